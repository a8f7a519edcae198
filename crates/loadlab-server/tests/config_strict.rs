#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use loadlab_server::config;
use loadlab_server::error::ConfigError;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:5000"
sampler:
  intervall_ms: 5000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:5000"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "127.0.0.1:5000");
    assert_eq!(cfg.sampler.interval_ms, 5000);
    assert_eq!(cfg.sampler.cpu_window_ms, 1000);
}

#[test]
fn empty_config_gets_defaults() {
    let cfg = config::load_from_str("version: 1").expect("must parse");
    assert_eq!(cfg.server.listen, "0.0.0.0:5000");
    assert_eq!(cfg.build.environment, "development");
}

#[test]
fn sampler_ranges_are_enforced() {
    let too_fast = r#"
version: 1
sampler:
  interval_ms: 10
"#;
    let err = config::load_from_str(too_fast).expect_err("must fail");
    assert!(matches!(err, ConfigError::Invalid(_)));

    let window_exceeds_interval = r#"
version: 1
sampler:
  interval_ms: 1000
  cpu_window_ms: 1000
"#;
    let err = config::load_from_str(window_exceeds_interval).expect_err("must fail");
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn unsupported_version_is_rejected() {
    let err = config::load_from_str("version: 2").expect_err("must fail");
    assert!(matches!(err, ConfigError::UnsupportedVersion));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = config::load_or_default("definitely-not-here.yaml").expect("defaults");
    assert_eq!(cfg.server.listen, "0.0.0.0:5000");
}
