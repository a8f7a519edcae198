//! Registry contract tests: registration idempotency, schema enforcement,
//! accumulator semantics.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use loadlab_core::{MetricDesc, MetricsError, Registry};

fn counter_desc() -> MetricDesc {
    MetricDesc::counter("req_total", "Requests", &["method", "status"])
}

#[test]
fn register_is_idempotent_for_identical_schema() {
    let r = Registry::new();
    r.register(counter_desc()).unwrap();
    r.register(counter_desc()).unwrap();
}

#[test]
fn register_rejects_conflicting_schema() {
    let r = Registry::new();
    r.register(counter_desc()).unwrap();
    let err = r
        .register(MetricDesc::gauge("req_total", "Requests", &["method", "status"]))
        .expect_err("kind change must fail");
    assert!(matches!(err, MetricsError::DuplicateMetric(name) if name == "req_total"));

    let err = r
        .register(MetricDesc::counter("req_total", "Requests", &["method"]))
        .expect_err("label schema change must fail");
    assert!(matches!(err, MetricsError::DuplicateMetric(_)));
}

#[test]
fn unknown_metric_is_rejected() {
    let r = Registry::new();
    let err = r.inc("nope_total", &[]).expect_err("must fail");
    assert!(matches!(err, MetricsError::UnknownMetric(name) if name == "nope_total"));
}

#[test]
fn label_mismatch_is_rejected() {
    let r = Registry::new();
    r.register(counter_desc()).unwrap();

    // missing label
    let err = r.inc("req_total", &[("method", "GET")]).expect_err("must fail");
    assert!(matches!(err, MetricsError::LabelMismatch { .. }));

    // extra label
    let err = r
        .inc(
            "req_total",
            &[("method", "GET"), ("status", "200"), ("extra", "x")],
        )
        .expect_err("must fail");
    assert!(matches!(err, MetricsError::LabelMismatch { .. }));

    // wrong name
    let err = r
        .inc("req_total", &[("method", "GET"), ("code", "200")])
        .expect_err("must fail");
    assert!(matches!(err, MetricsError::LabelMismatch { .. }));
}

#[test]
fn label_order_does_not_matter() {
    let r = Registry::new();
    r.register(counter_desc()).unwrap();
    r.inc("req_total", &[("method", "GET"), ("status", "200")])
        .unwrap();
    r.inc("req_total", &[("status", "200"), ("method", "GET")])
        .unwrap();
    let v = r
        .counter_value("req_total", &[("status", "200"), ("method", "GET")])
        .unwrap();
    assert_eq!(v, 2.0);
}

#[test]
fn counters_reject_negative_and_nonfinite_amounts() {
    let r = Registry::new();
    r.register(counter_desc()).unwrap();
    let labels = [("method", "GET"), ("status", "200")];
    assert!(matches!(
        r.add("req_total", &labels, -1.0),
        Err(MetricsError::InvalidArgument(_))
    ));
    assert!(matches!(
        r.add("req_total", &labels, f64::NAN),
        Err(MetricsError::InvalidArgument(_))
    ));
    // zero is a legal (no-op) increment
    r.add("req_total", &labels, 0.0).unwrap();
    assert_eq!(r.counter_value("req_total", &labels).unwrap(), 0.0);
}

#[test]
fn kind_mismatch_is_rejected() {
    let r = Registry::new();
    r.register(counter_desc()).unwrap();
    let labels = [("method", "GET"), ("status", "200")];
    assert!(matches!(
        r.set("req_total", &labels, 1.0),
        Err(MetricsError::KindMismatch { .. })
    ));
    assert!(matches!(
        r.observe("req_total", &labels, 1.0),
        Err(MetricsError::KindMismatch { .. })
    ));
}

#[test]
fn gauge_set_replaces_and_add_accumulates() {
    let r = Registry::new();
    r.register(MetricDesc::gauge("active", "Active", &[])).unwrap();
    r.set("active", &[], 10.0).unwrap();
    r.set("active", &[], 4.0).unwrap();
    assert_eq!(r.gauge_value("active", &[]).unwrap(), 4.0);

    r.gauge_inc("active", &[]).unwrap();
    r.gauge_inc("active", &[]).unwrap();
    r.gauge_dec("active", &[]).unwrap();
    assert_eq!(r.gauge_value("active", &[]).unwrap(), 5.0);
}

#[test]
fn histogram_bucket_validation() {
    let r = Registry::new();
    assert!(matches!(
        r.register(MetricDesc::histogram("h", "h", &[], &[])),
        Err(MetricsError::InvalidArgument(_))
    ));
    assert!(matches!(
        r.register(MetricDesc::histogram("h", "h", &[], &[1.0, 0.5])),
        Err(MetricsError::InvalidArgument(_))
    ));
    r.register(MetricDesc::histogram("h", "h", &[], &[0.5, 1.0]))
        .unwrap();
}

#[test]
fn histogram_count_tracks_observations() {
    let r = Registry::new();
    r.register(MetricDesc::histogram(
        "lat_seconds",
        "Latency",
        &["endpoint"],
        &[0.1, 0.5, 1.0],
    ))
    .unwrap();
    let labels = [("endpoint", "homepage")];
    r.observe("lat_seconds", &labels, 0.05).unwrap();
    r.observe("lat_seconds", &labels, 3.0).unwrap();
    assert_eq!(r.histogram_count("lat_seconds", &labels).unwrap(), 2);
}

#[test]
fn concurrent_updates_are_not_lost() {
    use std::sync::Arc;

    let r = Arc::new(Registry::new());
    r.register(MetricDesc::gauge("live", "Live", &[])).unwrap();
    r.register(MetricDesc::counter("hits_total", "Hits", &[]))
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let r = Arc::clone(&r);
        handles.push(std::thread::spawn(move || {
            for _ in 0..1000 {
                r.inc("hits_total", &[]).unwrap();
                r.gauge_inc("live", &[]).unwrap();
                r.gauge_dec("live", &[]).unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(r.counter_value("hits_total", &[]).unwrap(), 8000.0);
    assert_eq!(r.gauge_value("live", &[]).unwrap(), 0.0);
}
