//! A simple in-memory metrics recorder for testing.
//!
//! Metrics are stored under `name{label=value,...}`, e.g.
//! `notifications_sent_total{type=track}`.

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, Unit};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct TestMetrics {
    counters: Arc<Mutex<HashMap<String, u64>>>,
    gauges: Arc<Mutex<HashMap<String, f64>>>,
    histograms: Arc<Mutex<HashMap<String, Vec<f64>>>>,
}

impl TestMetrics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get_counter(&self, name: &str) -> u64 {
        self.counters
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or(0)
    }

    pub fn get_gauge(&self, name: &str) -> Option<f64> {
        self.gauges.lock().unwrap().get(name).cloned()
    }

    pub fn histogram_samples(&self, name: &str) -> usize {
        self.histograms
            .lock()
            .unwrap()
            .get(name)
            .map_or(0, Vec::len)
    }
}

fn key_string(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|label| format!("{}={}", label.key(), label.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for TestMetrics {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: metrics::SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: metrics::SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: metrics::SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(MetricCounter {
            name: key_string(key),
            counters: self.counters.clone(),
        }))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(MetricGauge {
            name: key_string(key),
            gauges: self.gauges.clone(),
        }))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(MetricHistogram {
            name: key_string(key),
            histograms: self.histograms.clone(),
        }))
    }
}

#[derive(Debug)]
struct MetricCounter {
    name: String,
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl metrics::CounterFn for MetricCounter {
    fn increment(&self, value: u64) {
        let mut counters = self.counters.lock().unwrap();
        *counters.entry(self.name.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        self.counters.lock().unwrap().insert(self.name.clone(), value);
    }
}

#[derive(Debug)]
struct MetricGauge {
    name: String,
    gauges: Arc<Mutex<HashMap<String, f64>>>,
}

impl metrics::GaugeFn for MetricGauge {
    fn increment(&self, value: f64) {
        *self.gauges.lock().unwrap().entry(self.name.clone()).or_insert(0.0) += value;
    }

    fn decrement(&self, value: f64) {
        *self.gauges.lock().unwrap().entry(self.name.clone()).or_insert(0.0) -= value;
    }

    fn set(&self, value: f64) {
        self.gauges.lock().unwrap().insert(self.name.clone(), value);
    }
}

#[derive(Debug)]
struct MetricHistogram {
    name: String,
    histograms: Arc<Mutex<HashMap<String, Vec<f64>>>>,
}

impl metrics::HistogramFn for MetricHistogram {
    fn record(&self, value: f64) {
        self.histograms
            .lock()
            .unwrap()
            .entry(self.name.clone())
            .or_default()
            .push(value);
    }
}
