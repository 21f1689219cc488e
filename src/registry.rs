use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Controls the synthetic value range of a metric: values fall in
/// `[baseline, baseline + spread)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricProfile {
    pub baseline: f64,
    pub spread: f64,
}

/// Known metrics and their profiles. Built once at startup and shared
/// read-only; nothing can be added after construction.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    profiles: BTreeMap<String, MetricProfile>,
}

impl MetricRegistry {
    pub fn new<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = (S, MetricProfile)>,
        S: Into<String>,
    {
        MetricRegistry {
            profiles: profiles
                .into_iter()
                .map(|(id, profile)| (id.into(), profile))
                .collect(),
        }
    }

    pub fn lookup(&self, metric_id: &str) -> Result<&MetricProfile> {
        self.profiles
            .get(metric_id)
            .ok_or_else(|| Error::UnknownMetric { metric: metric_id.to_string() })
    }

    /// Metric ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        MetricRegistry::new([
            ("total-revenue", MetricProfile { baseline: 20_000.0, spread: 5_000.0 }),
            ("total-pax", MetricProfile { baseline: 1_000.0, spread: 250.0 }),
        ])
    }
}
