use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::registry::MetricRegistry;
use crate::series::{self, DateRange, Series};

/// Read-only state shared by every request.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub registry: MetricRegistry,
    /// Longest accepted range in days; `None` accepts any length.
    pub max_range_days: Option<u32>,
}

impl AppState {
    pub fn new(registry: MetricRegistry, max_range_days: Option<u32>) -> Self {
        AppState { registry, max_range_days }
    }

    /// Validates a request and generates its series.
    ///
    /// Checks run in a fixed order: metric, `from`, `to`, ordering, length.
    pub fn series(&self, metric: &str, from: &str, to: &str) -> Result<Series> {
        let profile = self.registry.lookup(metric)?;
        let range = DateRange::parse(from, to)?;
        if let Some(max) = self.max_range_days {
            range.ensure_at_most(max)?;
        }
        Ok(series::generate(metric, profile, &range))
    }
}

/// `from` and `to` as sent. A repeated parameter keeps its first value.
#[derive(Debug, Default, PartialEq)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = RangeParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut params.from,
                "to" => &mut params.to,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "metricgen",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_metrics(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.registry.ids().map(str::to_string).collect())
}

pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Series>> {
    let params = RangeParams::from_pairs(pairs);
    let from = params.from.unwrap_or_default();
    let to = params.to.unwrap_or_default();

    // Long ranges are CPU bound; keep them off the async workers.
    let result = {
        let (metric, from, to) = (metric.clone(), from.clone(), to.clone());
        tokio::task::spawn_blocking(move || state.series(&metric, &from, &to)).await?
    };

    match result {
        Ok(series) => {
            debug!(metric = %metric, from = %from, to = %to, points = series.len(), "generated series");
            Ok(Json(series))
        }
        Err(e) => {
            warn!(metric = %metric, from = %from, to = %to, error = %e, "rejected series request");
            Err(e)
        }
    }
}
