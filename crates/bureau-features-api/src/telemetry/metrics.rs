//! Prometheus metrics for the feature service
//!
//! - `bureau_features_requests_total` (counter) - requests by endpoint and result
//! - `bureau_features_request_duration_seconds` (histogram) - feature computation latency
//! - `bureau_features_sentinel_total` (counter) - sentinel outputs by feature
//! - `bureau_features_contracts_per_request` (histogram) - contract list sizes

use bureau_features_core::{FeatureName, FeatureRecord};
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use super::{Result, TelemetryError};

const NAMESPACE: &str = "bureau_features";

/// Metrics registry and collectors for the service
pub struct FeatureMetrics {
    registry: Registry,

    /// Requests by endpoint and result (`ok`, `rejected`, `error`)
    requests_total: IntCounterVec,

    /// Feature computation duration by endpoint
    request_duration_seconds: HistogramVec,

    /// Sentinel outputs by feature and sentinel kind
    sentinel_total: IntCounterVec,

    /// Contracts received per request
    contracts_per_request: Histogram,
}

impl FeatureMetrics {
    /// Create collectors registered with a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("requests_total", "Total feature requests by endpoint and result")
                .namespace(NAMESPACE),
            &["endpoint", "result"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "request_duration_seconds",
                "Feature computation duration in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["endpoint"],
        )?;

        let sentinel_total = IntCounterVec::new(
            Opts::new("sentinel_total", "Feature values emitted as sentinels")
                .namespace(NAMESPACE),
            &["feature", "sentinel"],
        )?;

        let contracts_per_request = Histogram::with_opts(
            HistogramOpts::new("contracts_per_request", "Contracts received per request")
                .namespace(NAMESPACE)
                .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 500.0]),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(sentinel_total.clone()))?;
        registry.register(Box::new(contracts_per_request.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            sentinel_total,
            contracts_per_request,
        })
    }

    pub fn record_request(&self, endpoint: &str, result: &str) {
        self.requests_total.with_label_values(&[endpoint, result]).inc();
    }

    pub fn observe_duration(&self, endpoint: &str, seconds: f64) {
        self.request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(seconds);
    }

    pub fn observe_contracts(&self, count: usize) {
        self.contracts_per_request.observe(count as f64);
    }

    /// Count every sentinel present in a feature record
    pub fn record_features(&self, features: &FeatureRecord) {
        for name in FeatureName::ALL {
            if let Some(sentinel) = features.sentinel(name) {
                self.sentinel_total
                    .with_label_values(&[name.as_str(), sentinel.as_str()])
                    .inc();
            }
        }
    }

    /// Total requests seen for an endpoint and result
    pub fn request_count(&self, endpoint: &str, result: &str) -> u64 {
        self.requests_total.with_label_values(&[endpoint, result]).get()
    }

    /// Render all collectors in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(TelemetryError::MetricsError)?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::EncodingFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_render() {
        let metrics = FeatureMetrics::new().unwrap();
        metrics.record_request("calculate_features", "ok");
        metrics.record_request("calculate_features", "ok");
        metrics.observe_duration("calculate_features", 0.0004);
        metrics.observe_contracts(3);
        metrics.record_features(&FeatureRecord {
            tot_claim_cnt_l180d: -3,
            disb_bank_loan_wo_tbc: 0.0,
            day_sinlastloan: -1,
        });

        assert_eq!(metrics.request_count("calculate_features", "ok"), 2);

        let text = metrics.render().unwrap();
        assert!(text.contains("bureau_features_requests_total"));
        assert!(text.contains(
            "bureau_features_sentinel_total{feature=\"tot_claim_cnt_l180d\",sentinel=\"signal_absent\"} 1"
        ));
        assert!(text.contains(
            "bureau_features_sentinel_total{feature=\"day_sinlastloan\",sentinel=\"no_history\"} 1"
        ));
        assert!(!text.contains("feature=\"disb_bank_loan_wo_tbc\""));
    }
}
