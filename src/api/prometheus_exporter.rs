use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;

use crate::api::api_error::ApiError;
use crate::db::DbConnection;

/// Operational counters exposed on /metrics. The registry is local to the
/// server instance so that the metric prefix stays configurable.
pub struct PrometheusExporter {
    registry: Registry,
    api_calls: IntCounterVec,
    countries: IntGauge,
}

impl PrometheusExporter {
    pub fn new(prefix: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let api_calls = IntCounterVec::new(
            Opts::new(
                format!("{}api_calls", prefix),
                "Count of handled API requests",
            ),
            &["operation", "status"],
        )?;
        let countries = IntGauge::new(
            format!("{}countries", prefix),
            "Count of country records in the store",
        )?;
        registry.register(Box::new(api_calls.clone()))?;
        registry.register(Box::new(countries.clone()))?;
        Ok(PrometheusExporter {
            registry,
            api_calls,
            countries,
        })
    }

    pub fn count_api_call(&self, operation: &str, status_code: u16) {
        self.api_calls
            .with_label_values(&[operation, &status_code.to_string()])
            .inc();
    }

    /// The store size gauge is refreshed at scrape time, there is no
    /// background collection.
    pub fn render(&self, connection: &dyn DbConnection) -> Result<rouille::Response, ApiError> {
        let count = connection.get_country_count()?;
        self.countries.set(count as i64);

        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|err| ApiError::ServerError(err.to_string()))?;
        let body =
            String::from_utf8(buffer).map_err(|err| ApiError::ServerError(err.to_string()))?;
        Ok(rouille::Response::text(body).with_no_cache())
    }
}
