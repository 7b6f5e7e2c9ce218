use prometheus::{
    Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Prometheus counters for the search-history service, all registered in
/// their own registry so tests can create as many instances as they need.
#[derive(Clone, Debug)]
pub struct ServerMetrics {
    pub registry: Registry,

    pub request_errors: IntCounterVec,
    pub searches_recorded: IntCounter,
    pub history_reads: IntCounter,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        ServerMetrics::new().expect("Failed to create default ServerMetrics")
    }
}

impl ServerMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let request_errors = IntCounterVec::new(
            Opts::new(
                "request_errors",
                "A metric counting request errors by handler and error code",
            ),
            &["handler", "error_code"],
        )?;

        let searches_recorded = IntCounter::with_opts(Opts::new(
            "searches_recorded",
            "A metric counting successfully recorded search queries",
        ))?;

        let history_reads = IntCounter::with_opts(Opts::new(
            "history_reads",
            "A metric counting successful history reads",
        ))?;

        let registry = Registry::new();
        registry.register(Box::new(request_errors.clone()))?;
        registry.register(Box::new(searches_recorded.clone()))?;
        registry.register(Box::new(history_reads.clone()))?;

        Ok(Self {
            registry,
            request_errors,
            searches_recorded,
            history_reads,
        })
    }

    pub fn record_error(&self, handler: &str, error_code: &str) {
        self.request_errors
            .with_label_values(&[handler, error_code])
            .inc();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!("Failed to encode metrics: {e}");
            return String::new();
        }

        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::ServerMetrics;

    #[test]
    fn record_error_shows_up_in_rendered_output() {
        let metrics = ServerMetrics::new().unwrap();
        metrics.record_error("search_recent", "invalid_limit");
        metrics.record_error("search_recent", "invalid_limit");

        let rendered = metrics.render();
        assert!(rendered.contains("request_errors"));
        assert!(rendered.contains("invalid_limit"));
        assert!(rendered.contains("2"));
    }

    #[test]
    fn domain_counters_render_at_zero() {
        let metrics = ServerMetrics::new().unwrap();
        let rendered = metrics.render();
        assert!(rendered.contains("searches_recorded 0"));
        assert!(rendered.contains("history_reads 0"));
    }
}
