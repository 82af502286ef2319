pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Default to info level; allow override via RUST_LOG (e.g., "debug").
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a metrics-like line and bump the matching counter on whatever recorder is installed.
pub fn log_metric(scope: &str, metric: &str, value: u64) {
    tracing::trace!(scope = scope, metric = metric, value = value, "metric");
    metrics::counter!("mcp_events_total", "scope" => scope.to_owned(), "metric" => metric.to_owned())
        .increment(value);
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }

    #[test]
    fn log_metric_without_recorder_is_a_noop() {
        super::log_metric("tools/list", "requests_total", 1);
    }
}
