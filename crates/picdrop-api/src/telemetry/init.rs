use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "picdrop=debug,tower_http=debug";

/// Initialize console tracing.
///
/// `RUST_LOG` overrides the default filter. With `json_output` each event is a
/// JSON line, otherwise the compact human format is used. Calling this twice is
/// a no-op for the second caller.
pub fn init_telemetry(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if json_output {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        registry.with(console_fmt).try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }

    tracing::info!(json_output, "Tracing initialized");
    Ok(())
}
