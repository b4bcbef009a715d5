use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "chmm_core=warn";

/// Install a subscriber writing to stderr.
///
/// `RUST_LOG` overrides the default filter. With `json`, events and span
/// closings are emitted as JSON lines.
pub fn init_tracing(json: bool) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_env_filter(filter);
        if json {
            builder.json().with_span_events(FmtSpan::CLOSE).init();
        } else {
            builder.init();
        }
    });
}
