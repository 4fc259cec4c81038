//! Tracing for the `pretraffic` binary.
//!
//! Every gate invocation runs inside the span from
//! [`gate_span`](crate::obs::gate_span). The JSON format flattens that span
//! onto each line, so log pipelines can group lines by `invocation_id`
//! without reassembling span trees.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber on stderr.
///
/// `RUST_LOG` wins over `level`. stdout is left for the response document
/// the binary prints. A second call is a no-op.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json().with_current_span(true).with_span_list(false))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
