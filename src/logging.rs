//! Log subscriber setup. Logs go to stderr; stdout carries the JSON output.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "csvviz=debug"
    } else {
        "csvviz=warn"
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `debug` when set.
pub fn init(debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(debug)))
        .map_err(|e| eyre!("Invalid log filter: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_level() {
        assert_eq!(default_directive(true), "csvviz=debug");
        assert_eq!(default_directive(false), "csvviz=warn");
    }
}
