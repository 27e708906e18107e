//! Logging setup, powered by tracing-subscriber.
//!
//! The subscriber also installs the `log` bridge, so events from the
//! adapters crate (which logs through the `log` facade) end up in the same
//! output.

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Base level plus clamps for chatty dependencies.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut directives = vec![level.to_string()];
    for (target, lvl) in [("hyper", "warn"), ("h2", "warn"), ("tower", "warn"), ("rusqlite", "warn")] {
        directives.push(format!("{target}={lvl}"));
    }

    let filter = directives.join(",");
    EnvFilter::try_new(&filter).map_err(|e| anyhow::anyhow!("invalid log filter '{filter}': {e}"))
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over `level`.
pub fn init_logging(level: &str, format: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_env_filter(level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match LogFormat::parse(format) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Compact);
    }

    #[test]
    fn filter_accepts_levels_and_rejects_garbage() {
        assert!(build_env_filter("debug").is_ok());
        assert!(build_env_filter("opsportal=trace").is_ok());
        assert!(build_env_filter("info,opsportal=loud").is_err());
    }
}
