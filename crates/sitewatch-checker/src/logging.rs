use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use sitewatch_config::LoggingConfig;

/// 初始化日志，`RUST_LOG` 优先于配置文件中的级别
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| anyhow!("invalid log level {:?}: {}", config.level, e))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_level() {
        let config = LoggingConfig {
            level: "sitewatch=verbose".to_string(),
            json: false,
        };

        // RUST_LOG 存在时不会读取配置中的级别
        if std::env::var("RUST_LOG").is_err() {
            assert!(init_logging(&config).is_err());
        }
    }
}
