use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

use crate::SiteWatchConfig;

/// 环境变量前缀，例如 `SITEWATCH_SMTP__PASSWORD`
pub const ENV_PREFIX: &str = "SITEWATCH";

/// 配置加载器
pub struct ConfigLoader {
    config_path: PathBuf,
    use_env: bool,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            use_env: true,
        }
    }

    /// 不读取环境变量（测试用）
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// 加载配置：默认值 → 配置文件（可选） → 环境变量
    pub fn load(&self) -> Result<SiteWatchConfig> {
        let path = self
            .config_path
            .to_str()
            .ok_or_else(|| anyhow!("Invalid config path"))?;

        let mut builder = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false));

        if self.use_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: SiteWatchConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// 加载并验证
    pub fn load_validated(&self) -> Result<SiteWatchConfig> {
        let config = self.load()?;
        validate(&config)?;
        Ok(config)
    }
}

/// 验证配置
pub fn validate(config: &SiteWatchConfig) -> Result<()> {
    if config.checker.interval_secs == 0 {
        return Err(anyhow!("checker.interval_secs must be greater than 0"));
    }

    if config.checker.probe_timeout_secs == 0 {
        return Err(anyhow!("checker.probe_timeout_secs must be greater than 0"));
    }

    if config.store.url.trim().is_empty() {
        return Err(anyhow!("store.url is required"));
    }

    if config.store.service_key.trim().is_empty() {
        return Err(anyhow!("store.service_key is required"));
    }

    if config.smtp.host.trim().is_empty() {
        return Err(anyhow!("smtp.host is required"));
    }

    if config.smtp.username.trim().is_empty() {
        return Err(anyhow!("smtp.username is required"));
    }

    Ok(())
}
