pub mod loader;
pub mod settings;

pub use loader::{validate, ConfigLoader, ENV_PREFIX};
pub use settings::{CheckerConfig, LoggingConfig, SiteWatchConfig, SmtpConfig, StoreConfig};
