pub mod message;
pub mod notifier;
pub mod providers;

pub use message::{NotifyMessage, DEFAULT_SUBJECT};
pub use notifier::{Delivery, Notifier, NotifyResult};
pub use providers::{EmailConfig, EmailNotifier};
