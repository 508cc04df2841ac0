pub mod aggregator;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod probe;
pub mod scheduler;
pub mod shutdown;
pub mod tracker;

pub use aggregator::{AlertBatch, PendingAlert};
pub use dispatch::AlertDispatcher;
pub use error::CheckerError;
pub use logging::init_logging;
pub use probe::{HttpProber, ProbeSettings, Prober};
pub use scheduler::{CyclePhase, CycleReport, Scheduler, SchedulerHandle, SchedulerSettings};
pub use shutdown::{wait_for_signal, ShutdownSignal};
pub use tracker::{MemoryTracker, TransitionTracker};
