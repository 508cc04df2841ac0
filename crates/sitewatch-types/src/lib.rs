pub mod observation;
pub mod site;
pub mod status;

pub use observation::{Observation, ProbeResult};
pub use site::{display_name, Site};
pub use status::{ParseStatusError, SiteStatus};
