pub mod error;
pub mod memory;
pub mod store;
pub mod supabase;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{ObservationStore, SiteDirectory, HISTORY_LIMIT};
pub use supabase::{SupabaseConfig, SupabaseStore};
