//! Object store implementations - Supabase-compatible HTTP storage and in-memory fallback.

mod memory;
mod supabase;

pub use memory::InMemoryObjectStore;
pub use supabase::{StorageConfig, SupabaseObjectStore};
