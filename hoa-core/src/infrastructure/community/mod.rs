//! Community profile stores

pub mod memory;
pub mod supabase;

pub use memory::InMemoryCommunityStore;
pub use supabase::SupabaseCommunityStore;
