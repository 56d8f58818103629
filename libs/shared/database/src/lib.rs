pub mod supabase;

pub use supabase::{InsertOutcome, StoreError, SupabaseClient};
