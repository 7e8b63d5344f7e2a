pub mod profile_handler;

pub use profile_handler::{get_profile, list_profiles, upsert_profile};
