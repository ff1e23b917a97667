//! Outbound adapters implementing the domain ports.

pub mod jsonfile;
pub mod render;
pub mod supabase;
