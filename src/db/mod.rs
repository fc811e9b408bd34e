//! In-memory data behind the business endpoints.
//!
//! Profiles, menus, messages, materials and policies are fixture data held
//! in memory; nothing here persists across restarts. Credentials live in
//! [`crate::auth::credentials`], not here.

pub mod memory;

pub use memory::MockStore;
