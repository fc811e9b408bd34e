//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Login and logout.
pub mod auth;
/// Static lookup lists.
pub mod lists;
/// Material upload and review.
pub mod materials;
/// Notifications and chat.
pub mod messages;
/// Profile settings and operation log.
pub mod profile;
/// User center: profile, menu, projects, teams and certification.
pub mod user;
