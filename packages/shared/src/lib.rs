//! Utilities shared by the Engawa packages.

pub mod logger;
pub mod time;
