//! Engawa chat relay.
//!
//! Participants connect over WebSocket under a unique name, receive the
//! recent backlog, and exchange messages that are broadcast to everyone in
//! a single consistent order.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
