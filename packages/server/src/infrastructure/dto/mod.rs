//! Data Transfer Objects (DTOs) for the HTTP API.
//!
//! WebSocket payloads are the domain `Envelope` itself, so only the HTTP
//! responses need their own shapes.

pub mod http;
