//! Session registry implementations.
//!
//! - `inmemory`: process-local registry guarded by a single mutex

pub mod inmemory;

pub use inmemory::InMemorySessionRegistry;
