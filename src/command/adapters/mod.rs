//! Adapter implementations for dispatcher ports.

pub mod memory;
