//! Step definitions for command dispatch scenarios.

mod given;
mod then;
mod when;
pub mod world;
