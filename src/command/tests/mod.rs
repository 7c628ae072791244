//! Unit tests for the command module.
//!
//! Tests are organised by concept: tokenization, option parsing, command
//! definitions, the access policy, the in-memory adapters, the registry,
//! help rendering, configuration and the dispatch pipeline.
