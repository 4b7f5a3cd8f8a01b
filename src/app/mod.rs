//! Binary-local command handlers.
//!
//! `main.rs` keeps startup wiring; this module hosts the per-command logic so
//! it can be exercised with an in-memory store and a mock render sink.

pub(crate) mod theme;
