//! Host-facing contracts, adapters and error types.
//!
//! This module is platform-agnostic; host bridges (FFI, WASM, mobile) decode
//! wire contracts here and work with the domain types afterwards.

pub mod adapters;
pub mod contracts;
pub mod errors;
