//! Length-prefixed framing for RPC over plain HTTP.
//!
//! This crate is the I/O-free core of `protofetch`: it turns a single message
//! payload into a wire frame, and turns an arbitrarily chunked response body
//! back into discrete message payloads. Transports (see the
//! `protofetch-http-client` extension) feed it bytes as they arrive.

pub mod constants;
pub mod frame;
