//! Integration tests for the Chirp client.
//!
//! Each test drives a real [`chirp_client::Session`] over loopback TCP
//! against a scripted mock server from [`harness`], exercising the full
//! request/response path including framing, payloads, and fault handling.

pub mod harness;

#[cfg(test)]
mod session_tests;
