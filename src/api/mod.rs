//! Class profile API modules.
//!
//! This module provides the REST client that fetches roster and class
//! profile snapshots.

pub mod client;

pub use client::ProfileClient;
