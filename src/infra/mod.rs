//! Infrastructure adapters: durable storage, session-local blobs, telemetry.

pub mod blobs;
pub mod error;
pub mod kv;
pub mod telemetry;
