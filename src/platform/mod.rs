//! Platform abstraction layer
//!
//! Handles the inputs that arrive from outside the engine:
//! - Decoded QR payloads (bare id or URL carrying `id=`)
//! - The page URL's `?id=` query side channel
//! - Camera/decoder failures

pub mod scan;

pub use scan::{ScanSourceError, id_from_query, resolve_payload};
