#![deny(missing_docs)]

//! Bitcoin script codec SDK.
//!
//! Re-exports the SDK components for convenient single-crate usage.

pub use btc_primitives as primitives;
pub use btc_script as script;
