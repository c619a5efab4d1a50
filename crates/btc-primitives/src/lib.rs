/// btc-sdk - Hashing and encoding primitives.
///
/// This crate provides the collaborators the script codec leans on:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Base58 and Base58Check encoding/decoding

pub mod hash;
pub mod base58;

mod error;
pub use error::PrimitivesError;
