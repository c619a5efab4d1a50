//! Hash functions used by script commitments and address checksums.
//!
//! `sha256` commits P2WSH redeem scripts, `hash160` commits P2SH redeem
//! scripts and public keys, and `sha256d` produces Base58Check checksums.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Size in bytes of a `hash160` digest.
pub const HASH160_SIZE: usize = 20;

/// Size in bytes of a `sha256` digest.
pub const SHA256_SIZE: usize = 32;

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; SHA256_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256(SHA-256(data)).
///
/// The first four bytes of this digest form the Base58Check checksum.
pub fn sha256d(data: &[u8]) -> [u8; SHA256_SIZE] {
    sha256(&sha256(data))
}

/// Compute the RIPEMD-160 digest of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; HASH160_SIZE] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute RIPEMD-160(SHA-256(data)).
///
/// This is the 20-byte commitment embedded in P2PKH, P2WPKH and P2SH
/// locking scripts.
pub fn hash160(data: &[u8]) -> [u8; HASH160_SIZE] {
    ripemd160(&sha256(data))
}
