/// Bitcoin address handling.
///
/// Legacy P2PKH and P2SH addresses are Base58Check strings of a version
/// byte followed by a 20-byte hash. Version 0 witness outputs (P2WPKH and
/// P2WSH) use bech32 with the network's human readable part.

use std::fmt;

use bech32::primitives::gf32::Fe32;
use bech32::primitives::hrp::Hrp;
use bech32::segwit;
use btc_primitives::base58;
use btc_primitives::hash::{hash160, HASH160_SIZE};

use crate::network::ChainParams;
use crate::script::Script;
use crate::ScriptError;

/// Standard output types that have an address form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressType {
    /// Pay to public key hash.
    P2pkh,
    /// Pay to script hash.
    P2sh,
    /// Pay to witness public key hash.
    P2wpkh,
    /// Pay to witness script hash.
    P2wsh,
}

impl AddressType {
    /// Lowercase name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::P2pkh => "p2pkh",
            AddressType::P2sh => "p2sh",
            AddressType::P2wpkh => "p2wpkh",
            AddressType::P2wsh => "p2wsh",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded address.
///
/// `hash` is the 20-byte hash for P2PKH, P2SH and P2WPKH, and the 32-byte
/// witness program for P2WSH.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The encoded address string.
    pub address_string: String,
    /// Which output template the address pays to.
    pub address_type: AddressType,
    /// The hash or witness program committed to by the address.
    pub hash: Vec<u8>,
}

impl Address {
    /// Derive the address of a standard output script.
    ///
    /// Templates are tried in the order P2PKH, P2WPKH, P2WSH, P2SH. Scripts
    /// that match none of them, or whose pushed hash cannot be encoded,
    /// have no address.
    ///
    /// # Arguments
    /// * `script` - The output script.
    /// * `params` - Version bytes and bech32 prefix of the target network.
    ///
    /// # Returns
    /// `Some(Address)` for a recognised template, `None` otherwise.
    pub fn from_script(script: &Script, params: &ChainParams) -> Option<Self> {
        let chunks = script.chunks();
        let address = if script.is_p2pkh() {
            Self::legacy(chunks[2].data()?, params.address_version, AddressType::P2pkh)
        } else if script.is_p2wpkh() {
            Self::witness_v0(chunks[1].data()?, &params.bech32_hrp, AddressType::P2wpkh)
        } else if script.is_p2wsh() {
            Self::witness_v0(chunks[1].data()?, &params.bech32_hrp, AddressType::P2wsh)
        } else if script.is_p2sh() {
            Self::legacy(chunks[1].data()?, params.p2sh_version, AddressType::P2sh)
        } else {
            None
        };
        match &address {
            Some(addr) => tracing::trace!(address_type = %addr.address_type, "derived address"),
            None => tracing::trace!(script = %script, "script has no address form"),
        }
        address
    }

    /// Create a P2PKH address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; HASH160_SIZE], params: &ChainParams) -> Self {
        Address {
            address_string: legacy_string(params.address_version, hash),
            address_type: AddressType::P2pkh,
            hash: hash.to_vec(),
        }
    }

    /// Create a P2PKH address from serialized public key bytes.
    pub fn from_public_key(public_key: &[u8], params: &ChainParams) -> Self {
        Self::from_public_key_hash(&hash160(public_key), params)
    }

    /// Parse an address string for the given network.
    ///
    /// Strings starting with the network's bech32 prefix and separator are
    /// decoded as segwit addresses; anything else as Base58Check.
    ///
    /// # Arguments
    /// * `addr` - The address string.
    /// * `params` - The network the address must belong to.
    ///
    /// # Returns
    /// An `Address`, or an error if the string is malformed or belongs to
    /// another network.
    pub fn from_string(addr: &str, params: &ChainParams) -> Result<Self, ScriptError> {
        let segwit_prefix = format!("{}1", params.bech32_hrp.to_ascii_lowercase());
        if addr.to_ascii_lowercase().starts_with(&segwit_prefix) {
            Self::from_segwit_string(addr, params)
        } else {
            Self::from_base58_string(addr, params)
        }
    }

    /// The output script paying to this address.
    pub fn script_pubkey(&self) -> Result<Script, ScriptError> {
        match self.address_type {
            AddressType::P2pkh => Script::to_p2pkh(&self.hash),
            AddressType::P2sh => Script::to_p2sh(&self.hash),
            AddressType::P2wpkh => Script::to_p2wpkh(&self.hash),
            AddressType::P2wsh => Script::to_p2wsh_from_hash(&self.hash),
        }
    }

    fn legacy(hash: &[u8], version: u8, address_type: AddressType) -> Option<Self> {
        if hash.len() != HASH160_SIZE {
            tracing::debug!(len = hash.len(), "legacy address hash must be 20 bytes");
            return None;
        }
        Some(Address {
            address_string: legacy_string(version, hash),
            address_type,
            hash: hash.to_vec(),
        })
    }

    fn witness_v0(program: &[u8], hrp: &str, address_type: AddressType) -> Option<Self> {
        let hrp = Hrp::parse(hrp)
            .map_err(|e| tracing::debug!(error = %e, "invalid bech32 prefix"))
            .ok()?;
        let address_string = segwit::encode(hrp, Fe32::Q, program)
            .map_err(|e| tracing::debug!(error = %e, "witness program not encodable"))
            .ok()?;
        Some(Address {
            address_string,
            address_type,
            hash: program.to_vec(),
        })
    }

    fn from_base58_string(addr: &str, params: &ChainParams) -> Result<Self, ScriptError> {
        let payload = base58::check_decode(addr)?;
        if payload.len() != 1 + HASH160_SIZE {
            return Err(ScriptError::InvalidAddress(format!(
                "'{}' decodes to {} bytes, expected {}",
                addr,
                payload.len(),
                1 + HASH160_SIZE
            )));
        }
        let address_type = if payload[0] == params.address_version {
            AddressType::P2pkh
        } else if payload[0] == params.p2sh_version {
            AddressType::P2sh
        } else {
            return Err(ScriptError::UnsupportedAddress(format!(
                "'{}' has version byte {:#04x}",
                addr, payload[0]
            )));
        };
        Ok(Address {
            address_string: addr.to_string(),
            address_type,
            hash: payload[1..].to_vec(),
        })
    }

    fn from_segwit_string(addr: &str, params: &ChainParams) -> Result<Self, ScriptError> {
        let (hrp, version, program) = segwit::decode(addr)
            .map_err(|e| ScriptError::InvalidAddress(format!("'{}': {}", addr, e)))?;
        if !hrp.to_lowercase().eq_ignore_ascii_case(&params.bech32_hrp) {
            return Err(ScriptError::UnsupportedAddress(format!(
                "'{}' belongs to network prefix '{}'",
                addr, hrp
            )));
        }
        if version != Fe32::Q {
            return Err(ScriptError::UnsupportedAddress(format!(
                "'{}' is a version {} witness program",
                addr,
                version.to_u8()
            )));
        }
        let address_type = match program.len() {
            20 => AddressType::P2wpkh,
            32 => AddressType::P2wsh,
            n => {
                return Err(ScriptError::InvalidAddress(format!(
                    "'{}' has a {}-byte version 0 program",
                    addr, n
                )))
            }
        };
        Ok(Address {
            address_string: addr.to_ascii_lowercase(),
            address_type,
            hash: program,
        })
    }
}

fn legacy_string(version: u8, hash: &[u8]) -> String {
    let mut payload = Vec::with_capacity(1 + hash.len());
    payload.push(version);
    payload.extend_from_slice(hash);
    base58::check_encode(&payload)
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

impl Script {
    /// The address string of this script, if it is a standard output with an
    /// address form. See [`Address::from_script`].
    pub fn to_address(&self, params: &ChainParams) -> Option<String> {
        Address::from_script(self, params).map(|addr| addr.address_string)
    }
}
