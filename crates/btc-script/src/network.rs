//! Per-network address encoding parameters.

use serde::{Deserialize, Serialize};

/// Version bytes and bech32 prefix used when rendering addresses.
///
/// Passed explicitly to every address operation; there is no global
/// network setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainParams {
    /// Base58Check version byte for P2PKH addresses.
    pub address_version: u8,
    /// Base58Check version byte for P2SH addresses.
    pub p2sh_version: u8,
    /// Human readable part for segwit addresses.
    pub bech32_hrp: String,
}

impl ChainParams {
    /// Bitcoin mainnet parameters.
    pub fn mainnet() -> Self {
        Network::Mainnet.params()
    }

    /// Testnet parameters.
    pub fn testnet() -> Self {
        Network::Testnet.params()
    }

    /// Regtest parameters.
    pub fn regtest() -> Self {
        Network::Regtest.params()
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Bitcoin network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet (`bc`).
    Mainnet,
    /// Public testnet (`tb`).
    Testnet,
    /// Local regression test network (`bcrt`).
    Regtest,
}

impl Network {
    /// Address parameters for this network.
    pub fn params(self) -> ChainParams {
        let (address_version, p2sh_version, hrp) = match self {
            Network::Mainnet => (0x00, 0x05, "bc"),
            Network::Testnet => (0x6f, 0xc4, "tb"),
            Network::Regtest => (0x6f, 0xc4, "bcrt"),
        };
        ChainParams {
            address_version,
            p2sh_version,
            bech32_hrp: hrp.to_string(),
        }
    }
}

impl From<Network> for ChainParams {
    fn from(network: Network) -> Self {
        network.params()
    }
}
