/// Bitcoin script codec - building, parsing, classification and addresses.
///
/// Provides the immutable Script type and its builder, opcode definitions,
/// the push data codec, standard template detection and construction, and
/// P2PKH/P2SH/P2WPKH/P2WSH address derivation.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod num;
pub mod classify;
pub mod template;
pub mod network;
pub mod address;
pub mod policy;

mod error;
pub use error::ScriptError;
pub use script::{AppendItem, Script, ScriptBuilder};
pub use address::{Address, AddressType};
pub use chunk::ScriptChunk;
pub use network::{ChainParams, Network};
pub use opcodes::OpcodeTable;
pub use policy::Limits;
