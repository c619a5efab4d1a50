/// Error types for script operations.
///
/// Construction errors (`InvalidOpcode`, `DataTooBig`) and parse errors
/// (`TruncatedInput`) are the ones callers see in practice. Address
/// derivation from a script never errors; it yields `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// An integer does not resolve to a defined opcode.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(i64),

    /// A push data opcode was appended as a bare opcode.
    #[error("use append_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Push data longer than any push data header can describe.
    #[error("push data of {0} bytes exceeds the maximum encodable length")]
    DataTooBig(usize),

    /// A push declares more bytes than remain in the buffer.
    #[error("truncated input: push at offset {offset} needs {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A script text token is neither a mnemonic, a small integer nor hex.
    #[error("invalid script token '{0}'")]
    InvalidToken(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Address text that cannot be decoded.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address that decodes but belongs to another network or script type.
    #[error("address not supported: {0}")]
    UnsupportedAddress(String),

    #[error("script too large: {size} bytes exceeds {max}")]
    ScriptTooLarge { size: usize, max: usize },

    #[error("too many operations: {count} exceeds {max}")]
    TooManyOps { count: usize, max: usize },

    #[error("push data element too large: {size} bytes exceeds {max}")]
    ElementTooLarge { size: usize, max: usize },

    #[error("too many public keys in multisig: {count} exceeds {max}")]
    TooManyPubkeys { count: usize, max: usize },

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] btc_primitives::PrimitivesError),
}

impl From<hex::FromHexError> for ScriptError {
    fn from(e: hex::FromHexError) -> Self {
        ScriptError::InvalidHex(e.to_string())
    }
}
