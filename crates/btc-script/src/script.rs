/// Bitcoin Script type - a sequence of opcodes and data pushes.
///
/// Scripts are built through a [`ScriptBuilder`], which owns the chunk list
/// exclusively while appends run, and then frozen into an immutable
/// [`Script`] that can be shared freely between readers.

use std::fmt;

use crate::chunk::{decode_script, ScriptChunk};
use crate::num::encode_script_num;
use crate::opcodes::*;
use crate::ScriptError;

/// Anything that can be appended to a script in one call.
///
/// Integers go through [`ScriptBuilder::append_opcode`], byte strings through
/// [`ScriptBuilder::append_data`], and lists append their items in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppendItem {
    /// An opcode byte or a small integer in `-1..=16`.
    Opcode(i64),
    /// Bytes pushed as a single chunk.
    Data(Vec<u8>),
    /// Items appended in order.
    List(Vec<AppendItem>),
}

impl From<u8> for AppendItem {
    fn from(op: u8) -> Self {
        AppendItem::Opcode(op as i64)
    }
}

impl From<i32> for AppendItem {
    fn from(value: i32) -> Self {
        AppendItem::Opcode(value as i64)
    }
}

impl From<i64> for AppendItem {
    fn from(value: i64) -> Self {
        AppendItem::Opcode(value)
    }
}

impl From<Vec<u8>> for AppendItem {
    fn from(data: Vec<u8>) -> Self {
        AppendItem::Data(data)
    }
}

impl From<&[u8]> for AppendItem {
    fn from(data: &[u8]) -> Self {
        AppendItem::Data(data.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for AppendItem {
    fn from(data: &[u8; N]) -> Self {
        AppendItem::Data(data.to_vec())
    }
}

impl From<Vec<AppendItem>> for AppendItem {
    fn from(items: Vec<AppendItem>) -> Self {
        AppendItem::List(items)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Exclusive, mutable handle used while a script is under construction.
///
/// Every append returns the builder so calls chain with `?`. A failed
/// append leaves the builder exactly as it was.
#[derive(Clone, Debug)]
pub struct ScriptBuilder<'t> {
    table: &'t OpcodeTable,
    chunks: Vec<ScriptChunk>,
}

impl ScriptBuilder<'static> {
    /// Create an empty builder backed by the standard opcode table.
    pub fn new() -> Self {
        ScriptBuilder::with_table(OpcodeTable::standard())
    }
}

impl Default for ScriptBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> ScriptBuilder<'t> {
    /// Create an empty builder resolving opcodes against `table`.
    pub fn with_table(table: &'t OpcodeTable) -> Self {
        ScriptBuilder {
            table,
            chunks: Vec::new(),
        }
    }

    /// Append a single opcode.
    ///
    /// Values in `-1..=16` are taken as small integers and mapped to
    /// `OP_1NEGATE`, `OP_0` and `OP_1..=OP_16`; anything else must be a
    /// defined opcode byte. Push data opcodes are rejected, use
    /// [`append_data`](Self::append_data) for those.
    pub fn append_opcode(&mut self, value: impl Into<i64>) -> Result<&mut Self, ScriptError> {
        let value = value.into();
        let op = self.resolve_opcode(value)?;
        self.chunks.push(ScriptChunk::opcode(op));
        Ok(self)
    }

    /// Append `data` as a single push with the header chosen by the push
    /// data codec.
    pub fn append_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        let chunk = ScriptChunk::push(data)?;
        self.chunks.push(chunk);
        Ok(self)
    }

    /// Append an integer using the small-integer opcode when one exists and
    /// a minimal script number push otherwise.
    pub fn append_number(&mut self, n: i64) -> Result<&mut Self, ScriptError> {
        match small_int_to_opcode(n) {
            Some(op) => {
                self.chunks.push(ScriptChunk::opcode(op));
                Ok(self)
            }
            None => self.append_data(&encode_script_num(n)),
        }
    }

    /// Append an opcode, a byte string, or a list of those.
    ///
    /// Lists are applied atomically: if any item fails nothing from the
    /// list is kept.
    pub fn append(&mut self, item: impl Into<AppendItem>) -> Result<&mut Self, ScriptError> {
        let mark = self.chunks.len();
        if let Err(e) = self.append_item(item.into()) {
            self.chunks.truncate(mark);
            return Err(e);
        }
        Ok(self)
    }

    /// Append every chunk of an existing script.
    pub fn append_script(&mut self, script: &Script) -> &mut Self {
        self.chunks.extend_from_slice(script.chunks());
        self
    }

    /// The chunks appended so far.
    pub fn chunks(&self) -> &[ScriptChunk] {
        &self.chunks
    }

    /// Copy the current state into a [`Script`] without consuming the builder.
    pub fn to_script(&self) -> Script {
        Script {
            chunks: self.chunks.clone(),
        }
    }

    /// Freeze the builder into an immutable [`Script`].
    pub fn into_script(self) -> Script {
        Script {
            chunks: self.chunks,
        }
    }

    fn append_item(&mut self, item: AppendItem) -> Result<(), ScriptError> {
        match item {
            AppendItem::Opcode(value) => self.append_opcode(value).map(|_| ()),
            AppendItem::Data(data) => self.append_data(&data).map(|_| ()),
            AppendItem::List(items) => items
                .into_iter()
                .try_for_each(|item| self.append_item(item)),
        }
    }

    fn resolve_opcode(&self, value: i64) -> Result<u8, ScriptError> {
        let op = match self.table.small_int_opcode(value) {
            Some(op) => op,
            None => u8::try_from(value)
                .ok()
                .filter(|&op| self.table.is_defined(op))
                .ok_or(ScriptError::InvalidOpcode(value))?,
        };
        if is_push_data_op(op) {
            let name = self.table.name_for_code(op).unwrap_or(UNKNOWN_OPCODE_NAME);
            return Err(ScriptError::InvalidOpcodeType(name.to_string()));
        }
        Ok(op)
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// An immutable Bitcoin script: an ordered list of chunks.
///
/// Two scripts are equal when their chunk sequences are equal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script {
    chunks: Vec<ScriptChunk>,
}

impl Script {
    /// Create a new empty script.
    pub fn new() -> Self {
        Script { chunks: Vec::new() }
    }

    /// Start building a script with the standard opcode table.
    pub fn builder() -> ScriptBuilder<'static> {
        ScriptBuilder::new()
    }

    /// Parse a script from its wire payload.
    ///
    /// Chunks are read one at a time until the buffer is consumed exactly.
    /// A push whose declared length runs past the end of the buffer fails
    /// with [`ScriptError::TruncatedInput`].
    pub fn parse_from_payload(bytes: &[u8]) -> Result<Self, ScriptError> {
        let chunks = decode_script(bytes)?;
        tracing::trace!(bytes = bytes.len(), chunks = chunks.len(), "parsed script payload");
        Ok(Script { chunks })
    }

    /// Parse a script from the hex encoding of its payload.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str)?;
        Self::parse_from_payload(&bytes)
    }

    /// The flat wire encoding: every chunk's bytes in order.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        for chunk in &self.chunks {
            chunk.encode_to(&mut out);
        }
        out
    }

    /// Lowercase hex of [`to_payload`](Self::to_payload).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_payload())
    }

    /// Length in bytes of the wire payload.
    pub fn size(&self) -> usize {
        self.chunks.iter().map(ScriptChunk::encoded_len).sum()
    }

    /// The chunks making up this script.
    pub fn chunks(&self) -> &[ScriptChunk] {
        &self.chunks
    }

    /// True if the script has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Render the script as whitespace separated text.
    ///
    /// Opcodes appear by mnemonic and pushes as hex, the format accepted by
    /// [`Script::from_string`]. Reading the text back gives the same chunks
    /// for any script whose pushes use the shortest header.
    pub fn to_asm(&self) -> String {
        self.chunks
            .iter()
            .map(ScriptChunk::to_asm_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Reopen this script in a builder to append more chunks.
    pub fn into_builder(self) -> ScriptBuilder<'static> {
        ScriptBuilder {
            table: OpcodeTable::standard(),
            chunks: self.chunks,
        }
    }
}

impl fmt::Display for Script {
    /// Display the script in its text form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_asm())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
