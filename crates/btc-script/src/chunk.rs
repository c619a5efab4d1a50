//! Script chunks and the push data codec.
//!
//! A chunk is either a standalone opcode (like OP_DUP) or a data push: a
//! length header followed by the pushed bytes. The header takes one of four
//! forms depending on the data length:
//!
//! | data length        | header                         |
//! |--------------------|--------------------------------|
//! | `0..=75`           | the length itself (1 byte)     |
//! | `76..=254`         | `OP_PUSHDATA1` + 1 byte        |
//! | `255..=65535`      | `OP_PUSHDATA2` + 2 bytes LE    |
//! | `65536..=u32::MAX` | `OP_PUSHDATA4` + 4 bytes LE    |
//!
//! Decoding never reads past the end of the supplied buffer.

use crate::opcodes::*;
use crate::ScriptError;

/// A single element of a script.
///
/// For a data push, `op` is the header opcode (a direct length or one of
/// `OP_PUSHDATA1/2/4`) and `data` holds the pushed bytes. Plain opcodes
/// carry no data. The fields are private so that `op` always describes
/// `data` exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptChunk {
    op: u8,
    data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// A chunk holding the single opcode `op`.
    pub fn opcode(op: u8) -> Self {
        ScriptChunk { op, data: None }
    }

    /// A data push chunk with the header chosen by [`push_data_prefix`].
    ///
    /// Empty data is encoded as the single byte `OP_0`, so it comes back as
    /// an opcode chunk.
    pub fn push(data: &[u8]) -> Result<Self, ScriptError> {
        if data.is_empty() {
            return Ok(ScriptChunk::opcode(OP_0));
        }
        let prefix = push_data_prefix(data.len())?;
        Ok(ScriptChunk {
            op: prefix[0],
            data: Some(data.to_vec()),
        })
    }

    /// The opcode byte. For direct pushes this is the data length.
    pub fn op(&self) -> u8 {
        self.op
    }

    /// The pushed bytes, if this is a data push.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// True if this chunk is a data push rather than a plain opcode.
    pub fn is_push(&self) -> bool {
        self.data.is_some()
    }

    /// True if this chunk is the plain opcode `op`.
    pub fn is_opcode(&self, op: u8) -> bool {
        self.data.is_none() && self.op == op
    }

    /// Number of bytes this chunk occupies in the script payload, header
    /// included.
    pub fn encoded_len(&self) -> usize {
        match &self.data {
            None => 1,
            Some(data) => header_len(self.op) + data.len(),
        }
    }

    /// Append the wire encoding of this chunk to `out`.
    pub fn encode_to(&self, out: &mut Vec<u8>) {
        out.push(self.op);
        if let Some(data) = &self.data {
            let len = data.len();
            match self.op {
                OP_PUSHDATA1 => out.push(len as u8),
                OP_PUSHDATA2 => out.extend_from_slice(&(len as u16).to_le_bytes()),
                OP_PUSHDATA4 => out.extend_from_slice(&(len as u32).to_le_bytes()),
                _ => {}
            }
            out.extend_from_slice(data);
        }
    }

    /// The wire encoding of this chunk.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut out);
        out
    }

    /// Render this chunk as a script text token.
    ///
    /// Data pushes render as hex and opcodes by mnemonic. An empty push
    /// renders as `OP_0`, which pushes the same empty value. A push whose
    /// hex would read back as a small integer (`[0x10]` is `10`) gets a `0x`
    /// prefix.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) if data.is_empty() => opcode_to_string(OP_0).to_string(),
            Some(data) => {
                let hex_str = hex::encode(data);
                if parse_small_int_token(&hex_str).is_some() {
                    format!("0x{}", hex_str)
                } else {
                    hex_str
                }
            }
            None => opcode_to_string(self.op).to_string(),
        }
    }
}

/// Header size in bytes for a push introduced by `op`.
fn header_len(op: u8) -> usize {
    match op {
        OP_PUSHDATA1 => 2,
        OP_PUSHDATA2 => 3,
        OP_PUSHDATA4 => 5,
        _ => 1,
    }
}

/// Compute the push header for a payload of `data_len` bytes.
///
/// Fails with [`ScriptError::DataTooBig`] when the length does not fit the
/// four byte `OP_PUSHDATA4` length field.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len < OP_PUSHDATA1 as usize {
        Ok(vec![data_len as u8])
    } else if data_len < 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len as u64 <= u32::MAX as u64 {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig(data_len))
    }
}

/// Encode `data` as a single push: header followed by the data bytes.
pub fn encode_push_data(data: &[u8]) -> Result<Vec<u8>, ScriptError> {
    let prefix = push_data_prefix(data.len())?;
    let mut out = Vec::with_capacity(prefix.len() + data.len());
    out.extend_from_slice(&prefix);
    out.extend_from_slice(data);
    Ok(out)
}

/// Decode the push starting at `cursor`.
///
/// Returns the pushed data and the number of bytes consumed (header plus
/// data), or `None` when the byte at `cursor` is a plain opcode. A declared
/// length running past the end of `bytes` is a
/// [`ScriptError::TruncatedInput`].
pub fn decode_push_data(
    bytes: &[u8],
    cursor: usize,
) -> Result<Option<(Vec<u8>, usize)>, ScriptError> {
    let op = match bytes.get(cursor) {
        Some(&op) => op,
        None => return Err(truncated(bytes, cursor, 1)),
    };
    let (len_width, data_len) = match op {
        OP_DATA_1..=OP_DATA_75 => (0, op as usize),
        OP_PUSHDATA1 => (1, read_le(bytes, cursor + 1, 1)?),
        OP_PUSHDATA2 => (2, read_le(bytes, cursor + 1, 2)?),
        OP_PUSHDATA4 => (4, read_le(bytes, cursor + 1, 4)?),
        _ => return Ok(None),
    };
    let start = cursor + 1 + len_width;
    let data = start
        .checked_add(data_len)
        .and_then(|end| bytes.get(start..end))
        .ok_or_else(|| truncated(bytes, cursor, data_len.saturating_add(1 + len_width)))?;
    Ok(Some((data.to_vec(), 1 + len_width + data_len)))
}

/// Read the chunk at `*cursor` and advance the cursor past it.
pub fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<ScriptChunk, ScriptError> {
    let op = match bytes.get(*cursor) {
        Some(&op) => op,
        None => return Err(truncated(bytes, *cursor, 1)),
    };
    match decode_push_data(bytes, *cursor)? {
        Some((data, consumed)) => {
            *cursor += consumed;
            Ok(ScriptChunk { op, data: Some(data) })
        }
        None => {
            *cursor += 1;
            Ok(ScriptChunk::opcode(op))
        }
    }
}

/// Decode raw script bytes into chunks.
///
/// Stops exactly at the end of the buffer; any push that overruns it is
/// reported as [`ScriptError::TruncatedInput`].
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut cursor = 0;
    while cursor < bytes.len() {
        chunks.push(read_chunk(bytes, &mut cursor)?);
    }
    Ok(chunks)
}

/// Read a `width`-byte little-endian length at `pos`.
fn read_le(bytes: &[u8], pos: usize, width: usize) -> Result<usize, ScriptError> {
    let field = pos
        .checked_add(width)
        .and_then(|end| bytes.get(pos..end))
        .ok_or_else(|| truncated(bytes, pos - 1, 1 + width))?;
    let mut buf = [0u8; 4];
    buf[..width].copy_from_slice(field);
    Ok(u32::from_le_bytes(buf) as usize)
}

fn truncated(bytes: &[u8], offset: usize, needed: usize) -> ScriptError {
    let available = bytes.len().saturating_sub(offset);
    tracing::debug!(offset, needed, available, "push data runs past end of script");
    ScriptError::TruncatedInput {
        offset,
        needed,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // push_data_prefix tiers
    // -----------------------------------------------------------------------

    #[test]
    fn test_push_data_prefix_direct() {
        assert_eq!(push_data_prefix(1).unwrap(), vec![0x01]);
        assert_eq!(push_data_prefix(20).unwrap(), vec![OP_DATA_20]);
        assert_eq!(push_data_prefix(75).unwrap(), vec![OP_DATA_75]);
    }

    #[test]
    fn test_push_data_prefix_pushdata1() {
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(254).unwrap(), vec![OP_PUSHDATA1, 254]);
    }

    #[test]
    fn test_push_data_prefix_pushdata2() {
        assert_eq!(push_data_prefix(255).unwrap(), vec![OP_PUSHDATA2, 0xff, 0x00]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(push_data_prefix(65535).unwrap(), vec![OP_PUSHDATA2, 0xff, 0xff]);
    }

    #[test]
    fn test_push_data_prefix_pushdata4() {
        assert_eq!(
            push_data_prefix(65536).unwrap(),
            vec![OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_push_data_prefix_too_big() {
        let len = u32::MAX as usize + 1;
        assert_eq!(push_data_prefix(len), Err(ScriptError::DataTooBig(len)));
    }

    // -----------------------------------------------------------------------
    // decode_push_data
    // -----------------------------------------------------------------------

    #[test]
    fn test_tier_boundaries_decode_exactly() {
        for (len, header) in [(75usize, 1usize), (76, 2), (254, 2), (255, 3), (65535, 3), (65536, 5)] {
            let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let encoded = encode_push_data(&data).unwrap();
            assert_eq!(encoded.len(), header + len, "length {}", len);
            let (decoded, consumed) = decode_push_data(&encoded, 0).unwrap().unwrap();
            assert_eq!(decoded, data);
            assert_eq!(consumed, header + len);
        }
    }

    #[test]
    fn test_decode_push_data_at_cursor() {
        let bytes = [OP_DUP, 0x02, 0xaa, 0xbb, OP_EQUAL];
        assert_eq!(decode_push_data(&bytes, 0).unwrap(), None);
        assert_eq!(
            decode_push_data(&bytes, 1).unwrap(),
            Some((vec![0xaa, 0xbb], 3))
        );
        assert_eq!(decode_push_data(&bytes, 4).unwrap(), None);
    }

    #[test]
    fn test_decode_push_data_op0_is_plain_opcode() {
        assert_eq!(decode_push_data(&[OP_0], 0).unwrap(), None);
    }

    #[test]
    fn test_decode_push_data_truncated_direct() {
        // 0x05 claims five bytes but only three follow.
        let err = decode_push_data(&[0x05, 0x00, 0x00, 0x00], 0).unwrap_err();
        assert_eq!(
            err,
            ScriptError::TruncatedInput { offset: 0, needed: 6, available: 4 }
        );
    }

    #[test]
    fn test_decode_push_data_truncated_length_field() {
        assert!(matches!(
            decode_push_data(&[OP_PUSHDATA1], 0),
            Err(ScriptError::TruncatedInput { .. })
        ));
        assert!(matches!(
            decode_push_data(&[OP_PUSHDATA2, 0x01], 0),
            Err(ScriptError::TruncatedInput { .. })
        ));
        assert!(matches!(
            decode_push_data(&[OP_PUSHDATA4, 0x01, 0x00, 0x00], 0),
            Err(ScriptError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_decode_push_data_huge_declared_length() {
        let bytes = [OP_PUSHDATA4, 0xff, 0xff, 0xff, 0xff, 0x01];
        assert!(matches!(
            decode_push_data(&bytes, 0),
            Err(ScriptError::TruncatedInput { offset: 0, .. })
        ));
    }

    #[test]
    fn test_decode_push_data_cursor_past_end() {
        assert!(decode_push_data(&[0x01, 0xff], 2).is_err());
    }

    // -----------------------------------------------------------------------
    // decode_script
    // -----------------------------------------------------------------------

    #[test]
    fn test_decode_script_mixed() {
        let bytes = hex::decode("76a914000000000000000000000000000000000000000188ac").unwrap();
        let chunks = decode_script(&bytes).unwrap();
        assert_eq!(chunks.len(), 5);
        assert!(chunks[0].is_opcode(OP_DUP));
        assert!(chunks[1].is_opcode(OP_HASH160));
        assert_eq!(chunks[2].op(), OP_DATA_20);
        assert_eq!(chunks[2].encoded_len(), 21);
        assert!(chunks[3].is_opcode(OP_EQUALVERIFY));
        assert!(chunks[4].is_opcode(OP_CHECKSIG));
    }

    #[test]
    fn test_decode_script_empty() {
        assert!(decode_script(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_script_truncated_tail() {
        let bytes = [OP_DUP, OP_PUSHDATA1, 0x05, 0x01, 0x02];
        assert!(matches!(
            decode_script(&bytes),
            Err(ScriptError::TruncatedInput { offset: 1, .. })
        ));
    }

    #[test]
    fn test_decode_script_keeps_non_minimal_header() {
        // Three bytes pushed with OP_PUSHDATA1 instead of a direct length.
        let bytes = [OP_PUSHDATA1, 0x03, 0x01, 0x02, 0x03];
        let chunks = decode_script(&bytes).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].op(), OP_PUSHDATA1);
        assert_eq!(chunks[0].to_bytes(), bytes.to_vec());
    }

    // -----------------------------------------------------------------------
    // ScriptChunk
    // -----------------------------------------------------------------------

    #[test]
    fn test_chunk_push_empty_is_op0() {
        let chunk = ScriptChunk::push(&[]).unwrap();
        assert!(chunk.is_opcode(OP_0));
        assert!(!chunk.is_push());
        assert_eq!(chunk.to_bytes(), vec![OP_0]);
    }

    #[test]
    fn test_chunk_encoded_len_matches_bytes() {
        for len in [1usize, 20, 32, 75, 76, 300] {
            let chunk = ScriptChunk::push(&vec![0x11; len]).unwrap();
            assert_eq!(chunk.encoded_len(), chunk.to_bytes().len());
        }
        assert_eq!(ScriptChunk::opcode(OP_DUP).encoded_len(), 1);
    }

    #[test]
    fn test_chunk_to_asm_string() {
        let push = ScriptChunk::push(&[0xab; 20]).unwrap();
        assert_eq!(push.to_asm_string(), "ab".repeat(20));
        assert_eq!(ScriptChunk::opcode(OP_DUP).to_asm_string(), "OP_DUP");
        let empty = decode_script(&[OP_PUSHDATA1, 0x00]).unwrap();
        assert_eq!(empty[0].to_asm_string(), "OP_0");
    }

    #[test]
    fn test_chunk_to_asm_string_prefixes_number_like_bytes() {
        for (byte, text) in [(0x00u8, "0x00"), (0x09, "0x09"), (0x10, "0x10"), (0x16, "0x16")] {
            assert_eq!(ScriptChunk::push(&[byte]).unwrap().to_asm_string(), text);
        }
        assert_eq!(ScriptChunk::push(&[0x17]).unwrap().to_asm_string(), "17");
        assert_eq!(ScriptChunk::push(&[0x0a]).unwrap().to_asm_string(), "0a");
        assert_eq!(ScriptChunk::push(&[0x00, 0x10]).unwrap().to_asm_string(), "0010");
    }
}
