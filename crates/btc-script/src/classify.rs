//! Standard script template detection.
//!
//! Matching is structural and looks only at chunk opcodes and the encoded
//! size of push chunks. The free functions work on any chunk slice, so a
//! script still under construction in a [`ScriptBuilder`](crate::ScriptBuilder)
//! can be classified through its `chunks()` as well.

use crate::chunk::ScriptChunk;
use crate::num::decode_script_num;
use crate::opcodes::*;
use crate::script::Script;

/// Encoded size of a push carrying a 20-byte hash.
const HASH20_PUSH_LEN: usize = 21;
/// Encoded size of a push carrying a 32-byte hash.
const HASH32_PUSH_LEN: usize = 33;

fn is_push_of_len(chunk: &ScriptChunk, encoded_len: usize) -> bool {
    chunk.is_push() && chunk.encoded_len() == encoded_len
}

/// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
pub fn is_p2pkh(chunks: &[ScriptChunk]) -> bool {
    matches!(
        chunks,
        [dup, hash160, push, equal_verify, checksig]
            if dup.is_opcode(OP_DUP)
                && hash160.is_opcode(OP_HASH160)
                && is_push_of_len(push, HASH20_PUSH_LEN)
                && equal_verify.is_opcode(OP_EQUALVERIFY)
                && checksig.is_opcode(OP_CHECKSIG)
    )
}

/// `OP_0 <20 bytes>`
pub fn is_p2wpkh(chunks: &[ScriptChunk]) -> bool {
    matches!(
        chunks,
        [version, push] if version.is_opcode(OP_0) && is_push_of_len(push, HASH20_PUSH_LEN)
    )
}

/// `OP_0 <32 bytes>`
pub fn is_p2wsh(chunks: &[ScriptChunk]) -> bool {
    matches!(
        chunks,
        [version, push] if version.is_opcode(OP_0) && is_push_of_len(push, HASH32_PUSH_LEN)
    )
}

/// `OP_HASH160 <20 bytes> OP_EQUAL`
pub fn is_p2sh(chunks: &[ScriptChunk]) -> bool {
    matches!(
        chunks,
        [hash160, push, equal]
            if hash160.is_opcode(OP_HASH160)
                && is_push_of_len(push, HASH20_PUSH_LEN)
                && equal.is_opcode(OP_EQUAL)
    )
}

/// True if every chunk is a data push.
///
/// `OP_0`, `OP_1NEGATE` and `OP_1..=OP_16` are opcode chunks, so a script
/// containing them is not push-only here even though they push values at
/// run time.
pub fn is_push_only(chunks: &[ScriptChunk]) -> bool {
    chunks.iter().all(ScriptChunk::is_push)
}

/// A version 0 witness output, either P2WPKH or P2WSH.
pub fn is_witness_program(chunks: &[ScriptChunk]) -> bool {
    is_p2wpkh(chunks) || is_p2wsh(chunks)
}

/// `OP_RETURN` followed only by data pushes.
pub fn is_null_data(chunks: &[ScriptChunk]) -> bool {
    match chunks.split_first() {
        Some((first, rest)) => first.is_opcode(OP_RETURN) && is_push_only(rest),
        None => false,
    }
}

/// True for bare `m <pubkey>... n OP_CHECKMULTISIG` scripts.
pub fn is_multisig(chunks: &[ScriptChunk]) -> bool {
    multisig_params(chunks).is_some()
}

/// The `(m, n)` of a bare multisig script.
///
/// Both counts may be small-integer opcodes or script number pushes; `n`
/// must equal the number of key pushes and `1 <= m <= n`.
pub fn multisig_params(chunks: &[ScriptChunk]) -> Option<(usize, usize)> {
    let (last, rest) = chunks.split_last()?;
    if !last.is_opcode(OP_CHECKMULTISIG) {
        return None;
    }
    let (n_chunk, rest) = rest.split_last()?;
    let (m_chunk, keys) = rest.split_first()?;
    let m = chunk_number(m_chunk)?;
    let n = chunk_number(n_chunk)?;
    if m < 1 || m > n || n as usize != keys.len() {
        return None;
    }
    if !keys.iter().all(|k| k.data().map_or(false, |d| !d.is_empty())) {
        return None;
    }
    Some((m as usize, n as usize))
}

/// The 20-byte hash of a P2PKH script.
pub fn public_key_hash(chunks: &[ScriptChunk]) -> Option<&[u8]> {
    if is_p2pkh(chunks) {
        chunks[2].data()
    } else {
        None
    }
}

/// The 20-byte hash of a P2SH script.
pub fn script_hash(chunks: &[ScriptChunk]) -> Option<&[u8]> {
    if is_p2sh(chunks) {
        chunks[1].data()
    } else {
        None
    }
}

/// Witness version and program of a witness output script.
///
/// Accepts any version opcode (`OP_0` or `OP_1..=OP_16`) followed by a
/// single push of 2 to 40 bytes, so future witness versions are reported
/// even though only version 0 counts as [`is_witness_program`].
pub fn witness_program(chunks: &[ScriptChunk]) -> Option<(u8, &[u8])> {
    let [version, push] = chunks else {
        return None;
    };
    if version.is_push() || !is_small_int_op(version.op()) {
        return None;
    }
    let program = push.data()?;
    if !(2..=40).contains(&program.len()) {
        return None;
    }
    let version = opcode_to_small_int(version.op())? as u8;
    Some((version, program))
}

fn chunk_number(chunk: &ScriptChunk) -> Option<i64> {
    match chunk.data() {
        Some(data) => decode_script_num(data),
        None => opcode_to_small_int(chunk.op()),
    }
}

impl Script {
    /// Pay-to-public-key-hash output script.
    pub fn is_p2pkh(&self) -> bool {
        is_p2pkh(self.chunks())
    }

    /// Version 0 pay-to-witness-public-key-hash output script.
    pub fn is_p2wpkh(&self) -> bool {
        is_p2wpkh(self.chunks())
    }

    /// Version 0 pay-to-witness-script-hash output script.
    pub fn is_p2wsh(&self) -> bool {
        is_p2wsh(self.chunks())
    }

    /// Pay-to-script-hash output script.
    pub fn is_p2sh(&self) -> bool {
        is_p2sh(self.chunks())
    }

    /// See [`is_push_only`](crate::classify::is_push_only).
    pub fn is_push_only(&self) -> bool {
        is_push_only(self.chunks())
    }

    /// Version 0 witness output (P2WPKH or P2WSH).
    pub fn is_witness_program(&self) -> bool {
        is_witness_program(self.chunks())
    }

    /// `OP_RETURN` data carrier output.
    pub fn is_null_data(&self) -> bool {
        is_null_data(self.chunks())
    }

    /// Bare multisig script.
    pub fn is_multisig(&self) -> bool {
        is_multisig(self.chunks())
    }

    /// The `(m, n)` of a bare multisig script.
    pub fn multisig_params(&self) -> Option<(usize, usize)> {
        multisig_params(self.chunks())
    }

    /// The public key hash if this is a P2PKH script.
    pub fn public_key_hash(&self) -> Option<&[u8]> {
        public_key_hash(self.chunks())
    }

    /// The script hash if this is a P2SH script.
    pub fn script_hash(&self) -> Option<&[u8]> {
        script_hash(self.chunks())
    }

    /// The `(version, program)` pair if this is a witness program.
    pub fn witness_program(&self) -> Option<(u8, &[u8])> {
        witness_program(self.chunks())
    }
}
