//! Constructors for standard scripts and the script text parser.

use btc_primitives::hash::{hash160, sha256};

use crate::opcodes::*;
use crate::script::{AppendItem, Script, ScriptBuilder};
use crate::ScriptError;

impl Script {
    /// `OP_DUP OP_HASH160 <pubkey_hash> OP_EQUALVERIFY OP_CHECKSIG`
    ///
    /// The hash is pushed as given; its length is not checked.
    pub fn to_p2pkh(pubkey_hash: &[u8]) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::new();
        builder
            .append_opcode(OP_DUP)?
            .append_opcode(OP_HASH160)?
            .append_data(pubkey_hash)?
            .append_opcode(OP_EQUALVERIFY)?
            .append_opcode(OP_CHECKSIG)?;
        Ok(builder.into_script())
    }

    /// `OP_0 <pubkey_hash>`
    pub fn to_p2wpkh(pubkey_hash: &[u8]) -> Result<Script, ScriptError> {
        Self::witness_v0(pubkey_hash)
    }

    /// `OP_HASH160 <script_hash> OP_EQUAL`
    pub fn to_p2sh(script_hash: &[u8]) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::new();
        builder
            .append_opcode(OP_HASH160)?
            .append_data(script_hash)?
            .append_opcode(OP_EQUAL)?;
        Ok(builder.into_script())
    }

    /// `OP_0 <sha256(redeem_script)>`
    pub fn to_p2wsh(redeem_script: &Script) -> Result<Script, ScriptError> {
        Self::witness_v0(&sha256(&redeem_script.to_payload()))
    }

    /// `OP_0 <program>` for an already hashed witness script.
    pub fn to_p2wsh_from_hash(program: &[u8]) -> Result<Script, ScriptError> {
        Self::witness_v0(program)
    }

    /// `<m> <pubkey>... <n> OP_CHECKMULTISIG`
    ///
    /// Counts up to 16 use the small-integer opcodes; larger counts are
    /// pushed as script numbers. Keys are pushed verbatim, and `m` is not
    /// checked against the number of keys.
    pub fn to_multisig_script<K: AsRef<[u8]>>(m: usize, pubkeys: &[K]) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::new();
        builder.append_number(m as i64)?;
        for key in pubkeys {
            builder.append_data(key.as_ref())?;
        }
        builder
            .append_number(pubkeys.len() as i64)?
            .append_opcode(OP_CHECKMULTISIG)?;
        Ok(builder.into_script())
    }

    /// Build a multisig redeem script and the P2SH output that commits to it.
    ///
    /// Returns `(p2sh_output, redeem_script)`.
    pub fn to_p2sh_multisig_script<K: AsRef<[u8]>>(
        m: usize,
        pubkeys: &[K],
    ) -> Result<(Script, Script), ScriptError> {
        let redeem = Self::to_multisig_script(m, pubkeys)?;
        let p2sh = Self::to_p2sh(&hash160(&redeem.to_payload()))?;
        Ok((p2sh, redeem))
    }

    /// Parse script text using the standard opcode table.
    ///
    /// See [`Script::from_string_with_table`].
    pub fn from_string(text: &str) -> Result<Script, ScriptError> {
        Self::from_string_with_table(text, OpcodeTable::standard())
    }

    /// Parse whitespace separated script text.
    ///
    /// Each token is tried in turn as an opcode mnemonic, a small integer in
    /// `-1..=16`, and finally as hex data. A token made only of hex digits is
    /// taken as a mnemonic only when written with the `OP_` prefix, so
    /// `1add` is data while `OP_1ADD` is the opcode. Small integers are only
    /// recognised in their short decimal form, so `0010` is data. Hex may
    /// carry a `0x` prefix, which is how a one byte push such as `0x10` is
    /// told apart from the number `10`. Mnemonics for push data opcodes are
    /// rejected.
    pub fn from_string_with_table(text: &str, table: &OpcodeTable) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::with_table(table);
        for token in text.split_whitespace() {
            builder.append(resolve_token(table, token)?)?;
        }
        Ok(builder.into_script())
    }

    fn witness_v0(program: &[u8]) -> Result<Script, ScriptError> {
        let mut builder = ScriptBuilder::new();
        builder.append_opcode(OP_0)?.append_data(program)?;
        Ok(builder.into_script())
    }
}

fn resolve_token(table: &OpcodeTable, token: &str) -> Result<AppendItem, ScriptError> {
    let has_prefix = token
        .get(..3)
        .map_or(false, |p| p.eq_ignore_ascii_case("OP_"));
    let is_hex = token.len() % 2 == 0 && token.bytes().all(|b| b.is_ascii_hexdigit());

    if has_prefix || !is_hex {
        if let Some(op) = table.code_for_name(token) {
            return Ok(AppendItem::Opcode(op as i64));
        }
    }
    if let Some(n) = parse_small_int_token(token) {
        return Ok(AppendItem::Opcode(n));
    }
    let hex_str = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    match hex::decode(hex_str) {
        Ok(data) if !data.is_empty() => Ok(AppendItem::Data(data)),
        _ => Err(ScriptError::InvalidToken(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBKEY_HASH: &str = "e2a623699e81b291c0327f408fea765d534baa2a";

    fn compressed_key(tag: u8) -> Vec<u8> {
        let mut key = vec![0x02];
        key.extend_from_slice(&[tag; 32]);
        key
    }

    // -----------------------------------------------------------------------
    // Standard templates
    // -----------------------------------------------------------------------

    #[test]
    fn test_to_p2pkh() {
        let hash = hex::decode(PUBKEY_HASH).unwrap();
        let script = Script::to_p2pkh(&hash).unwrap();
        assert_eq!(script.to_hex(), format!("76a914{}88ac", PUBKEY_HASH));
        assert!(script.is_p2pkh());
        assert_eq!(script.size(), 25);
    }

    #[test]
    fn test_to_p2wpkh() {
        let hash = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let script = Script::to_p2wpkh(&hash).unwrap();
        assert_eq!(script.to_hex(), "0014751e76e8199196d454941c45d1b3a323f1433bd6");
        assert!(script.is_p2wpkh());
    }

    #[test]
    fn test_to_p2wsh_hashes_redeem_script() {
        let redeem = Script::from_string("OP_1").unwrap();
        let script = Script::to_p2wsh(&redeem).unwrap();
        assert!(script.is_p2wsh());
        let expected = sha256(&[OP_1]);
        assert_eq!(script.witness_program().unwrap().1, &expected[..]);
    }

    #[test]
    fn test_to_multisig_script() {
        let keys = vec![compressed_key(1), compressed_key(2), compressed_key(3)];
        let script = Script::to_multisig_script(2, &keys).unwrap();
        let payload = script.to_payload();
        assert_eq!(payload[0], OP_2);
        assert_eq!(payload[payload.len() - 2], OP_3);
        assert_eq!(payload[payload.len() - 1], OP_CHECKMULTISIG);
        assert_eq!(payload.len(), 1 + 3 * 34 + 2);
        assert_eq!(script.multisig_params(), Some((2, 3)));
    }

    #[test]
    fn test_to_multisig_script_large_counts() {
        let keys: Vec<Vec<u8>> = (0..20).map(compressed_key).collect();
        let script = Script::to_multisig_script(17, &keys).unwrap();
        let payload = script.to_payload();
        assert_eq!(&payload[..2], &[0x01, 0x11]);
        assert_eq!(&payload[payload.len() - 3..], &[0x01, 0x14, OP_CHECKMULTISIG]);
        assert_eq!(script.multisig_params(), Some((17, 20)));
    }

    #[test]
    fn test_to_p2sh_multisig_script() {
        let keys = vec![compressed_key(7), compressed_key(8)];
        let (p2sh, redeem) = Script::to_p2sh_multisig_script(1, &keys).unwrap();
        assert_eq!(redeem, Script::to_multisig_script(1, &keys).unwrap());
        assert!(p2sh.is_p2sh());
        assert!(redeem.is_multisig());
        let expected = hash160(&redeem.to_payload());
        assert_eq!(p2sh.script_hash().unwrap(), &expected[..]);
    }

    // -----------------------------------------------------------------------
    // from_string
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_string_p2pkh() {
        let text = format!("OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_CHECKSIG", PUBKEY_HASH);
        let script = Script::from_string(&text).unwrap();
        assert!(script.is_p2pkh());
        assert_eq!(script.to_string(), text);
    }

    #[test]
    fn test_from_string_small_ints() {
        let script = Script::from_string("2 3 OP_ADD 5 OP_EQUAL").unwrap();
        assert_eq!(script.to_hex(), "5253935587");
        let script = Script::from_string("-1 0 16").unwrap();
        assert_eq!(script.to_payload(), vec![OP_1NEGATE, OP_0, OP_16]);
    }

    #[test]
    fn test_from_string_mnemonic_without_prefix() {
        let script = Script::from_string("dup HASH160").unwrap();
        assert_eq!(script.to_payload(), vec![OP_DUP, OP_HASH160]);
    }

    #[test]
    fn test_from_string_hex_lookalike_is_data() {
        let script = Script::from_string("1add OP_1ADD").unwrap();
        assert_eq!(script.to_payload(), vec![0x02, 0x1a, 0xdd, OP_1ADD]);
    }

    #[test]
    fn test_from_string_number_outside_small_range_is_hex() {
        let script = Script::from_string("17").unwrap();
        assert_eq!(script.to_payload(), vec![0x01, 0x17]);
    }

    #[test]
    fn test_from_string_padded_number_is_data() {
        let script = Script::from_string("0010").unwrap();
        assert_eq!(script.to_payload(), vec![0x02, 0x00, 0x10]);
    }

    #[test]
    fn test_from_string_prefixed_hex() {
        let script = Script::from_string("0x10 0X0a0b").unwrap();
        assert_eq!(script.to_payload(), vec![0x01, 0x10, 0x02, 0x0a, 0x0b]);
        assert!(matches!(Script::from_string("0x"), Err(ScriptError::InvalidToken(_))));
    }

    #[test]
    fn test_from_string_empty() {
        assert!(Script::from_string("").unwrap().is_empty());
        assert!(Script::from_string("   \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_from_string_invalid_token() {
        assert_eq!(
            Script::from_string("OP_DUP OP_BOGUS").unwrap_err(),
            ScriptError::InvalidToken("OP_BOGUS".to_string())
        );
        assert!(matches!(Script::from_string("abc"), Err(ScriptError::InvalidToken(_))));
        assert!(matches!(Script::from_string("żółw"), Err(ScriptError::InvalidToken(_))));
    }

    #[test]
    fn test_from_string_rejects_pushdata_mnemonic() {
        assert!(matches!(
            Script::from_string("OP_PUSHDATA2"),
            Err(ScriptError::InvalidOpcodeType(_))
        ));
    }
}
