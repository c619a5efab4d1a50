//! Script number encoding.
//!
//! Numbers outside the small-integer opcode range are pushed as data in
//! minimal little-endian sign-magnitude form: the high bit of the last byte
//! carries the sign, and zero is the empty byte string.

/// Longest encoding accepted by [`decode_script_num`].
pub const MAX_SCRIPT_NUM_LEN: usize = 4;

/// Minimal script number encoding of `n`.
pub fn encode_script_num(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut result = Vec::with_capacity(9);
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }
    result
}

/// Decode a script number of at most [`MAX_SCRIPT_NUM_LEN`] bytes.
pub fn decode_script_num(bytes: &[u8]) -> Option<i64> {
    if bytes.len() > MAX_SCRIPT_NUM_LEN {
        return None;
    }
    let Some((&last, _)) = bytes.split_last() else {
        return Some(0);
    };
    let mut value: i64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        value |= (b as i64) << (8 * i);
    }
    if last & 0x80 != 0 {
        let mask = !(0x80_i64 << (8 * (bytes.len() - 1)));
        Some(-(value & mask))
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_script_num(0), Vec::<u8>::new());
        assert_eq!(encode_script_num(17), vec![0x11]);
        assert_eq!(encode_script_num(127), vec![0x7f]);
        assert_eq!(encode_script_num(128), vec![0x80, 0x00]);
        assert_eq!(encode_script_num(-1), vec![0x81]);
        assert_eq!(encode_script_num(-128), vec![0x80, 0x80]);
        assert_eq!(encode_script_num(256), vec![0x00, 0x01]);
    }

    #[test]
    fn test_decode_roundtrip() {
        for n in [0i64, 1, -1, 17, 20, 127, 128, -128, 255, 256, 0x7fff_ffff, -0x7fff_ffff] {
            assert_eq!(decode_script_num(&encode_script_num(n)), Some(n), "{}", n);
        }
    }

    #[test]
    fn test_decode_rejects_long_input() {
        assert_eq!(decode_script_num(&[0x01, 0x00, 0x00, 0x00, 0x00]), None);
    }
}
