use proptest::prelude::*;

use btc_primitives::base58;
use btc_primitives::hash::{hash160, ripemd160, sha256};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn base58_check_roundtrip(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let encoded = base58::check_encode(&data);
        let decoded = base58::check_decode(&encoded).unwrap();
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn base58_preserves_leading_zeros(zeros in 0usize..8, tail in prop::collection::vec(1u8..=255, 0..16)) {
        let mut data = vec![0u8; zeros];
        data.extend_from_slice(&tail);
        let encoded = base58::encode(&data);
        prop_assert!(encoded.starts_with(&"1".repeat(zeros)));
        prop_assert_eq!(base58::decode(&encoded).unwrap(), data);
    }

    #[test]
    fn hash160_composes_sha256_and_ripemd160(data in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(hash160(&data), ripemd160(&sha256(&data)));
    }
}
