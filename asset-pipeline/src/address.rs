use sha2::{Digest, Sha256};

use crate::ContentHash;

/// Content address of an artifact: lowercase hex SHA-256 of its bytes.
pub fn address_of(bytes: &[u8]) -> ContentHash {
    ContentHash(hex::encode(Sha256::digest(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            address_of(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            address_of(b"abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    proptest! {
        #[test]
        fn same_bytes_same_address(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let a = address_of(&bytes);
            let b = address_of(&bytes);
            prop_assert_eq!(a.as_str(), b.as_str());
            prop_assert_eq!(a.as_str().len(), 64);
            prop_assert!(a.as_str().chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        }

        #[test]
        fn different_bytes_different_address(
            a in proptest::collection::vec(any::<u8>(), 0..128),
            b in proptest::collection::vec(any::<u8>(), 0..128),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(address_of(&a), address_of(&b));
        }
    }
}
