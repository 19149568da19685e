//! Content hashing - SHA-256 digests key the model store.
//!
//! The digest doubles as the stored filename stem, so dedup survives users
//! re-selecting or renaming the same template file.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Length of a rendered digest: 256 bits as lowercase hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the SHA-256 hash of a byte buffer, rendered as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Recover the content digest from a stored image reference.
///
/// Stored files are named `<digest>[-suffix][.ext]`; the digest is the file
/// stem up to the first `-`. Returns `None` when the stem is not 64 lowercase
/// hex characters (e.g. the sentinel `"empty"` reference).
pub fn digest_from_reference(reference: &str) -> Option<String> {
    let stem = Path::new(reference).file_stem()?.to_str()?;
    let stem = match stem.find('-') {
        Some(i) if i > 0 => &stem[..i],
        _ => stem,
    };
    if stem.len() != DIGEST_HEX_LEN {
        return None;
    }
    if !stem.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
        return None;
    }
    Some(stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let data = b"template bytes";
        assert_eq!(sha256_hex(data), sha256_hex(data));
    }

    #[test]
    fn test_hash_distinct_inputs() {
        assert_ne!(sha256_hex(b"a"), sha256_hex(b"b"));
    }

    #[test]
    fn test_hash_shape() {
        let h = sha256_hex(b"");
        assert_eq!(h.len(), DIGEST_HEX_LEN);
        assert!(h.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(h, h.to_lowercase());
    }

    #[test]
    fn test_digest_from_plain_reference() {
        let digest = sha256_hex(b"x");
        let reference = format!("/base/models/images/{digest}.png");
        assert_eq!(digest_from_reference(&reference), Some(digest));
    }

    #[test]
    fn test_digest_from_suffixed_reference() {
        let digest = sha256_hex(b"x");
        let reference = format!("{digest}-copy.jpg");
        assert_eq!(digest_from_reference(&reference), Some(digest));
    }

    #[test]
    fn test_digest_rejects_non_hex() {
        assert_eq!(digest_from_reference("empty"), None);
        assert_eq!(digest_from_reference("short.png"), None);
        let upper = sha256_hex(b"x").to_uppercase();
        assert_eq!(digest_from_reference(&format!("{upper}.png")), None);
    }
}
