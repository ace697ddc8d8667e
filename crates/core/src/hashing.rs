//! SHA-256 content digests attached to image verdicts.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of image bytes. Stored on each verdict so hosts can
/// deduplicate resubmitted content and join verdicts back to stored files.
pub fn content_digest(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_produces_known_digest() {
        assert_eq!(
            content_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_is_stable_and_hex_encoded() {
        let data = b"\x89PNG not really";
        assert_eq!(content_digest(data), content_digest(data));
        assert_eq!(content_digest(data).len(), 64);
    }
}
