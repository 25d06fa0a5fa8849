//! Password digests as stored in the accounts table: SHA-1, upper-case hex.

use sha1::{Digest, Sha1};

/// Upper-case hex SHA-1 of `password`.
pub fn password_digest(password: &str) -> String {
    hex::encode_upper(Sha1::digest(password.as_bytes()))
}

/// Compares `password` against a stored digest. Stored digests written in lower
/// case by older tools still match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    password_digest(password).eq_ignore_ascii_case(stored.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_upper_hex_sha1() {
        assert_eq!(password_digest("password"), "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8");
        assert_eq!(password_digest(""), "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709");
    }

    #[test]
    fn test_verify_accepts_either_case() {
        assert!(verify_password("password", "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8"));
        assert!(verify_password("password", "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8"));
        assert!(!verify_password("Password", "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8"));
    }
}
