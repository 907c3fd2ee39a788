use sha2::{Digest, Sha512};

/// SHA-512 over password + salt, hex encoded.
///
/// The salt is a single value shared by every account, kept for
/// compatibility with the stored digests. A per-account random salt
/// would be stronger; switching would invalidate existing hashes.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
