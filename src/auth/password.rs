use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2-sha256";

/// Derive the raw hash for a password + salt using PBKDF2-SHA256
fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LENGTH]> {
    let mut hash = Zeroizing::new([0u8; HASH_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, hash.as_mut());
    hash
}

/// Generate a cryptographically random salt
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Hash a password for storage.
///
/// Encoded form: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
/// A fresh random salt per call, so hashing the same password twice
/// yields different encodings.
pub fn hash_password(password: &str) -> String {
    let salt = generate_salt();
    let hash = derive(password, &salt, PBKDF2_ITERATIONS);
    format!(
        "{SCHEME}${PBKDF2_ITERATIONS}${}${}",
        B64.encode(salt),
        B64.encode(hash.as_ref()),
    )
}

/// Verify a password against a stored encoding in constant time.
///
/// Malformed or foreign-scheme encodings verify as false rather than
/// erroring, so a stored plaintext credential can never match.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(stored)) = (B64.decode(salt), B64.decode(hash)) else {
        return false;
    };
    if stored.len() != HASH_LENGTH {
        return false;
    }

    let candidate = derive(password, &salt, iterations);
    candidate.as_ref().ct_eq(stored.as_slice()).into()
}
