//! Integrated encryption over x25519 + AES-256-GCM.
//!
//! Layout of a sealed payload: `ephemeral_pub(32) ‖ nonce(12) ‖ ciphertext+tag`.
//! Only the holder of the recipient's private scalar can recompute the shared
//! secret; any tampering fails the AEAD tag check instead of yielding
//! corrupted plaintext.

use crate::domain::keys::{KeyPair, PrivateKey, PublicKey, PUBLIC_KEY_LEN};
use crate::error::{EscrowError, Result};
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey as CurvePoint, StaticSecret};

const NONCE_LEN: usize = 12;
const HKDF_INFO: &[u8] = b"taskpay-sealed-payload-v1";

/// Generates a fresh keypair. The only place in the crate that mints key
/// material; callers own it from here on.
pub fn generate_keypair() -> KeyPair {
    let secret = StaticSecret::random_from_rng(OsRng);
    let point = CurvePoint::from(&secret);
    KeyPair {
        public: PublicKey::from(point.to_bytes()),
        private: PrivateKey::from(secret.to_bytes()),
    }
}

fn derive_key(shared: &[u8; 32], ephemeral: &[u8; 32], recipient: &[u8; 32]) -> Result<[u8; 32]> {
    // Both public points go into the context so a secret reused against a
    // different recipient derives a different key.
    let mut salt = Vec::with_capacity(PUBLIC_KEY_LEN * 2);
    salt.extend_from_slice(ephemeral);
    salt.extend_from_slice(recipient);

    let hk = Hkdf::<Sha256>::new(Some(&salt), shared);
    let mut okm = [0u8; 32];
    hk.expand(HKDF_INFO, &mut okm)
        .map_err(|_| EscrowError::Crypto("key derivation failed".to_string()))?;
    Ok(okm)
}

/// Seals `plaintext` so that only the holder of the private scalar matching
/// `recipient` can recover it. No shared secret pre-exchange is required.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let recipient_point = CurvePoint::from(*recipient.as_bytes());
    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_point = CurvePoint::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&recipient_point);

    let key_bytes = derive_key(
        shared.as_bytes(),
        ephemeral_point.as_bytes(),
        recipient.as_bytes(),
    )?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| EscrowError::Crypto("encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(PUBLIC_KEY_LEN + NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(ephemeral_point.as_bytes());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Recovers the exact plaintext sealed by `encrypt`, or fails with a crypto
/// error when the key does not match or the payload was tampered with.
pub fn decrypt(recipient: &PrivateKey, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < PUBLIC_KEY_LEN + NONCE_LEN {
        return Err(EscrowError::Crypto("sealed payload too short".to_string()));
    }
    let (ephemeral_bytes, rest) = sealed.split_at(PUBLIC_KEY_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let ephemeral_point: [u8; PUBLIC_KEY_LEN] = ephemeral_bytes
        .try_into()
        .map_err(|_| EscrowError::Crypto("malformed ephemeral point".to_string()))?;
    let secret = StaticSecret::from(*recipient.as_bytes());
    let our_point = CurvePoint::from(&secret);
    let shared = secret.diffie_hellman(&CurvePoint::from(ephemeral_point));

    let key_bytes = derive_key(shared.as_bytes(), &ephemeral_point, our_point.as_bytes())?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| EscrowError::Crypto("integrity check failed".to_string()))
}
