use crate::error::{EscrowError, Result};

pub const PUBLIC_KEY_LEN: usize = 32;
pub const PRIVATE_KEY_LEN: usize = 32;

/// Curve-point encoding of a public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

/// Raw private scalar. Never persisted by this crate; callers pass it
/// explicitly to every operation that needs it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey([u8; PRIVATE_KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let point: [u8; PUBLIC_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| EscrowError::Crypto(format!("public key must be {PUBLIC_KEY_LEN} bytes")))?;
        Ok(Self(point))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| EscrowError::Crypto(format!("invalid public key hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let scalar: [u8; PRIVATE_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| EscrowError::Crypto(format!("private key must be {PRIVATE_KEY_LEN} bytes")))?;
        Ok(Self(scalar))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| EscrowError::Crypto(format!("invalid private key hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.0
    }
}

impl From<[u8; PUBLIC_KEY_LEN]> for PublicKey {
    fn from(point: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(point)
    }
}

impl From<[u8; PRIVATE_KEY_LEN]> for PrivateKey {
    fn from(scalar: [u8; PRIVATE_KEY_LEN]) -> Self {
        Self(scalar)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

// Keeps the scalar out of logs and panic messages.
impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// Public/private pair used both to authorize ledger transactions and to
/// address encrypted payloads.
#[derive(Debug, Clone, Copy)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    pub fn new(public: PublicKey, private: PrivateKey) -> Self {
        Self { public, private }
    }
}

/// Credential handed to the ledger transport for payout co-signing.
///
/// The dual-oracle signature scheme itself is applied by the transport; this
/// layer only carries the key material and keeps it for the duration of the
/// call.
#[derive(Debug, Clone, Copy)]
pub struct Authorization {
    keys: KeyPair,
}

impl Authorization {
    pub fn derive(keys: &KeyPair) -> Self {
        Self { keys: *keys }
    }

    pub fn signer_public(&self) -> &PublicKey {
        &self.keys.public
    }

    pub fn signer_private(&self) -> &PrivateKey {
        &self.keys.private
    }
}
