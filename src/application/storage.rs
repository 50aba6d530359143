use crate::domain::keys::{PrivateKey, PublicKey};
use crate::domain::ports::{ContentReference, StorageBackendBox};
use crate::error::Result;
use crate::infrastructure::cipher;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Moves manifests and result payloads through the content store, sealing
/// them for a recipient on the way in and opening them on the way out.
///
/// Failures keep their class: `Transport` from the backend (retryable by the
/// caller), `Crypto` from the cipher (terminal for the given inputs). The
/// client itself never retries.
pub struct StorageClient {
    backend: StorageBackendBox,
}

impl StorageClient {
    pub fn new(backend: StorageBackendBox) -> Self {
        Self { backend }
    }

    /// Serializes `payload`, seals it for `recipient`, and stores the
    /// ciphertext. Returns the backend's reference to it.
    pub async fn upload<T: Serialize>(
        &self,
        payload: &T,
        recipient: &PublicKey,
    ) -> Result<ContentReference> {
        let plaintext = serde_json::to_vec(payload)?;
        let sealed = cipher::encrypt(recipient, &plaintext)?;
        self.backend.put(sealed).await
    }

    /// Fetches the ciphertext behind `reference`, opens it with `key`, and
    /// deserializes the payload.
    pub async fn download<T: DeserializeOwned>(
        &self,
        reference: &ContentReference,
        key: &PrivateKey,
    ) -> Result<T> {
        let sealed = self.backend.get(reference).await?;
        let plaintext = cipher::decrypt(key, &sealed)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}
