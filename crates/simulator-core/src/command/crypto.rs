use crate::args::{QuoteArgs, SignArgs};
use crate::buffer::{decode, encode_bytes_param, encode_param, ByteSource};
use crate::engine::Engine;
use crate::error::Error;
use crate::registry::Handle;
use crate::results::{QuoteResult, SignResult};

use super::Tpm;

impl<E: Engine> Tpm<E> {
    /// Encrypts with a loaded `SYMCIPHER` key.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an oversize message, otherwise
    /// propagates engine failures.
    pub fn encrypt(&mut self, key: Handle, message: &[u8]) -> Result<Vec<u8>, Error> {
        let message = encode_bytes_param("message", message)?;
        self.dispatch("EncryptDecrypt", |engine| engine.encrypt(key.value(), &message))
            .map(|out| decode(&out))
    }

    /// Decrypts with a loaded `SYMCIPHER` key.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an oversize message, otherwise
    /// propagates engine failures.
    pub fn decrypt(&mut self, key: Handle, message: &[u8]) -> Result<Vec<u8>, Error> {
        let message = encode_bytes_param("message", message)?;
        self.dispatch("EncryptDecrypt", |engine| engine.decrypt(key.value(), &message))
            .map(|out| decode(&out))
    }

    /// Encrypts with the public half of a loaded RSA key.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an oversize message, otherwise
    /// propagates engine failures.
    pub fn rsa_encrypt(&mut self, key: Handle, message: &[u8]) -> Result<Vec<u8>, Error> {
        let message = encode_bytes_param("message", message)?;
        self.dispatch("RSA_Encrypt", |engine| engine.rsa_encrypt(key.value(), &message))
            .map(|out| decode(&out))
    }

    /// Decrypts with a loaded RSA key.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an oversize message, otherwise
    /// propagates engine failures.
    pub fn rsa_decrypt(&mut self, key: Handle, message: &[u8]) -> Result<Vec<u8>, Error> {
        let message = encode_bytes_param("message", message)?;
        self.dispatch("RSA_Decrypt", |engine| engine.rsa_decrypt(key.value(), &message))
            .map(|out| decode(&out))
    }

    /// Signs the SHA-256 digest of the message with a loaded signing key.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unsupported scheme or an unencodable
    /// message, otherwise propagates engine failures.
    pub fn sign(&mut self, key: Handle, args: &SignArgs) -> Result<SignResult, Error> {
        let scheme = args.checked_scheme()?;
        let message = encode_param("message", &args.message)?;
        self.dispatch("Sign", |engine| {
            engine.sign(key.value(), scheme.value(), &message)
        })
        .map(SignResult::from)
    }

    /// Verifies `signature` over the SHA-256 digest of `message`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] when the signature does not verify.
    pub fn verify_signature(
        &mut self,
        key: Handle,
        message: &ByteSource,
        signature: &SignResult,
    ) -> Result<(), Error> {
        let message = encode_param("message", message)?;
        let signature = signature.to_raw();
        self.dispatch("VerifySignature", |engine| {
            engine.verify_signature(key.value(), &message, &signature)
        })
    }

    /// Quotes the selected PCRs with a loaded signing key.
    ///
    /// # Errors
    ///
    /// Returns an argument error for a PCR index outside the mask, otherwise
    /// propagates engine failures.
    pub fn quote(&mut self, key: Handle, args: &QuoteArgs) -> Result<QuoteResult, Error> {
        let pcr_mask = args.pcr_mask()?;
        let qualifying_data = encode_param("qualifying_data", &args.qualifying_data)?;
        self.dispatch("Quote", |engine| {
            engine.quote(key.value(), pcr_mask, &qualifying_data)
        })
        .map(QuoteResult::from)
    }
}
