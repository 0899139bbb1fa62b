use crate::args::KdfArgs;
use crate::buffer::{decode, encode_bytes_param, encode_param, ByteSource};
use crate::engine::{Engine, RawKdfRequest};
use crate::error::{ArgumentError, Error};
use crate::results::{AttestInfo, KeyedHashBlob};

use super::Tpm;

impl KdfArgs {
    /// Encodes the arguments into an engine request.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when a byte field cannot be encoded.
    pub fn to_raw(&self) -> Result<RawKdfRequest, ArgumentError> {
        Ok(RawKdfRequest {
            hash: self.hash.value(),
            key: encode_param("key", &self.key)?,
            label: encode_param("label", &self.label)?,
            context_u: encode_param("context_u", &self.context_u)?,
            context_v: encode_param("context_v", &self.context_v)?,
            bits: self.bits,
        })
    }
}

impl<E: Engine> Tpm<E> {
    /// Derives key material with KDFa.
    ///
    /// # Errors
    ///
    /// Returns an argument error before any engine call, otherwise
    /// propagates engine failures.
    pub fn kdfa(&mut self, args: &KdfArgs) -> Result<Vec<u8>, Error> {
        let request = args.to_raw()?;
        self.dispatch("KDFa", |engine| engine.kdfa(&request))
            .map(|out| decode(&out))
    }

    /// Decodes a marshaled attestation such as a quote's `tpm2b_attest`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] when the buffer does not unmarshal.
    pub fn unmarshal_attest_buffer(&mut self, tpm2b_attest: &[u8]) -> Result<AttestInfo, Error> {
        let buffer = encode_bytes_param("tpm2b_attest", tpm2b_attest)?;
        self.dispatch("UnmarshalAttestBuffer", |engine| {
            engine.unmarshal_attest_buffer(&buffer)
        })
        .map(AttestInfo::from)
    }

    /// Builds a keyed-hash object outside the TPM that seals `sensitive_data`.
    ///
    /// # Errors
    ///
    /// Returns an argument error for unencodable data, otherwise propagates
    /// engine failures.
    pub fn keyed_hash(&mut self, sensitive_data: &ByteSource) -> Result<KeyedHashBlob, Error> {
        let data = encode_param("sensitive_data", sensitive_data)?;
        self.dispatch("KeyedHash", |engine| engine.keyed_hash(&data))
            .map(KeyedHashBlob::from)
    }
}
