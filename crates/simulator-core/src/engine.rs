//! Enumerated interface of the native TPM engine.
//!
//! The engine is an external collaborator. Hosts implement these ports over
//! whatever binding they have (the wasm bridge binds the emscripten module
//! exports by name; tests use an in-memory double). Every record here uses
//! ABI types only: [`EngineBuffer`] for byte data, `u32` for handles and
//! `u16` for algorithm codes. Record fields carry the engine's own names.

use crate::buffer::EngineBuffer;
use crate::error::EngineError;

/// Request record for `TPM2_CreatePrimary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCreatePrimaryRequest {
    /// Hierarchy handle the key is created under.
    pub hierarchy: u32,
    /// Object type (`RSA`, `ECC`, `SYMCIPHER` or `KEYEDHASH`).
    pub algorithm: u16,
    /// Key only signs or decrypts TPM-generated structures.
    pub restricted: bool,
    /// Key may decrypt.
    pub decrypt: bool,
    /// Key may sign.
    pub sign: bool,
    /// Unique field of the public template.
    pub unique: EngineBuffer,
    /// Authorization value of the new key.
    pub user_auth: EngineBuffer,
    /// Data sealed into the object.
    pub sensitive_data: EngineBuffer,
    /// Policy digest gating use of the key.
    pub auth_policy: EngineBuffer,
}

/// Response record for `TPM2_CreatePrimary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCreatePrimaryResponse {
    /// Transient handle of the loaded key.
    pub handle: u32,
    /// RSA modulus, big-endian; empty for other types.
    pub rsa_public_n: EngineBuffer,
    /// ECC public point x coordinate; empty for other types.
    pub ecc_public_x: EngineBuffer,
    /// ECC public point y coordinate; empty for other types.
    pub ecc_public_y: EngineBuffer,
    /// `TPM2_ECC_*` curve of an ECC key.
    pub ecc_curve_id: u16,
    /// `TPM2B_NAME` of the key.
    pub name: EngineBuffer,
    /// Name of the parent hierarchy.
    pub parent_name: EngineBuffer,
    /// Qualified name of the parent hierarchy.
    pub parent_qualified_name: EngineBuffer,
}

/// Request record for `TPM2_Create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCreateRequest {
    /// Loaded parent key handle.
    pub parent: u32,
    /// Object type (`RSA`, `ECC`, `SYMCIPHER` or `KEYEDHASH`).
    pub algorithm: u16,
    /// Key only signs or decrypts TPM-generated structures.
    pub restricted: bool,
    /// Key may decrypt.
    pub decrypt: bool,
    /// Key may sign.
    pub sign: bool,
    /// Unique field of the public template.
    pub unique: EngineBuffer,
    /// Authorization value of the new key.
    pub user_auth: EngineBuffer,
    /// Data sealed into the object.
    pub sensitive_data: EngineBuffer,
    /// Policy digest gating use of the key.
    pub auth_policy: EngineBuffer,
}

/// Response record for `TPM2_Create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCreateResponse {
    /// Marshaled `TPM2B_PRIVATE`, loadable under the parent.
    pub tpm2b_private: EngineBuffer,
    /// Marshaled `TPM2B_PUBLIC`.
    pub tpm2b_public: EngineBuffer,
    /// RSA modulus, big-endian; empty for other types.
    pub rsa_public_n: EngineBuffer,
    /// ECC public point x coordinate; empty for other types.
    pub ecc_public_x: EngineBuffer,
    /// ECC public point y coordinate; empty for other types.
    pub ecc_public_y: EngineBuffer,
    /// `TPM2_ECC_*` curve of an ECC key.
    pub ecc_curve_id: u16,
    /// Name of the parent key.
    pub parent_name: EngineBuffer,
    /// Qualified name of the parent key.
    pub parent_qualified_name: EngineBuffer,
}

/// Response record for `TPM2_Load`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLoadResponse {
    /// Transient handle of the loaded object.
    pub handle: u32,
    /// `TPM2B_NAME` of the object.
    pub name: EngineBuffer,
}

/// Signature as produced by `TPM2_Sign` and consumed by verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSignature {
    /// Signature scheme (`RSASSA` or `ECDSA`).
    pub sign_algo: u16,
    /// Digest algorithm of the signed message.
    pub hash_algo: u16,
    /// RSASSA signature; empty for ECDSA.
    pub rsa_ssa_sig: EngineBuffer,
    /// ECDSA `r`; empty for RSASSA.
    pub ecdsa_r: EngineBuffer,
    /// ECDSA `s`; empty for RSASSA.
    pub ecdsa_s: EngineBuffer,
}

/// Response record for `TPM2_Quote`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuoteResponse {
    /// Signature scheme of the quote.
    pub sign_algo: u16,
    /// Digest algorithm of the quote.
    pub hash_algo: u16,
    /// RSASSA signature over `tpm2b_attest`.
    pub rsa_ssa_sig: EngineBuffer,
    /// Marshaled `TPMS_ATTEST` that was signed.
    pub tpm2b_attest: EngineBuffer,
}

/// Request record for `TPM2_Import`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImportRequest {
    /// Loaded parent key handle.
    pub parent: u32,
    /// Marshaled public area of the duplicated object.
    pub public_area: EngineBuffer,
    /// Outer integrity HMAC.
    pub integrity_hmac: EngineBuffer,
    /// Outer-wrapped sensitive area.
    pub encrypted_private: EngineBuffer,
    /// Seed encrypted to the parent.
    pub encrypted_seed: EngineBuffer,
    /// Inner wrapper algorithm; `NULL` when there is none.
    pub symmetric_alg: u16,
    /// Inner wrapper key.
    pub encryption_key: EngineBuffer,
}

/// Response record for `TPM2_Import`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImportResponse {
    /// Marshaled `TPM2B_PRIVATE`, loadable under the parent.
    pub tpm2b_private: EngineBuffer,
    /// Marshaled `TPM2B_PUBLIC`.
    pub tpm2b_public: EngineBuffer,
}

/// Capability data read through `TPM2_GetCapability`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTpmProperties {
    /// `TPM2_PT_REVISION` scaled by 100.
    pub spec_version: u32,
    /// Four-character manufacturer id.
    pub manufacturer_id: String,
}

/// Public area of an NV index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawNvPublic {
    /// Size of the index data area.
    pub data_size: u16,
}

/// Session returned by `TPM2_StartAuthSession`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAuthSession {
    /// Session handle.
    pub handle: u32,
    /// Nonce generated by the TPM.
    pub nonce_tpm: EngineBuffer,
}

/// Fields decoded from a marshaled `TPMS_ATTEST`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttestInfo {
    /// `TPM2_GENERATED_VALUE` for TPM-produced structures.
    pub magic: u32,
    /// `TPM2_ST_ATTEST_*` structure tag.
    pub attest_type: u16,
    /// Qualified name of the signing key.
    pub signer_qualified_name: EngineBuffer,
    /// Caller-supplied qualifying data.
    pub nonce: EngineBuffer,
    /// Digest over the quoted PCRs.
    pub selected_pcr_digest: EngineBuffer,
}

/// Inputs to the engine's KDFa (SP800-108 counter mode).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKdfRequest {
    /// HMAC digest algorithm.
    pub hash: u16,
    /// Derivation key; must not be empty.
    pub key: EngineBuffer,
    /// Label without terminator; must not be empty.
    pub label: EngineBuffer,
    /// First context value.
    pub context_u: EngineBuffer,
    /// Second context value.
    pub context_v: EngineBuffer,
    /// Number of bits to derive.
    pub bits: u32,
}

/// Wire-format keyed-hash object built around a sealed blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKeyedHash {
    /// Marshaled `TPM2B_PRIVATE`.
    pub tpm2b_private: EngineBuffer,
    /// Marshaled `TPM2B_PUBLIC`.
    pub tpm2b_public: EngineBuffer,
    /// `TPM2B_NAME` of the object.
    pub name: EngineBuffer,
}

/// Platform signals and state reads of the simulated TPM.
pub trait SimulatorPort {
    /// Raises platform power.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine refuses the transition.
    fn power_on(&mut self) -> Result<(), EngineError>;

    /// Drops platform power, discarding transient and session state.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine refuses the transition.
    fn power_off(&mut self) -> Result<(), EngineError>;

    /// Wipes persistent state and installs fresh seeds.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine refuses the transition.
    fn manufacture_reset(&mut self) -> Result<(), EngineError>;

    /// Platform power is on.
    fn is_powered_on(&self) -> bool;
    /// Manufacture reset has run at least once.
    fn is_manufactured(&self) -> bool;
    /// `TPM2_Startup` has completed in this power cycle.
    fn is_started(&self) -> bool;

    /// Reads PCR `index` of the SHA-256 bank; empty before manufacture.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be read.
    fn pcr(&self, index: u32) -> Result<EngineBuffer, EngineError>;

    /// Reads the endorsement primary seed.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be read.
    fn endorsement_seed(&self) -> Result<EngineBuffer, EngineError>;

    /// Reads the platform primary seed.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be read.
    fn platform_seed(&self) -> Result<EngineBuffer, EngineError>;

    /// Reads the storage primary seed.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be read.
    fn owner_seed(&self) -> Result<EngineBuffer, EngineError>;

    /// Reads the null hierarchy seed.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be read.
    fn null_seed(&self) -> Result<EngineBuffer, EngineError>;

    /// Reads the number of startups since manufacture.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be read.
    fn boot_counter(&self) -> Result<u32, EngineError>;
}

/// TPM2 command entry points.
///
/// Each call is synchronous; a non-success response code comes back as
/// [`EngineError::Failure`]. A request field the engine cannot carry comes
/// back as [`EngineError::Unsupported`] without the command being sent.
#[allow(clippy::missing_errors_doc)]
pub trait CommandPort {
    /// `TPM2_Startup(CLEAR)`.
    fn startup(&mut self) -> Result<(), EngineError>;
    /// `TPM2_Shutdown(CLEAR)`.
    fn shutdown(&mut self) -> Result<(), EngineError>;
    /// `TPM2_Clear` authorized by the platform hierarchy.
    fn clear(&mut self) -> Result<(), EngineError>;

    /// Extends `pcr` with the SHA-256 digest of `data`.
    fn extend_pcr(&mut self, pcr: u32, data: &EngineBuffer) -> Result<(), EngineError>;

    /// Draws `num_bytes` from the random number generator.
    fn get_random(&mut self, num_bytes: u16) -> Result<EngineBuffer, EngineError>;
    /// Runs the full self test.
    fn self_test(&mut self) -> Result<(), EngineError>;
    /// Reads the revision and manufacturer properties.
    fn get_tpm_properties(&mut self) -> Result<RawTpmProperties, EngineError>;

    /// Runs `TPM2_TestParms` for a keyed-hash object using `hash`.
    fn test_hash_param(&mut self, hash: u16) -> Result<(), EngineError>;

    /// Creates and loads a primary key.
    fn create_primary(
        &mut self,
        request: &RawCreatePrimaryRequest,
    ) -> Result<RawCreatePrimaryResponse, EngineError>;

    /// Creates the RSA endorsement key from the default TCG template.
    fn create_primary_endorsement_key(&mut self)
        -> Result<RawCreatePrimaryResponse, EngineError>;

    /// Creates an ordinary key under a loaded parent without loading it.
    fn create(&mut self, request: &RawCreateRequest) -> Result<RawCreateResponse, EngineError>;

    /// Loads a key created or imported under `parent`.
    fn load(
        &mut self,
        parent: u32,
        tpm2b_private: &EngineBuffer,
        tpm2b_public: &EngineBuffer,
    ) -> Result<RawLoadResponse, EngineError>;

    /// Evicts a transient object or session.
    fn flush_context(&mut self, handle: u32) -> Result<(), EngineError>;

    /// Symmetric encryption with a loaded `SYMCIPHER` key.
    fn encrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError>;
    /// Symmetric decryption with a loaded `SYMCIPHER` key.
    fn decrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError>;
    /// RSA encryption with a loaded RSA key.
    fn rsa_encrypt(&mut self, key: u32, message: &EngineBuffer)
        -> Result<EngineBuffer, EngineError>;
    /// RSA decryption with a loaded RSA key.
    fn rsa_decrypt(&mut self, key: u32, message: &EngineBuffer)
        -> Result<EngineBuffer, EngineError>;

    /// Signs the SHA-256 digest of `message` with `scheme`.
    fn sign(
        &mut self,
        key: u32,
        scheme: u16,
        message: &EngineBuffer,
    ) -> Result<RawSignature, EngineError>;

    /// Verifies `signature` over the SHA-256 digest of `message`.
    fn verify_signature(
        &mut self,
        key: u32,
        message: &EngineBuffer,
        signature: &RawSignature,
    ) -> Result<(), EngineError>;

    /// Makes `object` persistent at `persistent`, authorized by `auth`.
    fn evict_control(&mut self, auth: u32, object: u32, persistent: u32)
        -> Result<(), EngineError>;

    /// Defines an ordinary NV index holding `data_size` bytes.
    fn nv_define_space(&mut self, index: u32, data_size: u16) -> Result<(), EngineError>;
    /// Writes `data` at offset 0 of an NV index.
    fn nv_write(&mut self, index: u32, data: &EngineBuffer) -> Result<(), EngineError>;
    /// Reads the public area of an NV index.
    fn nv_read_public(&mut self, index: u32) -> Result<RawNvPublic, EngineError>;
    /// Reads `size` bytes at `offset` of an NV index.
    fn nv_read(&mut self, index: u32, size: u16, offset: u16) -> Result<EngineBuffer, EngineError>;

    /// Quotes the PCRs set in the 24-bit `pcr_mask`.
    fn quote(
        &mut self,
        key: u32,
        pcr_mask: u32,
        qualifying_data: &EngineBuffer,
    ) -> Result<RawQuoteResponse, EngineError>;

    /// Replaces the authorization value of `hierarchy`.
    fn hierarchy_change_auth(&mut self, hierarchy: u32, auth: &EngineBuffer)
        -> Result<(), EngineError>;

    /// Sets the HMAC value of the first command authorization.
    fn set_auth_password(&mut self, auth: &EngineBuffer) -> Result<(), EngineError>;

    /// Sets the session handle of the first command authorization.
    fn set_session_handle(&mut self, handle: u32) -> Result<(), EngineError>;

    /// Returns the data sealed in a loaded keyed-hash object.
    fn unseal(&mut self, handle: u32) -> Result<EngineBuffer, EngineError>;
    /// Starts a policy session, or a trial session when `trial` is set.
    fn start_auth_session(&mut self, trial: bool) -> Result<RawAuthSession, EngineError>;
    /// Reads the current policy digest of `session`.
    fn policy_get_digest(&mut self, session: u32) -> Result<EngineBuffer, EngineError>;
    /// Adds `TPM2_PolicyPassword` to `session`.
    fn policy_password(&mut self, session: u32) -> Result<(), EngineError>;
    /// Binds `session` to PCR 0..3 having `pcrs_digest`.
    fn policy_pcr(&mut self, session: u32, pcrs_digest: &EngineBuffer)
        -> Result<(), EngineError>;
    /// Binds `session` to the authorization of `auth`.
    fn policy_secret(&mut self, auth: u32, session: u32) -> Result<(), EngineError>;
    /// Resets the dictionary attack lockout.
    fn dictionary_attack_lock_reset(&mut self) -> Result<(), EngineError>;

    /// Imports a duplicated object under a loaded parent.
    fn import(&mut self, request: &RawImportRequest) -> Result<RawImportResponse, EngineError>;
}

/// Host-side helpers compiled into the engine module.
#[allow(clippy::missing_errors_doc)]
pub trait UtilPort {
    /// Decodes a marshaled `TPM2B_ATTEST`.
    fn unmarshal_attest_buffer(
        &mut self,
        tpm2b_attest: &EngineBuffer,
    ) -> Result<RawAttestInfo, EngineError>;

    /// Derives `bits` of key material with KDFa.
    fn kdfa(&mut self, request: &RawKdfRequest) -> Result<EngineBuffer, EngineError>;

    /// Builds a keyed-hash object sealing `sensitive_data`.
    fn keyed_hash(&mut self, sensitive_data: &EngineBuffer) -> Result<RawKeyedHash, EngineError>;
}

/// Complete engine surface required by [`crate::Tpm`].
pub trait Engine: SimulatorPort + CommandPort + UtilPort {}

impl<T: SimulatorPort + CommandPort + UtilPort> Engine for T {}
