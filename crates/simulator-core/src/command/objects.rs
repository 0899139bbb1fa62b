use crate::args::{CreateArgs, CreatePrimaryArgs, ImportArgs};
use crate::buffer::{encode_bytes_param, encode_param, EngineBuffer};
use crate::engine::{Engine, RawCreatePrimaryRequest, RawCreateRequest, RawImportRequest};
use crate::error::{ArgumentError, Error};
use crate::registry::Handle;
use crate::results::{CreatePrimaryResult, CreateResult, ImportResult, LoadResult};

use super::Tpm;

impl CreatePrimaryArgs {
    /// Encodes the arguments into an engine request.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when a byte field cannot be encoded.
    pub fn to_raw(&self) -> Result<RawCreatePrimaryRequest, ArgumentError> {
        Ok(RawCreatePrimaryRequest {
            hierarchy: self.hierarchy.value(),
            algorithm: self.algorithm.value(),
            restricted: self.restricted,
            decrypt: self.decrypt,
            sign: self.sign,
            unique: encode_param("unique", &self.unique)?,
            user_auth: encode_param("user_auth", &self.user_auth)?,
            sensitive_data: encode_param("sensitive_data", &self.sensitive_data)?,
            auth_policy: encode_bytes_param("auth_policy", &self.auth_policy)?,
        })
    }
}

impl CreateArgs {
    /// Encodes the arguments for a child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when a byte field cannot be encoded.
    pub fn to_raw(&self, parent: Handle) -> Result<RawCreateRequest, ArgumentError> {
        Ok(RawCreateRequest {
            parent: parent.value(),
            algorithm: self.algorithm.value(),
            restricted: self.restricted,
            decrypt: self.decrypt,
            sign: self.sign,
            unique: encode_param("unique", &self.unique)?,
            user_auth: encode_param("user_auth", &self.user_auth)?,
            sensitive_data: encode_param("sensitive_data", &self.sensitive_data)?,
            auth_policy: encode_bytes_param("auth_policy", &self.auth_policy)?,
        })
    }
}

impl ImportArgs {
    /// Encodes the arguments for import under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when a byte field cannot be encoded.
    pub fn to_raw(&self, parent: Handle) -> Result<RawImportRequest, ArgumentError> {
        Ok(RawImportRequest {
            parent: parent.value(),
            public_area: encode_bytes_param("public_area", &self.public_area)?,
            integrity_hmac: encode_param("integrity_hmac", &self.integrity_hmac)?,
            encrypted_private: encode_param("encrypted_private", &self.encrypted_private)?,
            encrypted_seed: encode_param("encrypted_seed", &self.encrypted_seed)?,
            symmetric_alg: self.symmetric_alg.value(),
            encryption_key: encode_param("encryption_key", &self.encryption_key)?,
        })
    }
}

impl<E: Engine> Tpm<E> {
    /// Creates and loads a primary object.
    ///
    /// # Errors
    ///
    /// Returns an argument error before any engine call, otherwise
    /// propagates engine failures.
    pub fn create_primary(&mut self, args: &CreatePrimaryArgs) -> Result<CreatePrimaryResult, Error> {
        let request = args.to_raw()?;
        self.dispatch("CreatePrimary", |engine| engine.create_primary(&request))
            .map(CreatePrimaryResult::from)
    }

    /// Creates the RSA endorsement key from the default TCG template.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn create_primary_endorsement_key(&mut self) -> Result<CreatePrimaryResult, Error> {
        self.dispatch("CreatePrimary(EK)", |engine| {
            engine.create_primary_endorsement_key()
        })
        .map(CreatePrimaryResult::from)
    }

    /// Creates an ordinary object under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an argument error before any engine call, otherwise
    /// propagates engine failures.
    pub fn create(&mut self, parent: Handle, args: &CreateArgs) -> Result<CreateResult, Error> {
        let request = args.to_raw(parent)?;
        self.dispatch("Create", |engine| engine.create(&request))
            .map(CreateResult::from)
    }

    /// Loads a private/public blob pair under `parent`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn load(
        &mut self,
        parent: Handle,
        tpm2b_private: &EngineBuffer,
        tpm2b_public: &EngineBuffer,
    ) -> Result<LoadResult, Error> {
        self.dispatch("Load", |engine| {
            engine.load(parent.value(), tpm2b_private, tpm2b_public)
        })
        .map(LoadResult::from)
    }

    /// Unloads a transient object or session.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn flush_context(&mut self, handle: Handle) -> Result<(), Error> {
        self.dispatch("FlushContext", |engine| engine.flush_context(handle.value()))
    }

    /// Persists `object` at `persistent`, or evicts it when already persistent.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn evict_control(
        &mut self,
        auth: Handle,
        object: Handle,
        persistent: Handle,
    ) -> Result<(), Error> {
        self.dispatch("EvictControl", |engine| {
            engine.evict_control(auth.value(), object.value(), persistent.value())
        })
    }

    /// Imports a duplicated object under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an argument error before any engine call, otherwise
    /// propagates engine failures.
    pub fn import(&mut self, parent: Handle, args: &ImportArgs) -> Result<ImportResult, Error> {
        let request = args.to_raw(parent)?;
        self.dispatch("Import", |engine| engine.import(&request))
            .map(ImportResult::from)
    }
}
