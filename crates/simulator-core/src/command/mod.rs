//! Fixed-signature command adapter over an [`Engine`].
//!
//! Every method coerces its inputs into fresh engine buffers before the
//! engine is touched, forwards one synchronous call, and coerces the result
//! only when the call succeeded.

mod crypto;
mod nv;
mod objects;
mod session;
mod util;

use log::{debug, warn};

use crate::buffer::{decode, encode_param, ByteSource};
use crate::config::TpmConfig;
use crate::engine::Engine;
use crate::error::{EngineError, Error};
use crate::registry::AlgorithmId;
use crate::results::TpmProperties;
use crate::snapshot::SnapshotSink;

/// TPM front end owning an engine, a snapshot sink and its configuration.
pub struct Tpm<E: Engine> {
    pub(crate) engine: E,
    pub(crate) sink: Box<dyn SnapshotSink>,
    config: TpmConfig,
}

impl<E: Engine> std::fmt::Debug for Tpm<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tpm")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: Engine> Tpm<E> {
    /// Wraps `engine` without touching it.
    #[must_use]
    pub fn new(engine: E, sink: Box<dyn SnapshotSink>, config: TpmConfig) -> Self {
        Self {
            engine,
            sink,
            config,
        }
    }

    /// Wraps `engine` and applies the attach-time behavior of `config`.
    ///
    /// # Errors
    ///
    /// Returns the first error of the boot sequence when
    /// [`TpmConfig::boot_on_attach`] is set, otherwise the failure of the
    /// initial refresh.
    pub fn attach(engine: E, sink: Box<dyn SnapshotSink>, config: TpmConfig) -> Result<Self, Error> {
        let mut tpm = Self::new(engine, sink, config);
        let mut outcome = if config.boot_on_attach {
            tpm.run_steps(crate::controller::BOOT_STEPS)
        } else {
            Ok(())
        };
        if config.snapshot_on_attach {
            let refreshed = tpm.refresh().map(drop);
            outcome = outcome.and(refreshed);
        }
        outcome.map(|()| tpm)
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &TpmConfig {
        &self.config
    }

    /// Borrows the engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Consumes the front end and returns the engine.
    #[must_use]
    pub fn into_engine(self) -> E {
        self.engine
    }

    pub(crate) fn dispatch<T>(
        &mut self,
        command: &'static str,
        call: impl FnOnce(&mut E) -> Result<T, EngineError>,
    ) -> Result<T, Error> {
        debug!(target: "tpm::command", "{command}");
        call(&mut self.engine).map_err(|err| {
            warn!(target: "tpm::command", "{command}: {err}");
            Error::from(err)
        })
    }

    /// Runs `TPM2_Clear` against the platform hierarchy.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.dispatch("Clear", |engine| engine.clear())
    }

    /// Extends `pcr` with the SHA-256 digest of `data`, then refreshes.
    ///
    /// # Errors
    ///
    /// Returns an argument error for unencodable `data`, otherwise
    /// propagates engine and refresh failures. No refresh happens on
    /// failure.
    pub fn extend_pcr(&mut self, pcr: u32, data: &ByteSource) -> Result<(), Error> {
        let data = encode_param("data", data)?;
        self.dispatch("PCR_Extend", |engine| engine.extend_pcr(pcr, &data))?;
        self.refresh()?;
        Ok(())
    }

    /// Draws `num_bytes` from the TPM random number generator.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn get_random(&mut self, num_bytes: u16) -> Result<Vec<u8>, Error> {
        self.dispatch("GetRandom", |engine| engine.get_random(num_bytes))
            .map(|bytes| decode(&bytes))
    }

    /// Runs the full self test.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn self_test(&mut self) -> Result<(), Error> {
        self.dispatch("SelfTest", |engine| engine.self_test())
    }

    /// Reads the spec revision and manufacturer id.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn get_tpm_properties(&mut self) -> Result<TpmProperties, Error> {
        self.dispatch("GetCapability", |engine| engine.get_tpm_properties())
            .map(TpmProperties::from)
    }

    /// Asks whether the TPM supports `hash` for keyed-hash objects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] with `TPM2_RC_HASH` at parameter 1 for an
    /// unsupported hash.
    pub fn test_hash_param(&mut self, hash: AlgorithmId) -> Result<(), Error> {
        self.dispatch("TestParms", |engine| engine.test_hash_param(hash.value()))
    }

    /// Reads PCR `index` of the SHA-256 bank; empty before manufacture.
    ///
    /// # Errors
    ///
    /// Propagates engine read failures.
    pub fn pcr(&self, index: u32) -> Result<Vec<u8>, Error> {
        Ok(decode(&self.engine.pcr(index)?))
    }

    /// Reads the endorsement primary seed.
    ///
    /// # Errors
    ///
    /// Propagates engine read failures.
    pub fn endorsement_seed(&self) -> Result<Vec<u8>, Error> {
        Ok(decode(&self.engine.endorsement_seed()?))
    }

    /// Reads the platform primary seed.
    ///
    /// # Errors
    ///
    /// Propagates engine read failures.
    pub fn platform_seed(&self) -> Result<Vec<u8>, Error> {
        Ok(decode(&self.engine.platform_seed()?))
    }

    /// Reads the storage primary seed.
    ///
    /// # Errors
    ///
    /// Propagates engine read failures.
    pub fn owner_seed(&self) -> Result<Vec<u8>, Error> {
        Ok(decode(&self.engine.owner_seed()?))
    }

    /// Reads the null hierarchy seed.
    ///
    /// # Errors
    ///
    /// Propagates engine read failures.
    pub fn null_seed(&self) -> Result<Vec<u8>, Error> {
        Ok(decode(&self.engine.null_seed()?))
    }
}
