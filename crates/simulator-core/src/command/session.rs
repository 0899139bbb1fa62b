use crate::buffer::{decode, encode_bytes_param, encode_param, ByteSource};
use crate::engine::Engine;
use crate::error::Error;
use crate::registry::Handle;
use crate::results::AuthSession;

use super::Tpm;

impl<E: Engine> Tpm<E> {
    /// Replaces the authorization value of a hierarchy.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unencodable value, otherwise
    /// propagates engine failures.
    pub fn hierarchy_change_auth(&mut self, hierarchy: Handle, auth: &ByteSource) -> Result<(), Error> {
        let auth = encode_param("auth", auth)?;
        self.dispatch("HierarchyChangeAuth", |engine| {
            engine.hierarchy_change_auth(hierarchy.value(), &auth)
        })
    }

    /// Sets the password used by the first command authorization.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an unencodable value.
    pub fn set_auth_password(&mut self, auth: &ByteSource) -> Result<(), Error> {
        let auth = encode_param("auth", auth)?;
        self.dispatch("SetAuthPassword", |engine| engine.set_auth_password(&auth))
    }

    /// Sets the session used by the first command authorization.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn set_session_handle(&mut self, session: Handle) -> Result<(), Error> {
        self.dispatch("SetSessionHandle", |engine| {
            engine.set_session_handle(session.value())
        })
    }

    /// Returns the data sealed in a loaded keyed-hash object.
    ///
    /// # Errors
    ///
    /// Propagates engine failures, including policy check failures.
    pub fn unseal(&mut self, handle: Handle) -> Result<Vec<u8>, Error> {
        self.dispatch("Unseal", |engine| engine.unseal(handle.value()))
            .map(|data| decode(&data))
    }

    /// Starts a policy session, or a trial session when `trial` is set.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn start_auth_session(&mut self, trial: bool) -> Result<AuthSession, Error> {
        self.dispatch("StartAuthSession", |engine| engine.start_auth_session(trial))
            .map(AuthSession::from)
    }

    /// Reads the current policy digest of `session`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn policy_get_digest(&mut self, session: Handle) -> Result<Vec<u8>, Error> {
        self.dispatch("PolicyGetDigest", |engine| {
            engine.policy_get_digest(session.value())
        })
        .map(|digest| decode(&digest))
    }

    /// Adds a password check to the policy of `session`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn policy_password(&mut self, session: Handle) -> Result<(), Error> {
        self.dispatch("PolicyPassword", |engine| engine.policy_password(session.value()))
    }

    /// Binds the policy of `session` to PCR 0..3 having `pcrs_digest`.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an oversize digest, otherwise
    /// propagates engine failures.
    pub fn policy_pcr(&mut self, session: Handle, pcrs_digest: &[u8]) -> Result<(), Error> {
        let pcrs_digest = encode_bytes_param("pcrs_digest", pcrs_digest)?;
        self.dispatch("PolicyPCR", |engine| {
            engine.policy_pcr(session.value(), &pcrs_digest)
        })
    }

    /// Requires knowledge of the authorization value of `auth`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn policy_secret(&mut self, auth: Handle, session: Handle) -> Result<(), Error> {
        self.dispatch("PolicySecret", |engine| {
            engine.policy_secret(auth.value(), session.value())
        })
    }

    /// Clears the dictionary-attack lockout.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn dictionary_attack_lock_reset(&mut self) -> Result<(), Error> {
        self.dispatch("DictionaryAttackLockReset", |engine| {
            engine.dictionary_attack_lock_reset()
        })
    }
}
