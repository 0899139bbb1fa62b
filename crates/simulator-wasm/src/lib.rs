mod engine;
mod logging;

pub use engine::JsEngine;

use js_sys::{Function, Reflect};
use log::{warn, LevelFilter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use simulator_core::{
    encode_bytes, AlgorithmId, ByteSource, CreateArgs, CreatePrimaryArgs, Error, Handle,
    ImportArgs, KdfArgs, NoopSnapshotSink, NvReadArgs, QuoteArgs, ResponseCode, SignArgs,
    SignResult, SimulatorSnapshot, SnapshotSink, SystemAction, Tpm, TpmConfig,
};
use wasm_bindgen::prelude::*;

/// Publishes snapshots to a JS callback.
struct CallbackSink(Function);

impl SnapshotSink for CallbackSink {
    fn publish(&mut self, snapshot: &SimulatorSnapshot) {
        let delivered = to_js(snapshot).and_then(|value| self.0.call1(&JsValue::NULL, &value));
        if let Err(err) = delivered {
            warn!(target: "tpm::lifecycle", "snapshot callback failed: {err:?}");
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(Into::into)
}

/// Deserializes an optional argument; `undefined` and `null` take the defaults.
///
/// Byte inputs accept a string, a `Uint8Array` or an array of numbers, at the
/// top level or nested in an argument object.
fn args_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    from_js(value)
}

/// Converts an adapter error into a JS `Error` carrying `kind` and, for
/// engine failures, the numeric `rc`.
fn js_error(err: Error) -> JsValue {
    let out = js_sys::Error::new(&err.to_string());
    let kind = match err {
        Error::Engine(_) => "engine",
        Error::State(_) => "state",
        Error::Argument(_) => "argument",
    };
    let mut props = vec![("kind", JsValue::from_str(kind))];
    if let Some(rc) = err.response_code() {
        props.push(("rc", JsValue::from(rc.value())));
    }
    for (key, value) in props {
        if Reflect::set(&out, &JsValue::from_str(key), &value).is_err() {
            warn!(target: "tpm::command", "could not annotate error with {key}");
        }
    }
    out.into()
}

/// Display form of a response code, e.g. `TPM2_RC_HASH (parameter 1)`.
#[wasm_bindgen]
#[must_use]
pub fn response_code_name(rc: u32) -> String {
    ResponseCode::new(rc).to_string()
}

/// Layer, severity, format, base and subject of a response code.
#[wasm_bindgen]
pub fn decompose_response_code(rc: u32) -> Result<JsValue, JsValue> {
    to_js(&ResponseCode::new(rc).decompose())
}

/// Registered name of an algorithm id, if any.
#[wasm_bindgen]
#[must_use]
pub fn algorithm_name(alg: u16) -> Option<String> {
    AlgorithmId::new(alg).name().map(str::to_owned)
}

#[wasm_bindgen]
pub struct WasmTpm {
    tpm: Tpm<JsEngine>,
}

#[wasm_bindgen]
impl WasmTpm {
    /// Attaches to an initialized simulator module.
    ///
    /// `on_snapshot` receives every refreshed snapshot. `config` defaults to
    /// booting and publishing on attach.
    #[wasm_bindgen(constructor)]
    pub fn new(
        module: JsValue,
        on_snapshot: Option<Function>,
        config: JsValue,
    ) -> Result<Self, JsValue> {
        logging::install(LevelFilter::Info);
        let config: TpmConfig = args_or_default(config)?;
        let engine = JsEngine::bind(module)?;
        let sink: Box<dyn SnapshotSink> = match on_snapshot {
            Some(callback) => Box::new(CallbackSink(callback)),
            None => Box::new(NoopSnapshotSink),
        };
        Tpm::attach(engine, sink, config)
            .map(|tpm| Self { tpm })
            .map_err(js_error)
    }

    /// Re-reads the engine and publishes the snapshot.
    pub fn refresh(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.tpm.refresh().map_err(js_error)?)
    }

    /// Powers on, manufactures and starts the TPM.
    pub fn boot(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.tpm.boot().map_err(js_error)?;
        to_js(&snapshot)
    }

    /// Runs `"restart"`, `"clear"` or `"manufacture_reset"`.
    pub fn run_action(&mut self, action: JsValue) -> Result<JsValue, JsValue> {
        let action: SystemAction = from_js(action)?;
        let snapshot = self.tpm.run_action(action).map_err(js_error)?;
        to_js(&snapshot)
    }

    pub fn power_on(&mut self) -> Result<(), JsValue> {
        self.tpm.power_on().map_err(js_error)
    }

    pub fn power_off(&mut self) -> Result<(), JsValue> {
        self.tpm.power_off().map_err(js_error)
    }

    pub fn manufacture_reset(&mut self) -> Result<(), JsValue> {
        self.tpm.manufacture_reset().map_err(js_error)
    }

    pub fn startup(&mut self) -> Result<(), JsValue> {
        self.tpm.startup().map_err(js_error)
    }

    pub fn shutdown(&mut self) -> Result<(), JsValue> {
        self.tpm.shutdown().map_err(js_error)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.tpm.clear().map_err(js_error)
    }

    pub fn extend_pcr(&mut self, pcr: u32, data: JsValue) -> Result<(), JsValue> {
        let data: ByteSource = args_or_default(data)?;
        self.tpm.extend_pcr(pcr, &data).map_err(js_error)
    }

    pub fn get_random(&mut self, num_bytes: u16) -> Result<Vec<u8>, JsValue> {
        self.tpm.get_random(num_bytes).map_err(js_error)
    }

    pub fn self_test(&mut self) -> Result<(), JsValue> {
        self.tpm.self_test().map_err(js_error)
    }

    pub fn get_tpm_properties(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.tpm.get_tpm_properties().map_err(js_error)?)
    }

    pub fn test_hash_param(&mut self, hash: u16) -> Result<(), JsValue> {
        self.tpm
            .test_hash_param(AlgorithmId::new(hash))
            .map_err(js_error)
    }

    pub fn create_primary(&mut self, args: JsValue) -> Result<JsValue, JsValue> {
        let args: CreatePrimaryArgs = args_or_default(args)?;
        to_js(&self.tpm.create_primary(&args).map_err(js_error)?)
    }

    pub fn create_primary_endorsement_key(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.tpm.create_primary_endorsement_key().map_err(js_error)?)
    }

    pub fn create(&mut self, parent: u32, args: JsValue) -> Result<JsValue, JsValue> {
        let args: CreateArgs = args_or_default(args)?;
        to_js(&self.tpm.create(Handle::new(parent), &args).map_err(js_error)?)
    }

    pub fn load(
        &mut self,
        parent: u32,
        tpm2b_private: &[u8],
        tpm2b_public: &[u8],
    ) -> Result<JsValue, JsValue> {
        let loaded = self
            .tpm
            .load(
                Handle::new(parent),
                &encode_bytes(tpm2b_private),
                &encode_bytes(tpm2b_public),
            )
            .map_err(js_error)?;
        to_js(&loaded)
    }

    pub fn flush_context(&mut self, handle: u32) -> Result<(), JsValue> {
        self.tpm.flush_context(Handle::new(handle)).map_err(js_error)
    }

    pub fn evict_control(&mut self, auth: u32, object: u32, persistent: u32) -> Result<(), JsValue> {
        self.tpm
            .evict_control(Handle::new(auth), Handle::new(object), Handle::new(persistent))
            .map_err(js_error)
    }

    pub fn import(&mut self, parent: u32, args: JsValue) -> Result<JsValue, JsValue> {
        let args: ImportArgs = args_or_default(args)?;
        to_js(&self.tpm.import(Handle::new(parent), &args).map_err(js_error)?)
    }

    pub fn encrypt(&mut self, key: u32, message: &[u8]) -> Result<Vec<u8>, JsValue> {
        self.tpm.encrypt(Handle::new(key), message).map_err(js_error)
    }

    pub fn decrypt(&mut self, key: u32, message: &[u8]) -> Result<Vec<u8>, JsValue> {
        self.tpm.decrypt(Handle::new(key), message).map_err(js_error)
    }

    pub fn rsa_encrypt(&mut self, key: u32, message: &[u8]) -> Result<Vec<u8>, JsValue> {
        self.tpm.rsa_encrypt(Handle::new(key), message).map_err(js_error)
    }

    pub fn rsa_decrypt(&mut self, key: u32, message: &[u8]) -> Result<Vec<u8>, JsValue> {
        self.tpm.rsa_decrypt(Handle::new(key), message).map_err(js_error)
    }

    pub fn sign(&mut self, key: u32, args: JsValue) -> Result<JsValue, JsValue> {
        let args: SignArgs = args_or_default(args)?;
        to_js(&self.tpm.sign(Handle::new(key), &args).map_err(js_error)?)
    }

    /// Verifies a signature as returned by `sign`; ECDSA components are hex strings.
    pub fn verify_signature(
        &mut self,
        key: u32,
        message: JsValue,
        signature: JsValue,
    ) -> Result<(), JsValue> {
        let message: ByteSource = args_or_default(message)?;
        let signature: SignResult = from_js(signature)?;
        self.tpm
            .verify_signature(Handle::new(key), &message, &signature)
            .map_err(js_error)
    }

    pub fn quote(&mut self, key: u32, args: JsValue) -> Result<JsValue, JsValue> {
        let args: QuoteArgs = args_or_default(args)?;
        to_js(&self.tpm.quote(Handle::new(key), &args).map_err(js_error)?)
    }

    pub fn nv_define_space(&mut self, index: u32, data_size: u16) -> Result<(), JsValue> {
        self.tpm
            .nv_define_space(Handle::new(index), data_size)
            .map_err(js_error)
    }

    pub fn nv_write(&mut self, index: u32, data: &[u8]) -> Result<(), JsValue> {
        self.tpm.nv_write(Handle::new(index), data).map_err(js_error)
    }

    pub fn nv_read_public(&mut self, index: u32) -> Result<JsValue, JsValue> {
        to_js(&self.tpm.nv_read_public(Handle::new(index)).map_err(js_error)?)
    }

    /// Reads `{ size, offset? }` bytes from an NV index.
    pub fn nv_read(&mut self, index: u32, args: JsValue) -> Result<Vec<u8>, JsValue> {
        let args: NvReadArgs = from_js(args)?;
        self.tpm.nv_read(Handle::new(index), args).map_err(js_error)
    }

    pub fn hierarchy_change_auth(&mut self, hierarchy: u32, auth: JsValue) -> Result<(), JsValue> {
        let auth: ByteSource = args_or_default(auth)?;
        self.tpm
            .hierarchy_change_auth(Handle::new(hierarchy), &auth)
            .map_err(js_error)
    }

    pub fn set_auth_password(&mut self, auth: JsValue) -> Result<(), JsValue> {
        let auth: ByteSource = args_or_default(auth)?;
        self.tpm.set_auth_password(&auth).map_err(js_error)
    }

    pub fn set_session_handle(&mut self, session: u32) -> Result<(), JsValue> {
        self.tpm
            .set_session_handle(Handle::new(session))
            .map_err(js_error)
    }

    pub fn unseal(&mut self, handle: u32) -> Result<Vec<u8>, JsValue> {
        self.tpm.unseal(Handle::new(handle)).map_err(js_error)
    }

    pub fn start_auth_session(&mut self, trial: bool) -> Result<JsValue, JsValue> {
        to_js(&self.tpm.start_auth_session(trial).map_err(js_error)?)
    }

    pub fn policy_get_digest(&mut self, session: u32) -> Result<Vec<u8>, JsValue> {
        self.tpm
            .policy_get_digest(Handle::new(session))
            .map_err(js_error)
    }

    pub fn policy_password(&mut self, session: u32) -> Result<(), JsValue> {
        self.tpm
            .policy_password(Handle::new(session))
            .map_err(js_error)
    }

    pub fn policy_pcr(&mut self, session: u32, pcrs_digest: &[u8]) -> Result<(), JsValue> {
        self.tpm
            .policy_pcr(Handle::new(session), pcrs_digest)
            .map_err(js_error)
    }

    pub fn policy_secret(&mut self, auth: u32, session: u32) -> Result<(), JsValue> {
        self.tpm
            .policy_secret(Handle::new(auth), Handle::new(session))
            .map_err(js_error)
    }

    pub fn dictionary_attack_lock_reset(&mut self) -> Result<(), JsValue> {
        self.tpm.dictionary_attack_lock_reset().map_err(js_error)
    }

    pub fn kdfa(&mut self, args: JsValue) -> Result<Vec<u8>, JsValue> {
        let args: KdfArgs = args_or_default(args)?;
        self.tpm.kdfa(&args).map_err(js_error)
    }

    pub fn unmarshal_attest_buffer(&mut self, tpm2b_attest: &[u8]) -> Result<JsValue, JsValue> {
        to_js(&self.tpm.unmarshal_attest_buffer(tpm2b_attest).map_err(js_error)?)
    }

    pub fn keyed_hash(&mut self, sensitive_data: JsValue) -> Result<JsValue, JsValue> {
        let data: ByteSource = args_or_default(sensitive_data)?;
        to_js(&self.tpm.keyed_hash(&data).map_err(js_error)?)
    }

    pub fn pcr(&self, index: u32) -> Result<Vec<u8>, JsValue> {
        self.tpm.pcr(index).map_err(js_error)
    }

    pub fn endorsement_seed(&self) -> Result<Vec<u8>, JsValue> {
        self.tpm.endorsement_seed().map_err(js_error)
    }

    pub fn platform_seed(&self) -> Result<Vec<u8>, JsValue> {
        self.tpm.platform_seed().map_err(js_error)
    }

    pub fn owner_seed(&self) -> Result<Vec<u8>, JsValue> {
        self.tpm.owner_seed().map_err(js_error)
    }

    pub fn null_seed(&self) -> Result<Vec<u8>, JsValue> {
        self.tpm.null_seed().map_err(js_error)
    }
}
