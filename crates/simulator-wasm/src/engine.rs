//! [`Engine`](simulator_core::Engine) over an initialized Emscripten module.
//!
//! Byte vectors cross the boundary as embind `StdVectorOfBytes` instances,
//! which are deleted as soon as they have been read or passed on. Byte
//! strings travel as JS strings whose character codes are the bytes.
//!
//! Each module function is called with its exact embind arity. Request
//! fields the module has no parameter for must hold their default value and
//! are otherwise rejected with [`EngineError::Unsupported`] before any call.

use js_sys::{Array, Function, Object, Reflect, Uint8Array};
use log::{error, warn};
use simulator_core::{
    encode_bytes, AlgorithmId, CommandPort, EngineBuffer, EngineError, RawAttestInfo, RawAuthSession,
    RawCreatePrimaryRequest, RawCreatePrimaryResponse, RawCreateRequest, RawCreateResponse,
    RawImportRequest, RawImportResponse, RawKdfRequest, RawKeyedHash, RawLoadResponse,
    RawNvPublic, RawQuoteResponse, RawSignature, RawTpmProperties, ResponseCode, SimulatorPort,
    StateError, UtilPort,
};
use wasm_bindgen::{JsCast, JsValue};

const LOG_TARGET: &str = "tpm::engine";

/// PCRs covered by `App.Quote`, which takes no selection.
const QUOTED_PCRS: u32 = 0b1111;

#[derive(Debug, Clone, Copy)]
enum Target {
    Module,
    App,
}

/// Embind object deleted on drop.
struct Owned(JsValue);

impl Drop for Owned {
    fn drop(&mut self) {
        let Ok(delete) = Reflect::get(&self.0, &JsValue::from_str("delete")) else {
            return;
        };
        if let Some(delete) = delete.dyn_ref::<Function>() {
            if let Err(err) = delete.call0(&self.0) {
                warn!(target: LOG_TARGET, "failed to delete embind object: {err:?}");
            }
        }
    }
}

fn thrown(name: &str, exception: &JsValue) -> EngineError {
    error!(target: LOG_TARGET, "{name} threw {exception:?}");
    EngineError::Failure(ResponseCode::FAILURE)
}

fn malformed(name: &str) -> EngineError {
    error!(target: LOG_TARGET, "malformed result for {name}");
    EngineError::Failure(ResponseCode::FAILURE)
}

fn field(object: &JsValue, name: &'static str) -> Result<JsValue, EngineError> {
    Reflect::get(object, &JsValue::from_str(name)).map_err(|err| thrown(name, &err))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn number(value: &JsValue, name: &'static str) -> Result<u32, EngineError> {
    // Embind returns C ints as doubles; negative values wrap like the C cast.
    value
        .as_f64()
        .map(|raw| raw as i64 as u32)
        .ok_or_else(|| malformed(name))
}

fn u16_field(object: &JsValue, name: &'static str) -> Result<u16, EngineError> {
    let raw = number(&field(object, name)?, name)?;
    u16::try_from(raw).map_err(|_| malformed(name))
}

fn status(value: &JsValue, name: &'static str) -> Result<(), EngineError> {
    match number(value, name)? {
        0 => Ok(()),
        rc => Err(EngineError::Failure(ResponseCode::new(rc))),
    }
}

fn text(buffer: &EngineBuffer) -> JsValue {
    let latin1: String = buffer.as_slice().iter().map(|&byte| char::from(byte)).collect();
    JsValue::from_str(&latin1)
}

fn flag(value: bool) -> JsValue {
    JsValue::from(u32::from(value))
}

/// Reads a returned byte vector and releases it.
fn take_bytes(value: JsValue, name: &'static str) -> Result<EngineBuffer, EngineError> {
    if let Some(array) = value.dyn_ref::<Uint8Array>() {
        return Ok(encode_bytes(&array.to_vec()));
    }
    let vector = Owned(value);
    let size = call(&vector.0, "size", &[]).map_err(|err| thrown(name, &err))?;
    let get = Reflect::get(&vector.0, &JsValue::from_str("get"))
        .ok()
        .and_then(|get| get.dyn_into::<Function>().ok())
        .ok_or_else(|| malformed(name))?;
    let mut buffer = EngineBuffer::new();
    for index in 0..number(&size, name)? {
        let byte = get
            .call1(&vector.0, &JsValue::from(index))
            .map_err(|err| thrown(name, &err))?;
        buffer.push(u8::try_from(number(&byte, name)?).map_err(|_| malformed(name))?);
    }
    Ok(buffer)
}

/// Embind value object; vector fields not taken are deleted on drop.
struct Returned(JsValue);

impl Returned {
    /// Fails with the object's `rc` when it is nonzero.
    fn checked(self, name: &'static str) -> Result<Self, EngineError> {
        status(&field(&self.0, "rc")?, name)?;
        Ok(self)
    }

    fn number(&self, name: &'static str) -> Result<u32, EngineError> {
        number(&field(&self.0, name)?, name)
    }

    fn u16(&self, name: &'static str) -> Result<u16, EngineError> {
        u16_field(&self.0, name)
    }

    /// Detaches the named vector so drop does not see it again.
    fn bytes(&self, name: &'static str) -> Result<EngineBuffer, EngineError> {
        let value = field(&self.0, name)?;
        Reflect::set(&self.0, &JsValue::from_str(name), &JsValue::UNDEFINED)
            .map_err(|err| thrown(name, &err))?;
        take_bytes(value, name)
    }
}

impl Drop for Returned {
    fn drop(&mut self) {
        let Some(object) = self.0.dyn_ref::<Object>() else {
            return;
        };
        for value in Object::values(object).iter() {
            if value.is_object() {
                drop(Owned(value));
            }
        }
    }
}

/// Key type `App.Sign` expects for a signature scheme.
fn signing_key_type(scheme: u16) -> Result<u16, EngineError> {
    match AlgorithmId::new(scheme) {
        AlgorithmId::RSASSA => Ok(AlgorithmId::RSA.value()),
        AlgorithmId::ECDSA => Ok(AlgorithmId::ECC.value()),
        _ => Err(EngineError::Unsupported("scheme")),
    }
}

fn call(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    function.apply(target, &args.iter().collect::<Array>())
}

/// Simulator module handle plus its `App` singleton.
#[derive(Debug)]
pub struct JsEngine {
    module: JsValue,
    app: JsValue,
}

impl JsEngine {
    /// Binds to `module` and constructs its `App`.
    ///
    /// # Errors
    ///
    /// Returns the JS exception when `module.App` is missing or throws.
    pub fn bind(module: JsValue) -> Result<Self, JsValue> {
        let class: Function = Reflect::get(&module, &JsValue::from_str("App"))?.dyn_into()?;
        let app = Reflect::construct(&class, &Array::new())?;
        Ok(Self { module, app })
    }

    fn invoke(
        &self,
        target: Target,
        name: &'static str,
        args: &[JsValue],
    ) -> Result<JsValue, EngineError> {
        let receiver = match target {
            Target::Module => &self.module,
            Target::App => &self.app,
        };
        call(receiver, name, args).map_err(|err| thrown(name, &err))
    }

    fn app_status(&self, name: &'static str, args: &[JsValue]) -> Result<(), EngineError> {
        self.require_started()?;
        status(&self.invoke(Target::App, name, args)?, name)
    }

    fn app_bytes(&self, name: &'static str, args: &[JsValue]) -> Result<EngineBuffer, EngineError> {
        self.require_started()?;
        take_bytes(self.invoke(Target::App, name, args)?, name)
    }

    fn app_result(&self, name: &'static str, args: &[JsValue]) -> Result<Returned, EngineError> {
        self.require_started()?;
        Returned(self.invoke(Target::App, name, args)?).checked(name)
    }

    fn vector(&self, buffer: &EngineBuffer) -> Result<Owned, EngineError> {
        const NAME: &str = "StdVectorOfBytes";
        let class: Function = Reflect::get(&self.module, &JsValue::from_str(NAME))
            .ok()
            .and_then(|class| class.dyn_into().ok())
            .ok_or_else(|| malformed(NAME))?;
        let vector = Owned(Reflect::construct(&class, &Array::new()).map_err(|err| thrown(NAME, &err))?);
        for &byte in buffer.as_slice() {
            call(&vector.0, "push_back", &[JsValue::from(byte)]).map_err(|err| thrown(NAME, &err))?;
        }
        Ok(vector)
    }

    fn module_flag(&self, name: &'static str) -> bool {
        self.invoke(Target::Module, name, &[])
            .and_then(|value| number(&value, name))
            .is_ok_and(|value| value != 0)
    }

    fn module_bytes(&self, name: &'static str, args: &[JsValue]) -> Result<EngineBuffer, EngineError> {
        take_bytes(self.invoke(Target::Module, name, args)?, name)
    }

    fn require_started(&self) -> Result<(), EngineError> {
        if !self.is_powered_on() {
            return Err(StateError::PoweredOff.into());
        }
        if !self.is_started() {
            return Err(StateError::NotStarted.into());
        }
        Ok(())
    }

    fn create_primary_response(result: &Returned) -> Result<RawCreatePrimaryResponse, EngineError> {
        Ok(RawCreatePrimaryResponse {
            handle: result.number("handle")?,
            rsa_public_n: result.bytes("rsa_public_n")?,
            ecc_public_x: result.bytes("ecc_public_x")?,
            ecc_public_y: result.bytes("ecc_public_y")?,
            ecc_curve_id: result.u16("ecc_curve_id")?,
            name: result.bytes("name")?,
            parent_name: result.bytes("parent_name")?,
            parent_qualified_name: result.bytes("parent_qualified_name")?,
        })
    }
}

impl SimulatorPort for JsEngine {
    fn power_on(&mut self) -> Result<(), EngineError> {
        self.invoke(Target::Module, "SimPowerOn", &[]).map(drop)
    }

    fn power_off(&mut self) -> Result<(), EngineError> {
        self.invoke(Target::Module, "SimPowerOff", &[]).map(drop)
    }

    fn manufacture_reset(&mut self) -> Result<(), EngineError> {
        if !self.is_powered_on() {
            return Err(StateError::PoweredOff.into());
        }
        self.invoke(Target::Module, "SimManufactureReset", &[])
            .map(drop)
    }

    fn is_powered_on(&self) -> bool {
        self.module_flag("SimIsPoweredOn")
    }

    fn is_manufactured(&self) -> bool {
        self.module_flag("SimIsManufactured")
    }

    fn is_started(&self) -> bool {
        self.module_flag("SimIsStarted")
    }

    fn pcr(&self, index: u32) -> Result<EngineBuffer, EngineError> {
        self.module_bytes("SimGetPcr", &[JsValue::from(index)])
    }

    fn endorsement_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.module_bytes("SimGetEndorsementSeed", &[])
    }

    fn platform_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.module_bytes("SimGetPlatformSeed", &[])
    }

    fn owner_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.module_bytes("SimGetOwnerSeed", &[])
    }

    fn null_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.module_bytes("SimGetNullSeed", &[])
    }

    fn boot_counter(&self) -> Result<u32, EngineError> {
        const NAME: &str = "SimGetBootCounter";
        number(&self.invoke(Target::Module, NAME, &[])?, NAME)
    }
}

impl CommandPort for JsEngine {
    fn startup(&mut self) -> Result<(), EngineError> {
        if !self.is_powered_on() {
            return Err(StateError::PoweredOff.into());
        }
        if !self.is_manufactured() {
            return Err(StateError::NotManufactured.into());
        }
        if self.is_started() {
            return Err(StateError::AlreadyStarted.into());
        }
        status(&self.invoke(Target::App, "Startup", &[])?, "Startup")
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        self.app_status("Shutdown", &[])
    }

    fn clear(&mut self) -> Result<(), EngineError> {
        self.app_status("Clear", &[])
    }

    fn extend_pcr(&mut self, pcr: u32, data: &EngineBuffer) -> Result<(), EngineError> {
        self.app_status("ExtendPcr", &[JsValue::from(pcr), text(data)])
    }

    fn get_random(&mut self, num_bytes: u16) -> Result<EngineBuffer, EngineError> {
        self.app_bytes("GetRandom", &[JsValue::from(num_bytes)])
    }

    fn self_test(&mut self) -> Result<(), EngineError> {
        self.app_status("SelfTest", &[])
    }

    fn get_tpm_properties(&mut self) -> Result<RawTpmProperties, EngineError> {
        self.require_started()?;
        let result = self.invoke(Target::App, "GetTpmProperties", &[])?;
        Ok(RawTpmProperties {
            spec_version: number(&field(&result, "spec_version")?, "spec_version")?,
            manufacturer_id: field(&result, "manufacturer_id")?
                .as_string()
                .ok_or_else(|| malformed("manufacturer_id"))?,
        })
    }

    fn test_hash_param(&mut self, hash: u16) -> Result<(), EngineError> {
        self.app_status("TestHashParam", &[JsValue::from(hash)])
    }

    fn create_primary(
        &mut self,
        request: &RawCreatePrimaryRequest,
    ) -> Result<RawCreatePrimaryResponse, EngineError> {
        let auth_policy = self.vector(&request.auth_policy)?;
        let result = self.app_result(
            "CreatePrimary",
            &[
                JsValue::from(request.hierarchy),
                JsValue::from(request.algorithm),
                flag(request.restricted),
                flag(request.decrypt),
                flag(request.sign),
                text(&request.unique),
                text(&request.user_auth),
                text(&request.sensitive_data),
                auth_policy.0.clone(),
            ],
        )?;
        Self::create_primary_response(&result)
    }

    fn create_primary_endorsement_key(&mut self) -> Result<RawCreatePrimaryResponse, EngineError> {
        let result = self.app_result("CreatePrimaryEndorsementKey", &[])?;
        Self::create_primary_response(&result)
    }

    fn create(&mut self, request: &RawCreateRequest) -> Result<RawCreateResponse, EngineError> {
        if !request.unique.is_empty() {
            return Err(EngineError::Unsupported("unique"));
        }
        let auth_policy = self.vector(&request.auth_policy)?;
        let result = self.app_result(
            "Create",
            &[
                JsValue::from(request.parent),
                JsValue::from(request.algorithm),
                flag(request.restricted),
                flag(request.decrypt),
                flag(request.sign),
                text(&request.user_auth),
                text(&request.sensitive_data),
                auth_policy.0.clone(),
            ],
        )?;
        Ok(RawCreateResponse {
            tpm2b_private: result.bytes("tpm2b_private")?,
            tpm2b_public: result.bytes("tpm2b_public")?,
            rsa_public_n: result.bytes("rsa_public_n")?,
            ecc_public_x: result.bytes("ecc_public_x")?,
            ecc_public_y: result.bytes("ecc_public_y")?,
            ecc_curve_id: result.u16("ecc_curve_id")?,
            parent_name: result.bytes("parent_name")?,
            parent_qualified_name: result.bytes("parent_qualified_name")?,
        })
    }

    fn load(
        &mut self,
        parent: u32,
        tpm2b_private: &EngineBuffer,
        tpm2b_public: &EngineBuffer,
    ) -> Result<RawLoadResponse, EngineError> {
        let private = self.vector(tpm2b_private)?;
        let public = self.vector(tpm2b_public)?;
        let result = self.app_result(
            "Load",
            &[JsValue::from(parent), private.0.clone(), public.0.clone()],
        )?;
        Ok(RawLoadResponse {
            handle: result.number("handle")?,
            name: result.bytes("name")?,
        })
    }

    fn flush_context(&mut self, handle: u32) -> Result<(), EngineError> {
        self.app_status("FlushContext", &[JsValue::from(handle)])
    }

    fn encrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        let message = self.vector(message)?;
        self.app_bytes("Encrypt", &[JsValue::from(key), message.0.clone()])
    }

    fn decrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        let message = self.vector(message)?;
        self.app_bytes("Decrypt", &[JsValue::from(key), message.0.clone()])
    }

    fn rsa_encrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        let message = self.vector(message)?;
        self.app_bytes("RSAEncrypt", &[JsValue::from(key), message.0.clone()])
    }

    fn rsa_decrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        let message = self.vector(message)?;
        self.app_bytes("RSADecrypt", &[JsValue::from(key), message.0.clone()])
    }

    fn sign(
        &mut self,
        key: u32,
        scheme: u16,
        message: &EngineBuffer,
    ) -> Result<RawSignature, EngineError> {
        let key_type = signing_key_type(scheme)?;
        let result = self.app_result(
            "Sign",
            &[JsValue::from(key), JsValue::from(key_type), text(message)],
        )?;
        Ok(RawSignature {
            sign_algo: result.u16("sign_algo")?,
            hash_algo: result.u16("hash_algo")?,
            rsa_ssa_sig: result.bytes("rsa_ssa_sig")?,
            ecdsa_r: result.bytes("ecdsa_r")?,
            ecdsa_s: result.bytes("ecdsa_s")?,
        })
    }

    fn verify_signature(
        &mut self,
        key: u32,
        message: &EngineBuffer,
        signature: &RawSignature,
    ) -> Result<(), EngineError> {
        let rsa_ssa_sig = self.vector(&signature.rsa_ssa_sig)?;
        let ecdsa_r = self.vector(&signature.ecdsa_r)?;
        let ecdsa_s = self.vector(&signature.ecdsa_s)?;
        let object: JsValue = Object::new().into();
        let fields = [
            ("rc", JsValue::from(0_u32)),
            ("sign_algo", JsValue::from(signature.sign_algo)),
            ("hash_algo", JsValue::from(signature.hash_algo)),
            ("rsa_ssa_sig", rsa_ssa_sig.0.clone()),
            ("ecdsa_r", ecdsa_r.0.clone()),
            ("ecdsa_s", ecdsa_s.0.clone()),
        ];
        for (name, value) in fields {
            Reflect::set(&object, &JsValue::from_str(name), &value)
                .map_err(|err| thrown("VerifySignature", &err))?;
        }
        self.app_status(
            "VerifySignature",
            &[JsValue::from(key), text(message), object],
        )
    }

    fn evict_control(&mut self, auth: u32, object: u32, persistent: u32) -> Result<(), EngineError> {
        self.app_status(
            "EvictControl",
            &[
                JsValue::from(auth),
                JsValue::from(object),
                JsValue::from(persistent),
            ],
        )
    }

    fn nv_define_space(&mut self, index: u32, data_size: u16) -> Result<(), EngineError> {
        self.app_status(
            "NvDefineSpace",
            &[JsValue::from(index), JsValue::from(data_size)],
        )
    }

    fn nv_write(&mut self, index: u32, data: &EngineBuffer) -> Result<(), EngineError> {
        let data = self.vector(data)?;
        self.app_status("NvWrite", &[JsValue::from(index), data.0.clone()])
    }

    fn nv_read_public(&mut self, index: u32) -> Result<RawNvPublic, EngineError> {
        let result = self.app_result("NvReadPublic", &[JsValue::from(index)])?;
        Ok(RawNvPublic {
            data_size: result.u16("data_size")?,
        })
    }

    fn nv_read(&mut self, index: u32, size: u16, offset: u16) -> Result<EngineBuffer, EngineError> {
        let result = self.app_result(
            "NvRead",
            &[
                JsValue::from(index),
                JsValue::from(size),
                JsValue::from(offset),
            ],
        )?;
        result.bytes("data")
    }

    fn quote(
        &mut self,
        key: u32,
        pcr_mask: u32,
        qualifying_data: &EngineBuffer,
    ) -> Result<RawQuoteResponse, EngineError> {
        if pcr_mask != QUOTED_PCRS {
            return Err(EngineError::Unsupported("pcr_selection"));
        }
        let result = self.app_result("Quote", &[JsValue::from(key), text(qualifying_data)])?;
        Ok(RawQuoteResponse {
            sign_algo: result.u16("sign_algo")?,
            hash_algo: result.u16("hash_algo")?,
            rsa_ssa_sig: result.bytes("rsa_ssa_sig")?,
            tpm2b_attest: result.bytes("tpm2b_attest")?,
        })
    }

    fn hierarchy_change_auth(&mut self, hierarchy: u32, auth: &EngineBuffer) -> Result<(), EngineError> {
        self.app_status(
            "HierarchyChangeAuth",
            &[JsValue::from(hierarchy), text(auth)],
        )
    }

    fn set_auth_password(&mut self, auth: &EngineBuffer) -> Result<(), EngineError> {
        self.invoke(Target::App, "SetAuthPassword", &[text(auth)])
            .map(drop)
    }

    fn set_session_handle(&mut self, handle: u32) -> Result<(), EngineError> {
        self.invoke(Target::App, "SetSessionHandle", &[JsValue::from(handle)])
            .map(drop)
    }

    fn unseal(&mut self, handle: u32) -> Result<EngineBuffer, EngineError> {
        let result = self.app_result("Unseal", &[JsValue::from(handle)])?;
        result.bytes("sensitive_data")
    }

    fn start_auth_session(&mut self, trial: bool) -> Result<RawAuthSession, EngineError> {
        let result = self.app_result("StartAuthSession", &[JsValue::from(trial)])?;
        Ok(RawAuthSession {
            handle: result.number("handle")?,
            nonce_tpm: result.bytes("nonce_tpm")?,
        })
    }

    fn policy_get_digest(&mut self, session: u32) -> Result<EngineBuffer, EngineError> {
        self.app_bytes("PolicyGetDigest", &[JsValue::from(session)])
    }

    fn policy_password(&mut self, session: u32) -> Result<(), EngineError> {
        self.app_status("PolicyPassword", &[JsValue::from(session)])
    }

    fn policy_pcr(&mut self, session: u32, pcrs_digest: &EngineBuffer) -> Result<(), EngineError> {
        let digest = self.vector(pcrs_digest)?;
        self.app_status("PolicyPCR", &[JsValue::from(session), digest.0.clone()])
    }

    fn policy_secret(&mut self, auth: u32, session: u32) -> Result<(), EngineError> {
        self.app_status(
            "PolicySecret",
            &[JsValue::from(auth), JsValue::from(session)],
        )
    }

    fn dictionary_attack_lock_reset(&mut self) -> Result<(), EngineError> {
        self.app_status("DictionaryAttackLockReset", &[])
    }

    fn import(&mut self, request: &RawImportRequest) -> Result<RawImportResponse, EngineError> {
        if request.symmetric_alg != AlgorithmId::NULL.value() {
            return Err(EngineError::Unsupported("symmetric_alg"));
        }
        if !request.encryption_key.is_empty() {
            return Err(EngineError::Unsupported("encryption_key"));
        }
        let public_area = self.vector(&request.public_area)?;
        let integrity_hmac = self.vector(&request.integrity_hmac)?;
        let encrypted_private = self.vector(&request.encrypted_private)?;
        let encrypted_seed = self.vector(&request.encrypted_seed)?;
        let result = self.app_result(
            "Import",
            &[
                JsValue::from(request.parent),
                public_area.0.clone(),
                integrity_hmac.0.clone(),
                encrypted_private.0.clone(),
                encrypted_seed.0.clone(),
            ],
        )?;
        Ok(RawImportResponse {
            tpm2b_private: result.bytes("tpm2b_private")?,
            tpm2b_public: result.bytes("tpm2b_public")?,
        })
    }
}

impl UtilPort for JsEngine {
    fn unmarshal_attest_buffer(&mut self, tpm2b_attest: &EngineBuffer) -> Result<RawAttestInfo, EngineError> {
        const NAME: &str = "UtilUnmarshalAttestBuffer";
        let attest = self.vector(tpm2b_attest)?;
        let result = Returned(self.invoke(Target::Module, NAME, &[attest.0.clone()])?).checked(NAME)?;
        Ok(RawAttestInfo {
            magic: result.number("magic")?,
            attest_type: result.u16("type")?,
            signer_qualified_name: result.bytes("signer_qualified_name")?,
            nonce: result.bytes("nonce")?,
            selected_pcr_digest: result.bytes("selected_pcr_digest")?,
        })
    }

    fn kdfa(&mut self, request: &RawKdfRequest) -> Result<EngineBuffer, EngineError> {
        const NAME: &str = "UtilKDFa";
        let key = self.vector(&request.key)?;
        let context_u = self.vector(&request.context_u)?;
        let context_v = self.vector(&request.context_v)?;
        let result = self.invoke(
            Target::Module,
            NAME,
            &[
                JsValue::from(request.hash),
                key.0.clone(),
                text(&request.label),
                context_u.0.clone(),
                context_v.0.clone(),
                JsValue::from(request.bits),
            ],
        )?;
        let derived = take_bytes(result, NAME)?;
        // The module signals failure with an empty vector.
        if derived.is_empty() && request.bits > 0 {
            warn!(target: LOG_TARGET, "{NAME} derived no key material");
            return Err(EngineError::Failure(ResponseCode::FAILURE));
        }
        Ok(derived)
    }

    fn keyed_hash(&mut self, sensitive_data: &EngineBuffer) -> Result<RawKeyedHash, EngineError> {
        const NAME: &str = "KeyedHash";
        let class: Function = Reflect::get(&self.module, &JsValue::from_str(NAME))
            .ok()
            .and_then(|class| class.dyn_into().ok())
            .ok_or_else(|| malformed(NAME))?;
        let object = Owned(
            Reflect::construct(&class, &[text(sensitive_data)].iter().collect::<Array>())
                .map_err(|err| thrown(NAME, &err))?,
        );
        let encoded = |method: &'static str| {
            call(&object.0, method, &[])
                .map_err(|err| thrown(method, &err))
                .and_then(|value| take_bytes(value, method))
        };
        Ok(RawKeyedHash {
            tpm2b_private: encoded("GetEncodedPrivate")?,
            tpm2b_public: encoded("GetEncodedPublic")?,
            name: encoded("GetEncodedPublicName")?,
        })
    }
}
