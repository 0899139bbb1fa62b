//! In-memory engine double shared by the integration suites.
//!
//! Enforces the power/manufacture/startup lifecycle, keeps a SHA-256 PCR
//! bank, records every port call by name and supports per-call failure
//! injection.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sha2::{Digest, Sha256};
use simulator_core::{
    decode, encode_bytes, offset, AlgorithmId, CommandPort, EngineBuffer, EngineError,
    RawAttestInfo, RawAuthSession, RawCreatePrimaryRequest, RawCreatePrimaryResponse,
    RawCreateRequest, RawCreateResponse, RawImportRequest, RawImportResponse, RawKdfRequest,
    RawKeyedHash, RawLoadResponse, RawNvPublic, RawQuoteResponse, RawSignature,
    RawTpmProperties, ResponseCode, SimulatorPort, SimulatorSnapshot, SnapshotSink, StateError,
    StructureTag, UtilPort, GENERATED_VALUE,
};

pub const PCR_COUNT: usize = 24;
pub const FIRST_TRANSIENT: u32 = 0x8000_0000;
pub const FIRST_SESSION: u32 = 0x0300_0000;
pub const PRIVATE_MARKER: u8 = 0xA5;

/// Engine failure a handle-typed first parameter produces when unknown.
pub const RC_BAD_HANDLE_1: ResponseCode =
    ResponseCode::new(ResponseCode::HANDLE.value() + offset::N1);

fn sha256(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

#[derive(Debug, Clone, Default)]
struct LoadedObject {
    sealed: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MockEngine {
    pub calls: Vec<&'static str>,
    pub failures: HashMap<&'static str, ResponseCode>,
    pub powered_on: bool,
    pub manufactured: bool,
    pub started: bool,
    pub boot_counter: u32,
    pub pcrs: Vec<Vec<u8>>,
    seed_generation: [u8; 4],
    objects: HashMap<u32, LoadedObject>,
    next_object: u32,
    sessions: HashMap<u32, Vec<u8>>,
    next_session: u32,
    nv: HashMap<u32, (u16, Option<Vec<u8>>)>,
    pub persistent: Vec<(u32, u32, u32)>,
    pub auth_password: EngineBuffer,
    pub session_handle: Option<u32>,
    pub create_primary_requests: Vec<RawCreatePrimaryRequest>,
    pub create_requests: Vec<RawCreateRequest>,
    pub import_requests: Vec<RawImportRequest>,
    pub kdf_requests: Vec<RawKdfRequest>,
    pub sign_requests: Vec<(u32, u16, EngineBuffer)>,
    pub quote_requests: Vec<(u32, u32, EngineBuffer)>,
    pub hierarchy_auth: HashMap<u32, EngineBuffer>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            next_object: FIRST_TRANSIENT,
            next_session: FIRST_SESSION,
            ..Self::default()
        }
    }

    /// Engine that has already been powered, manufactured and started.
    pub fn booted() -> Self {
        let mut engine = Self::new();
        engine.power_on().expect("power on");
        engine.manufacture_reset().expect("manufacture");
        engine.startup().expect("startup");
        engine.calls.clear();
        engine
    }

    /// Makes every later call named `call` fail with `rc`.
    pub fn fail(&mut self, call: &'static str, rc: ResponseCode) {
        self.failures.insert(call, rc);
    }

    fn enter(&mut self, call: &'static str) -> Result<(), EngineError> {
        self.calls.push(call);
        match self.failures.get(call) {
            Some(rc) => Err(EngineError::Failure(*rc)),
            None => Ok(()),
        }
    }

    /// State reads are not recorded but honor injected failures.
    fn read_state(&self, call: &'static str) -> Result<(), EngineError> {
        match self.failures.get(call) {
            Some(rc) => Err(EngineError::Failure(*rc)),
            None => Ok(()),
        }
    }

    fn command(&mut self, call: &'static str) -> Result<(), EngineError> {
        self.enter(call)?;
        if !self.powered_on {
            return Err(StateError::PoweredOff.into());
        }
        if !self.started {
            return Err(StateError::NotStarted.into());
        }
        Ok(())
    }

    fn seed(&self, kind: u8) -> EngineBuffer {
        if !self.manufactured {
            return EngineBuffer::new();
        }
        encode_bytes(&sha256(&[&[kind, self.seed_generation[usize::from(kind)]]]))
    }

    fn object(&self, handle: u32) -> Result<&LoadedObject, EngineError> {
        self.objects
            .get(&handle)
            .ok_or(EngineError::Failure(RC_BAD_HANDLE_1))
    }

    fn allocate_object(&mut self, object: LoadedObject) -> u32 {
        let handle = self.next_object;
        self.next_object += 1;
        self.objects.insert(handle, object);
        handle
    }

    fn name_of(handle: u32) -> EngineBuffer {
        let mut name = vec![0x00, 0x0B];
        name.extend(sha256(&[&handle.to_be_bytes()]));
        encode_bytes(&name)
    }

    fn public_key(algorithm: u16, seed: &[u8]) -> (EngineBuffer, EngineBuffer, EngineBuffer, u16) {
        let material = sha256(&[seed]);
        if algorithm == AlgorithmId::ECC.value() {
            let x = material.clone();
            let y = sha256(&[&material]);
            return (EngineBuffer::new(), encode_bytes(&x), encode_bytes(&y), 0x0003);
        }
        if algorithm == AlgorithmId::RSA.value() {
            let mut n = Vec::with_capacity(256);
            while n.len() < 256 {
                n.extend(sha256(&[&material, &[u8::try_from(n.len() / 32).expect("block")]]));
            }
            n[0] |= 0x80;
            return (encode_bytes(&n), EngineBuffer::new(), EngineBuffer::new(), 0);
        }
        (EngineBuffer::new(), EngineBuffer::new(), EngineBuffer::new(), 0)
    }

    fn signature(scheme: u16, message: &EngineBuffer) -> RawSignature {
        let digest = sha256(&[&decode(message)]);
        if scheme == AlgorithmId::ECDSA.value() {
            // High bit set so the integers keep their width through BigUint.
            let mut r = digest[..16].to_vec();
            let mut s = digest[16..].to_vec();
            r[0] |= 0x80;
            s[0] |= 0x80;
            return RawSignature {
                sign_algo: scheme,
                hash_algo: AlgorithmId::SHA256.value(),
                rsa_ssa_sig: EngineBuffer::new(),
                ecdsa_r: encode_bytes(&r),
                ecdsa_s: encode_bytes(&s),
            };
        }
        RawSignature {
            sign_algo: scheme,
            hash_algo: AlgorithmId::SHA256.value(),
            rsa_ssa_sig: encode_bytes(&digest),
            ecdsa_r: EngineBuffer::new(),
            ecdsa_s: EngineBuffer::new(),
        }
    }

    fn pcr_digest(&self, mask: u32) -> Vec<u8> {
        let selected: Vec<&[u8]> = (0..PCR_COUNT)
            .filter(|index| mask & (1 << index) != 0)
            .map(|index| self.pcrs[index].as_slice())
            .collect();
        sha256(&selected)
    }

    fn extend_session(&mut self, session: u32, parts: &[&[u8]]) -> Result<(), EngineError> {
        let digest = self
            .sessions
            .get_mut(&session)
            .ok_or(EngineError::Failure(RC_BAD_HANDLE_1))?;
        let mut all: Vec<&[u8]> = vec![digest.as_slice()];
        all.extend_from_slice(parts);
        *digest = sha256(&all);
        Ok(())
    }
}

impl SimulatorPort for MockEngine {
    fn power_on(&mut self) -> Result<(), EngineError> {
        self.enter("power_on")?;
        self.powered_on = true;
        Ok(())
    }

    fn power_off(&mut self) -> Result<(), EngineError> {
        self.enter("power_off")?;
        self.powered_on = false;
        self.started = false;
        self.objects.clear();
        self.sessions.clear();
        Ok(())
    }

    fn manufacture_reset(&mut self) -> Result<(), EngineError> {
        self.enter("manufacture_reset")?;
        if !self.powered_on {
            return Err(StateError::PoweredOff.into());
        }
        self.manufactured = true;
        self.started = false;
        self.boot_counter = 0;
        self.pcrs = vec![vec![0; 32]; PCR_COUNT];
        for generation in &mut self.seed_generation {
            *generation = generation.wrapping_add(1);
        }
        self.nv.clear();
        Ok(())
    }

    fn is_powered_on(&self) -> bool {
        self.powered_on
    }

    fn is_manufactured(&self) -> bool {
        self.manufactured
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn pcr(&self, index: u32) -> Result<EngineBuffer, EngineError> {
        self.read_state("pcr")?;
        if !self.manufactured {
            return Ok(EngineBuffer::new());
        }
        Ok(usize::try_from(index)
            .ok()
            .and_then(|index| self.pcrs.get(index))
            .map_or_else(EngineBuffer::new, |value| encode_bytes(value)))
    }

    fn endorsement_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.read_state("endorsement_seed")?;
        Ok(self.seed(0))
    }

    fn platform_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.read_state("platform_seed")?;
        Ok(self.seed(1))
    }

    fn owner_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.read_state("owner_seed")?;
        Ok(self.seed(2))
    }

    fn null_seed(&self) -> Result<EngineBuffer, EngineError> {
        self.read_state("null_seed")?;
        Ok(self.seed(3))
    }

    fn boot_counter(&self) -> Result<u32, EngineError> {
        self.read_state("boot_counter")?;
        Ok(self.boot_counter)
    }
}

impl CommandPort for MockEngine {
    fn startup(&mut self) -> Result<(), EngineError> {
        self.enter("startup")?;
        if !self.powered_on {
            return Err(StateError::PoweredOff.into());
        }
        if !self.manufactured {
            return Err(StateError::NotManufactured.into());
        }
        if self.started {
            return Err(StateError::AlreadyStarted.into());
        }
        self.started = true;
        self.boot_counter += 1;
        self.pcrs = vec![vec![0; 32]; PCR_COUNT];
        self.seed_generation[3] = self.seed_generation[3].wrapping_add(1);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        self.command("shutdown")
    }

    fn clear(&mut self) -> Result<(), EngineError> {
        self.command("clear")?;
        self.seed_generation[2] = self.seed_generation[2].wrapping_add(1);
        Ok(())
    }

    fn extend_pcr(&mut self, pcr: u32, data: &EngineBuffer) -> Result<(), EngineError> {
        self.command("extend_pcr")?;
        let slot = usize::try_from(pcr)
            .ok()
            .and_then(|index| self.pcrs.get_mut(index))
            .ok_or(EngineError::Failure(ResponseCode::new(
                ResponseCode::VALUE.value() + offset::N1,
            )))?;
        let digest = sha256(&[&decode(data)]);
        *slot = sha256(&[slot.as_slice(), &digest]);
        Ok(())
    }

    fn get_random(&mut self, num_bytes: u16) -> Result<EngineBuffer, EngineError> {
        self.command("get_random")?;
        let bytes: Vec<u8> = (0..num_bytes)
            .map(|i| i.to_le_bytes()[0].wrapping_mul(37))
            .collect();
        Ok(encode_bytes(&bytes))
    }

    fn self_test(&mut self) -> Result<(), EngineError> {
        self.command("self_test")
    }

    fn get_tpm_properties(&mut self) -> Result<RawTpmProperties, EngineError> {
        self.command("get_tpm_properties")?;
        Ok(RawTpmProperties {
            spec_version: 146,
            manufacturer_id: "IBM ".to_owned(),
        })
    }

    fn test_hash_param(&mut self, hash: u16) -> Result<(), EngineError> {
        self.command("test_hash_param")?;
        if AlgorithmId::new(hash).is_hash() {
            return Ok(());
        }
        Err(EngineError::Failure(ResponseCode::new(
            offset::P + offset::N1 + ResponseCode::HASH.value(),
        )))
    }

    fn create_primary(
        &mut self,
        request: &RawCreatePrimaryRequest,
    ) -> Result<RawCreatePrimaryResponse, EngineError> {
        self.command("create_primary")?;
        self.create_primary_requests.push(request.clone());
        let seed = decode(&self.seed(2));
        let (n, x, y, curve) = Self::public_key(request.algorithm, &[seed, decode(&request.unique)].concat());
        let handle = self.allocate_object(LoadedObject::default());
        Ok(RawCreatePrimaryResponse {
            handle,
            rsa_public_n: n,
            ecc_public_x: x,
            ecc_public_y: y,
            ecc_curve_id: curve,
            name: Self::name_of(handle),
            parent_name: encode_bytes(&request.hierarchy.to_be_bytes()),
            parent_qualified_name: encode_bytes(&request.hierarchy.to_be_bytes()),
        })
    }

    fn create_primary_endorsement_key(&mut self) -> Result<RawCreatePrimaryResponse, EngineError> {
        self.command("create_primary_endorsement_key")?;
        let seed = decode(&self.seed(0));
        let (n, x, y, curve) = Self::public_key(AlgorithmId::RSA.value(), &seed);
        let handle = self.allocate_object(LoadedObject::default());
        Ok(RawCreatePrimaryResponse {
            handle,
            rsa_public_n: n,
            ecc_public_x: x,
            ecc_public_y: y,
            ecc_curve_id: curve,
            name: Self::name_of(handle),
            parent_name: encode_bytes(&0x4000_000B_u32.to_be_bytes()),
            parent_qualified_name: encode_bytes(&0x4000_000B_u32.to_be_bytes()),
        })
    }

    fn create(&mut self, request: &RawCreateRequest) -> Result<RawCreateResponse, EngineError> {
        self.command("create")?;
        self.object(request.parent)?;
        self.create_requests.push(request.clone());
        let mut private = vec![PRIVATE_MARKER];
        private.extend(decode(&request.sensitive_data));
        let public = [request.algorithm.to_be_bytes().as_slice(), &request.parent.to_be_bytes()].concat();
        let (n, x, y, curve) = Self::public_key(request.algorithm, &public);
        Ok(RawCreateResponse {
            tpm2b_private: encode_bytes(&private),
            tpm2b_public: encode_bytes(&public),
            rsa_public_n: n,
            ecc_public_x: x,
            ecc_public_y: y,
            ecc_curve_id: curve,
            parent_name: Self::name_of(request.parent),
            parent_qualified_name: Self::name_of(request.parent),
        })
    }

    fn load(
        &mut self,
        parent: u32,
        tpm2b_private: &EngineBuffer,
        tpm2b_public: &EngineBuffer,
    ) -> Result<RawLoadResponse, EngineError> {
        self.command("load")?;
        self.object(parent)?;
        let private = decode(tpm2b_private);
        if private.first() != Some(&PRIVATE_MARKER) || tpm2b_public.is_empty() {
            return Err(EngineError::Failure(ResponseCode::new(
                ResponseCode::INTEGRITY.value() + offset::P + offset::N1,
            )));
        }
        let handle = self.allocate_object(LoadedObject {
            sealed: private[1..].to_vec(),
        });
        Ok(RawLoadResponse {
            handle,
            name: Self::name_of(handle),
        })
    }

    fn flush_context(&mut self, handle: u32) -> Result<(), EngineError> {
        self.command("flush_context")?;
        if self.objects.remove(&handle).is_some() || self.sessions.remove(&handle).is_some() {
            return Ok(());
        }
        Err(EngineError::Failure(RC_BAD_HANDLE_1))
    }

    fn encrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        self.command("encrypt")?;
        self.object(key)?;
        Ok(encode_bytes(&decode(message).iter().map(|b| b ^ 0x5A).collect::<Vec<_>>()))
    }

    fn decrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        self.command("decrypt")?;
        self.object(key)?;
        Ok(encode_bytes(&decode(message).iter().map(|b| b ^ 0x5A).collect::<Vec<_>>()))
    }

    fn rsa_encrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        self.command("rsa_encrypt")?;
        self.object(key)?;
        let mut out = decode(message);
        out.reverse();
        Ok(encode_bytes(&out))
    }

    fn rsa_decrypt(&mut self, key: u32, message: &EngineBuffer) -> Result<EngineBuffer, EngineError> {
        self.command("rsa_decrypt")?;
        self.object(key)?;
        let mut out = decode(message);
        out.reverse();
        Ok(encode_bytes(&out))
    }

    fn sign(
        &mut self,
        key: u32,
        scheme: u16,
        message: &EngineBuffer,
    ) -> Result<RawSignature, EngineError> {
        self.command("sign")?;
        self.object(key)?;
        self.sign_requests.push((key, scheme, message.clone()));
        Ok(Self::signature(scheme, message))
    }

    fn verify_signature(
        &mut self,
        key: u32,
        message: &EngineBuffer,
        signature: &RawSignature,
    ) -> Result<(), EngineError> {
        self.command("verify_signature")?;
        self.object(key)?;
        if Self::signature(signature.sign_algo, message) == *signature {
            return Ok(());
        }
        Err(EngineError::Failure(ResponseCode::new(
            ResponseCode::SIGNATURE.value() + offset::P + offset::N2,
        )))
    }

    fn evict_control(&mut self, auth: u32, object: u32, persistent: u32) -> Result<(), EngineError> {
        self.command("evict_control")?;
        self.object(object)?;
        self.persistent.push((auth, object, persistent));
        Ok(())
    }

    fn nv_define_space(&mut self, index: u32, data_size: u16) -> Result<(), EngineError> {
        self.command("nv_define_space")?;
        if self.nv.contains_key(&index) {
            return Err(EngineError::Failure(ResponseCode::NV_DEFINED));
        }
        self.nv.insert(index, (data_size, None));
        Ok(())
    }

    fn nv_write(&mut self, index: u32, data: &EngineBuffer) -> Result<(), EngineError> {
        self.command("nv_write")?;
        let (size, contents) = self
            .nv
            .get_mut(&index)
            .ok_or(EngineError::Failure(RC_BAD_HANDLE_1))?;
        if data.len() > usize::from(*size) {
            return Err(EngineError::Failure(ResponseCode::NV_RANGE));
        }
        let mut stored = vec![0; usize::from(*size)];
        stored[..data.len()].copy_from_slice(data.as_slice());
        *contents = Some(stored);
        Ok(())
    }

    fn nv_read_public(&mut self, index: u32) -> Result<RawNvPublic, EngineError> {
        self.command("nv_read_public")?;
        let (size, _) = self.nv.get(&index).ok_or(EngineError::Failure(RC_BAD_HANDLE_1))?;
        Ok(RawNvPublic { data_size: *size })
    }

    fn nv_read(&mut self, index: u32, size: u16, offset: u16) -> Result<EngineBuffer, EngineError> {
        self.command("nv_read")?;
        let (_, contents) = self.nv.get(&index).ok_or(EngineError::Failure(RC_BAD_HANDLE_1))?;
        let data = contents
            .as_ref()
            .ok_or(EngineError::Failure(ResponseCode::NV_UNINITIALIZED))?;
        let start = usize::from(offset);
        let end = start + usize::from(size);
        data.get(start..end)
            .map(encode_bytes)
            .ok_or(EngineError::Failure(ResponseCode::NV_RANGE))
    }

    fn quote(
        &mut self,
        key: u32,
        pcr_mask: u32,
        qualifying_data: &EngineBuffer,
    ) -> Result<RawQuoteResponse, EngineError> {
        self.command("quote")?;
        self.object(key)?;
        self.quote_requests.push((key, pcr_mask, qualifying_data.clone()));
        let nonce = decode(qualifying_data);
        let mut attest = GENERATED_VALUE.to_be_bytes().to_vec();
        attest.extend(StructureTag::ATTEST_QUOTE.value().to_be_bytes());
        attest.extend(u16::try_from(nonce.len()).expect("nonce fits").to_be_bytes());
        attest.extend(&nonce);
        attest.extend(self.pcr_digest(pcr_mask));
        let signature = Self::signature(AlgorithmId::RSASSA.value(), &encode_bytes(&attest));
        Ok(RawQuoteResponse {
            sign_algo: AlgorithmId::RSASSA.value(),
            hash_algo: AlgorithmId::SHA256.value(),
            rsa_ssa_sig: signature.rsa_ssa_sig,
            tpm2b_attest: encode_bytes(&attest),
        })
    }

    fn hierarchy_change_auth(&mut self, hierarchy: u32, auth: &EngineBuffer) -> Result<(), EngineError> {
        self.command("hierarchy_change_auth")?;
        self.hierarchy_auth.insert(hierarchy, auth.clone());
        Ok(())
    }

    fn set_auth_password(&mut self, auth: &EngineBuffer) -> Result<(), EngineError> {
        self.enter("set_auth_password")?;
        self.auth_password = auth.clone();
        Ok(())
    }

    fn set_session_handle(&mut self, handle: u32) -> Result<(), EngineError> {
        self.enter("set_session_handle")?;
        self.session_handle = Some(handle);
        Ok(())
    }

    fn unseal(&mut self, handle: u32) -> Result<EngineBuffer, EngineError> {
        self.command("unseal")?;
        let sealed = self.object(handle)?.sealed.clone();
        Ok(encode_bytes(&sealed))
    }

    fn start_auth_session(&mut self, trial: bool) -> Result<RawAuthSession, EngineError> {
        self.command("start_auth_session")?;
        let handle = self.next_session;
        self.next_session += 1;
        self.sessions.insert(handle, vec![0; 32]);
        Ok(RawAuthSession {
            handle,
            nonce_tpm: encode_bytes(&sha256(&[&handle.to_be_bytes(), &[u8::from(trial)]])[..16]),
        })
    }

    fn policy_get_digest(&mut self, session: u32) -> Result<EngineBuffer, EngineError> {
        self.command("policy_get_digest")?;
        self.sessions
            .get(&session)
            .map(|digest| encode_bytes(digest))
            .ok_or(EngineError::Failure(RC_BAD_HANDLE_1))
    }

    fn policy_password(&mut self, session: u32) -> Result<(), EngineError> {
        self.command("policy_password")?;
        self.extend_session(session, &[b"PolicyPassword"])
    }

    fn policy_pcr(&mut self, session: u32, pcrs_digest: &EngineBuffer) -> Result<(), EngineError> {
        self.command("policy_pcr")?;
        self.extend_session(session, &[b"PolicyPCR", pcrs_digest.as_slice()])
    }

    fn policy_secret(&mut self, auth: u32, session: u32) -> Result<(), EngineError> {
        self.command("policy_secret")?;
        self.extend_session(session, &[b"PolicySecret", &auth.to_be_bytes()])
    }

    fn dictionary_attack_lock_reset(&mut self) -> Result<(), EngineError> {
        self.command("dictionary_attack_lock_reset")
    }

    fn import(&mut self, request: &RawImportRequest) -> Result<RawImportResponse, EngineError> {
        self.command("import")?;
        self.object(request.parent)?;
        self.import_requests.push(request.clone());
        Ok(RawImportResponse {
            tpm2b_private: request.encrypted_private.clone(),
            tpm2b_public: request.public_area.clone(),
        })
    }
}

impl UtilPort for MockEngine {
    fn unmarshal_attest_buffer(&mut self, tpm2b_attest: &EngineBuffer) -> Result<RawAttestInfo, EngineError> {
        self.enter("unmarshal_attest_buffer")?;
        let bytes = decode(tpm2b_attest);
        let malformed = EngineError::Failure(ResponseCode::new(
            ResponseCode::SIZE.value() + offset::P + offset::N1,
        ));
        if bytes.len() < 8 {
            return Err(malformed);
        }
        let magic = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let attest_type = u16::from_be_bytes([bytes[4], bytes[5]]);
        let nonce_len = usize::from(u16::from_be_bytes([bytes[6], bytes[7]]));
        let nonce = bytes.get(8..8 + nonce_len).ok_or(malformed)?;
        let digest = bytes.get(8 + nonce_len..).ok_or(malformed)?;
        Ok(RawAttestInfo {
            magic,
            attest_type,
            signer_qualified_name: Self::name_of(FIRST_TRANSIENT),
            nonce: encode_bytes(nonce),
            selected_pcr_digest: encode_bytes(digest),
        })
    }

    fn kdfa(&mut self, request: &RawKdfRequest) -> Result<EngineBuffer, EngineError> {
        self.enter("kdfa")?;
        self.kdf_requests.push(request.clone());
        if request.key.is_empty() || request.label.is_empty() {
            return Err(EngineError::Failure(ResponseCode::VALUE));
        }
        let len = usize::try_from(request.bits.div_ceil(8)).expect("length fits");
        let mut out = Vec::with_capacity(len);
        let mut counter = 1_u32;
        while out.len() < len {
            out.extend(sha256(&[
                &counter.to_be_bytes(),
                request.key.as_slice(),
                request.label.as_slice(),
                &[0],
                request.context_u.as_slice(),
                request.context_v.as_slice(),
                &request.bits.to_be_bytes(),
            ]));
            counter += 1;
        }
        out.truncate(len);
        Ok(encode_bytes(&out))
    }

    fn keyed_hash(&mut self, sensitive_data: &EngineBuffer) -> Result<RawKeyedHash, EngineError> {
        self.enter("keyed_hash")?;
        let mut private = vec![PRIVATE_MARKER];
        private.extend(decode(sensitive_data));
        let public = [
            AlgorithmId::KEYEDHASH.value().to_be_bytes(),
            AlgorithmId::SHA256.value().to_be_bytes(),
        ]
        .concat();
        let mut name = AlgorithmId::SHA256.value().to_be_bytes().to_vec();
        name.extend(sha256(&[&public]));
        Ok(RawKeyedHash {
            tpm2b_private: encode_bytes(&private),
            tpm2b_public: encode_bytes(&public),
            name: encode_bytes(&name),
        })
    }
}

/// Sink that keeps every published snapshot for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink(pub Rc<RefCell<Vec<SimulatorSnapshot>>>);

impl RecordingSink {
    pub fn published(&self) -> Vec<SimulatorSnapshot> {
        self.0.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }
}

impl SnapshotSink for RecordingSink {
    fn publish(&mut self, snapshot: &SimulatorSnapshot) {
        self.0.borrow_mut().push(snapshot.clone());
    }
}
