//! Command marshaling and state synchronization for a TPM 2.0 simulator engine.

/// TPM 2.0 constants: algorithms, response codes, handles, curves and tags.
pub mod registry;
pub use registry::{
    offset, AlgorithmId, EccCurve, Handle, RcParts, RcSubject, ResponseCode, StructureTag,
    ALGORITHM_NAMES, GENERATED_VALUE, RC_FMT1, RC_P_BIT, RC_VER1, RC_WARN_BIT,
    RESPONSE_CODE_NAMES,
};

/// Error taxonomy for engine, lifecycle and argument failures.
pub mod error;
pub use error::{ArgumentError, EngineError, Error, StateError};

/// Engine buffer codec.
pub mod buffer;
pub use buffer::{
    decode, encode, encode_bytes, encode_bytes_param, encode_param, ByteSource, EngineBuffer,
    MAX_TPM2B_LEN,
};

/// Big-endian integer and hex codec.
pub mod bigint;
pub use bigint::{bytes_to_int, from_hex, int_to_bytes, strip_leading_zeros, to_hex};

/// Engine port traits and raw ABI records.
pub mod engine;
pub use engine::{
    CommandPort, Engine, RawAttestInfo, RawAuthSession, RawCreatePrimaryRequest,
    RawCreatePrimaryResponse, RawCreateRequest, RawCreateResponse, RawImportRequest,
    RawImportResponse, RawKdfRequest, RawKeyedHash, RawLoadResponse, RawNvPublic,
    RawQuoteResponse, RawSignature, RawTpmProperties, SimulatorPort, UtilPort,
};

/// Per-command argument structs with defaults.
pub mod args;
pub use args::{
    CreateArgs, CreatePrimaryArgs, ImportArgs, KdfArgs, NvReadArgs, QuoteArgs, SignArgs,
    PCR_SELECT_MAX,
};

/// Coerced command results.
pub mod results;
pub use results::{
    AttestInfo, AuthSession, CreatePrimaryResult, CreateResult, ImportResult, KeyedHashBlob,
    LoadResult, NvPublic, QuoteResult, SignResult, TpmProperties,
};

/// Simulator snapshot and its sink.
pub mod snapshot;
pub use snapshot::{NoopSnapshotSink, SimulatorSnapshot, SnapshotSink, SNAPSHOT_PCR_COUNT};

/// Attach-time configuration.
pub mod config;
pub use config::TpmConfig;

/// Command adapter.
pub mod command;
pub use command::Tpm;

/// Lifecycle controller and operator actions.
pub mod controller;
pub use controller::{LifecycleStep, SystemAction};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use sha2 as _;
