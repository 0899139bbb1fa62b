//! Fixed TPM 2.0 numeric vocabulary shared with the engine ABI.
//!
//! Every value here is a wire constant from TPM 2.0 Part 2 and must match
//! the engine bit for bit.

mod alg;
mod curve;
mod handle;
mod rc;
mod tag;

pub use alg::{AlgorithmId, ALGORITHM_NAMES};
pub use curve::EccCurve;
pub use handle::Handle;
pub use rc::{
    offset, RcParts, RcSubject, ResponseCode, RC_FMT1, RC_P_BIT, RC_VER1, RC_WARN_BIT,
    RESPONSE_CODE_NAMES,
};
pub use tag::{StructureTag, GENERATED_VALUE};
