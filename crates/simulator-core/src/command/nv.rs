use crate::args::NvReadArgs;
use crate::buffer::{decode, encode_bytes_param};
use crate::engine::Engine;
use crate::error::Error;
use crate::registry::Handle;
use crate::results::NvPublic;

use super::Tpm;

impl<E: Engine> Tpm<E> {
    /// Defines an owner-authorized NV index of `data_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] with `TPM2_RC_NV_DEFINED` when the index
    /// already exists.
    pub fn nv_define_space(&mut self, index: Handle, data_size: u16) -> Result<(), Error> {
        self.dispatch("NV_DefineSpace", |engine| {
            engine.nv_define_space(index.value(), data_size)
        })
    }

    /// Writes `data` at the start of the index.
    ///
    /// # Errors
    ///
    /// Returns an argument error for oversize data, otherwise propagates
    /// engine failures.
    pub fn nv_write(&mut self, index: Handle, data: &[u8]) -> Result<(), Error> {
        let data = encode_bytes_param("data", data)?;
        self.dispatch("NV_Write", |engine| engine.nv_write(index.value(), &data))
    }

    /// Reads the public area of the index.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn nv_read_public(&mut self, index: Handle) -> Result<NvPublic, Error> {
        self.dispatch("NV_ReadPublic", |engine| engine.nv_read_public(index.value()))
            .map(NvPublic::from)
    }

    /// Reads `args.size` bytes at `args.offset`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn nv_read(&mut self, index: Handle, args: NvReadArgs) -> Result<Vec<u8>, Error> {
        self.dispatch("NV_Read", |engine| {
            engine.nv_read(index.value(), args.size, args.offset)
        })
        .map(|data| decode(&data))
    }
}
