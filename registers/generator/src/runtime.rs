// Licensed under the Apache-2.0 license

//! Executable model of the generated accessors.
//!
//! The functions here behave exactly like the C accessors the generator
//! emits: same uninitialized check, same offsets, same packing and the same
//! number of physical writes. They let the packing rules be exercised (and
//! reused from Rust host tools) without a C toolchain.
//!
//! There is no locking. A [`RegisterPort`] shared between threads must be
//! synchronized by its owner.

use crate::packing::Packing;
use hwacc_registers_descriptor::{ArrayRegister, RegisterDescriptor};
use thiserror::Error;

/// Status returned by a generated accessor that failed.
pub const FAILURE_STATUS: i32 = -1;

/// One register write request, laid out like `hwacc_reg_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RegWrite {
    pub offset: u32,
    pub value: u32,
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum AccessError {
    /// The device handle has not been set up; nothing was written.
    #[error("Zynq runtime is uninitialized")]
    Uninitialized,
    /// The device-write primitive reported a failure.
    #[error("register write at {offset:#x} failed: {reason}")]
    Write { offset: u32, reason: String },
}

impl AccessError {
    /// Status the C accessor returns for this error.
    pub fn status(&self) -> i32 {
        FAILURE_STATUS
    }
}

/// Status code of an accessor call: `0` on success, negative on failure.
pub fn status(result: &Result<(), AccessError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.status(),
    }
}

/// The device-write primitive.
pub trait RegisterPort {
    /// False until the device handle has been opened.
    fn is_initialized(&self) -> bool;

    /// Perform exactly one physical register write.
    fn write_reg(&mut self, reg: RegWrite) -> Result<(), AccessError>;
}

fn check_initialized<P: RegisterPort + ?Sized>(port: &P) -> Result<(), AccessError> {
    if port.is_initialized() {
        Ok(())
    } else {
        log::error!("{}", AccessError::Uninitialized);
        Err(AccessError::Uninitialized)
    }
}

/// Set a scalar register. `value` is truncated to the register width.
pub fn set_scalar<P: RegisterPort + ?Sized>(
    port: &mut P,
    reg: &RegisterDescriptor,
    value: u32,
) -> Result<(), AccessError> {
    log::trace!("Setting {}", reg.canonical_name);
    check_initialized(port)?;
    let r = RegWrite {
        offset: reg.offset,
        value: value & Packing::for_width(reg.data_width).element_mask(),
    };
    log::trace!("  r.offset = {:x}", r.offset);
    log::trace!("  r.value  = {}", r.value);
    port.write_reg(r)
}

/// Set every element of a register array from `buffer`.
///
/// `buffer` holds one element per array entry in span order; each element
/// is truncated to the register width. Its length must match
/// [`ArrayRegister::len`].
pub fn set_array<P: RegisterPort + ?Sized>(
    port: &mut P,
    reg: &ArrayRegister,
    buffer: &[u32],
) -> Result<(), AccessError> {
    log::trace!("Setting {}", reg.canonical_name);
    check_initialized(port)?;
    Packing::for_width(reg.data_width).walk(&reg.spans, buffer, |r| {
        log::trace!("  r.offset = {:x}", r.offset);
        log::trace!("  r.value  = {}", r.value);
        port.write_reg(r)
    })
}
