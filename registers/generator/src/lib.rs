// Licensed under the Apache-2.0 license

//! Register access API generator for HLS accelerators.
//!
//! Converts the register description of an HLS IP core into a small C API:
//! one setter per configuration register, writing through a single-register
//! ioctl on the accelerator's device handle.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use hwacc_registers_descriptor::ParseConfig;
//! use hwacc_registers_generator::{
//!     generate_reg_api_from_file, generate_reg_api_from_file_with_config, NameConfig,
//!     OutputConfig,
//! };
//!
//! // Generate with the default naming (halide_zynq_set_<register>)
//! let files = generate_reg_api_from_file(Path::new("auxiliary.xml")).unwrap();
//! std::fs::write("halide_zynq_api_setreg.h", &files.declarations).unwrap();
//! std::fs::write("halide_zynq_api_setreg.cpp", &files.definitions).unwrap();
//!
//! // Or with debug traces and a custom device handle
//! let files = generate_reg_api_from_file_with_config(
//!     Path::new("auxiliary.xml"),
//!     &ParseConfig::with_defaults(),
//!     &NameConfig::with_defaults(),
//!     &OutputConfig::with_defaults().debug_trace(true).device_handle("fd_blur"),
//! )
//! .unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Accessor naming ([`NameConfig`]) and output layout ([`OutputConfig`])
//! - [`packing`]: Grouping of narrow array elements into 32-bit writes
//! - [`runtime`]: Executable model of the generated accessors
//! - [`output`]: Generated accessor types and C code emission
//! - [`util`]: C identifier and literal formatting
//! - `codegen`: Entry points

pub mod config;
pub mod output;
pub mod packing;
pub mod runtime;
pub mod util;

mod codegen;

// Re-export main public API
pub use codegen::{
    generate_reg_api, generate_reg_api_from_file, generate_reg_api_from_file_with_config,
    generate_reg_api_from_str, GeneratedFiles,
};
pub use config::{NameConfig, OutputConfig};
pub use output::{AccessorKind, Artifact, GeneratedAccessor, GeneratedRegApi};
pub use packing::Packing;
pub use runtime::{AccessError, RegWrite, RegisterPort};
