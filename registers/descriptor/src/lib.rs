// Licensed under the Apache-2.0 license

//! HLS IP descriptor reader.
//!
//! Reads the auxiliary XML document an HLS flow emits for an accelerator and
//! produces a [`RegisterTable`]: the configuration registers reachable over
//! the AXI4-Lite slave port, split into scalars and (possibly decomposed)
//! arrays.
//!
//! ```no_run
//! use std::path::Path;
//! use hwacc_registers_descriptor::{parse_file, ParseConfig};
//!
//! let table = parse_file(Path::new("auxiliary.xml"), &ParseConfig::with_defaults()).unwrap();
//! for reg in table.scalars() {
//!     println!("{} @ {:#x}", reg.canonical_name, reg.offset);
//! }
//! ```

pub mod config;
pub mod error;
pub mod parse;
pub mod table;

pub use config::ParseConfig;
pub use error::{DescriptorFormatError, DescriptorResult};
pub use parse::{parse_file, parse_str};
pub use table::{ArrayRegister, DataWidth, RegisterDescriptor, RegisterTable, Span};
