// Licensed under the Apache-2.0 license

//! Entry points for generating a register access API.
//!
//! The implementation is split across submodules:
//! - `generate`: building accessor descriptions from a register table

mod generate;

use anyhow::Context;
use hwacc_registers_descriptor::{parse_file, parse_str, ParseConfig, RegisterTable};
use std::path::Path;

use crate::config::{NameConfig, OutputConfig};
use crate::output::{AccessorKind, GeneratedAccessor, GeneratedRegApi};
use crate::packing::Packing;
use crate::util::c_identifier;

/// The rendered declarations and definitions artifacts.
#[derive(Clone, Debug)]
pub struct GeneratedFiles {
    /// Accessors both artifacts were rendered from.
    pub api: GeneratedRegApi,
    /// Header text: record type, device handle, prototypes.
    pub declarations: String,
    /// Implementation text: one function body per accessor.
    pub definitions: String,
}

/// Generate the access API for an already parsed register table.
pub fn generate_reg_api(
    table: &RegisterTable,
    name_config: &NameConfig,
    output_config: &OutputConfig,
) -> GeneratedFiles {
    let api = GeneratedRegApi::from_table(table, name_config);
    let declarations = api.generate_declarations(output_config).render();
    let definitions = api.generate_definitions(output_config).render();
    log::info!(
        "generated {} accessors ({} scalar, {} array)",
        api.accessors.len(),
        table.scalars().len(),
        table.arrays().len()
    );
    GeneratedFiles {
        api,
        declarations,
        definitions,
    }
}

/// Generate the access API from a descriptor document held in memory.
pub fn generate_reg_api_from_str(
    xml: &str,
    parse_config: &ParseConfig,
    name_config: &NameConfig,
    output_config: &OutputConfig,
) -> anyhow::Result<GeneratedFiles> {
    let table = parse_str(xml, parse_config)?;
    Ok(generate_reg_api(&table, name_config, output_config))
}

/// Generate the access API from a descriptor file with default configuration.
///
/// AXI4-Lite arguments are collected, the `arg_` prefix is stripped and
/// accessors are named `halide_zynq_set_<register>`.
pub fn generate_reg_api_from_file(file: &Path) -> anyhow::Result<GeneratedFiles> {
    generate_reg_api_from_file_with_config(
        file,
        &ParseConfig::with_defaults(),
        &NameConfig::with_defaults(),
        &OutputConfig::with_defaults(),
    )
}

/// Generate the access API from a descriptor file with custom configuration.
pub fn generate_reg_api_from_file_with_config(
    file: &Path,
    parse_config: &ParseConfig,
    name_config: &NameConfig,
    output_config: &OutputConfig,
) -> anyhow::Result<GeneratedFiles> {
    let table = parse_file(file, parse_config)
        .with_context(|| format!("failed to read descriptor {}", file.display()))?;
    Ok(generate_reg_api(&table, name_config, output_config))
}
