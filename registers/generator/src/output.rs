// Licensed under the Apache-2.0 license

//! Output types and C code generation for register accessors.
//!
//! ## Code Generation Flow
//!
//! ```text
//! RegisterTable → GeneratedRegApi → (declarations, definitions)
//!                 └── GeneratedAccessor[]  → prototype + function body
//! ```
//!
//! ## Generated Code Structure
//!
//! For a 16-bit scalar `gain` and a 16-bit array `weight` of one 5-element
//! span the definitions look like:
//!
//! ```text
//! int halide_zynq_set_gain(unsigned short gain) {
//!   hwacc_reg_t r;
//!   if (fd_hwacc == 0) { ...; return -1; }
//!   r.offset = (unsigned int)0x18;
//!   r.value  = (unsigned int)(gain);
//!   if (ioctl(fd_hwacc, SET_REG32, &r) < 0) return -1;
//!   return 0;
//! }
//!
//! int halide_zynq_set_weight(const unsigned short *weight) {
//!   ...
//!   for (size_t i = 0; i < 5; i++, p++) {
//!     if ((i & 1) == 0) { r.value = 0; r.offset = (unsigned int)(0x40 + i * 2); }
//!     r.value |= ((unsigned int)(*p)) << (16 * (i & 1));
//!     if (((i & 1) == 1) || (i == 4)) { ioctl... }
//!   }
//!   return 0;
//! }
//! ```
//!
//! Every artifact is an [`Artifact`]: an ordered list of text fragments
//! rendered once at the end.

use crate::config::OutputConfig;
use crate::packing::Packing;
use crate::runtime::{self, AccessError, RegisterPort};
use crate::util::{c_hex, c_type};
use hwacc_registers_descriptor::{ArrayRegister, DataWidth, RegisterDescriptor, Span};
use std::fmt;

//=============================================================================
// Artifact
//=============================================================================

/// A generated text file, kept as ordered fragments until rendered.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Artifact {
    fragments: Vec<String>,
}

impl Artifact {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line (a newline is added).
    pub fn line(&mut self, text: impl Into<String>) {
        let mut text = text.into();
        text.push('\n');
        self.fragments.push(text);
    }

    pub fn blank(&mut self) {
        self.fragments.push("\n".to_string());
    }

    /// Append all fragments of `other`, keeping their order.
    pub fn append(&mut self, other: Artifact) {
        self.fragments.extend(other.fragments);
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn render(&self) -> String {
        self.fragments.concat()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for fragment in &self.fragments {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

//=============================================================================
// Generated Types
//=============================================================================

/// Register an accessor writes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessorKind {
    Scalar(RegisterDescriptor),
    Array(ArrayRegister),
}

/// One generated accessor function.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedAccessor {
    /// C function name.
    pub function: String,
    /// C parameter name.
    pub param: String,
    pub kind: AccessorKind,
}

/// All accessors of one accelerator, scalars first.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GeneratedRegApi {
    pub accessors: Vec<GeneratedAccessor>,
}

impl GeneratedAccessor {
    pub fn width(&self) -> DataWidth {
        match &self.kind {
            AccessorKind::Scalar(reg) => reg.data_width,
            AccessorKind::Array(reg) => reg.data_width,
        }
    }

    /// Canonical name of the register behind this accessor.
    pub fn register_name(&self) -> &str {
        match &self.kind {
            AccessorKind::Scalar(reg) => &reg.canonical_name,
            AccessorKind::Array(reg) => &reg.canonical_name,
        }
    }

    /// Function signature without the trailing `;` or body.
    pub fn signature(&self) -> String {
        let ty = c_type(self.width());
        match self.kind {
            AccessorKind::Scalar(_) => format!("int {}({ty} {})", self.function, self.param),
            AccessorKind::Array(_) => format!("int {}(const {ty} *{})", self.function, self.param),
        }
    }

    /// Run this accessor against `port`. For scalars only `values[0]` is used.
    pub fn invoke<P: RegisterPort + ?Sized>(
        &self,
        port: &mut P,
        values: &[u32],
    ) -> Result<(), AccessError> {
        match &self.kind {
            AccessorKind::Scalar(reg) => {
                runtime::set_scalar(port, reg, values.first().copied().unwrap_or(0))
            }
            AccessorKind::Array(reg) => runtime::set_array(port, reg, values),
        }
    }

    fn generate_definition(&self, config: &OutputConfig) -> Artifact {
        let mut out = Artifact::new();
        out.line(format!("{} {{", self.signature()));
        if config.debug_trace {
            out.line(format!("  printf(\"Setting {}\\n\");", self.register_name()));
        }
        out.line("  hwacc_reg_t r;");
        out.line(format!("  if ({} == 0) {{", config.device_handle));
        out.line("      printf(\"Zynq runtime is uninitialized.\\n\");");
        out.line("      return -1;");
        out.line("  }");

        match &self.kind {
            AccessorKind::Scalar(reg) => self.generate_scalar_body(reg, config, &mut out),
            AccessorKind::Array(reg) => self.generate_array_body(reg, config, &mut out),
        }

        out.line("  return 0;");
        out.line("}");
        out.blank();
        out
    }

    fn generate_scalar_body(
        &self,
        reg: &RegisterDescriptor,
        config: &OutputConfig,
        out: &mut Artifact,
    ) {
        out.line(format!("  r.offset = (unsigned int){};", c_hex(reg.offset)));
        out.line(format!("  r.value  = (unsigned int)({});", self.param));
        generate_write(config, "  ", out);
    }

    fn generate_array_body(&self, reg: &ArrayRegister, config: &OutputConfig, out: &mut Artifact) {
        let packing = Packing::for_width(reg.data_width);
        let ty = c_type(reg.data_width);
        out.line(format!("  const {ty} *p = {};", self.param));
        for span in &reg.spans {
            // A zero-length span walks no elements.
            if span.size == 0 {
                continue;
            }
            out.append(generate_span_loop(&packing, span, config));
        }
    }
}

/// One loop over a span, with the clear/flush rules taken from `packing`.
fn generate_span_loop(packing: &Packing, span: &Span, config: &OutputConfig) -> Artifact {
    let mut out = Artifact::new();
    let base = c_hex(span.offset);
    let bytes = packing.element_bytes();
    let last = span.size - 1;
    out.line(format!("  for (size_t i = 0; i < {}; i++, p++) {{", span.size));
    if packing.is_packed() {
        let mask = packing.lane_mask();
        let bits = packing.element_bits();
        out.line(format!("    if ((i & {mask}) == 0) {{"));
        out.line("        r.value  = 0;");
        out.line(format!("        r.offset = (unsigned int)({base} + i * {bytes});"));
        out.line("    }");
        out.line(format!(
            "    r.value |= ((unsigned int)(*p)) << ({bits} * (i & {mask}));"
        ));
        out.line(format!("    if (((i & {mask}) == {mask}) || (i == {last})) {{"));
        generate_write(config, "        ", &mut out);
        out.line("    }");
    } else {
        out.line(format!("    r.offset = (unsigned int)({base} + i * {bytes});"));
        out.line("    r.value  = (unsigned int)(*p);");
        generate_write(config, "    ", &mut out);
    }
    out.line("  }");
    out
}

/// Optional trace, then the single physical write; a failed write returns.
fn generate_write(config: &OutputConfig, indent: &str, out: &mut Artifact) {
    if config.debug_trace {
        out.line(format!("{indent}printf(\"  r.offset = %x\\n\", r.offset);"));
        out.line(format!("{indent}printf(\"  r.value  = %u\\n\", r.value);"));
    }
    out.line(format!(
        "{indent}if (ioctl({}, {}, &r) < 0) return -1;",
        config.device_handle, config.write_command.0
    ));
}

//=============================================================================
// Code Generation
//=============================================================================

impl GeneratedRegApi {
    /// Declarations artifact: record type, write command, handle, prototypes.
    pub fn generate_declarations(&self, config: &OutputConfig) -> Artifact {
        let (command, code) = &config.write_command;
        let mut out = Artifact::new();
        out.blank();
        out.line("#ifndef REGISTER_T_DEFINED");
        out.line("#define REGISTER_T_DEFINED");
        out.line("typedef struct hwacc_reg_t {");
        out.line("    unsigned int offset;");
        out.line("    unsigned int value;");
        out.line("} hwacc_reg_t;");
        out.line("#endif");
        out.line(format!("#define {command} {code} // Set Configuration register"));
        out.blank();
        out.line(format!("extern int {};", config.device_handle));
        out.blank();
        for accessor in &self.accessors {
            out.line(format!("{};", accessor.signature()));
        }
        out
    }

    /// Definitions artifact: includes and one function body per accessor.
    pub fn generate_definitions(&self, config: &OutputConfig) -> Artifact {
        let mut out = Artifact::new();
        out.line("#include <stdio.h>");
        out.line("#include <sys/ioctl.h>");
        out.line(format!("#include \"{}\"", config.header_name));
        out.blank();
        for accessor in &self.accessors {
            out.append(accessor.generate_definition(config));
        }
        out
    }

    pub fn accessor(&self, register_name: &str) -> Option<&GeneratedAccessor> {
        self.accessors
            .iter()
            .find(|a| a.register_name() == register_name)
    }
}
