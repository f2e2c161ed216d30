// Licensed under the Apache-2.0 license

//! Formatting helpers for C code generation.

use hwacc_registers_descriptor::DataWidth;
use std::path::{Path, PathBuf};

/// C element type for a register word of the given width.
///
/// # Examples
/// ```
/// use hwacc_registers_descriptor::DataWidth;
/// use hwacc_registers_generator::util::c_type;
/// assert_eq!(c_type(DataWidth::W16), "unsigned short");
/// ```
pub fn c_type(width: DataWidth) -> &'static str {
    match width {
        DataWidth::W8 => "unsigned char",
        DataWidth::W16 => "unsigned short",
        DataWidth::W32 => "unsigned int",
    }
}

/// Converts a register name into a C identifier.
///
/// - Leading digits get an underscore prefix
/// - Characters outside `[A-Za-z0-9_]` become underscores
/// - C keywords and accessor locals get an underscore suffix
///
/// # Examples
/// ```
/// use hwacc_registers_generator::util::c_identifier;
/// assert_eq!(c_identifier("0"), "_0");
/// assert_eq!(c_identifier("weight"), "weight");
/// assert_eq!(c_identifier("int"), "int_");
/// ```
pub fn c_identifier(name: &str) -> String {
    let mut result = String::new();
    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        result.push('_');
    }
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else {
            result.push('_');
        }
    }
    tweak_keywords(&result)
}

/// Appends underscore suffix to C keywords and to the locals of an
/// accessor body (`r`, `p`, `i`).
fn tweak_keywords(s: &str) -> String {
    match s {
        "auto" | "break" | "case" | "char" | "const" | "continue" | "default" | "do"
        | "double" | "else" | "enum" | "extern" | "float" | "for" | "goto" | "if" | "int"
        | "long" | "register" | "return" | "short" | "signed" | "sizeof" | "static"
        | "struct" | "switch" | "typedef" | "union" | "unsigned" | "void" | "volatile"
        | "while" | "p" | "r" | "i" => format!("{s}_"),
        s => s.to_string(),
    }
}

/// Formats a register offset as a C hex literal.
///
/// # Examples
/// ```
/// use hwacc_registers_generator::util::c_hex;
/// assert_eq!(c_hex(0), "0x0");
/// assert_eq!(c_hex(0x40), "0x40");
/// ```
pub fn c_hex(val: u32) -> String {
    format!("{val:#x}")
}

/// Declarations artifact path for a definitions artifact path
/// (`out/api.cpp` -> `out/api.h`).
pub fn header_path_for(output: &Path) -> PathBuf {
    output.with_extension("h")
}

/// File name component of a path, for `#include` lines.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_hex() {
        assert_eq!(c_hex(0x10), "0x10");
        assert_eq!(c_hex(0xdead_beef), "0xdeadbeef");
    }

    #[test]
    fn test_c_identifier() {
        assert_eq!(c_identifier("12"), "_12");
        assert_eq!(c_identifier("coef.x"), "coef_x");
        assert_eq!(c_identifier(""), "_");
        // locals of the generated accessor body
        assert_eq!(c_identifier("r"), "r_");
        assert_eq!(c_identifier("p"), "p_");
        assert_eq!(c_identifier("ready"), "ready");
    }

    #[test]
    fn test_header_path() {
        assert_eq!(
            header_path_for(Path::new("out/halide_zynq_api_setreg.cpp")),
            PathBuf::from("out/halide_zynq_api_setreg.h")
        );
        assert_eq!(header_path_for(Path::new("api")), PathBuf::from("api.h"));
        assert_eq!(file_name(Path::new("out/api.h")), "api.h");
    }
}
