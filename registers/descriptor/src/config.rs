// Licensed under the Apache-2.0 license

//! Configuration for reading descriptor documents.
//!
//! [`ParseConfig`] selects which arguments are in scope (by bus kind) and how
//! the canonical register name is derived from the original argument name.

/// Bus kind of the AXI4-Lite slave interface carrying configuration registers.
pub const DEFAULT_BUS_KIND: &str = "axilite";

/// Prefix the HLS flow puts in front of every original argument name.
pub const DEFAULT_ARG_PREFIX: &str = "arg_";

/// Controls which descriptor arguments are collected and how they are named.
///
/// # Example
///
/// ```
/// use hwacc_registers_descriptor::ParseConfig;
///
/// let config = ParseConfig::with_defaults();
/// assert_eq!(config.canonical_name("arg_weight"), "weight");
///
/// let config = ParseConfig::none().bus_kind("m_axi").add_prefix("p_");
/// assert_eq!(config.canonical_name("p_coef"), "coef");
/// assert!(config.accepts_bus(Some("m_axi")));
/// ```
#[derive(Clone, Debug)]
pub struct ParseConfig {
    /// Only arguments whose `busTypeRef` equals this literal are collected.
    pub bus_kind: String,

    /// Prefixes stripped from the original name, in order. Each one is
    /// removed at most once and only from the start of the name.
    pub strip_prefixes: Vec<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ParseConfig {
    /// AXI4-Lite arguments, `arg_` prefix stripped.
    pub fn with_defaults() -> Self {
        Self {
            bus_kind: DEFAULT_BUS_KIND.to_string(),
            strip_prefixes: vec![DEFAULT_ARG_PREFIX.to_string()],
        }
    }

    /// AXI4-Lite arguments, names kept verbatim.
    pub fn none() -> Self {
        Self {
            bus_kind: DEFAULT_BUS_KIND.to_string(),
            strip_prefixes: vec![],
        }
    }

    pub fn bus_kind(mut self, bus_kind: &str) -> Self {
        self.bus_kind = bus_kind.to_string();
        self
    }

    pub fn add_prefix(mut self, prefix: &str) -> Self {
        self.strip_prefixes.push(prefix.to_string());
        self
    }

    /// Returns true if an argument with this bus tag belongs to the register window.
    pub fn accepts_bus(&self, bus: Option<&str>) -> bool {
        bus == Some(self.bus_kind.as_str())
    }

    /// Derive the canonical register name from an original argument name.
    pub fn canonical_name(&self, original: &str) -> String {
        let mut result = original;
        for prefix in &self.strip_prefixes {
            if let Some(rest) = result.strip_prefix(prefix.as_str()) {
                result = rest;
            }
        }
        result.to_string()
    }
}
