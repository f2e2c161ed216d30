// Licensed under the Apache-2.0 license

//! Configuration for accessor naming and output layout.
//!
//! [`NameConfig`] controls how accessor functions are named. [`OutputConfig`]
//! controls the symbols the generated code refers to (device handle, write
//! command) and whether debug traces are emitted.

/// Prefix of every generated accessor function.
pub const DEFAULT_ACCESSOR_PREFIX: &str = "halide_zynq_set_";

/// Symbol holding the device file descriptor.
pub const DEFAULT_DEVICE_HANDLE: &str = "fd_hwacc";

/// Request code of the single-register write ioctl.
pub const DEFAULT_WRITE_COMMAND: (&str, u32) = ("SET_REG32", 1005);

/// Default name of the definitions artifact.
pub const DEFAULT_OUTPUT: &str = "halide_zynq_api_setreg.cpp";

/// Naming of generated accessors.
///
/// # Example
///
/// ```
/// use hwacc_registers_generator::config::NameConfig;
///
/// let config = NameConfig::with_defaults();
/// assert_eq!(config.accessor_name("weight"), "halide_zynq_set_weight");
///
/// let config = NameConfig::none().accessor_prefix("blur_set_");
/// assert_eq!(config.accessor_name("0"), "blur_set_0");
/// ```
#[derive(Clone, Debug, Default)]
pub struct NameConfig {
    /// Prepended to the canonical register name.
    pub accessor_prefix: String,
}

impl NameConfig {
    pub fn with_defaults() -> Self {
        Self {
            accessor_prefix: DEFAULT_ACCESSOR_PREFIX.to_string(),
        }
    }

    /// Accessors are named exactly after their registers.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn accessor_prefix(mut self, prefix: &str) -> Self {
        self.accessor_prefix = prefix.to_string();
        self
    }

    pub fn accessor_name(&self, canonical_name: &str) -> String {
        format!("{}{}", self.accessor_prefix, canonical_name)
    }
}

/// Layout of the two generated artifacts.
#[derive(Clone, Debug)]
pub struct OutputConfig {
    /// File name the definitions artifact uses to include the declarations.
    pub header_name: String,
    /// Extern symbol holding the device handle; zero means uninitialized.
    pub device_handle: String,
    /// Macro name and value of the register-write request.
    pub write_command: (String, u32),
    /// Emit `printf` traces of every register write.
    pub debug_trace: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl OutputConfig {
    pub fn with_defaults() -> Self {
        Self {
            header_name: "halide_zynq_api_setreg.h".to_string(),
            device_handle: DEFAULT_DEVICE_HANDLE.to_string(),
            write_command: (DEFAULT_WRITE_COMMAND.0.to_string(), DEFAULT_WRITE_COMMAND.1),
            debug_trace: false,
        }
    }

    pub fn header_name(mut self, name: &str) -> Self {
        self.header_name = name.to_string();
        self
    }

    pub fn device_handle(mut self, symbol: &str) -> Self {
        self.device_handle = symbol.to_string();
        self
    }

    pub fn debug_trace(mut self, enabled: bool) -> Self {
        self.debug_trace = enabled;
        self
    }
}
