// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while turning a descriptor document into a [`RegisterTable`].
///
/// Any of these aborts generation; no output is produced.
///
/// [`RegisterTable`]: crate::RegisterTable
#[derive(Error, Debug)]
pub enum DescriptorFormatError {
    #[error("cannot read descriptor document: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed descriptor XML at byte {position}: {message}")]
    Xml { position: usize, message: String },

    #[error("descriptor document has no root element")]
    NoRootElement,

    #[error("descriptor document ends with {0} unclosed element(s)")]
    Truncated(usize),

    #[error("attribute text is not valid UTF-8")]
    NonUtf8,

    #[error("argument {arg} is missing required attribute `{attribute}`")]
    MissingAttribute {
        arg: String,
        attribute: &'static str,
    },

    #[error("argument {arg}: `{attribute}` value {value:?} is not a number")]
    InvalidNumber {
        arg: String,
        attribute: &'static str,
        value: String,
    },

    #[error("register {name} is declared both as a scalar and as an array")]
    MixedKinds { name: String },
}

pub type DescriptorResult<T> = std::result::Result<T, DescriptorFormatError>;
