// Licensed under the Apache-2.0 license

//! Normalized register table built from a descriptor document.
//!
//! ```text
//! RegisterTable
//! ├── scalars: canonical name → RegisterDescriptor
//! └── arrays:  canonical name → ArrayRegister
//!              ├── data_width (recorded once, on first sight)
//!              └── spans: [(offset, size), ...] in encounter order
//! ```
//!
//! Both partitions keep first-seen order so generated output is stable
//! across runs.

use crate::error::{DescriptorFormatError, DescriptorResult};
use std::collections::HashMap;
use std::fmt;

/// Bits per physical register word.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataWidth {
    W8,
    W16,
    W32,
}

impl DataWidth {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(DataWidth::W8),
            16 => Some(DataWidth::W16),
            32 => Some(DataWidth::W32),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            DataWidth::W8 => 8,
            DataWidth::W16 => 16,
            DataWidth::W32 => 32,
        }
    }
}

impl fmt::Display for DataWidth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// One in-scope argument from the descriptor document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegisterDescriptor {
    /// Declared name, possibly with a trailing `[n]` index.
    pub name: String,
    /// Original name with the implementation prefix stripped.
    pub canonical_name: String,
    /// Byte offset into the device register window.
    pub offset: u32,
    /// Element count of a partially decomposed slice.
    pub array_size: Option<u32>,
    pub data_width: DataWidth,
    pub bus_kind: String,
}

impl RegisterDescriptor {
    /// True if the declared name carries an array-index marker.
    pub fn is_array_element(&self) -> bool {
        self.name.ends_with(']')
    }

    /// The span this descriptor contributes to its array. A missing array
    /// size means one individually addressed element.
    pub fn span(&self) -> Span {
        Span {
            offset: self.offset,
            size: self.array_size.unwrap_or(1),
        }
    }
}

/// One contiguous declaration of part of a logical array.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    /// Base byte offset of the first element.
    pub offset: u32,
    /// Number of elements.
    pub size: u32,
}

/// A logical register array assembled from one or more spans.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayRegister {
    pub canonical_name: String,
    pub data_width: DataWidth,
    pub spans: Vec<Span>,
}

impl ArrayRegister {
    /// Total number of elements across all spans.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|s| s.size as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if every span holds a single element.
    pub fn is_fully_decomposed(&self) -> bool {
        self.spans.iter().all(|s| s.size == 1)
    }
}

/// Registers of one accelerator, partitioned into scalars and arrays.
#[derive(Clone, Debug, Default)]
pub struct RegisterTable {
    scalars: Vec<RegisterDescriptor>,
    scalar_index: HashMap<String, usize>,
    arrays: Vec<ArrayRegister>,
    array_index: HashMap<String, usize>,
}

impl RegisterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor to the partition its declared name selects.
    ///
    /// A scalar whose canonical name is already present replaces the earlier
    /// entry in place. An array element appends its span; the data width is
    /// taken from the first element seen.
    pub fn insert(&mut self, desc: RegisterDescriptor) -> DescriptorResult<()> {
        let key = desc.canonical_name.clone();
        if desc.is_array_element() {
            if self.scalar_index.contains_key(&key) {
                return Err(DescriptorFormatError::MixedKinds { name: key });
            }
            let span = desc.span();
            match self.array_index.get(&key) {
                Some(&idx) => self.arrays[idx].spans.push(span),
                None => {
                    self.array_index.insert(key.clone(), self.arrays.len());
                    self.arrays.push(ArrayRegister {
                        canonical_name: key,
                        data_width: desc.data_width,
                        spans: vec![span],
                    });
                }
            }
        } else {
            if self.array_index.contains_key(&key) {
                return Err(DescriptorFormatError::MixedKinds { name: key });
            }
            match self.scalar_index.get(&key) {
                Some(&idx) => {
                    log::warn!(
                        "scalar register {} redeclared by {}; keeping the later declaration",
                        key,
                        desc.name
                    );
                    self.scalars[idx] = desc;
                }
                None => {
                    self.scalar_index.insert(key, self.scalars.len());
                    self.scalars.push(desc);
                }
            }
        }
        Ok(())
    }

    pub fn scalars(&self) -> &[RegisterDescriptor] {
        &self.scalars
    }

    pub fn arrays(&self) -> &[ArrayRegister] {
        &self.arrays
    }

    pub fn scalar(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.scalar_index.get(name).map(|&idx| &self.scalars[idx])
    }

    pub fn array(&self, name: &str) -> Option<&ArrayRegister> {
        self.array_index.get(name).map(|&idx| &self.arrays[idx])
    }

    pub fn len(&self) -> usize {
        self.scalars.len() + self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(name: &str, canonical: &str, offset: u32, size: Option<u32>) -> RegisterDescriptor {
        RegisterDescriptor {
            name: name.to_string(),
            canonical_name: canonical.to_string(),
            offset,
            array_size: size,
            data_width: DataWidth::W16,
            bus_kind: "axilite".to_string(),
        }
    }

    fn span(offset: u32, size: u32) -> Span {
        Span { offset, size }
    }

    #[test]
    fn test_data_width() {
        assert_eq!(DataWidth::from_bits(8), Some(DataWidth::W8));
        assert_eq!(DataWidth::from_bits(64), None);
        assert_eq!(DataWidth::W16.bits(), 16);
        assert_eq!(DataWidth::W32.to_string(), "32");
    }

    #[test]
    fn test_scalar_overwrite_keeps_position() {
        let mut table = RegisterTable::new();
        table.insert(desc("a", "a", 0x10, None)).unwrap();
        table.insert(desc("b", "b", 0x18, None)).unwrap();
        table.insert(desc("a", "a", 0x20, None)).unwrap();
        assert_eq!(table.scalars().len(), 2);
        assert_eq!(table.scalars()[0].canonical_name, "a");
        assert_eq!(table.scalars()[0].offset, 0x20);
        assert_eq!(table.scalar("b").unwrap().offset, 0x18);
    }

    #[test]
    fn test_spans_in_encounter_order() {
        let mut table = RegisterTable::new();
        table.insert(desc("w[4]", "w", 0x80, Some(4))).unwrap();
        table.insert(desc("w[0]", "w", 0x40, Some(4))).unwrap();
        table.insert(desc("w[8]", "w", 0xc0, None)).unwrap();
        let w = table.array("w").unwrap();
        assert_eq!(w.spans, vec![span(0x80, 4), span(0x40, 4), span(0xc0, 1)]);
        assert_eq!(w.len(), 9);
        assert!(!w.is_fully_decomposed());
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let mut table = RegisterTable::new();
        table.insert(desc("k", "k", 0x10, None)).unwrap();
        let err = table.insert(desc("k[0]", "k", 0x20, None)).unwrap_err();
        assert!(matches!(err, DescriptorFormatError::MixedKinds { name } if name == "k"));

        let mut table = RegisterTable::new();
        table.insert(desc("k[0]", "k", 0x20, None)).unwrap();
        assert!(table.insert(desc("k", "k", 0x10, None)).is_err());
    }
}
