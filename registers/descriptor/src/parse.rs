// Licensed under the Apache-2.0 license

//! Reader for HLS IP auxiliary descriptor documents.
//!
//! The document lists one `xd:arg` element per kernel argument, each a
//! direct child of the root. Only the attributes are consumed; element text
//! and children are skipped, and `arg` elements nested deeper are ignored.
//! Element and attribute names are matched on their local part, so the
//! namespace prefix the document binds to the xidane namespace does not
//! matter.
//!
//! ```text
//! <xd:component xmlns:xd="http://www.xilinx.com/xidane" ...>
//!   <xd:arg xd:name="arg_0" xd:originalName="arg_0" xd:offset="0x10"
//!           xd:dataWidth="32" xd:busTypeRef="axilite" .../>
//!   <xd:arg xd:name="weight[0]" xd:originalName="arg_weight" xd:offset="0x40"
//!           xd:arraySize="4" xd:dataWidth="16" xd:busTypeRef="axilite" .../>
//! </xd:component>
//! ```

use crate::config::ParseConfig;
use crate::error::{DescriptorFormatError, DescriptorResult};
use crate::table::{DataWidth, RegisterDescriptor, RegisterTable};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const ARG_TAG: &[u8] = b"arg";

/// Parse a descriptor document held in memory.
pub fn parse_str(xml: &str, config: &ParseConfig) -> DescriptorResult<RegisterTable> {
    let mut reader = Reader::from_str(xml);
    parse_events(&mut reader, config)
}

/// Parse a descriptor document from disk.
pub fn parse_file(path: &Path, config: &ParseConfig) -> DescriptorResult<RegisterTable> {
    let file = File::open(path)?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    parse_events(&mut reader, config)
}

fn parse_events<T: BufRead>(
    reader: &mut Reader<T>,
    config: &ParseConfig,
) -> DescriptorResult<RegisterTable> {
    reader.trim_text(true);

    let mut table = RegisterTable::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    loop {
        match reader.read_event(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if depth == 1 && local_name(e.name()) == ARG_TAG {
                    collect_arg(e, config, &mut table)?;
                }
                depth += 1;
                seen_root = true;
            }
            Ok(Event::Empty(ref e)) => {
                if depth == 1 && local_name(e.name()) == ARG_TAG {
                    collect_arg(e, config, &mut table)?;
                }
                seen_root = true;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => (),
            Err(e) => {
                return Err(DescriptorFormatError::Xml {
                    position: reader.buffer_position(),
                    message: e.to_string(),
                })
            }
        }
        buf.clear();
    }

    if !seen_root {
        return Err(DescriptorFormatError::NoRootElement);
    }
    if depth != 0 {
        return Err(DescriptorFormatError::Truncated(depth));
    }
    log::debug!(
        "collected {} scalar and {} array registers",
        table.scalars().len(),
        table.arrays().len()
    );
    Ok(table)
}

fn collect_arg(
    e: &BytesStart,
    config: &ParseConfig,
    table: &mut RegisterTable,
) -> DescriptorResult<()> {
    let attrs = ArgAttributes::read(e)?;
    if let Some(desc) = attrs.into_descriptor(config)? {
        log::debug!(
            "arg {} -> {} @ {:#x} (size {:?}, width {})",
            desc.name,
            desc.canonical_name,
            desc.offset,
            desc.array_size,
            desc.data_width
        );
        table.insert(desc)?;
    }
    Ok(())
}

/// Strip a namespace prefix (`xd:name` -> `name`).
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Raw attribute text of one `arg` element.
#[derive(Default, Debug)]
struct ArgAttributes {
    name: Option<String>,
    original_name: Option<String>,
    offset: Option<String>,
    array_size: Option<String>,
    data_width: Option<String>,
    bus: Option<String>,
}

impl ArgAttributes {
    fn read(e: &BytesStart) -> DescriptorResult<Self> {
        let mut attrs = ArgAttributes::default();
        for att in e.attributes() {
            let att = att.map_err(|err| DescriptorFormatError::Xml {
                position: 0,
                message: err.to_string(),
            })?;
            let value = att
                .unescaped_value()
                .map_err(|err| DescriptorFormatError::Xml {
                    position: 0,
                    message: err.to_string(),
                })?;
            let value = std::str::from_utf8(&value)
                .map_err(|_| DescriptorFormatError::NonUtf8)?
                .to_string();
            match local_name(att.key) {
                b"name" => attrs.name = Some(value),
                b"originalName" => attrs.original_name = Some(value),
                b"offset" => attrs.offset = Some(value),
                b"arraySize" => attrs.array_size = Some(value),
                b"dataWidth" => attrs.data_width = Some(value),
                b"busTypeRef" => attrs.bus = Some(value),
                _ => (),
            }
        }
        Ok(attrs)
    }

    /// Returns `None` for arguments on another interconnect.
    fn into_descriptor(self, config: &ParseConfig) -> DescriptorResult<Option<RegisterDescriptor>> {
        if !config.accepts_bus(self.bus.as_deref()) {
            log::debug!(
                "skipping arg {:?} on bus {:?}",
                self.name.as_deref().unwrap_or("<unnamed>"),
                self.bus
            );
            return Ok(None);
        }

        let name = self
            .name
            .ok_or_else(|| DescriptorFormatError::MissingAttribute {
                arg: "<unnamed>".to_string(),
                attribute: "name",
            })?;
        let missing = |attribute: &'static str| DescriptorFormatError::MissingAttribute {
            arg: name.clone(),
            attribute,
        };
        let original_name = self.original_name.ok_or_else(|| missing("originalName"))?;
        let offset = self.offset.ok_or_else(|| missing("offset"))?;
        let data_width = self.data_width.ok_or_else(|| missing("dataWidth"))?;

        let offset = parse_number(&name, "offset", &offset)?;
        // An empty arraySize is the same as none: one individually addressed element.
        let array_size = match self.array_size.as_deref().map(str::trim) {
            Some(size) if !size.is_empty() => Some(parse_number(&name, "arraySize", size)?),
            _ => None,
        };
        let width = parse_number(&name, "dataWidth", &data_width)?;
        let data_width = DataWidth::from_bits(width).unwrap_or_else(|| {
            log::warn!("argument {name}: data width {width} is not 8, 16 or 32; treating it as 8");
            DataWidth::W8
        });

        Ok(Some(RegisterDescriptor {
            canonical_name: config.canonical_name(&original_name),
            name,
            offset,
            array_size,
            data_width,
            bus_kind: config.bus_kind.clone(),
        }))
    }
}

/// Accepts decimal or `0x`-prefixed hex, with optional `_` separators.
fn parse_number(arg: &str, attribute: &'static str, value: &str) -> DescriptorResult<u32> {
    let cleaned: String = value.trim().chars().filter(|&c| c != '_').collect();
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => cleaned.parse::<u32>(),
    };
    parsed.map_err(|_| DescriptorFormatError::InvalidNumber {
        arg: arg.to_string(),
        attribute,
        value: value.to_string(),
    })
}
