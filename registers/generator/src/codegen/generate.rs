// Licensed under the Apache-2.0 license

//! Conversion of a [`RegisterTable`] into accessor descriptions.

use super::*;

impl GeneratedRegApi {
    /// One accessor per scalar, in table order, followed by one per array.
    pub(super) fn from_table(table: &RegisterTable, name_config: &NameConfig) -> Self {
        let mut accessors = Vec::with_capacity(table.len());

        for reg in table.scalars() {
            log::debug!(
                "scalar {} @ {:#x}, {} bits",
                reg.canonical_name,
                reg.offset,
                reg.data_width
            );
            accessors.push(GeneratedAccessor {
                function: c_identifier(&name_config.accessor_name(&reg.canonical_name)),
                param: c_identifier(&reg.canonical_name),
                kind: AccessorKind::Scalar(reg.clone()),
            });
        }

        for reg in table.arrays() {
            let packing = Packing::for_width(reg.data_width);
            let writes: u32 = reg
                .spans
                .iter()
                .map(|span| packing.flush_count(span.size))
                .sum();
            log::debug!(
                "array {}: {} elements in {} span(s), {} bits, {} writes",
                reg.canonical_name,
                reg.len(),
                reg.spans.len(),
                reg.data_width,
                writes
            );
            accessors.push(GeneratedAccessor {
                function: c_identifier(&name_config.accessor_name(&reg.canonical_name)),
                param: c_identifier(&reg.canonical_name),
                kind: AccessorKind::Array(reg.clone()),
            });
        }

        Self { accessors }
    }
}
