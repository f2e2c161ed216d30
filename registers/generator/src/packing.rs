// Licensed under the Apache-2.0 license

//! Packing of register arrays into 32-bit physical writes.
//!
//! Every physical register is 32 bits wide. Elements narrower than that are
//! grouped: two 16-bit elements or four 8-bit elements share one write.
//!
//! ```text
//! width  group  lane of element i   bits written
//! 32     1      0                   [31:0]
//! 16     2      i & 1               [16*lane+15 : 16*lane]
//!  8     4      i & 3               [8*lane+7   : 8*lane]
//! ```
//!
//! Within one span the accumulator is cleared when `lane(i) == 0` (the write
//! offset is latched at that point) and flushed when `lane(i) == group - 1`
//! or `i` is the last element of the span. Grouping restarts at index 0 of
//! every span, so a span with a partial last group flushes it before the
//! next span begins; nothing carries across span boundaries.
//!
//! The C emitter and the runtime model both take their conditions from
//! [`Packing`], so the two cannot disagree.

use crate::runtime::RegWrite;
use hwacc_registers_descriptor::{DataWidth, Span};
use std::convert::Infallible;

/// Physical register width, in bits.
pub const REGISTER_BITS: u32 = 32;

/// Grouping parameters for one element width.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Packing {
    group_size: u32,
    element_bits: u32,
}

impl Packing {
    pub fn for_width(width: DataWidth) -> Self {
        Self {
            group_size: REGISTER_BITS / width.bits(),
            element_bits: width.bits(),
        }
    }

    /// Elements per physical write: 1, 2 or 4.
    pub fn group_size(&self) -> u32 {
        self.group_size
    }

    pub fn element_bits(&self) -> u32 {
        self.element_bits
    }

    pub fn element_bytes(&self) -> u32 {
        self.element_bits / 8
    }

    /// True if more than one element shares a physical write.
    pub fn is_packed(&self) -> bool {
        self.group_size > 1
    }

    /// Mask applied to a span index to get its lane.
    pub fn lane_mask(&self) -> u32 {
        self.group_size - 1
    }

    /// Mask truncating an element to its declared width.
    pub fn element_mask(&self) -> u32 {
        if self.element_bits >= REGISTER_BITS {
            u32::MAX
        } else {
            (1 << self.element_bits) - 1
        }
    }

    /// Position of span element `index` within its physical word.
    pub fn lane(&self, index: u32) -> u32 {
        index & self.lane_mask()
    }

    /// The accumulator is cleared and its offset latched here.
    pub fn clears_at(&self, index: u32) -> bool {
        self.lane(index) == 0
    }

    /// The accumulator is written out here.
    pub fn flushes_at(&self, index: u32, span_size: u32) -> bool {
        self.lane(index) == self.lane_mask() || index + 1 == span_size
    }

    /// Left shift placing span element `index` in its lane.
    pub fn shift(&self, index: u32) -> u32 {
        self.element_bits * self.lane(index)
    }

    /// Byte offset of span element `index`.
    pub fn element_offset(&self, span: &Span, index: u32) -> u32 {
        span.offset.wrapping_add(index.wrapping_mul(self.element_bytes()))
    }

    /// Number of physical writes issued for a span of `span_size` elements.
    pub fn flush_count(&self, span_size: u32) -> u32 {
        span_size.div_ceil(self.group_size)
    }

    /// Walk `buffer` across `spans` in order, calling `flush` once per
    /// physical write.
    ///
    /// The buffer is expected to hold exactly as many elements as the spans
    /// declare. Surplus elements are ignored; if the buffer runs short the
    /// walk stops at its end without flushing the partial group.
    pub fn walk<E>(
        &self,
        spans: &[Span],
        buffer: &[u32],
        mut flush: impl FnMut(RegWrite) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut cursor = buffer.iter().copied();
        for span in spans {
            let mut pending = RegWrite::default();
            for index in 0..span.size {
                let Some(element) = cursor.next() else {
                    return Ok(());
                };
                if self.clears_at(index) {
                    pending = RegWrite {
                        offset: self.element_offset(span, index),
                        value: 0,
                    };
                }
                pending.value |= (element & self.element_mask()) << self.shift(index);
                if self.flushes_at(index, span.size) {
                    flush(pending)?;
                }
            }
        }
        Ok(())
    }

    /// Convenience wrapper collecting the writes of [`Packing::walk`].
    pub fn pack(&self, spans: &[Span], buffer: &[u32]) -> Vec<RegWrite> {
        let mut writes = Vec::new();
        let _ = self.walk(spans, buffer, |w| {
            writes.push(w);
            Ok::<(), Infallible>(())
        });
        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(offset: u32, size: u32) -> Span {
        Span { offset, size }
    }

    fn w(offset: u32, value: u32) -> RegWrite {
        RegWrite { offset, value }
    }

    #[test]
    fn test_parameters() {
        let p32 = Packing::for_width(DataWidth::W32);
        let p16 = Packing::for_width(DataWidth::W16);
        let p8 = Packing::for_width(DataWidth::W8);
        assert_eq!((p32.group_size(), p32.element_bits()), (1, 32));
        assert_eq!((p16.group_size(), p16.element_bits()), (2, 16));
        assert_eq!((p8.group_size(), p8.element_bits()), (4, 8));
        assert!(!p32.is_packed());
        assert_eq!(p32.element_mask(), u32::MAX);
        assert_eq!(p16.element_mask(), 0xffff);
        assert_eq!(p8.element_mask(), 0xff);
    }

    #[test]
    fn test_clear_and_flush_rules() {
        let p8 = Packing::for_width(DataWidth::W8);
        let clears: Vec<_> = (0..6).map(|i| p8.clears_at(i)).collect();
        assert_eq!(clears, [true, false, false, false, true, false]);
        let flushes: Vec<_> = (0..6).map(|i| p8.flushes_at(i, 6)).collect();
        assert_eq!(flushes, [false, false, false, true, false, true]);
        assert_eq!(p8.shift(6), 16);

        let p32 = Packing::for_width(DataWidth::W32);
        assert!((0..3).all(|i| p32.clears_at(i) && p32.flushes_at(i, 3)));
        assert!((0..3).all(|i| p32.shift(i) == 0));
    }

    #[test]
    fn test_pack_32() {
        let p = Packing::for_width(DataWidth::W32);
        let writes = p.pack(&[span(0x100, 3)], &[0xdead_beef, 2, 3]);
        assert_eq!(writes, [w(0x100, 0xdead_beef), w(0x104, 2), w(0x108, 3)]);
    }

    #[test]
    fn test_pack_16_odd_tail() {
        let p = Packing::for_width(DataWidth::W16);
        let writes = p.pack(&[span(0x40, 5)], &[1, 2, 3, 4, 0x1_0005]);
        // the tail write is freshly cleared, so its high half is zero
        assert_eq!(
            writes,
            [w(0x40, 0x0002_0001), w(0x44, 0x0004_0003), w(0x48, 0x0005)]
        );
    }

    #[test]
    fn test_pack_8_partial_group() {
        let p = Packing::for_width(DataWidth::W8);
        let writes = p.pack(&[span(0x80, 6)], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x166]);
        assert_eq!(writes, [w(0x80, 0x4433_2211), w(0x84, 0x6655)]);
    }

    #[test]
    fn test_no_carry_across_spans() {
        let p = Packing::for_width(DataWidth::W16);
        let writes = p.pack(&[span(0x10, 3), span(0x20, 3)], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(
            writes,
            [
                w(0x10, 0x0002_0001),
                w(0x14, 0x0003),
                w(0x20, 0x0005_0004),
                w(0x24, 0x0006),
            ]
        );
    }

    #[test]
    fn test_fully_decomposed() {
        let p = Packing::for_width(DataWidth::W8);
        let spans = [span(0x30, 1), span(0x38, 1), span(0x40, 1)];
        let writes = p.pack(&spans, &[7, 8, 9]);
        assert_eq!(writes, [w(0x30, 7), w(0x38, 8), w(0x40, 9)]);
    }

    #[test]
    fn test_flush_count() {
        let p16 = Packing::for_width(DataWidth::W16);
        assert_eq!(p16.flush_count(5), 3);
        assert_eq!(p16.flush_count(0), 0);
        assert_eq!(Packing::for_width(DataWidth::W8).flush_count(6), 2);
        assert_eq!(Packing::for_width(DataWidth::W32).flush_count(6), 6);
    }

    #[test]
    fn test_short_buffer_stops() {
        let p = Packing::for_width(DataWidth::W16);
        let writes = p.pack(&[span(0x40, 4)], &[1, 2, 3]);
        assert_eq!(writes, [w(0x40, 0x0002_0001)]);
    }

    #[test]
    fn test_flush_error_stops_walk() {
        let p = Packing::for_width(DataWidth::W32);
        let mut seen = 0;
        let result = p.walk(&[span(0, 4)], &[1, 2, 3, 4], |_| {
            seen += 1;
            if seen == 2 {
                Err("bus error")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("bus error"));
        assert_eq!(seen, 2);
    }
}
