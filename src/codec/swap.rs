//! Byte-order normalization for decoded records.

use crate::codec::types::{Record, RecordHeader, RouterTelemetry, TopologySummary};

/// Reverses the byte order of every multi-byte field in place.
///
/// Applying it twice restores the original value.
pub trait ByteSwap {
    fn swap_bytes_in_place(&mut self);
}

fn swap64(field: &mut u64) {
    *field = field.swap_bytes();
}

impl ByteSwap for RecordHeader {
    fn swap_bytes_in_place(&mut self) {
        swap64(&mut self.id);
        swap64(&mut self.rank);
    }
}

impl ByteSwap for TopologySummary {
    fn swap_bytes_in_place(&mut self) {
        self.base.swap_bytes_in_place();
        swap64(&mut self.groups);
        swap64(&mut self.chassis);
        swap64(&mut self.blades);
    }
}

impl ByteSwap for RouterTelemetry {
    fn swap_bytes_in_place(&mut self) {
        self.base.swap_bytes_in_place();
        self.coord.iter_mut().for_each(swap64);
        self.counters.iter_mut().for_each(swap64);
    }
}

impl ByteSwap for Record {
    fn swap_bytes_in_place(&mut self) {
        match self {
            Record::Topology(rec) => rec.swap_bytes_in_place(),
            Record::Router(rec) => rec.swap_bytes_in_place(),
        }
    }
}
