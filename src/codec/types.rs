use std::mem;

use bytemuck::{Pod, Zeroable};

use crate::codec::catalog::COUNTER_COUNT;

/// Identity shared by both record shapes.
///
/// Set once by the producing instrumentation; the codec only byte-swaps it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct RecordHeader {
    pub id: u64,
    pub rank: u64,
}

/// First record of every module stream: static interconnect topology of the
/// job's allocation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct TopologySummary {
    pub base: RecordHeader,
    pub groups: u64,
    pub chassis: u64,
    pub blades: u64,
}

impl TopologySummary {
    /// On-disk size at the current format version.
    pub const SIZE: usize = mem::size_of::<TopologySummary>();
}

/// Counters sampled from one router during the job.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct RouterTelemetry {
    pub base: RecordHeader,
    /// group, chassis, blade, node
    pub coord: [u64; 4],
    /// Indexed by Counter Catalog slot.
    pub counters: [u64; COUNTER_COUNT],
}

impl RouterTelemetry {
    /// On-disk size at the current format version.
    pub const SIZE: usize = mem::size_of::<RouterTelemetry>();

    /// A router record with the given identity and coordinate and all
    /// counters zero.
    pub fn new(base: RecordHeader, coord: [u64; 4]) -> Self {
        RouterTelemetry {
            base,
            coord,
            counters: [0; COUNTER_COUNT],
        }
    }
}

/// Which of the two record shapes a stream position holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordShape {
    Topology,
    Router,
}

/// A decoded module record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Topology(TopologySummary),
    Router(Box<RouterTelemetry>),
}

impl Record {
    pub fn shape(&self) -> RecordShape {
        match self {
            Record::Topology(_) => RecordShape::Topology,
            Record::Router(_) => RecordShape::Router,
        }
    }

    pub fn header(&self) -> &RecordHeader {
        match self {
            Record::Topology(rec) => &rec.base,
            Record::Router(rec) => &rec.base,
        }
    }

    /// The record's on-disk byte image (host byte order).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Record::Topology(rec) => bytemuck::bytes_of(rec),
            Record::Router(rec) => bytemuck::bytes_of(rec.as_ref()),
        }
    }
}

impl From<TopologySummary> for Record {
    fn from(rec: TopologySummary) -> Self {
        Record::Topology(rec)
    }
}

impl From<RouterTelemetry> for Record {
    fn from(rec: RouterTelemetry) -> Self {
        Record::Router(Box::new(rec))
    }
}

/// Position of a stream relative to its single topology summary.
///
/// Shape is positional: the first record of a stream is the summary and
/// every later record is router telemetry. One cursor belongs to exactly one
/// stream; a new stream needs a fresh (or reset) cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamCursor {
    #[default]
    ExpectingSummary,
    ExpectingTelemetry,
}

impl StreamCursor {
    /// Shape of the next record at this position.
    pub fn shape(self) -> RecordShape {
        match self {
            StreamCursor::ExpectingSummary => RecordShape::Topology,
            StreamCursor::ExpectingTelemetry => RecordShape::Router,
        }
    }

    /// Moves past one record.
    pub fn advance(&mut self) {
        *self = StreamCursor::ExpectingTelemetry;
    }

    pub fn reset(&mut self) {
        *self = StreamCursor::ExpectingSummary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sizes() {
        assert_eq!(TopologySummary::SIZE, 40);
        assert_eq!(RouterTelemetry::SIZE, (6 + COUNTER_COUNT) * 8);
    }

    #[test]
    fn test_topology_byte_image_order() {
        let rec = TopologySummary {
            base: RecordHeader { id: 1, rank: 2 },
            groups: 3,
            chassis: 4,
            blades: 5,
        };
        let record = Record::from(rec);
        let image = record.as_bytes();
        assert_eq!(image.len(), TopologySummary::SIZE);
        for (i, chunk) in image.chunks(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            assert_eq!(u64::from_ne_bytes(word), i as u64 + 1);
        }
    }

    #[test]
    fn test_cursor_transitions() {
        let mut cursor = StreamCursor::default();
        assert_eq!(cursor.shape(), RecordShape::Topology);
        cursor.advance();
        assert_eq!(cursor.shape(), RecordShape::Router);
        cursor.advance();
        assert_eq!(cursor.shape(), RecordShape::Router);
        cursor.reset();
        assert_eq!(cursor, StreamCursor::ExpectingSummary);
    }

    #[test]
    fn test_record_accessors() {
        let router = RouterTelemetry::new(RecordHeader { id: 11, rank: 3 }, [1, 2, 3, 4]);
        let record = Record::from(router);
        assert_eq!(record.shape(), RecordShape::Router);
        assert_eq!(record.header().id, 11);
        assert_eq!(record.as_bytes().len(), RouterTelemetry::SIZE);
    }
}
