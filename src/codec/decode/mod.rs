// Decode module for router telemetry module streams

use std::iter::FusedIterator;

use byteorder::{NativeEndian, ReadBytesExt};

use crate::codec::swap::ByteSwap;
use crate::codec::types::{
    Record, RecordHeader, RecordShape, RouterTelemetry, StreamCursor, TopologySummary,
};
use crate::codec::version::{layout_for, CURRENT_VERSION};
use crate::internal::container::ModuleSource;
use crate::internal::error::{Error, Result};
use crate::module::ModuleId;

/// Reserves a record buffer without aborting on allocation failure.
fn alloc_buffer(size: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| Error::AllocationError(size))?;
    Ok(buffer)
}

fn read_header(reader: &mut &[u8]) -> Result<RecordHeader> {
    let id = reader.read_u64::<NativeEndian>()?;
    let rank = reader.read_u64::<NativeEndian>()?;
    Ok(RecordHeader { id, rank })
}

/// Parses an exact-length record image of the given shape (host byte order).
pub fn parse_record(shape: RecordShape, data: &[u8]) -> Result<Record> {
    let layout = layout_for(CURRENT_VERSION)?;
    let expected = layout.size_of(shape);
    if data.len() != expected {
        return Err(Error::CodecError(format!(
            "Invalid length for {:?} record: expected {} bytes, got {}",
            shape,
            expected,
            data.len()
        )));
    }

    let mut reader = data;
    let base = read_header(&mut reader)?;
    match shape {
        RecordShape::Topology => {
            let groups = reader.read_u64::<NativeEndian>()?;
            let chassis = reader.read_u64::<NativeEndian>()?;
            let blades = reader.read_u64::<NativeEndian>()?;
            Ok(Record::Topology(TopologySummary {
                base,
                groups,
                chassis,
                blades,
            }))
        }
        RecordShape::Router => {
            let mut rec = Box::new(RouterTelemetry::new(base, [0; 4]));
            reader.read_u64_into::<NativeEndian>(&mut rec.coord)?;
            reader.read_u64_into::<NativeEndian>(&mut rec.counters)?;
            Ok(Record::Router(rec))
        }
    }
}

/// Decodes the next record of `module` from `source`.
///
/// The record's shape comes from `cursor`, which advances after a
/// successful read. Returns `Ok(None)` at end of stream: the module is
/// absent, its declared version is 0, or the container returned fewer
/// bytes than a full record.
pub fn decode_record<S>(
    source: &mut S,
    module: ModuleId,
    cursor: &mut StreamCursor,
) -> Result<Option<Record>>
where
    S: ModuleSource + ?Sized,
{
    if source.region_len(module) == 0 {
        return Ok(None);
    }

    let mut buffer = alloc_buffer(RouterTelemetry::SIZE)?;

    let version = source.declared_version(module);
    if version == 0 {
        tracing::warn!(%module, version, "either unknown or debug format version, skipping module");
        return Ok(None);
    }

    let layout = layout_for(version).map_err(|e| {
        tracing::warn!(%module, version, "no record layout for declared format version");
        e
    })?;

    let shape = cursor.shape();
    let rec_len = layout.size_of(shape);
    buffer.resize(rec_len, 0);

    let n = source.read_module(module, &mut buffer).map_err(|e| {
        tracing::error!(%module, error = %e, "module read failed");
        Error::from(e)
    })?;
    if n != rec_len {
        tracing::debug!(%module, ?shape, expected = rec_len, got = n, "short read, end of stream");
        return Ok(None);
    }

    let mut record = parse_record(shape, &buffer)?;
    if source.byte_order_mismatch(module) {
        record.swap_bytes_in_place();
    }
    cursor.advance();
    Ok(Some(record))
}

/// A module stream paired with its own cursor.
///
/// Once the stream ends or a decode fails, the reader is finished and
/// yields nothing more.
pub struct RecordReader<'a, S: ModuleSource + ?Sized> {
    source: &'a mut S,
    module: ModuleId,
    cursor: StreamCursor,
    finished: bool,
}

impl<'a, S: ModuleSource + ?Sized> RecordReader<'a, S> {
    /// Starts reading `module` from the beginning of its stream.
    pub fn new(source: &'a mut S, module: ModuleId) -> Self {
        RecordReader {
            source,
            module,
            cursor: StreamCursor::ExpectingSummary,
            finished: false,
        }
    }

    pub fn cursor(&self) -> StreamCursor {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decodes the next record, or `None` at end of stream.
    ///
    /// After the first end of stream or error every call returns `Ok(None)`.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if self.finished {
            return Ok(None);
        }
        let result = decode_record(&mut *self.source, self.module, &mut self.cursor);
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }
}

impl<'a, S: ModuleSource + ?Sized> Iterator for RecordReader<'a, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl<'a, S: ModuleSource + ?Sized> FusedIterator for RecordReader<'a, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::catalog::COUNTER_COUNT;
    use crate::internal::container::MemoryContainer;
    use std::io;

    fn topology_image(id: u64, groups: u64, chassis: u64, blades: u64) -> Vec<u8> {
        [id, 0, groups, chassis, blades]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect()
    }

    fn router_image(id: u64, coord: [u64; 4]) -> Vec<u8> {
        let mut words = vec![id, 0];
        words.extend_from_slice(&coord);
        words.extend(std::iter::repeat(0).take(COUNTER_COUNT));
        words.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    struct FailingSource;

    impl ModuleSource for FailingSource {
        fn region_len(&self, _module: ModuleId) -> u64 {
            64
        }
        fn declared_version(&self, _module: ModuleId) -> u32 {
            CURRENT_VERSION
        }
        fn byte_order_mismatch(&self, _module: ModuleId) -> bool {
            false
        }
        fn read_module(&mut self, _module: ModuleId, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "inflate failed"))
        }
    }

    #[test]
    fn test_alloc_buffer_failure_is_an_error() {
        assert!(matches!(alloc_buffer(usize::MAX), Err(Error::AllocationError(usize::MAX))));
        assert!(alloc_buffer(RouterTelemetry::SIZE).unwrap().capacity() >= RouterTelemetry::SIZE);
    }

    #[test]
    fn test_reader_stops_after_unsupported_version() {
        let data = topology_image(1, 2, 4, 8);
        let mut container = MemoryContainer::with_region(ModuleId::APXC, &data, CURRENT_VERSION + 1, false);
        let mut reader = RecordReader::new(&mut container, ModuleId::APXC);
        let items: Vec<Result<Record>> = reader.by_ref().take(1000).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Error::UnsupportedVersion { .. })));
        assert!(reader.is_finished());
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn test_reader_stops_after_io_error() {
        let mut source = FailingSource;
        let reader = RecordReader::new(&mut source, ModuleId::APXC);
        assert_eq!(reader.filter_map(|r| r.ok()).count(), 0);
    }

    #[test]
    fn test_decode_topology_then_router() {
        let mut data = topology_image(1, 2, 4, 8);
        data.extend(router_image(2, [1, 2, 3, 4]));
        let mut container = MemoryContainer::with_region(ModuleId::APXC, &data, CURRENT_VERSION, false);
        let mut cursor = StreamCursor::default();

        let first = decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap().unwrap();
        assert_eq!(first.shape(), RecordShape::Topology);
        let second = decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap().unwrap();
        assert_eq!(second.shape(), RecordShape::Router);
        match second {
            Record::Router(rec) => assert_eq!(rec.coord, [1, 2, 3, 4]),
            _ => panic!("Expected router record"),
        }
        assert!(decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_decode_absent_module() {
        let mut container = MemoryContainer::new(false);
        let mut cursor = StreamCursor::default();
        assert!(decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap().is_none());
        assert_eq!(cursor, StreamCursor::ExpectingSummary);
    }

    #[test]
    fn test_decode_version_zero_is_end_of_stream() {
        let data = topology_image(1, 2, 4, 8);
        let mut container = MemoryContainer::with_region(ModuleId::APXC, &data, 0, false);
        let mut cursor = StreamCursor::default();
        assert!(decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_decode_unknown_version_errors() {
        let data = topology_image(1, 2, 4, 8);
        let mut container = MemoryContainer::with_region(ModuleId::APXC, &data, CURRENT_VERSION + 1, false);
        let mut cursor = StreamCursor::default();
        let err = decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_decode_short_read_is_end_of_stream() {
        let data = topology_image(1, 2, 4, 8);
        let mut container =
            MemoryContainer::with_region(ModuleId::APXC, &data[..39], CURRENT_VERSION, false);
        let mut cursor = StreamCursor::default();
        assert!(decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap().is_none());
        assert_eq!(cursor, StreamCursor::ExpectingSummary);
    }

    #[test]
    fn test_decode_truncated_router_is_end_of_stream() {
        let mut data = topology_image(1, 2, 4, 8);
        data.extend(&router_image(2, [1, 2, 3, 4])[..100]);
        let mut container = MemoryContainer::with_region(ModuleId::APXC, &data, CURRENT_VERSION, false);
        let mut reader = RecordReader::new(&mut container, ModuleId::APXC);
        assert!(reader.next_record().unwrap().is_some());
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn test_decode_io_error_propagates() {
        let mut cursor = StreamCursor::default();
        let err = decode_record(&mut FailingSource, ModuleId::APXC, &mut cursor).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
        assert_eq!(cursor, StreamCursor::ExpectingSummary);
    }

    #[test]
    fn test_decode_swaps_when_byte_order_differs() {
        let data = topology_image(7u64.swap_bytes(), 2u64.swap_bytes(), 4u64.swap_bytes(), 8u64.swap_bytes());
        let mut container = MemoryContainer::with_region(ModuleId::APXC, &data, CURRENT_VERSION, true);
        let mut cursor = StreamCursor::default();
        match decode_record(&mut container, ModuleId::APXC, &mut cursor).unwrap() {
            Some(Record::Topology(rec)) => {
                assert_eq!(rec.base.id, 7);
                assert_eq!((rec.groups, rec.chassis, rec.blades), (2, 4, 8));
            }
            other => panic!("Expected topology record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_record_rejects_wrong_length() {
        let result = parse_record(RecordShape::Topology, &[0u8; 32]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Codec Error: Invalid length for Topology record: expected 40 bytes, got 32"
        );
    }

    #[test]
    fn test_reader_iterates_all_records() {
        let mut data = topology_image(1, 2, 4, 8);
        for i in 0..3 {
            data.extend(router_image(10 + i, [i, 0, 0, 0]));
        }
        let mut container = MemoryContainer::with_region(ModuleId::APXC, &data, CURRENT_VERSION, false);
        let shapes: Vec<RecordShape> = RecordReader::new(&mut container, ModuleId::APXC)
            .map(|r| r.unwrap().shape())
            .collect();
        assert_eq!(
            shapes,
            vec![
                RecordShape::Topology,
                RecordShape::Router,
                RecordShape::Router,
                RecordShape::Router
            ]
        );
    }
}
