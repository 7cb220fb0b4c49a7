// Encode module for router telemetry module streams

use byteorder::{NativeEndian, WriteBytesExt};

use crate::codec::types::{Record, RecordHeader, StreamCursor};
use crate::codec::version::{layout_for, CURRENT_VERSION};
use crate::internal::container::ModuleSink;
use crate::internal::error::{Error, Result};
use crate::module::ModuleId;

fn write_header(buf: &mut Vec<u8>, header: &RecordHeader) -> Result<()> {
    buf.write_u64::<NativeEndian>(header.id)?;
    buf.write_u64::<NativeEndian>(header.rank)?;
    Ok(())
}

/// Serializes a record into its on-disk image (host byte order).
pub fn serialize_record(record: &Record) -> Result<Vec<u8>> {
    let layout = layout_for(CURRENT_VERSION)?;
    let mut buf = Vec::with_capacity(layout.size_of(record.shape()));
    write_header(&mut buf, record.header())?;
    match record {
        Record::Topology(rec) => {
            buf.write_u64::<NativeEndian>(rec.groups)?;
            buf.write_u64::<NativeEndian>(rec.chassis)?;
            buf.write_u64::<NativeEndian>(rec.blades)?;
        }
        Record::Router(rec) => {
            for value in rec.coord.iter().chain(rec.counters.iter()) {
                buf.write_u64::<NativeEndian>(*value)?;
            }
        }
    }
    Ok(buf)
}

/// Encodes `record` into the stream of `module`.
///
/// The written length follows the position in `cursor`, not the record's
/// own shape: the first record of a stream is always written as a topology
/// summary. Writes are tagged with `CURRENT_VERSION`. The cursor advances
/// after a successful write.
pub fn encode_record<S>(
    sink: &mut S,
    module: ModuleId,
    cursor: &mut StreamCursor,
    record: &Record,
) -> Result<()>
where
    S: ModuleSink + ?Sized,
{
    let shape = cursor.shape();
    let rec_len = layout_for(CURRENT_VERSION)?.size_of(shape);

    let image = serialize_record(record)?;
    if image.len() < rec_len {
        return Err(Error::CodecError(format!(
            "{:?} record ({} bytes) cannot fill a {:?} position ({} bytes)",
            record.shape(),
            image.len(),
            shape,
            rec_len
        )));
    }
    if record.shape() != shape {
        tracing::debug!(%module, given = ?record.shape(), written = ?shape, "record written as positional shape");
    }

    sink.write_module(module, &image[..rec_len], CURRENT_VERSION)
        .map_err(|e| {
            tracing::error!(%module, error = %e, "module write failed");
            Error::from(e)
        })?;
    cursor.advance();
    Ok(())
}

/// A module sink paired with its own cursor.
pub struct RecordWriter<'a, S: ModuleSink + ?Sized> {
    sink: &'a mut S,
    module: ModuleId,
    cursor: StreamCursor,
}

impl<'a, S: ModuleSink + ?Sized> RecordWriter<'a, S> {
    /// Starts a new stream for `module`; the first record written is the
    /// topology summary.
    pub fn new(sink: &'a mut S, module: ModuleId) -> Self {
        RecordWriter {
            sink,
            module,
            cursor: StreamCursor::ExpectingSummary,
        }
    }

    pub fn cursor(&self) -> StreamCursor {
        self.cursor
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        encode_record(&mut *self.sink, self.module, &mut self.cursor, record)
    }
}
