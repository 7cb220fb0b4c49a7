// Codec module for the router telemetry (APXC) log module

pub mod catalog;
pub mod decode;
pub mod encode;
pub mod swap;
pub mod types;
pub mod version;

pub use decode::{decode_record, RecordReader};
pub use encode::{encode_record, RecordWriter};
pub use swap::ByteSwap;
pub use types::{Record, RecordHeader, RecordShape, RouterTelemetry, StreamCursor, TopologySummary};
pub use version::{layout_for, RecordLayout, CURRENT_VERSION};
