//! Maps a declared format version to the record layout it uses.

use crate::codec::types::{RecordShape, RouterTelemetry, TopologySummary};
use crate::internal::error::{Error, Result};

/// The only format version this codec reads and the one it always writes.
pub const CURRENT_VERSION: u32 = 1;

/// Record sizes for one format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub topology_size: usize,
    pub router_size: usize,
}

impl RecordLayout {
    /// Bytes occupied by a record of `shape`.
    pub fn size_of(&self, shape: RecordShape) -> usize {
        match shape {
            RecordShape::Topology => self.topology_size,
            RecordShape::Router => self.router_size,
        }
    }

    /// Size of the largest record shape.
    pub fn max_size(&self) -> usize {
        self.topology_size.max(self.router_size)
    }
}

/// Returns the layout for `version`.
///
/// Versions other than `CURRENT_VERSION` have no layout: older versions
/// would need an up-conversion that does not exist.
pub fn layout_for(version: u32) -> Result<RecordLayout> {
    match version {
        CURRENT_VERSION => Ok(RecordLayout {
            topology_size: TopologySummary::SIZE,
            router_size: RouterTelemetry::SIZE,
        }),
        _ => Err(Error::UnsupportedVersion {
            version,
            current: CURRENT_VERSION,
        }),
    }
}
