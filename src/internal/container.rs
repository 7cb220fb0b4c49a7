//! The narrow slice of the log container that the record codec consumes.
//!
//! The container owns file I/O, compression and indexing. The codec only
//! needs to pull bytes out of one module's region, push bytes into it, and
//! look at the per-module metadata (format version, byte-order flag).

use std::collections::HashMap;
use std::io;

use bytes::{BufMut, BytesMut};

use crate::module::ModuleId;

/// Read side of a module stream.
pub trait ModuleSource {
    /// Total length in bytes of the module's region. Zero when the module is
    /// absent from the log.
    fn region_len(&self, module: ModuleId) -> u64;

    /// Format version recorded for the module in the container metadata.
    fn declared_version(&self, module: ModuleId) -> u32;

    /// Whether the log was produced on a host of the opposite byte order.
    fn byte_order_mismatch(&self, module: ModuleId) -> bool;

    /// Reads up to `buf.len()` bytes from the module's region.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` when
    /// the region runs out.
    fn read_module(&mut self, module: ModuleId, buf: &mut [u8]) -> io::Result<usize>;
}

/// Write side of a module stream.
pub trait ModuleSink {
    /// Appends `buf` to the module's region and tags the region with `version`.
    fn write_module(&mut self, module: ModuleId, buf: &[u8], version: u32) -> io::Result<()>;
}

#[derive(Debug, Default)]
struct Region {
    data: BytesMut,
    read_pos: usize,
    version: u32,
}

/// In-memory container holding one byte region per module.
///
/// Used by the tools and the tests in place of a real log file.
#[derive(Debug, Default)]
pub struct MemoryContainer {
    regions: HashMap<ModuleId, Region>,
    swap: bool,
}

impl MemoryContainer {
    /// Creates an empty container. `swap` marks every region as produced
    /// with the opposite byte order.
    pub fn new(swap: bool) -> Self {
        MemoryContainer {
            regions: HashMap::new(),
            swap,
        }
    }

    /// Creates a container holding a single module region.
    pub fn with_region(module: ModuleId, data: &[u8], version: u32, swap: bool) -> Self {
        let mut container = MemoryContainer::new(swap);
        container.regions.insert(
            module,
            Region {
                data: BytesMut::from(data),
                read_pos: 0,
                version,
            },
        );
        container
    }

    /// Raw bytes of a module's region, if the module is present.
    pub fn region_bytes(&self, module: ModuleId) -> Option<&[u8]> {
        self.regions.get(&module).map(|r| &r.data[..])
    }

    /// Moves the read position of a module's region back to its start.
    pub fn rewind(&mut self, module: ModuleId) {
        if let Some(region) = self.regions.get_mut(&module) {
            region.read_pos = 0;
        }
    }
}

impl ModuleSource for MemoryContainer {
    fn region_len(&self, module: ModuleId) -> u64 {
        self.regions.get(&module).map_or(0, |r| r.data.len() as u64)
    }

    fn declared_version(&self, module: ModuleId) -> u32 {
        self.regions.get(&module).map_or(0, |r| r.version)
    }

    fn byte_order_mismatch(&self, _module: ModuleId) -> bool {
        self.swap
    }

    fn read_module(&mut self, module: ModuleId, buf: &mut [u8]) -> io::Result<usize> {
        let region = match self.regions.get_mut(&module) {
            Some(region) => region,
            None => return Ok(0),
        };
        let available = &region.data[region.read_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        region.read_pos += n;
        Ok(n)
    }
}

impl ModuleSink for MemoryContainer {
    fn write_module(&mut self, module: ModuleId, buf: &[u8], version: u32) -> io::Result<()> {
        let region = self.regions.entry(module).or_default();
        region.data.put_slice(buf);
        region.version = version;
        Ok(())
    }
}
