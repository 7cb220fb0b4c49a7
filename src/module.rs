use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::io::Write;

use crate::aggregate::{self, AggregateRecord, DiffReport};
use crate::codec::types::{Record, StreamCursor};
use crate::codec::{decode, encode};
use crate::internal::container::{ModuleSink, ModuleSource};
use crate::internal::error::{Error, Result};
use crate::present::{self, ReportOptions};

/// Identity tag of a log module within the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u16);

impl ModuleId {
    /// Cray XC (Aries) router telemetry module.
    pub const APXC: ModuleId = ModuleId(11);
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ModuleId::APXC => write!(f, "APXC"),
            ModuleId(id) => write!(f, "module#{}", id),
        }
    }
}

/// The operations a log module plugs into the host framework.
pub trait LogUtil: Debug + Send + Sync {
    fn id(&self) -> ModuleId;

    /// Human-readable module name, used as the first column of counter lines.
    fn name(&self) -> &'static str;

    /// Reads the next record of this module's stream.
    fn get_record(&self, source: &mut dyn ModuleSource, cursor: &mut StreamCursor) -> Result<Option<Record>>;

    /// Appends a record to this module's stream.
    fn put_record(&self, sink: &mut dyn ModuleSink, cursor: &mut StreamCursor, record: &Record) -> Result<()>;

    /// Prints a record as counter lines.
    fn print_record(&self, out: &mut dyn Write, record: &Record, opts: &ReportOptions) -> Result<()>;

    /// Description of the module's counters for format `version`.
    fn print_description(&self, version: u32) -> String;

    fn print_diff(&self, a: &Record, name_a: &str, b: &Record, name_b: &str) -> DiffReport;

    /// Folds a record into a running aggregate.
    fn agg_records(&self, record: &Record, acc: &mut AggregateRecord, is_first: bool);
}

/// Router telemetry module.
#[derive(Debug, Default)]
pub struct ApxcLogUtil;

impl LogUtil for ApxcLogUtil {
    fn id(&self) -> ModuleId {
        ModuleId::APXC
    }

    fn name(&self) -> &'static str {
        "APXC"
    }

    fn get_record(&self, source: &mut dyn ModuleSource, cursor: &mut StreamCursor) -> Result<Option<Record>> {
        decode::decode_record(source, self.id(), cursor)
    }

    fn put_record(&self, sink: &mut dyn ModuleSink, cursor: &mut StreamCursor, record: &Record) -> Result<()> {
        encode::encode_record(sink, self.id(), cursor, record)
    }

    fn print_record(&self, out: &mut dyn Write, record: &Record, opts: &ReportOptions) -> Result<()> {
        present::write_record(out, record, opts)
    }

    fn print_description(&self, version: u32) -> String {
        present::describe_counters(version)
    }

    fn print_diff(&self, a: &Record, name_a: &str, b: &Record, name_b: &str) -> DiffReport {
        aggregate::diff(a, name_a, b, name_b)
    }

    fn agg_records(&self, record: &Record, acc: &mut AggregateRecord, is_first: bool) {
        aggregate::fold(record, acc, is_first)
    }
}

/// Returns the LogUtil implementation for a module id.
pub fn get_logutil(id: ModuleId) -> Result<Box<dyn LogUtil>> {
    match id {
        ModuleId::APXC => Ok(Box::new(ApxcLogUtil)),
        other => Err(Error::ModuleError(format!("No log utilities registered for {}", other))),
    }
}

/// Mapping from module id to its LogUtil implementation.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<ModuleId, Box<dyn LogUtil>>,
}

impl ModuleRegistry {
    /// A registry holding every module this crate implements.
    pub fn with_defaults() -> Self {
        let mut registry = ModuleRegistry::default();
        registry.register(Box::new(ApxcLogUtil));
        registry
    }

    /// Registers `util` under its own id, returning any implementation it replaces.
    pub fn register(&mut self, util: Box<dyn LogUtil>) -> Option<Box<dyn LogUtil>> {
        self.modules.insert(util.id(), util)
    }

    pub fn get(&self, id: ModuleId) -> Result<&dyn LogUtil> {
        self.modules
            .get(&id)
            .map(|util| util.as_ref())
            .ok_or_else(|| Error::ModuleError(format!("No log utilities registered for {}", id)))
    }

    /// Registered module ids in ascending order.
    pub fn ids(&self) -> Vec<ModuleId> {
        let mut ids: Vec<ModuleId> = self.modules.keys().copied().collect();
        ids.sort();
        ids
    }
}
