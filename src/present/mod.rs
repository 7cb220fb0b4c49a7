//! Text rendering of decoded records.

use std::io::Write;

use crate::codec::catalog::COUNTER_NAMES;
use crate::codec::types::Record;
use crate::internal::error::Result;

/// Names of the router coordinate fields, in record order.
pub const COORD_NAMES: [&str; 4] = ["group", "chassis", "blade", "node"];

/// One named value of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterLine {
    pub name: &'static str,
    pub value: u64,
}

/// Columns of the counter line that do not come from the record.
///
/// Router telemetry has no file system, so the mount point and fs type
/// columns are always empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub module_name: String,
    pub file_name: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            module_name: "APXC".to_string(),
            file_name: String::new(),
        }
    }
}

/// Lists the named values of `record` in print order.
///
/// A topology summary yields groups, chassis and blades. Router telemetry
/// yields its four coordinates followed by every catalog counter.
pub fn render(record: &Record) -> Vec<CounterLine> {
    match record {
        Record::Topology(rec) => vec![
            CounterLine { name: "groups", value: rec.groups },
            CounterLine { name: "chassis", value: rec.chassis },
            CounterLine { name: "blades", value: rec.blades },
        ],
        Record::Router(rec) => COORD_NAMES
            .iter()
            .zip(rec.coord.iter())
            .chain(COUNTER_NAMES.iter().zip(rec.counters.iter()))
            .map(|(name, value)| CounterLine { name: *name, value: *value })
            .collect(),
    }
}

/// Writes `record` as tab-separated counter lines:
/// module, rank, record id, counter, value, file name, and two empty
/// columns for mount point and fs type.
pub fn write_record<W: Write + ?Sized>(out: &mut W, record: &Record, opts: &ReportOptions) -> Result<()> {
    let header = record.header();
    for line in render(record) {
        // rank is printed signed; -1 marks a record shared by all ranks
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t\t",
            opts.module_name,
            header.rank as i64,
            header.id,
            line.name,
            line.value,
            opts.file_name
        )?;
    }
    Ok(())
}

/// Static description of the module's counters, printed once per report.
pub fn describe_counters(version: u32) -> String {
    format!(
        "\n# description of APXC counters: {version}\n\
         #   groups: total number of groups.\n\
         #   chassis: total number of chassis.\n\
         #   blades: total number of blades.\n\
         #   router:\n\
         #     group:   group this router is in.\n\
         #     chassis: chassis this router is in.\n\
         #     blade:   blade this router is in.\n\
         #     node:    node connected to this router.\n\
         #     AR_RTR_x_y_INQ_PRF_INCOMING_FLIT_VC[0-7]: flits on VCz\n\
         #     AR_RTR_x_y_INQ_PRF_ROWBUS_STALL_CNT: stalls on x y tile\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::catalog::COUNTER_COUNT;
    use crate::codec::types::{RecordHeader, RouterTelemetry, TopologySummary};

    fn topology() -> Record {
        Record::from(TopologySummary {
            base: RecordHeader { id: 42, rank: u64::MAX },
            groups: 2,
            chassis: 4,
            blades: 8,
        })
    }

    #[test]
    fn test_render_topology() {
        let lines = render(&topology());
        let pairs: Vec<(&str, u64)> = lines.iter().map(|l| (l.name, l.value)).collect();
        assert_eq!(pairs, vec![("groups", 2), ("chassis", 4), ("blades", 8)]);
    }

    #[test]
    fn test_render_router() {
        let mut rec = RouterTelemetry::new(RecordHeader { id: 1, rank: 0 }, [1, 2, 3, 4]);
        rec.counters[COUNTER_COUNT - 1] = 99;
        let lines = render(&Record::from(rec));
        assert_eq!(lines.len(), 4 + COUNTER_COUNT);
        let coords: Vec<(&str, u64)> = lines[..4].iter().map(|l| (l.name, l.value)).collect();
        assert_eq!(coords, vec![("group", 1), ("chassis", 2), ("blade", 3), ("node", 4)]);
        assert_eq!(lines[4].name, COUNTER_NAMES[0]);
        assert_eq!(
            lines.last().copied(),
            Some(CounterLine { name: "AR_RTR_5_7_INQ_PRF_ROWBUS_STALL_CNT", value: 99 })
        );
    }

    #[test]
    fn test_write_record_columns() {
        let opts = ReportOptions {
            file_name: "job.darshan".to_string(),
            ..ReportOptions::default()
        };
        let mut out = Vec::new();
        write_record(&mut out, &topology(), &opts).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "APXC\t-1\t42\tgroups\t2\tjob.darshan\t\t");
        assert_eq!(lines[2], "APXC\t-1\t42\tblades\t8\tjob.darshan\t\t");
        assert!(lines.iter().all(|l| l.split('\t').count() == 8));
    }

    #[test]
    fn test_describe_counters() {
        let text = describe_counters(1);
        assert!(text.starts_with("\n# description of APXC counters: 1\n"));
        assert!(text.contains("#   groups: total number of groups.\n"));
        assert!(text.contains("AR_RTR_x_y_INQ_PRF_ROWBUS_STALL_CNT"));
        assert_eq!(text.lines().filter(|l| l.starts_with('#')).count(), 11);
    }
}
