//! CSV export of race traces.

use crate::race::AgentRun;
use std::io::{self, Write};

pub const TRACE_CSV_HEADER: &str = "agent_id,algorithm,score,timer,reason,steps,space,step_index,x,y";

/// One row per trace record. `steps` and `space` repeat the agent's search
/// metrics on every row.
pub fn write_trace_csv<W: Write>(mut writer: W, runs: &[AgentRun]) -> io::Result<()> {
    writeln!(writer, "{}", TRACE_CSV_HEADER)?;
    for run in runs {
        for record in run.trace.records() {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{}",
                run.agent_id,
                run.algorithm,
                record.score,
                record.timer,
                record.reason,
                run.metrics.steps,
                run.metrics.space,
                record.step_index,
                record.position.x(),
                record.position.y()
            )?;
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaceConfig;
    use crate::race::Race;

    #[test]
    fn one_row_per_record_plus_header() {
        let outcome = Race::run(&RaceConfig::default(), Some(4), 4).unwrap();
        let mut buffer = Vec::new();
        write_trace_csv(&mut buffer, &outcome.runs).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        let records: usize = outcome.runs.iter().map(|r| r.trace.len()).sum();
        assert_eq!(lines[0], TRACE_CSV_HEADER);
        assert_eq!(lines.len(), records + 1);
        assert!(lines[1..].iter().all(|line| line.split(',').count() == 10));

        let start = outcome.world.placement.start;
        let first: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(first[0], "0");
        assert_eq!(first[1], outcome.runs[0].algorithm.code());
        assert_eq!(first[7], "0");
        assert_eq!(first[8], start.x().to_string());
        assert_eq!(first[9], start.y().to_string());
    }
}
