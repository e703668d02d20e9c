//! Replays a path against the score and timer cost model.

use crate::constants::*;
use crate::grid::*;
use crate::location::*;
use crate::placement::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepReason {
    Normal,
    Angry,
    Chair,
    Goal,
    NoPoints,
    NoTime,
    Done,
}

impl StepReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StepReason::Normal => "normal",
            StepReason::Angry => "angry",
            StepReason::Chair => "chair",
            StepReason::Goal => "goal",
            StepReason::NoPoints => "no_points",
            StepReason::NoTime => "no_time",
            StepReason::Done => "done",
        }
    }

    /// Whether a record with this reason ends the trace.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepReason::Chair | StepReason::Goal | StepReason::NoPoints | StepReason::NoTime
        )
    }
}

impl std::fmt::Display for StepReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_index: usize,
    pub position: Location,
    pub score: i32,
    pub timer: i32,
    pub reason: StepReason,
}

/// Append-only record of one agent's walk. Only `simulate` builds traces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    records: Vec<StepRecord>,
}

impl Trace {
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn final_reason(&self) -> Option<StepReason> {
        self.last().map(|record| record.reason)
    }

    pub fn final_score(&self) -> i32 {
        self.last().map_or(0, |record| record.score)
    }

    pub fn final_timer(&self) -> i32 {
        self.last().map_or(0, |record| record.timer)
    }

    pub fn reached_goal(&self) -> bool {
        self.final_reason() == Some(StepReason::Goal)
    }
}

/// Walk `path` tile by tile. Every tile, the start included, costs one point
/// and one time unit. The trace stops at the first terminal record or when
/// the path runs out.
///
/// Goal and chair outrank resource exhaustion on the same tile. An angry tile
/// that drains the last points is recorded as `angry`; the agent only runs
/// out of points on its next tile.
pub fn simulate(
    grid: &WorldGrid,
    placement: &Placement,
    path: &[Location],
    start_score: i32,
    start_time: i32,
) -> Trace {
    if path.is_empty() {
        return Trace {
            records: vec![StepRecord {
                step_index: 0,
                position: placement.start,
                score: start_score,
                timer: start_time,
                reason: StepReason::Done,
            }],
        };
    }

    let mut records = Vec::with_capacity(path.len());
    let mut score = start_score;
    let mut timer = start_time;

    for (step_index, &position) in path.iter().enumerate() {
        let score_before = score;
        score -= STEP_COST;
        timer -= STEP_COST;

        let mut reason = match grid.get(position).unwrap_or_default() {
            CellKind::Angry => {
                score -= ANGRY_PENALTY;
                StepReason::Angry
            }
            CellKind::Chair => {
                score = 0;
                StepReason::Chair
            }
            CellKind::Office => StepReason::Goal,
            _ => StepReason::Normal,
        };

        let drained_by_hazard = reason == StepReason::Angry && score_before > 0;
        if !matches!(reason, StepReason::Goal | StepReason::Chair) {
            if timer <= 0 {
                reason = StepReason::NoTime;
            } else if score <= 0 && !drained_by_hazard {
                reason = StepReason::NoPoints;
            }
        }

        score = score.max(0);
        timer = timer.max(0);

        records.push(StepRecord {
            step_index,
            position,
            score,
            timer,
            reason,
        });

        if reason.is_terminal() {
            break;
        }
    }

    Trace { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::WorldGeometry;

    fn world() -> (WorldGrid, Placement) {
        let geometry = WorldGeometry::new(10, 3, 7);
        let placement = Placement {
            start: Location::from_xy(0, 3),
            walls_main: Default::default(),
            walls_pab: Default::default(),
            angry_main: [Location::from_xy(1, 3)].into_iter().collect(),
            angry_pab: Default::default(),
            chair: Location::from_xy(14, 5),
            office: Location::from_xy(16, 5),
            bridge: geometry.bridge_cells().collect(),
        };
        (WorldGrid::from_placement(geometry, &placement), placement)
    }

    fn row(from: u8, to: u8, y: u8) -> Vec<Location> {
        (from..=to).map(|x| Location::from_xy(x, y)).collect()
    }

    #[test]
    fn empty_path_reports_done() {
        let (grid, placement) = world();
        let trace = simulate(&grid, &placement, &[], 1000, 300);
        assert_eq!(trace.len(), 1);
        let record = trace.records()[0];
        assert_eq!(record.reason, StepReason::Done);
        assert_eq!(record.position, placement.start);
        assert_eq!((record.score, record.timer), (1000, 300));
    }

    #[test]
    fn hazard_drains_then_next_step_runs_out_of_points() {
        let (grid, placement) = world();
        let path = row(0, 4, 3);
        let trace = simulate(&grid, &placement, &path, 5, 300);

        let reasons: Vec<StepReason> = trace.records().iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![StepReason::Normal, StepReason::Angry, StepReason::NoPoints]
        );
        assert_eq!(trace.records()[1].score, 0);
        assert_eq!(trace.records()[2].score, 0);
    }

    #[test]
    fn hazard_penalty_is_applied_on_top_of_step_cost() {
        let (grid, placement) = world();
        let trace = simulate(&grid, &placement, &row(0, 2, 3), 1000, 300);
        let scores: Vec<i32> = trace.records().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![999, 848, 847]);
        assert_eq!(trace.final_reason(), Some(StepReason::Normal));
    }

    #[test]
    fn chair_zeroes_score_and_stops() {
        let (grid, placement) = world();
        let path = vec![
            Location::from_xy(13, 3),
            Location::from_xy(13, 4),
            Location::from_xy(13, 5),
            Location::from_xy(14, 5),
            Location::from_xy(15, 5),
        ];
        let trace = simulate(&grid, &placement, &path, 1000, 300);
        let last = trace.last().copied().unwrap();
        assert_eq!(last.reason, StepReason::Chair);
        assert_eq!(last.score, 0);
        assert_eq!(last.position, placement.chair);
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn goal_ends_trace_at_office() {
        let (grid, placement) = world();
        let path = vec![
            Location::from_xy(15, 4),
            Location::from_xy(16, 4),
            Location::from_xy(16, 5),
            Location::from_xy(17, 5),
        ];
        let trace = simulate(&grid, &placement, &path, 1000, 300);
        assert!(trace.reached_goal());
        assert_eq!(trace.last().map(|r| r.position), Some(placement.office));
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.final_score(), 997);
    }

    #[test]
    fn timer_runs_out() {
        let (grid, placement) = world();
        let path = row(2, 9, 0);
        let trace = simulate(&grid, &placement, &path, 1000, 3);
        assert_eq!(trace.len(), 3);
        let last = trace.last().copied().unwrap();
        assert_eq!(last.reason, StepReason::NoTime);
        assert_eq!(last.timer, 0);
    }

    #[test]
    fn resources_never_increase() {
        let (grid, placement) = world();
        let path = row(0, 9, 3);
        let trace = simulate(&grid, &placement, &path, 1000, 300);
        for pair in trace.records().windows(2) {
            assert!(pair[1].score <= pair[0].score);
            assert!(pair[1].timer <= pair[0].timer);
            assert!(pair[1].score >= 0 && pair[1].timer >= 0);
        }
        assert_eq!(trace.len(), path.len());
    }
}
