//! Progress of a tracking call through its snapshot intervals.

use std::fmt;

/// Where the tracker is in the current day's walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackerState {
    /// No particle set being advanced
    #[default]
    Idle,
    /// Advancing sub-step `sub_step` of snapshot interval `interval`
    Stepping { interval: usize, sub_step: usize },
    /// Interval finished and its saves recorded
    Written { interval: usize },
    /// Every interval of the day consumed
    Done,
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerState::Idle => write!(f, "idle"),
            TrackerState::Stepping { interval, sub_step } => {
                write!(f, "stepping (interval {}, sub-step {})", interval, sub_step)
            }
            TrackerState::Written { interval } => write!(f, "written (interval {})", interval),
            TrackerState::Done => write!(f, "done"),
        }
    }
}
