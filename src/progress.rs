//! Run state and progress reporting for a comparison run.
//!
//! A run moves `NotStarted → Loading(i) → Measuring(i) → … → Done`, or to
//! `Aborted` on the first fatal error. The aggregator reports every
//! transition through an optional [`ProgressCallback`], which decouples the
//! measurement loop from presentation (CLI progress bar, logs, tests).

use std::fmt;

/// Where a comparison run currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// No variant has been touched yet.
    NotStarted,
    /// Acquiring the handle for variant `index`.
    Loading { index: usize, name: String },
    /// Measuring footprint, quality and latency of variant `index`.
    Measuring { index: usize, name: String },
    /// Every variant was measured.
    Done,
    /// A fatal error ended the run; `name` is the failing variant, if any.
    Aborted { name: Option<String> },
}

impl RunState {
    /// Whether the run has reached `Done` or `Aborted`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted { .. })
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Loading { index, name } => write!(f, "loading[{index}]({name})"),
            Self::Measuring { index, name } => write!(f, "measuring[{index}]({name})"),
            Self::Done => write!(f, "done"),
            Self::Aborted { name: Some(name) } => write!(f, "aborted({name})"),
            Self::Aborted { name: None } => write!(f, "aborted"),
        }
    }
}

/// Callback invoked on every run state transition.
pub type ProgressCallback = Box<dyn Fn(&RunState) + Send + Sync>;
