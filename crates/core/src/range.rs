//! Windowing of the filtered post list.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::extract::Post;

/// Safety ceiling on how many posts "show all" will return.
pub const HARD_MAX: usize = 3000;

/// Default window size for bounded ranges.
pub const DEFAULT_RANGE_SIZE: usize = 400;

/// How to cut the post list down for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// Posts numbered `start..=start + size - 1`, by original sequence number.
    Bounded { start: usize, size: usize },
    /// Everything, capped at [`HARD_MAX`].
    All,
}

impl RangeMode {
    /// A bounded range; zero values are raised to 1.
    pub fn bounded(start: usize, size: usize) -> Self {
        RangeMode::Bounded { start: start.max(1), size: size.max(1) }
    }

    /// Human-readable description of the window.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl Default for RangeMode {
    fn default() -> Self {
        RangeMode::Bounded { start: 1, size: DEFAULT_RANGE_SIZE }
    }
}

impl fmt::Display for RangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RangeMode::Bounded { start, size } => write!(f, "{}-{}", start, last_in_range(start, size)),
            RangeMode::All => write!(f, "all"),
        }
    }
}

fn last_in_range(start: usize, size: usize) -> usize {
    start.saturating_add(size.max(1) - 1)
}

/// Advisory attached when "show all" hit [`HARD_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// Posts available before truncation
    pub total: usize,
    /// Posts actually returned
    pub kept: usize,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "showing the first {} of {} posts", self.kept, self.total)
    }
}

/// The outcome of range selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub posts: Vec<Post>,
    pub label: String,
    pub truncation: Option<Truncation>,
}

/// Selects the window of `posts` described by `mode`.
///
/// Bounded ranges compare against each post's original sequence number, so
/// the same range shows the same part of the thread whether or not posts were
/// filtered out beforehand.
pub fn select_range(posts: Vec<Post>, mode: RangeMode) -> Selection {
    select_range_with_cap(posts, mode, HARD_MAX)
}

/// [`select_range`] with an explicit "show all" ceiling.
pub fn select_range_with_cap(mut posts: Vec<Post>, mode: RangeMode, cap: usize) -> Selection {
    let label = mode.label();

    match mode {
        RangeMode::Bounded { start, size } => {
            let end = last_in_range(start, size);
            posts.retain(|p| (start..=end).contains(&p.sequence_number));
            Selection { posts, label, truncation: None }
        }
        RangeMode::All => {
            let total = posts.len();
            let truncation = if total > cap {
                posts.truncate(cap);
                warn!(total, kept = cap, "show-all truncated at hard limit");
                Some(Truncation { total, kept: cap })
            } else {
                None
            };
            Selection { posts, label, truncation }
        }
    }
}
