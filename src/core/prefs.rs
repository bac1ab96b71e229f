//! The preference record and its sort-order state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Task-list ordering selected by the user.
///
/// `Unspecified` marks a record that has never been migrated nor had an
/// ordering applied; migration rewrites it exactly once. The two sort
/// dimensions (deadline, priority) are independent toggles multiplexed
/// into this one persisted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Unspecified,
    None,
    ByDeadline,
    ByPriority,
    ByDeadlineAndPriority,
}

/// Sort-order string that matches no known variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("sort order `{raw}` is invalid")]
pub struct InvalidSortOrder {
    pub raw: String,
}

impl SortOrder {
    /// Parse a stored sort-order string. Tolerant of case and surrounding
    /// whitespace; anything else is a hard error, never a silent default.
    pub fn parse(raw: &str) -> Result<Self, InvalidSortOrder> {
        let s = raw.trim().to_lowercase();
        match s.as_str() {
            "unspecified" => Ok(SortOrder::Unspecified),
            "none" => Ok(SortOrder::None),
            "by_deadline" => Ok(SortOrder::ByDeadline),
            "by_priority" => Ok(SortOrder::ByPriority),
            "by_deadline_and_priority" => Ok(SortOrder::ByDeadlineAndPriority),
            _ => Err(InvalidSortOrder {
                raw: raw.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Unspecified => "unspecified",
            SortOrder::None => "none",
            SortOrder::ByDeadline => "by_deadline",
            SortOrder::ByPriority => "by_priority",
            SortOrder::ByDeadlineAndPriority => "by_deadline_and_priority",
        }
    }

    /// Turn the deadline dimension on or off.
    ///
    /// Enabling on top of a pure priority order combines the two; disabling
    /// a combined order leaves the priority half standing.
    pub fn with_deadline_sort(self, enable: bool) -> SortOrder {
        if enable {
            if self == SortOrder::ByPriority {
                SortOrder::ByDeadlineAndPriority
            } else {
                SortOrder::ByDeadline
            }
        } else if self == SortOrder::ByDeadlineAndPriority {
            SortOrder::ByPriority
        } else {
            SortOrder::None
        }
    }

    /// Turn the priority dimension on or off. Symmetric to
    /// [`SortOrder::with_deadline_sort`].
    pub fn with_priority_sort(self, enable: bool) -> SortOrder {
        if enable {
            if self == SortOrder::ByDeadline {
                SortOrder::ByDeadlineAndPriority
            } else {
                SortOrder::ByPriority
            }
        } else if self == SortOrder::ByDeadlineAndPriority {
            SortOrder::ByDeadline
        } else {
            SortOrder::None
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single structured record a store persists.
///
/// Missing fields deserialize to their defaults, so records written by
/// older builds stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPrefs {
    pub show_completed: bool,
    pub sort_order: SortOrder,
    pub counter: u64,
}
