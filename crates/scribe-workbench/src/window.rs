use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::condition::ConditionError;
use crate::debugger::DebuggerDescriptor;

/// Set of window state flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WindowState(u8);

impl WindowState {
    pub const NONE: Self = Self(0);
    pub const DIRTY: Self = Self(1 << 0);
    pub const UNTITLED: Self = Self(1 << 1);
    pub const VIEW_ONLY: Self = Self(1 << 2);

    const NAMED: [(&'static str, WindowState); 3] = [
        ("Dirty", Self::DIRTY),
        ("Untitled", Self::UNTITLED),
        ("ViewOnly", Self::VIEW_ONLY),
    ];

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for WindowState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl FromStr for WindowState {
    type Err = ConditionError;

    /// Parses `None` or a comma-separated list such as `Dirty, Untitled`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut state = Self::NONE;
        for part in s.split(',').map(str::trim) {
            if part.eq_ignore_ascii_case("none") {
                continue;
            }
            let (_, flag) = Self::NAMED
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))
                .ok_or_else(|| ConditionError::UnknownWindowState(part.to_string()))?;
            state = state | *flag;
        }
        Ok(state)
    }
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(", "))
    }
}

/// What a workbench window currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewContent {
    pub file_name: Option<String>,
    pub untitled_name: Option<String>,
    pub is_untitled: bool,
    pub is_dirty: bool,
    pub is_view_only: bool,
}

impl ViewContent {
    pub fn state(&self) -> WindowState {
        let mut state = WindowState::NONE;
        if self.is_dirty {
            state = state | WindowState::DIRTY;
        }
        if self.is_untitled {
            state = state | WindowState::UNTITLED;
        }
        if self.is_view_only {
            state = state | WindowState::VIEW_ONLY;
        }
        state
    }

    /// The name shown for the content: the untitled name for new buffers,
    /// the file name otherwise.
    pub fn display_name(&self) -> Option<&str> {
        if self.is_untitled {
            self.untitled_name.as_deref()
        } else {
            self.file_name.as_deref()
        }
    }
}

/// Explicit view of the workbench state that conditions are evaluated against.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchSnapshot {
    pub views: Vec<ViewContent>,
    /// Index into `views` of the active window, if any.
    pub active: Option<usize>,
    pub debugger: Option<DebuggerDescriptor>,
}

impl WorkbenchSnapshot {
    pub fn active_view(&self) -> Option<&ViewContent> {
        self.views.get(self.active?)
    }
}
