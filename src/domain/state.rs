//! Tri-state check value and the rule deriving a parent's state from its children.

use std::fmt;

/// Check value held by every tree node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriState {
    #[default]
    Unchecked,
    Checked,
    /// Mixed: some descendants checked, some not
    Inconsistent,
}

impl TriState {
    /// State a node moves to when the user toggles it.
    ///
    /// Only `Checked` flips to `Unchecked`; both `Unchecked` and
    /// `Inconsistent` resolve to `Checked`.
    pub fn toggled(self) -> Self {
        match self {
            TriState::Checked => TriState::Unchecked,
            TriState::Unchecked | TriState::Inconsistent => TriState::Checked,
        }
    }

    /// Derive a parent's state from the states of its direct children.
    ///
    /// Returns `None` for an empty iterator: leaves never derive their state.
    /// The scan stops at the first `Inconsistent` child or as soon as both
    /// a checked and an unchecked child have been seen.
    pub fn from_children<I>(children: I) -> Option<Self>
    where
        I: IntoIterator<Item = TriState>,
    {
        let mut n_true = 0usize;
        let mut n_false = 0usize;

        for state in children {
            match state {
                TriState::Inconsistent => return Some(TriState::Inconsistent),
                TriState::Checked => n_true += 1,
                TriState::Unchecked => n_false += 1,
            }
            if n_true > 0 && n_false > 0 {
                return Some(TriState::Inconsistent);
            }
        }

        match (n_true, n_false) {
            (0, 0) => None,
            (t, _) if t > 0 => Some(TriState::Checked),
            _ => Some(TriState::Unchecked),
        }
    }

    pub fn is_checked(self) -> bool {
        self == TriState::Checked
    }
}

impl From<bool> for TriState {
    fn from(checked: bool) -> Self {
        if checked {
            TriState::Checked
        } else {
            TriState::Unchecked
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TriState::Unchecked => "unchecked",
            TriState::Checked => "checked",
            TriState::Inconsistent => "inconsistent",
        };
        write!(f, "{s}")
    }
}
