//! Exhaustive enumeration of input assignments.

use crate::signal::Level;

/// One full assignment of every declared input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    index: u64,
    values: Vec<(String, Level)>,
}

impl InputState {
    /// Position of this state in enumeration order.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Input names with their levels, in declaration order.
    pub fn values(&self) -> &[(String, Level)] {
        &self.values
    }

    /// Level assigned to `name`.
    pub fn get(&self, name: &str) -> Option<Level> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, level)| *level)
    }

    /// Borrowing iterator usable with [`Ic::change_state`](super::Ic::change_state).
    pub fn iter(&self) -> impl Iterator<Item = (&str, Level)> {
        self.values.iter().map(|(n, level)| (n.as_str(), *level))
    }
}

/// Iterator over all `2^n` input assignments.
///
/// Index bit `n-1-i` holds the level of the i-th declared input, so the first
/// input is the most significant bit. Call
/// [`Ic::all_states`](super::Ic::all_states) again for a fresh pass.
#[derive(Debug, Clone)]
pub struct States {
    names: Vec<String>,
    next: u64,
    end: u64,
}

impl States {
    pub(crate) fn new(names: Vec<String>) -> Self {
        let end = 1u64.checked_shl(names.len() as u32).unwrap_or(u64::MAX);
        Self {
            names,
            next: 0,
            end,
        }
    }

    /// Build the assignment with the given index.
    pub fn state(&self, index: u64) -> InputState {
        let n = self.names.len();
        let values = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let bit = (index >> (n - 1 - i)) & 1 == 1;
                (name.clone(), Level::from(bit))
            })
            .collect();
        InputState { index, values }
    }
}

impl Iterator for States {
    type Item = InputState;

    fn next(&mut self) -> Option<InputState> {
        if self.next >= self.end {
            return None;
        }
        let state = self.state(self.next);
        self.next += 1;
        Some(state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for States {}
