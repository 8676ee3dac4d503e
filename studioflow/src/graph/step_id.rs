//! Step identifier type
//!
//! A [`StepId`] is an integer assigned by the graph when a step is added (or
//! carried in by an import). It never changes while the step exists, so UI
//! connectors and exported edge lists can refer to it across edits and
//! reorders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a step within a workflow
///
/// # Examples
///
/// ```
/// use studioflow::StepId;
///
/// let step = StepId::new(7);
/// assert_eq!(step.get(), 7);
/// assert_eq!(step.to_string(), "7");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(u64);

impl StepId {
    /// Creates a StepId from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one, or `None` at `u64::MAX`
    pub(crate) fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepId({})", self.0)
    }
}

impl From<u64> for StepId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<StepId> for u64 {
    fn from(id: StepId) -> Self {
        id.0
    }
}

impl FromStr for StepId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_id_creation() {
        let step = StepId::new(42);
        assert_eq!(step.get(), 42);
        assert_eq!(u64::from(step), 42);
    }

    #[test]
    fn test_step_id_ordering() {
        let mut ids = vec![StepId::new(3), StepId::new(1), StepId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![StepId::new(1), StepId::new(2), StepId::new(3)]);
    }

    #[test]
    fn test_step_id_from_string() {
        let step: StepId = " 12 ".parse().unwrap();
        assert_eq!(step, StepId::new(12));
        assert!("twelve".parse::<StepId>().is_err());
    }

    #[test]
    fn test_step_id_display() {
        assert_eq!(format!("{}", StepId::new(5)), "5");
        assert_eq!(format!("{:?}", StepId::new(5)), "StepId(5)");
    }

    #[test]
    fn test_step_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&StepId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: StepId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StepId::new(9));
    }

    #[test]
    fn test_next_stops_at_max() {
        assert_eq!(StepId::new(1).next(), Some(StepId::new(2)));
        assert_eq!(StepId::new(u64::MAX).next(), None);
    }

    #[test]
    fn test_step_id_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(StepId::new(1));
        set.insert(StepId::new(2));
        set.insert(StepId::new(1)); // duplicate

        assert_eq!(set.len(), 2);
    }
}
