//! Size criteria: count ranges mapped to a size category per mission

use pesv_types::{CriterionId, MissionId, SizeId};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Legacy marker for "no upper limit" in imported range data
const LEGACY_UNBOUNDED: i64 = -1;

/// Upper end of a count range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpperBound {
    /// Inclusive maximum
    Bounded(u64),
    #[default]
    Unbounded,
}

impl UpperBound {
    pub fn admits(self, value: u64) -> bool {
        match self {
            UpperBound::Bounded(max) => value <= max,
            UpperBound::Unbounded => true,
        }
    }

    /// The bound as an optional maximum
    pub fn max(self) -> Option<u64> {
        match self {
            UpperBound::Bounded(max) => Some(max),
            UpperBound::Unbounded => None,
        }
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpperBound::Bounded(max) => write!(f, "{}", max),
            UpperBound::Unbounded => write!(f, "∞"),
        }
    }
}

impl Serialize for UpperBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UpperBound::Bounded(max) => serializer.serialize_u64(*max),
            UpperBound::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUpperBound {
    Number(i64),
    /// Counts above `i64::MAX`
    Unsigned(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for UpperBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawUpperBound::deserialize(deserializer)? {
            RawUpperBound::Number(LEGACY_UNBOUNDED) => Ok(UpperBound::Unbounded),
            RawUpperBound::Number(n) if n >= 0 => Ok(UpperBound::Bounded(n as u64)),
            RawUpperBound::Number(n) => Err(de::Error::custom(format!(
                "invalid upper bound {}: expected a non-negative count or -1 for no limit",
                n
            ))),
            RawUpperBound::Unsigned(n) => Ok(UpperBound::Bounded(n)),
            RawUpperBound::Text(s) => match s.trim().to_lowercase().as_str() {
                "unbounded" | "none" | "inf" => Ok(UpperBound::Unbounded),
                other => other.parse::<u64>().map(UpperBound::Bounded).map_err(|_| {
                    de::Error::custom(format!("invalid upper bound: {:?}", s))
                }),
            },
        }
    }
}

/// Count range with an inclusive lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountRange {
    #[serde(default)]
    pub min: u64,
    #[serde(default)]
    pub max: UpperBound,
}

impl CountRange {
    pub fn new(min: u64, max: UpperBound) -> Self {
        Self { min, max }
    }

    pub fn bounded(min: u64, max: u64) -> Self {
        Self::new(min, UpperBound::Bounded(max))
    }

    pub fn at_least(min: u64) -> Self {
        Self::new(min, UpperBound::Unbounded)
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && self.max.admits(value)
    }

    /// True when the range admits no value at all
    pub fn is_inverted(&self) -> bool {
        matches!(self.max, UpperBound::Bounded(max) if max < self.min)
    }

    pub fn overlaps(&self, other: &CountRange) -> bool {
        if self.is_inverted() || other.is_inverted() {
            return false;
        }
        self.max.admits(other.min) && other.max.admits(self.min)
    }
}

impl fmt::Display for CountRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Maps a vehicle range × driver range to a size category for one mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCriterion {
    pub id: CriterionId,
    pub mission_id: MissionId,
    pub size_id: SizeId,
    pub vehicles: CountRange,
    pub drivers: CountRange,
}

impl SizeCriterion {
    pub fn matches(&self, mission: MissionId, vehicles: u64, drivers: u64) -> bool {
        self.mission_id == mission
            && self.vehicles.contains(vehicles)
            && self.drivers.contains(drivers)
    }

    /// Whether some (vehicles, drivers) pair satisfies both criteria
    pub fn overlaps(&self, other: &SizeCriterion) -> bool {
        self.mission_id == other.mission_id
            && self.vehicles.overlaps(&other.vehicles)
            && self.drivers.overlaps(&other.drivers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_range_is_inclusive_on_both_ends() {
        let range = CountRange::bounded(2, 10);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(10));
        assert!(!range.contains(11));
    }

    #[test]
    fn test_unbounded_range_has_no_ceiling() {
        let range = CountRange::at_least(50);
        assert!(!range.contains(49));
        assert!(range.contains(50));
        assert!(range.contains(u64::MAX));
    }

    #[test]
    fn test_legacy_sentinel_becomes_unbounded() {
        let range: CountRange = serde_json::from_str(r#"{"min": 3, "max": -1}"#).unwrap();
        assert_eq!(range.max, UpperBound::Unbounded);

        let range: CountRange = serde_json::from_str(r#"{"min": 3, "max": "unbounded"}"#).unwrap();
        assert_eq!(range.max, UpperBound::Unbounded);

        let range: CountRange = serde_json::from_str(r#"{"min": 3, "max": 19}"#).unwrap();
        assert_eq!(range.max, UpperBound::Bounded(19));
    }

    #[test]
    fn test_other_negative_bounds_rejected() {
        let result: Result<CountRange, _> = serde_json::from_str(r#"{"min": 0, "max": -5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bounds_above_signed_range_read_back() {
        let range = CountRange::bounded(0, u64::MAX);
        let json = serde_json::to_string(&range).unwrap();
        let back: CountRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);

        let past_i64 = (i64::MAX as u64) + 1;
        let range: CountRange =
            serde_json::from_str(&format!(r#"{{"min": 0, "max": {}}}"#, past_i64)).unwrap();
        assert_eq!(range.max, UpperBound::Bounded(past_i64));
    }

    #[test]
    fn test_missing_max_means_no_limit() {
        let range: CountRange = serde_json::from_str(r#"{"min": 1}"#).unwrap();
        assert_eq!(range, CountRange::at_least(1));
    }

    #[test]
    fn test_unbounded_serializes_as_keyword() {
        let json = serde_json::to_string(&CountRange::at_least(4)).unwrap();
        assert_eq!(json, r#"{"min":4,"max":"unbounded"}"#);
    }

    #[test]
    fn test_overlap() {
        let a = CountRange::bounded(0, 10);
        assert!(a.overlaps(&CountRange::bounded(10, 20)));
        assert!(!a.overlaps(&CountRange::bounded(11, 20)));
        assert!(a.overlaps(&CountRange::at_least(5)));
        assert!(CountRange::at_least(5).overlaps(&CountRange::at_least(500)));
        assert!(!a.overlaps(&CountRange::bounded(5, 1)));
    }

    #[test]
    fn test_inverted() {
        assert!(CountRange::bounded(5, 1).is_inverted());
        assert!(!CountRange::bounded(5, 5).is_inverted());
        assert!(!CountRange::at_least(5).is_inverted());
    }

    #[test]
    fn test_criterion_matches_only_its_mission() {
        let criterion = SizeCriterion {
            id: CriterionId(1),
            mission_id: MissionId(1),
            size_id: SizeId(1),
            vehicles: CountRange::bounded(0, 10),
            drivers: CountRange::bounded(0, 5),
        };
        assert!(criterion.matches(MissionId(1), 5, 2));
        assert!(!criterion.matches(MissionId(2), 5, 2));
        assert!(!criterion.matches(MissionId(1), 5, 6));
    }
}
