//! Strongly typed record identifiers
//!
//! Every table is keyed by a positive integer. Wrapping them keeps a
//! company id from being passed where a question id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Company record id
    CompanyId
);
define_id!(
    /// Mission (activity classification) id
    MissionId
);
define_id!(
    /// Segment id
    SegmentId
);
define_id!(
    /// Company size category id
    SizeId
);
define_id!(
    /// Size criterion id
    CriterionId
);
define_id!(
    /// Vehicle questionnaire category id
    VehicleQuestionId
);
define_id!(
    /// Driver questionnaire category id
    DriverQuestionId
);
define_id!(
    /// Stored answer row id
    AnswerId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!("42".parse::<CompanyId>().unwrap(), CompanyId(42));
        assert_eq!(" 7 ".parse::<SizeId>().unwrap(), SizeId(7));
        assert!("-1".parse::<CompanyId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&MissionId(3)).unwrap();
        assert_eq!(json, "3");
        let id: MissionId = serde_json::from_str("3").unwrap();
        assert_eq!(id, MissionId(3));
    }
}
