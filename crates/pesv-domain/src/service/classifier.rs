//! Company size classification

use pesv_types::{CriterionId, MissionId, SizeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aggregator::SizingTotals;
use crate::model::SizeCriterion;

/// Why no single size category could be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationError {
    #[error("no size criterion of mission {mission} matches {totals}")]
    NotFound {
        mission: MissionId,
        totals: SizingTotals,
    },

    #[error("size criteria {criteria:?} of mission {mission} all match {totals}")]
    Ambiguous {
        mission: MissionId,
        totals: SizingTotals,
        criteria: Vec<CriterionId>,
    },
}

/// Resolved size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub size_id: SizeId,
    pub criterion_id: CriterionId,
}

/// Find the size category whose criterion covers the totals
///
/// Exactly one criterion of the mission must match. Zero or several
/// matches mean the configured ranges do not partition the count space.
pub fn classify(
    criteria: &[SizeCriterion],
    mission: MissionId,
    totals: SizingTotals,
) -> Result<Classification, ClassificationError> {
    let matches: Vec<&SizeCriterion> = criteria
        .iter()
        .filter(|c| c.matches(mission, totals.vehicles, totals.drivers))
        .collect();

    match matches.as_slice() {
        [only] => Ok(Classification {
            size_id: only.size_id,
            criterion_id: only.id,
        }),
        [] => Err(ClassificationError::NotFound { mission, totals }),
        many => Err(ClassificationError::Ambiguous {
            mission,
            totals,
            criteria: many.iter().map(|c| c.id).collect(),
        }),
    }
}
