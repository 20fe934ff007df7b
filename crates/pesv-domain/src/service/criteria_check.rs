//! Consistency check of configured size criteria

use pesv_types::{CriterionId, MissionId, SizeId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Catalog;

/// A configuration defect in the size criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriteriaIssue {
    /// Two criteria of one mission can match the same totals
    Overlap {
        mission: MissionId,
        first: CriterionId,
        second: CriterionId,
    },
    /// A range whose maximum is below its minimum never matches
    InvertedRange {
        criterion: CriterionId,
        axis: String,
    },
    UnknownMission {
        criterion: CriterionId,
        mission: MissionId,
    },
    UnknownSize {
        criterion: CriterionId,
        size: SizeId,
    },
}

impl fmt::Display for CriteriaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriteriaIssue::Overlap {
                mission,
                first,
                second,
            } => write!(
                f,
                "mission {}: criteria {} and {} overlap",
                mission, first, second
            ),
            CriteriaIssue::InvertedRange { criterion, axis } => {
                write!(f, "criterion {}: {} range is inverted", criterion, axis)
            }
            CriteriaIssue::UnknownMission { criterion, mission } => {
                write!(f, "criterion {}: unknown mission {}", criterion, mission)
            }
            CriteriaIssue::UnknownSize { criterion, size } => {
                write!(f, "criterion {}: unknown size {}", criterion, size)
            }
        }
    }
}

/// Find every defect that would make classification fail or misbehave
pub fn check_criteria(catalog: &Catalog) -> Vec<CriteriaIssue> {
    let mut issues = Vec::new();

    for criterion in &catalog.criteria {
        if catalog.mission(criterion.mission_id).is_none() {
            issues.push(CriteriaIssue::UnknownMission {
                criterion: criterion.id,
                mission: criterion.mission_id,
            });
        }
        if catalog.size(criterion.size_id).is_none() {
            issues.push(CriteriaIssue::UnknownSize {
                criterion: criterion.id,
                size: criterion.size_id,
            });
        }
        if criterion.vehicles.is_inverted() {
            issues.push(CriteriaIssue::InvertedRange {
                criterion: criterion.id,
                axis: "vehicle".to_string(),
            });
        }
        if criterion.drivers.is_inverted() {
            issues.push(CriteriaIssue::InvertedRange {
                criterion: criterion.id,
                axis: "driver".to_string(),
            });
        }
    }

    for (i, first) in catalog.criteria.iter().enumerate() {
        for second in &catalog.criteria[i + 1..] {
            if first.overlaps(second) {
                issues.push(CriteriaIssue::Overlap {
                    mission: first.mission_id,
                    first: first.id,
                    second: second.id,
                });
            }
        }
    }

    issues
}

pub fn generate_criteria_report(catalog: &Catalog, issues: &[CriteriaIssue]) -> String {
    let mut report = String::new();
    report.push_str("==================================================\n");
    report.push_str("              Size Criteria Check                 \n");
    report.push_str("==================================================\n\n");
    report.push_str(&format!("  Missions:   {}\n", catalog.missions.len()));
    report.push_str(&format!("  Sizes:      {}\n", catalog.sizes.len()));
    report.push_str(&format!("  Criteria:   {}\n", catalog.criteria.len()));
    report.push_str(&format!("  Issues:     {}\n\n", issues.len()));

    if issues.is_empty() {
        report.push_str("  All criteria are consistent.\n\n");
    } else {
        for issue in issues {
            report.push_str(&format!("  - {}\n", issue));
        }
        report.push('\n');
    }

    report.push_str("==================================================\n");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompanySize, CountRange, Mission, SizeCriterion};

    fn catalog(criteria: Vec<SizeCriterion>) -> Catalog {
        Catalog {
            missions: vec![Mission { id: MissionId(1), name: "Transporte".to_string() }],
            sizes: vec![
                CompanySize {
                    id: SizeId(1),
                    name: "Básico".to_string(),
                    description: String::new(),
                },
                CompanySize {
                    id: SizeId(2),
                    name: "Estándar".to_string(),
                    description: String::new(),
                },
            ],
            criteria,
            ..Default::default()
        }
    }

    fn criterion(
        id: u64,
        mission: u64,
        size: u64,
        vehicles: CountRange,
        drivers: CountRange,
    ) -> SizeCriterion {
        SizeCriterion {
            id: CriterionId(id),
            mission_id: MissionId(mission),
            size_id: SizeId(size),
            vehicles,
            drivers,
        }
    }

    #[test]
    fn test_partitioned_criteria_are_clean() {
        let c = catalog(vec![
            criterion(1, 1, 1, CountRange::bounded(0, 10), CountRange::bounded(0, 19)),
            criterion(2, 1, 2, CountRange::at_least(11), CountRange::bounded(0, 19)),
            criterion(3, 1, 2, CountRange::at_least(0), CountRange::at_least(20)),
        ]);
        assert!(check_criteria(&c).is_empty());
    }

    #[test]
    fn test_overlap_detected() {
        let c = catalog(vec![
            criterion(1, 1, 1, CountRange::bounded(0, 10), CountRange::bounded(0, 5)),
            criterion(2, 1, 2, CountRange::bounded(10, 20), CountRange::bounded(5, 9)),
        ]);
        assert_eq!(
            check_criteria(&c),
            vec![CriteriaIssue::Overlap {
                mission: MissionId(1),
                first: CriterionId(1),
                second: CriterionId(2),
            }]
        );
    }

    #[test]
    fn test_same_ranges_in_different_missions_do_not_overlap() {
        let mut c = catalog(vec![
            criterion(1, 1, 1, CountRange::bounded(0, 10), CountRange::bounded(0, 5)),
            criterion(2, 2, 1, CountRange::bounded(0, 10), CountRange::bounded(0, 5)),
        ]);
        c.missions.push(Mission { id: MissionId(2), name: "Otra".to_string() });
        assert!(check_criteria(&c).is_empty());
    }

    #[test]
    fn test_dangling_references_and_inverted_ranges() {
        let c = catalog(vec![criterion(
            1,
            7,
            9,
            CountRange::bounded(5, 1),
            CountRange::bounded(0, 5),
        )]);
        let issues = check_criteria(&c);
        assert_eq!(issues.len(), 3);
        assert!(issues.contains(&CriteriaIssue::UnknownMission {
            criterion: CriterionId(1),
            mission: MissionId(7),
        }));
        assert!(issues.contains(&CriteriaIssue::UnknownSize {
            criterion: CriterionId(1),
            size: SizeId(9),
        }));
        assert!(issues.contains(&CriteriaIssue::InvertedRange {
            criterion: CriterionId(1),
            axis: "vehicle".to_string(),
        }));
    }

    #[test]
    fn test_report_lists_issues() {
        let c = catalog(vec![
            criterion(1, 1, 1, CountRange::bounded(0, 10), CountRange::bounded(0, 5)),
            criterion(2, 1, 2, CountRange::bounded(0, 10), CountRange::bounded(0, 5)),
        ]);
        let issues = check_criteria(&c);
        let report = generate_criteria_report(&c, &issues);
        assert!(report.contains("mission 1: criteria 1 and 2 overlap"));
        assert!(report.contains("Issues:     1"));
    }
}
