//! Reference data: missions, segments, size categories, questionnaires and
//! economic activity codes

use pesv_types::{
    CriterionId, DriverQuestionId, MissionId, SegmentId, SizeId, VehicleQuestionId,
};
use serde::{Deserialize, Serialize};

use super::criterion::SizeCriterion;

/// Declared operational category of a company (misionalidad)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub name: String,
}

/// Size category a company is classified into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySize {
    pub id: SizeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Vehicle questionnaire category (e.g. "Motos", "Vehículos livianos")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleQuestion {
    pub id: VehicleQuestionId,
    pub name: String,
}

/// Driver questionnaire category (e.g. "Conductores directos")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverQuestion {
    pub id: DriverQuestionId,
    pub name: String,
}

/// Economic activity code (CIIU, the Colombian adaptation of ISIC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciiu {
    pub code: String,
    pub name: String,
}

/// The full set of reference tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub sizes: Vec<CompanySize>,
    #[serde(default)]
    pub criteria: Vec<SizeCriterion>,
    #[serde(default)]
    pub vehicle_questions: Vec<VehicleQuestion>,
    #[serde(default)]
    pub driver_questions: Vec<DriverQuestion>,
    #[serde(default)]
    pub ciius: Vec<Ciiu>,
}

impl Catalog {
    pub fn mission(&self, id: MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn size(&self, id: SizeId) -> Option<&CompanySize> {
        self.sizes.iter().find(|s| s.id == id)
    }

    pub fn criterion(&self, id: CriterionId) -> Option<&SizeCriterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    /// Criteria configured for one mission, in catalog order
    pub fn criteria_for_mission(&self, mission: MissionId) -> Vec<SizeCriterion> {
        self.criteria
            .iter()
            .filter(|c| c.mission_id == mission)
            .cloned()
            .collect()
    }

    pub fn has_vehicle_question(&self, id: VehicleQuestionId) -> bool {
        self.vehicle_questions.iter().any(|q| q.id == id)
    }

    pub fn has_driver_question(&self, id: DriverQuestionId) -> bool {
        self.driver_questions.iter().any(|q| q.id == id)
    }

    pub fn ciiu(&self, code: &str) -> Option<&Ciiu> {
        self.ciius.iter().find(|c| c.code == code)
    }

    /// CIIU entries whose code contains `fragment`, ignoring case.
    /// An empty fragment matches every entry.
    pub fn search_ciius(&self, fragment: &str) -> Vec<Ciiu> {
        let fragment = fragment.trim().to_lowercase();
        self.ciius
            .iter()
            .filter(|c| c.code.to_lowercase().contains(&fragment))
            .cloned()
            .collect()
    }

    /// Ids that appear more than once in a table, as "table #id" labels
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut dupes = Vec::new();
        collect_dupes("missions", self.missions.iter().map(|m| m.id.get()), &mut dupes);
        collect_dupes("segments", self.segments.iter().map(|s| s.id.get()), &mut dupes);
        collect_dupes("sizes", self.sizes.iter().map(|s| s.id.get()), &mut dupes);
        collect_dupes("criteria", self.criteria.iter().map(|c| c.id.get()), &mut dupes);
        collect_dupes(
            "vehicle_questions",
            self.vehicle_questions.iter().map(|q| q.id.get()),
            &mut dupes,
        );
        collect_dupes(
            "driver_questions",
            self.driver_questions.iter().map(|q| q.id.get()),
            &mut dupes,
        );
        collect_dupes("ciius", self.ciius.iter().map(|c| c.code.as_str()), &mut dupes);
        dupes
    }
}

fn collect_dupes<K: Ord + std::fmt::Display + Copy>(
    table: &str,
    ids: impl Iterator<Item = K>,
    out: &mut Vec<String>,
) {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            out.push(format!("{} #{}", table, id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_reported_per_table() {
        let catalog = Catalog {
            missions: vec![
                Mission { id: MissionId(1), name: "Transporte".to_string() },
                Mission { id: MissionId(1), name: "Otra".to_string() },
            ],
            vehicle_questions: vec![VehicleQuestion {
                id: VehicleQuestionId(1),
                name: "Motos".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(catalog.duplicate_ids(), vec!["missions #1".to_string()]);
    }

    #[test]
    fn test_question_lookup() {
        let catalog = Catalog {
            driver_questions: vec![DriverQuestion {
                id: DriverQuestionId(4),
                name: "Conductores propios".to_string(),
            }],
            ..Default::default()
        };
        assert!(catalog.has_driver_question(DriverQuestionId(4)));
        assert!(!catalog.has_driver_question(DriverQuestionId(5)));
        assert!(!catalog.has_vehicle_question(VehicleQuestionId(4)));
    }

    fn ciiu(code: &str, name: &str) -> Ciiu {
        Ciiu { code: code.to_string(), name: name.to_string() }
    }

    #[test]
    fn test_ciiu_search_by_code_fragment() {
        let catalog = Catalog {
            ciius: vec![
                ciiu("4921", "Transporte de pasajeros"),
                ciiu("4923", "Transporte de carga por carretera"),
                ciiu("5210", "Almacenamiento y depósito"),
            ],
            ..Default::default()
        };
        let codes: Vec<String> = catalog.search_ciius("492").into_iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["4921".to_string(), "4923".to_string()]);
        assert_eq!(catalog.search_ciius("").len(), 3);
        assert!(catalog.search_ciius("99").is_empty());
        let storage = catalog.ciiu("5210").map(|c| c.name.as_str());
        assert_eq!(storage, Some("Almacenamiento y depósito"));
        assert!(catalog.ciiu("52").is_none());
    }

    #[test]
    fn test_duplicate_ciiu_codes_reported() {
        let catalog = Catalog {
            ciius: vec![ciiu("4923", "Carga"), ciiu("4923", "Carga otra vez")],
            ..Default::default()
        };
        assert_eq!(catalog.duplicate_ids(), vec!["ciius #4923".to_string()]);
    }
}
