//! On-disk document layout

use pesv_domain::model::{AnswerKey, Catalog, Company, DriverAnswer, FleetAnswer};
use pesv_types::{CompanyId, DriverQuestionId, VehicleQuestionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Row types stored in a keyed table
pub trait Keyed {
    type Key: Ord;

    fn key(&self) -> Self::Key;
}

impl Keyed for Company {
    type Key = CompanyId;

    fn key(&self) -> CompanyId {
        self.id
    }
}

impl Keyed for FleetAnswer {
    type Key = AnswerKey<VehicleQuestionId>;

    fn key(&self) -> Self::Key {
        FleetAnswer::key(self)
    }
}

impl Keyed for DriverAnswer {
    type Key = AnswerKey<DriverQuestionId>;

    fn key(&self) -> Self::Key {
        DriverAnswer::key(self)
    }
}

/// Tables are written as plain row arrays and indexed again on load.
mod keyed_rows {
    use super::Keyed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S, V>(map: &BTreeMap<V::Key, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Keyed + Serialize,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<V::Key, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Keyed + Deserialize<'de>,
    {
        let rows = Vec::<V>::deserialize(deserializer)?;
        Ok(rows.into_iter().map(|row| (row.key(), row)).collect())
    }
}

/// Every table of the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub catalog: Catalog,

    #[serde(default, with = "keyed_rows")]
    pub companies: BTreeMap<CompanyId, Company>,

    #[serde(default, with = "keyed_rows")]
    pub fleet_answers: BTreeMap<AnswerKey<VehicleQuestionId>, FleetAnswer>,

    #[serde(default, with = "keyed_rows")]
    pub driver_answers: BTreeMap<AnswerKey<DriverQuestionId>, DriverAnswer>,

    /// Last id handed out for companies
    #[serde(default)]
    pub company_seq: u64,

    /// Last id handed out for answer rows
    #[serde(default)]
    pub answer_seq: u64,
}

impl Dataset {
    pub fn fleet_answers_of(&self, company: CompanyId) -> Vec<FleetAnswer> {
        self.fleet_answers
            .values()
            .filter(|a| a.company_id == company)
            .cloned()
            .collect()
    }

    pub fn driver_answers_of(&self, company: CompanyId) -> Vec<DriverAnswer> {
        self.driver_answers
            .values()
            .filter(|a| a.company_id == company)
            .cloned()
            .collect()
    }
}
