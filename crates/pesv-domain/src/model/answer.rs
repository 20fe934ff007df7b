//! Questionnaire answers: fleet counts and driver counts per company

use chrono::{DateTime, Utc};
use pesv_types::{AnswerId, CompanyId, DriverQuestionId, VehicleQuestionId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Natural key of a stored answer row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnswerKey<Q> {
    pub company_id: CompanyId,
    pub question_id: Q,
}

impl<Q> AnswerKey<Q> {
    pub fn new(company_id: CompanyId, question_id: Q) -> Self {
        Self {
            company_id,
            question_id,
        }
    }
}

/// Vehicle counts by ownership mode for one vehicle category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetCounts {
    pub owned: u64,
    pub third_party: u64,
    pub arrended: u64,
    pub contractors: u64,
    pub intermediation: u64,
    pub leasing: u64,
    pub renting: u64,
}

impl FleetCounts {
    pub fn total(&self) -> u64 {
        [
            self.owned,
            self.third_party,
            self.arrended,
            self.contractors,
            self.intermediation,
            self.leasing,
            self.renting,
        ]
        .iter()
        .fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

/// Stored fleet answer, one per (company, vehicle question)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetAnswer {
    pub id: AnswerId,
    pub company_id: CompanyId,
    pub question_id: VehicleQuestionId,
    #[serde(flatten)]
    pub counts: FleetCounts,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FleetAnswer {
    pub fn key(&self) -> AnswerKey<VehicleQuestionId> {
        AnswerKey::new(self.company_id, self.question_id)
    }
}

/// Stored driver answer, one per (company, driver question)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAnswer {
    pub id: AnswerId,
    pub company_id: CompanyId,
    pub question_id: DriverQuestionId,
    pub quantity: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriverAnswer {
    pub fn key(&self) -> AnswerKey<DriverQuestionId> {
        AnswerKey::new(self.company_id, self.question_id)
    }
}

/// A count field exactly as a client sent it
///
/// Integers, integral floats (`2.0`) and integral strings (`"2"`) read as
/// numbers. Anything else is kept in its JSON form so validation can report
/// it against the one record that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountInput {
    Number(i64),
    Invalid(String),
}

impl Default for CountInput {
    fn default() -> Self {
        CountInput::Number(0)
    }
}

impl From<i64> for CountInput {
    fn from(value: i64) -> Self {
        CountInput::Number(value)
    }
}

impl CountInput {
    fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        let number = match &value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        };

        match number {
            Some(n) => CountInput::Number(n),
            None => CountInput::Invalid(value.to_string()),
        }
    }
}

impl Serialize for CountInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CountInput::Number(n) => serializer.serialize_i64(*n),
            CountInput::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for CountInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(CountInput::from_json)
    }
}

/// Unvalidated vehicle answer as submitted by a client
///
/// Counts are kept raw so negative or malformed input can be reported per
/// record instead of failing the whole payload at parse time. Absent counts
/// read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAnswerInput {
    #[serde(default, alias = "vehicle_question")]
    pub question_id: Option<u64>,
    #[serde(default, alias = "quantity_owned")]
    pub owned: CountInput,
    #[serde(default, alias = "quantity_third_party")]
    pub third_party: CountInput,
    #[serde(default, alias = "quantity_arrended")]
    pub arrended: CountInput,
    #[serde(default, alias = "quantity_contractors")]
    pub contractors: CountInput,
    #[serde(default, alias = "quantity_intermediation")]
    pub intermediation: CountInput,
    #[serde(default, alias = "quantity_leasing")]
    pub leasing: CountInput,
    #[serde(default, alias = "quantity_renting")]
    pub renting: CountInput,
}

impl VehicleAnswerInput {
    /// Answer with only the owned count set
    pub fn owned(question_id: u64, owned: i64) -> Self {
        Self {
            question_id: Some(question_id),
            owned: owned.into(),
            ..Default::default()
        }
    }

    /// Count fields paired with their wire names
    pub fn fields(&self) -> [(&'static str, &CountInput); 7] {
        [
            ("owned", &self.owned),
            ("third_party", &self.third_party),
            ("arrended", &self.arrended),
            ("contractors", &self.contractors),
            ("intermediation", &self.intermediation),
            ("leasing", &self.leasing),
            ("renting", &self.renting),
        ]
    }
}

/// Unvalidated driver answer as submitted by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverAnswerInput {
    #[serde(default, alias = "driver_question")]
    pub question_id: Option<u64>,
    #[serde(default)]
    pub quantity: CountInput,
}

impl DriverAnswerInput {
    pub fn new(question_id: u64, quantity: i64) -> Self {
        Self {
            question_id: Some(question_id),
            quantity: quantity.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_total_sums_all_modes() {
        let counts = FleetCounts {
            owned: 1,
            third_party: 2,
            arrended: 3,
            contractors: 4,
            intermediation: 5,
            leasing: 6,
            renting: 7,
        };
        assert_eq!(counts.total(), 28);
        assert_eq!(FleetCounts::default().total(), 0);
    }

    #[test]
    fn test_vehicle_input_accepts_legacy_field_names() {
        let input: VehicleAnswerInput = serde_json::from_str(
            r#"{"vehicle_question": 3, "quantity_owned": 4, "quantity_renting": 1}"#,
        )
        .unwrap();
        assert_eq!(input.question_id, Some(3));
        assert_eq!(input.owned, CountInput::Number(4));
        assert_eq!(input.renting, CountInput::Number(1));
        assert_eq!(input.leasing, CountInput::Number(0));
    }

    #[test]
    fn test_driver_input_defaults_to_zero() {
        let input: DriverAnswerInput = serde_json::from_str(r#"{"question_id": 2}"#).unwrap();
        assert_eq!(input.quantity, CountInput::Number(0));
        assert_eq!(input.question_id, Some(2));
    }

    #[test]
    fn test_malformed_counts_parse_as_invalid() {
        let input: VehicleAnswerInput = serde_json::from_str(
            r#"{"question_id": 1, "owned": null, "third_party": 1.5, "arrended": "x",
                "contractors": 99999999999999999999, "leasing": [1]}"#,
        )
        .unwrap();
        assert_eq!(input.owned, CountInput::Invalid("null".to_string()));
        assert_eq!(input.third_party, CountInput::Invalid("1.5".to_string()));
        assert_eq!(input.arrended, CountInput::Invalid("\"x\"".to_string()));
        assert!(matches!(input.contractors, CountInput::Invalid(_)));
        assert_eq!(input.leasing, CountInput::Invalid("[1]".to_string()));
        assert_eq!(input.renting, CountInput::Number(0));
    }

    #[test]
    fn test_integral_text_and_floats_read_as_numbers() {
        let input: DriverAnswerInput =
            serde_json::from_str(r#"{"driver_question": 1, "quantity": " 7 "}"#).unwrap();
        assert_eq!(input.quantity, CountInput::Number(7));
        let input: DriverAnswerInput =
            serde_json::from_str(r#"{"driver_question": 1, "quantity": 3.0}"#).unwrap();
        assert_eq!(input.quantity, CountInput::Number(3));
        let input: DriverAnswerInput =
            serde_json::from_str(r#"{"driver_question": 1, "quantity": -4}"#).unwrap();
        assert_eq!(input.quantity, CountInput::Number(-4));
    }
}
