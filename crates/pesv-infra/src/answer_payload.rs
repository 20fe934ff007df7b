//! Answer submission payload reader
//!
//! Accepts both the documented field names and the ones used by the
//! legacy web client (`company`, `vehicleData`, `driverData`).

use std::fs;
use std::path::Path;

use pesv_domain::model::{DriverAnswerInput, VehicleAnswerInput};
use pesv_types::{CompanyId, Error, Result};
use serde::{Deserialize, Serialize};

/// Raw sizing submission as sent by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    #[serde(default, alias = "company")]
    pub company_id: Option<CompanyId>,

    #[serde(default, alias = "vehicleData")]
    pub vehicles: Vec<VehicleAnswerInput>,

    #[serde(default, alias = "driverData")]
    pub drivers: Vec<DriverAnswerInput>,
}

pub fn parse_payload(json: &str) -> Result<AnswerPayload> {
    serde_json::from_str(json)
        .map_err(|e| Error::InvalidInput(format!("Malformed answer payload: {}", e)))
}

pub fn load_payload_from_file(path: &Path) -> Result<AnswerPayload> {
    let content = fs::read_to_string(path)?;
    parse_payload(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesv_domain::model::CountInput;

    #[test]
    fn test_parse_documented_names() {
        let payload = parse_payload(
            r#"{
                "company_id": 3,
                "vehicles": [{"question_id": 1, "owned": 2, "renting": 1}],
                "drivers": [{"question_id": 1, "quantity": 4}]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.company_id, Some(CompanyId(3)));
        assert_eq!(payload.vehicles[0].owned, CountInput::Number(2));
        assert_eq!(payload.vehicles[0].renting, CountInput::Number(1));
        assert_eq!(payload.drivers[0].quantity, CountInput::Number(4));
    }

    #[test]
    fn test_parse_legacy_client_names() {
        let payload = parse_payload(
            r#"{
                "company": 3,
                "vehicleData": [
                    {"vehicle_question": 1, "quantity_owned": 2, "quantity_leasing": -1}
                ],
                "driverData": [{"driver_question": 2, "quantity": 4}]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.company_id, Some(CompanyId(3)));
        assert_eq!(payload.vehicles[0].question_id, Some(1));
        assert_eq!(payload.vehicles[0].leasing, CountInput::Number(-1));
        assert_eq!(payload.drivers[0].question_id, Some(2));
    }

    #[test]
    fn test_null_count_keeps_the_rest_of_the_payload() {
        let payload = parse_payload(
            r#"{
                "company": 3,
                "vehicleData": [
                    {"vehicle_question": 1, "quantity_owned": 3},
                    {"vehicle_question": 2, "quantity_owned": null}
                ],
                "driverData": [{"driver_question": 1, "quantity": "2"}]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.vehicles.len(), 2);
        assert_eq!(payload.vehicles[0].owned, CountInput::Number(3));
        assert_eq!(payload.vehicles[1].owned, CountInput::Invalid("null".to_string()));
        assert_eq!(payload.drivers[0].quantity, CountInput::Number(2));
    }

    #[test]
    fn test_missing_lists_are_empty() {
        let payload = parse_payload("{}").unwrap();
        assert!(payload.vehicles.is_empty());
        assert!(payload.drivers.is_empty());
        assert_eq!(payload.company_id, None);
    }

    #[test]
    fn test_malformed_payload() {
        let err = parse_payload(r#"{"vehicles": 5}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
