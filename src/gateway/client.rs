//! Typed client for the personnel contract.

use serde::de::DeserializeOwned;

use crate::contract::transactions::{
    complete_training, enroll_cadet, get_personnel, get_training_history, get_training_record,
    get_training_roster,
};
use crate::contract::CONTRACT_NAME;
use crate::domain::{parse_timestamp, Personnel, TrainingRecord};

use super::{Gateway, GatewayError};

/// Calls `PersonnelContract` transactions and decodes their JSON results.
///
/// Obviously bad input (empty ids, a `completedAt` that is not RFC 3339) is
/// rejected here without a round trip.
pub struct PersonnelClient<G: Gateway> {
    gateway: G,
}

impl<G: Gateway> PersonnelClient<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn get_personnel(&self, personnel_id: &str) -> Result<Personnel, GatewayError> {
        require_personnel_id(personnel_id)?;
        self.evaluate(get_personnel::NAME, &[personnel_id])
    }

    pub fn enroll_cadet(
        &self,
        personnel_id: &str,
        name: &str,
        campus: &str,
    ) -> Result<Personnel, GatewayError> {
        require_personnel_id(personnel_id)?;
        self.submit(enroll_cadet::NAME, &[personnel_id, name, campus])
    }

    pub fn complete_training(
        &self,
        record_id: &str,
        personnel_id: &str,
        campus: &str,
        training_code: &str,
        completed_at: &str,
        issued_by: &str,
    ) -> Result<TrainingRecord, GatewayError> {
        require("recordID", record_id)?;
        require_personnel_id(personnel_id)?;
        require("campus", campus)?;
        require("trainingCode", training_code)?;
        require("completedAt", completed_at)?;
        require("issuedBy", issued_by)?;
        parse_timestamp(completed_at).map_err(|e| {
            GatewayError::InvalidRequest(format!(
                "completedAt must be in ISO 8601 / RFC3339 format: {e}"
            ))
        })?;

        self.submit(
            complete_training::NAME,
            &[
                record_id,
                personnel_id,
                campus,
                training_code,
                completed_at,
                issued_by,
            ],
        )
    }

    pub fn get_training_record(&self, record_id: &str) -> Result<TrainingRecord, GatewayError> {
        require("recordID", record_id)?;
        self.evaluate(get_training_record::NAME, &[record_id])
    }

    /// All training records for a person, ordered by completion time.
    pub fn training_history(&self, personnel_id: &str) -> Result<Vec<TrainingRecord>, GatewayError> {
        require_personnel_id(personnel_id)?;
        self.evaluate(get_training_history::NAME, &[personnel_id])
    }

    /// Completed records for a training code, ordered by personnel id.
    pub fn training_roster(&self, training_code: &str) -> Result<Vec<TrainingRecord>, GatewayError> {
        require("trainingCode", training_code)?;
        self.evaluate(get_training_roster::NAME, &[training_code])
    }

    fn evaluate<T: DeserializeOwned>(&self, name: &str, args: &[&str]) -> Result<T, GatewayError> {
        let function = qualified(name);
        let bytes = self.gateway.evaluate_transaction(&function, args)?;
        decode(&function, &bytes)
    }

    fn submit<T: DeserializeOwned>(&self, name: &str, args: &[&str]) -> Result<T, GatewayError> {
        let function = qualified(name);
        let bytes = self.gateway.submit_transaction(&function, args)?;
        decode(&function, &bytes)
    }
}

fn qualified(name: &str) -> String {
    format!("{CONTRACT_NAME}:{name}")
}

fn decode<T: DeserializeOwned>(function: &str, bytes: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(bytes).map_err(|source| GatewayError::Decode {
        function: function.to_string(),
        source,
    })
}

fn require_personnel_id(personnel_id: &str) -> Result<(), GatewayError> {
    if personnel_id.is_empty() {
        return Err(GatewayError::InvalidRequest("invalid personnel ID".into()));
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), GatewayError> {
    if value.is_empty() {
        return Err(GatewayError::InvalidRequest(format!("{field} is required")));
    }
    Ok(())
}
