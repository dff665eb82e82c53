//! Transaction: GetTrainingHistory(personnelID) -> [TrainingRecord]
//!
//! Ordered by the `training_byPersonnel` index, i.e. by completion time text.

use crate::contract::{respond, ContractError, TransactionContext};

pub const NAME: &str = "GetTrainingHistory";
pub const PARAMS: &[&str] = &["personnelID"];

pub fn handle(ctx: &mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> {
    let personnel_id = ctx.arg(0);
    respond(&ctx.ledger().training_history(personnel_id)?)
}
