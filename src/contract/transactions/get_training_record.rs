//! Transaction: GetTrainingRecord(recordID) -> TrainingRecord

use crate::contract::{respond, ContractError, TransactionContext};

pub const NAME: &str = "GetTrainingRecord";
pub const PARAMS: &[&str] = &["recordID"];

pub fn handle(ctx: &mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> {
    let record_id = ctx.arg(0);
    respond(&ctx.ledger().get_training_record(record_id)?)
}
