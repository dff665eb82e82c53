//! Transaction: GetTrainingRoster(trainingCode) -> [TrainingRecord]

use crate::contract::{respond, ContractError, TransactionContext};

pub const NAME: &str = "GetTrainingRoster";
pub const PARAMS: &[&str] = &["trainingCode"];

pub fn handle(ctx: &mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> {
    let training_code = ctx.arg(0);
    respond(&ctx.ledger().training_roster(training_code)?)
}
