//! Transaction: CompleteTraining(recordID, personnelID, campus, trainingCode,
//! completedAt, issuedBy) -> TrainingRecord

use crate::contract::{respond, ContractError, TransactionContext};

pub const NAME: &str = "CompleteTraining";
pub const PARAMS: &[&str] = &[
    "recordID",
    "personnelID",
    "campus",
    "trainingCode",
    "completedAt",
    "issuedBy",
];

pub fn handle(ctx: &mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> {
    let (record_id, personnel_id, campus) = (ctx.arg(0), ctx.arg(1), ctx.arg(2));
    let (training_code, completed_at, issued_by) = (ctx.arg(3), ctx.arg(4), ctx.arg(5));

    let record = ctx.ledger().complete_training(
        record_id,
        personnel_id,
        campus,
        training_code,
        completed_at,
        issued_by,
    )?;
    respond(&record)
}
