//! Transaction: GetPersonnel(personnelID) -> Personnel

use crate::contract::{respond, ContractError, TransactionContext};

pub const NAME: &str = "GetPersonnel";
pub const PARAMS: &[&str] = &["personnelID"];

pub fn handle(ctx: &mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> {
    let personnel_id = ctx.arg(0);
    respond(&ctx.ledger().get_personnel(personnel_id)?)
}
