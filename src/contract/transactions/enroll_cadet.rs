//! Transaction: EnrollCadet(personnelID, name, campus) -> Personnel

use crate::contract::{respond, ContractError, TransactionContext};

pub const NAME: &str = "EnrollCadet";
pub const PARAMS: &[&str] = &["personnelID", "name", "campus"];

pub fn handle(ctx: &mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> {
    let (personnel_id, name, campus) = (ctx.arg(0), ctx.arg(1), ctx.arg(2));
    let personnel = ctx.ledger().enroll_cadet(personnel_id, name, campus)?;
    respond(&personnel)
}
