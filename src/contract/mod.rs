//! contract - the named transaction surface over the ledger.
//!
//! Each transaction is invoked by name with ordered string arguments and
//! returns serialized bytes. Handlers receive a [`TransactionContext`] with
//! the arguments and the invocation's stub.
//!
//! ## Handler Convention
//!
//! Each transaction module exports:
//!
//! ```ignore
//! pub const NAME: &str = "EnrollCadet";
//! pub const PARAMS: &[&str] = &["personnelID", "name", "campus"];
//!
//! pub fn handle(ctx: &mut TransactionContext<'_>) -> Result<Vec<u8>, ContractError> {
//!     let (id, name, campus) = (ctx.arg(0), ctx.arg(1), ctx.arg(2));
//!     respond(&ctx.ledger().enroll_cadet(id, name, campus)?)
//! }
//! ```

mod context;
mod error;
mod registry;
pub mod transactions;

pub use context::{respond, TransactionContext};
pub use error::{status_for_kind, ContractError};
pub use registry::Contract;

/// Name the personnel contract is deployed under.
pub const CONTRACT_NAME: &str = "PersonnelContract";

/// Register transaction modules with a contract using the convention pattern.
///
/// Each module must export `NAME: &str`, `PARAMS: &[&str]` and
/// `handle(ctx) -> Result<Vec<u8>, ContractError>`.
///
/// # Example
/// ```ignore
/// let contract = starfleet_ledger::register_transactions!(
///     Contract::new("PersonnelContract"),
///     transactions::get_personnel,
///     transactions::enroll_cadet,
/// );
/// ```
#[macro_export]
macro_rules! register_transactions {
    ($contract:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $contract
        $(
            .transaction(
                $($seg)::+::NAME,
                $($seg)::+::PARAMS,
                $($seg)::+::handle,
            )
        )+
    };
}

/// The personnel contract with every transaction registered.
pub fn personnel_contract() -> Contract {
    crate::register_transactions!(
        Contract::new(CONTRACT_NAME),
        transactions::get_personnel,
        transactions::enroll_cadet,
        transactions::complete_training,
        transactions::get_training_record,
        transactions::get_training_history,
        transactions::get_training_roster,
    )
}
