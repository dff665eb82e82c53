pub mod contract;
pub mod domain;
mod error;
pub mod gateway;
pub mod keys;
pub mod ledger;
pub mod state;

pub use contract::{personnel_contract, Contract, ContractError, TransactionContext, CONTRACT_NAME};
pub use domain::{
    parse_timestamp, Document, Personnel, PersonnelStatus, Rank, TimestampError, TrainingRecord,
    TrainingStatus,
};
pub use error::{ErrorKind, LedgerError};
pub use gateway::{Gateway, GatewayConfig, GatewayError, LocalGateway, PersonnelClient};
pub use keys::{CompositeKey, IndexDef, KeyError, TRAINING_BY_CODE, TRAINING_BY_PERSONNEL};
pub use ledger::{
    Documents, IndexAudit, IndexEntry, IndexScan, PersonnelLedger, StateAccessExt,
    TrainingByCode, TrainingByPersonnel, WriteBatch, INDEX_MARKER,
};
pub use state::{
    InMemoryWorldState, Invocation, KeyValue, ReadWriteSet, StateError, StateRange, Stub,
    Versioned, WorldState,
};
