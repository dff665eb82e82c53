//! Ledger integration tests: operations over an invocation on the in-memory
//! world state.

mod training;
