//! Transaction handlers of the personnel contract.

pub mod complete_training;
pub mod enroll_cadet;
pub mod get_personnel;
pub mod get_training_history;
pub mod get_training_record;
pub mod get_training_roster;
