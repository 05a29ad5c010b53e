//! The transaction-diff engine.
//!
//! Given a read-only blockchain snapshot and one transaction, the engine
//! produces a [`diff::Diff`]: a deterministic, composable description of
//! every state mutation the transaction would cause, or a structured
//! validation error. The entry point is [`drivers::transaction_diff`].
//!
//! The engine is single-threaded and purely functional: no shared mutable
//! state, no I/O, no wall clock. Budget exhaustion inside script evaluation
//! is the only cooperative cancellation mechanism.

pub mod actions;
pub mod bindings;
pub mod blockchain;
pub mod composite;
pub mod data_entry;
pub mod diff;
pub mod drivers;
pub mod error;
pub mod fee;
pub mod invoke;
pub mod limits;
pub mod pseudo_tx;
pub mod script_result;
pub mod settings;
pub mod sponsorship;
pub mod testing;
pub mod trace;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use blockchain::{AssetDescription, Blockchain};
pub use composite::CompositeBlockchain;
pub use data_entry::{DataEntry, DataValue};
pub use diff::{Diff, Portfolio};
pub use drivers::transaction_diff;
pub use error::{FailedTransactionError, RejectError, TransactionError};
pub use settings::FunctionalitySettings;
pub use trace::{Traced, TraceStep};
pub use transaction::Transaction;
