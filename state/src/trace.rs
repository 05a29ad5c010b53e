//! Per-step trace records attached to every driver result.

use crate::error::TransactionError;
use waves_lang::ExecutionLog;
use waves_primitives::{Address, ByteStr};

#[derive(Debug, Clone, PartialEq)]
pub enum AssetVerifierOutcome {
	Allowed,
	Denied,
	Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceStep {
	/// One asset-script run triggered by an asset-touching action or payment.
	AssetVerification { asset_id: ByteStr, outcome: AssetVerifierOutcome },
	/// One dApp function evaluation, root or nested.
	InvokeScript {
		dapp: Address,
		function: String,
		outcome: Result<(), String>,
		log: ExecutionLog,
	},
	/// The post-hoc minimum fee computed for an invocation.
	MinFee { computed: i64 },
}

/// A driver result with its ordered trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Traced<T> {
	pub result: Result<T, TransactionError>,
	pub trace: Vec<TraceStep>,
}

impl<T> Traced<T> {
	pub fn new(result: Result<T, TransactionError>, trace: Vec<TraceStep>) -> Self {
		Traced { result, trace }
	}

	pub fn without_trace(result: Result<T, TransactionError>) -> Self {
		Traced { result, trace: Vec::new() }
	}
}
