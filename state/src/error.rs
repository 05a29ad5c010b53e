//! The two-tier error taxonomy.
//!
//! `RejectError`: the transaction never enters a block. `FailedTransactionError`:
//! the transaction enters the block and its fee is consumed, but no state
//! mutation besides the fee is applied. Which tier a given violation lands in
//! is gated by activation heights (see `FunctionalitySettings`).

use thiserror::Error;
use waves_lang::{render_log, ExecutionLog};
use waves_primitives::{Alias, ByteStr};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectError {
	#[error("Invalid signature")]
	InvalidSignature,
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	#[error("Overflow error")]
	OverflowError,
	#[error("{0}")]
	GenericError(String),
	#[error("Insufficient fee: {0}")]
	InsufficientFee(String),
	#[error("Non-positive amount: {amount} of {of}")]
	NonPositiveAmount { amount: i64, of: String },
	#[error("Referenced asset {0} was not issued")]
	UnissuedAsset(ByteStr),
	#[error("Alias {0} does not exist")]
	AliasDoesNotExist(Alias),
	#[error("Account balance error: {0}")]
	AccountBalanceError(String),
	#[error("The dApp is already on the call stack and does not allow reentrancy")]
	ReentrancyDisallowed,
	#[error("{0}")]
	NegativeAmount(String),
	#[error("Asset {0} already exists")]
	AssetAlreadyExists(ByteStr),
	#[error("Write set is too large: {size} bytes exceeds {limit}")]
	WriteSetTooLarge { size: usize, limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailedTransactionError {
	#[error("dApp execution failed: {message}{}", format_log(.log))]
	DAppExecution { message: String, complexity: u64, log: ExecutionLog },
	#[error("Asset script of {asset_id} failed in action: {message}{}", format_log(.log))]
	AssetExecutionInAction {
		message: String,
		complexity: u64,
		log: ExecutionLog,
		asset_id: ByteStr,
	},
	#[error("Transaction is not allowed by the script of asset {asset_id}{}", format_log(.log))]
	NotAllowedByAssetInAction { complexity: u64, log: ExecutionLog, asset_id: ByteStr },
	#[error("{message}")]
	FeeForActions { message: String, complexity: u64, min_fee: i64 },
}

fn format_log(log: &ExecutionLog) -> String {
	if log.is_empty() {
		String::new()
	} else {
		format!("\n{}", render_log(log))
	}
}

impl FailedTransactionError {
	/// The running total at the point of failure: errors inside the action
	/// fold accumulate the complexity spent by every earlier step, and the
	/// block records this figure.
	pub fn spent_complexity(&self) -> u64 {
		match self {
			FailedTransactionError::DAppExecution { complexity, .. } |
			FailedTransactionError::AssetExecutionInAction { complexity, .. } |
			FailedTransactionError::NotAllowedByAssetInAction { complexity, .. } |
			FailedTransactionError::FeeForActions { complexity, .. } => *complexity,
		}
	}
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransactionError {
	#[error(transparent)]
	Rejected(#[from] RejectError),
	#[error(transparent)]
	Failed(#[from] FailedTransactionError),
}

impl TransactionError {
	pub fn generic(message: impl Into<String>) -> TransactionError {
		TransactionError::Rejected(RejectError::GenericError(message.into()))
	}
}
