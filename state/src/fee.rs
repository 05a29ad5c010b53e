//! Minimum-fee computation.
//!
//! Invocations pay per complexity step plus surcharges for issued assets and
//! extra script runs; plain transactions pay a flat kind-dependent minimum.

use crate::{
	limits::{FEE_UNIT, INVOKE_FEE_BASE, ISSUE_FEE_BASE, SCRIPT_EXTRA_FEE},
	transaction::Transaction,
};
use waves_lang::StdLibVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeFeeDetails {
	pub steps: u64,
	pub min_fee: i64,
}

/// `steps = ceil(used_complexity / step_limit)`, at least one;
/// `min_fee = FeeUnit * (InvokeFeeBase * steps + issues * IssueFeeBase +
/// extra_scripts * ScriptExtraFee)`.
pub fn invoke_fee(
	used_complexity: u64,
	version: StdLibVersion,
	non_nft_issues: u64,
	extra_script_invocations: u64,
) -> InvokeFeeDetails {
	let step_limit = crate::limits::max_complexity(version);
	let steps = used_complexity.div_ceil(step_limit).max(1);
	let min_fee = FEE_UNIT *
		(INVOKE_FEE_BASE * steps as i64 +
			ISSUE_FEE_BASE * non_nft_issues as i64 +
			SCRIPT_EXTRA_FEE * extra_script_invocations as i64);
	InvokeFeeDetails { steps, min_fee }
}

/// Flat minimum for non-invoke transactions, before script surcharges.
pub fn base_min_fee(tx: &Transaction) -> i64 {
	match tx {
		Transaction::Issue(_) => ISSUE_FEE_BASE * FEE_UNIT,
		Transaction::Data(data) => {
			let payload: usize = data.entries.iter().map(|e| e.payload_size()).sum();
			FEE_UNIT * (1 + payload.div_ceil(1024) as i64)
		},
		_ => FEE_UNIT,
	}
}
