use crate::{
	fee::{base_min_fee, invoke_fee},
	limits::{FEE_UNIT, INVOKE_FEE_BASE, ISSUE_FEE_BASE, SCRIPT_EXTRA_FEE},
	tests::{tx_id, TestAccount},
	transaction::{DataTransaction, Transaction},
};
use crate::data_entry::{DataEntry, DataValue};
use waves_lang::StdLibVersion;

#[test]
fn steps_are_ceiling_division_with_a_floor_of_one() {
	// V5 step size is 10_000.
	assert_eq!(invoke_fee(0, StdLibVersion::V5, 0, 0).steps, 1);
	assert_eq!(invoke_fee(10_000, StdLibVersion::V5, 0, 0).steps, 1);
	assert_eq!(invoke_fee(10_001, StdLibVersion::V5, 0, 0).steps, 2);
	assert_eq!(invoke_fee(25_000, StdLibVersion::V5, 0, 0).steps, 3);
}

#[test]
fn min_fee_combines_steps_issues_and_extra_scripts() {
	let details = invoke_fee(10_001, StdLibVersion::V5, 2, 1);
	assert_eq!(
		details.min_fee,
		FEE_UNIT * (INVOKE_FEE_BASE * 2 + ISSUE_FEE_BASE * 2 + SCRIPT_EXTRA_FEE)
	);
}

#[test]
fn data_fee_scales_with_payload_kilobytes() {
	let sender = TestAccount::new(1);
	let entry = |key: &str, bytes: usize| {
		DataEntry::new(key, DataValue::Binary(waves_primitives::ByteStr::new(vec![0; bytes])))
	};
	let tx = |entries| {
		Transaction::Data(DataTransaction {
			id: tx_id(1),
			sender: sender.public_key(),
			version: 2,
			entries,
			fee: 0,
			timestamp: 0,
			proofs: vec![],
		})
	};
	assert_eq!(base_min_fee(&tx(vec![entry("k", 10)])), 2 * FEE_UNIT);
	assert_eq!(base_min_fee(&tx(vec![entry("k", 3000)])), 4 * FEE_UNIT);
	assert_eq!(base_min_fee(&tx(vec![])), FEE_UNIT);
}
