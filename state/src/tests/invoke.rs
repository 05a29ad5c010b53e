use crate::{
	blockchain::{AssetDescription, Blockchain},
	data_entry::DataValue,
	drivers::transaction_diff,
	error::{RejectError, TransactionError},
	limits::{FEE_UNIT, INVOKE_FEE_BASE},
	settings::FunctionalitySettings,
	tests::{blockchain, dapp_with_callable, invoke_tx, list_of, tx_id, TestAccount},
	trace::TraceStep,
	transaction::{Payment, Transaction},
};
use waves_lang::{CallableFunction, DAppScript, Expr, NativeFunction, StdLibVersion, Value};
use waves_primitives::{hashing, Asset, ByteStr};

const WAVES: i64 = 100_000_000;
const INVOKE_FEE: i64 = INVOKE_FEE_BASE * FEE_UNIT;

fn settings() -> FunctionalitySettings {
	FunctionalitySettings::default()
}

fn legacy_settings() -> FunctionalitySettings {
	// Heights far above the test height of 1000: the strict checks are off.
	FunctionalitySettings { transfers_check_height: 10_000, ..Default::default() }
}

fn asset_description(issuer: &TestAccount, origin: ByteStr, volume: u128) -> AssetDescription {
	AssetDescription {
		origin_tx: origin,
		issuer: issuer.public_key(),
		name: "token".to_owned(),
		description: String::new(),
		decimals: 0,
		reissuable: true,
		total_volume: volume,
		last_updated_height: 1,
		script: None,
		sponsorship_rate: 0,
		nft: false,
	}
}

/// `[Burn(asset, quantity)]` in script form.
fn burn_callable(asset_id: &ByteStr, quantity: i64) -> Expr {
	list_of(vec![Expr::user_call("Burn", vec![
		Expr::bytes(asset_id.as_bytes()),
		Expr::ConstLong(quantity),
	])])
}

#[test]
fn negative_burn_rejects_once_transfers_check_is_active() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let asset_id = tx_id(0x77);
	let mut chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_balance(dapp.address(), Asset::IssuedAsset(asset_id.clone()), 100)
		.with_asset(asset_id.clone(), asset_description(&dapp, asset_id.clone(), 100))
		.with_dapp(dapp.public_key(), dapp_with_callable("call", vec![], burn_callable(&asset_id, -1)));

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x01));
	let result = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx)).result;
	assert_eq!(
		result,
		Err(TransactionError::Rejected(RejectError::NegativeAmount(
			"Negative burn quantity = -1".to_owned()
		)))
	);

	// Nothing was applied: the dApp still holds 100.
	chain.set_height(1001);
	assert_eq!(chain.balance(&dapp.address(), &Asset::IssuedAsset(asset_id)), 100);
}

#[test]
fn negative_burn_fails_for_fee_with_partial_state_before_the_check() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let asset_id = tx_id(0x77);
	let mut chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_balance(dapp.address(), Asset::IssuedAsset(asset_id.clone()), 100)
		.with_asset(asset_id.clone(), asset_description(&dapp, asset_id.clone(), 100))
		.with_dapp(dapp.public_key(), dapp_with_callable("call", vec![], burn_callable(&asset_id, -1)));

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x01));
	let diff = transaction_diff(&chain, &legacy_settings(), &Transaction::Invoke(tx.clone()))
		.result
		.expect("fails for the fee, still a diff");

	let (_, info) = &diff.transactions[0];
	assert!(!info.applied);
	assert_eq!(diff.portfolios[&user.address()].balance, -INVOKE_FEE, "fee consumed");
	let error = diff.script_results[&tx.id].error_message.as_deref().unwrap();
	assert!(error.contains("Negative burn quantity = -1"));

	// The legacy reissue side-effect path: supply goes up to 101.
	chain.apply(&diff);
	assert_eq!(chain.balance(&dapp.address(), &Asset::IssuedAsset(asset_id.clone())), 101);
	assert_eq!(chain.asset_description(&asset_id).unwrap().total_volume, 101);
}

#[test]
fn negative_lease_rejects_once_transfers_check_is_active() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(
			dapp.public_key(),
			dapp_with_callable(
				"call",
				vec![],
				list_of(vec![Expr::user_call("Lease", vec![
					Expr::user_call("Address", vec![Expr::bytes(user.address().as_bytes())]),
					Expr::ConstLong(-1),
					Expr::ConstLong(0),
				])]),
			),
		);

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x02));
	let result = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx)).result;
	assert_eq!(
		result,
		Err(TransactionError::Rejected(RejectError::NegativeAmount(
			"Negative lease amount = -1".to_owned()
		)))
	);
}

#[test]
fn fee_shortage_fails_for_fee_with_the_computed_minimum() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(dapp.public_key(), dapp_with_callable("call", vec![], Expr::reference("nil")));

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE - 1, tx_id(0x03));
	let traced = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx.clone()));
	let diff = traced.result.expect("fails for the fee, still a diff");

	let (_, info) = &diff.transactions[0];
	assert!(!info.applied);
	assert!(traced
		.trace
		.iter()
		.any(|step| matches!(step, TraceStep::MinFee { computed } if *computed == INVOKE_FEE)));
	let error = diff.script_results[&tx.id].error_message.as_deref().unwrap();
	assert!(error.contains("does not exceed minimal value"));
	assert_eq!(diff.portfolios[&user.address()].balance, -(INVOKE_FEE - 1));
}

#[test]
fn lease_lifecycle_through_invocations() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let recipient = TestAccount::new(3);
	let amount: i64 = 10_000 * WAVES;

	// @Callable open():   let lease = Lease(recipient, amount, 0)
	//                     [lease, BinaryEntry("leaseId", calculateLeaseId(lease))]
	// @Callable close(id): [LeaseCancel(id)]
	let open_body = Expr::let_in(
		"lease",
		Expr::user_call("Lease", vec![
			Expr::user_call("Address", vec![Expr::bytes(recipient.address().as_bytes())]),
			Expr::ConstLong(amount),
			Expr::ConstLong(0),
		]),
		list_of(vec![
			Expr::reference("lease"),
			Expr::user_call("BinaryEntry", vec![
				Expr::string("leaseId"),
				Expr::native(NativeFunction::CalculateLeaseId.id(), vec![Expr::reference("lease")]),
			]),
		]),
	);
	let script = DAppScript {
		stdlib_version: StdLibVersion::V5,
		declarations: Vec::new(),
		callables: vec![
			CallableFunction { name: "open".to_owned(), arg_names: vec![], body: open_body },
			CallableFunction {
				name: "close".to_owned(),
				arg_names: vec!["id".to_owned()],
				body: list_of(vec![Expr::user_call("LeaseCancel", vec![Expr::reference("id")])]),
			},
		],
		verifier: None,
		allow_reentrancy: false,
	};
	let mut chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_balance(dapp.address(), Asset::Waves, 20_000 * WAVES)
		.with_dapp(dapp.public_key(), script);
	let config = settings();

	let open = invoke_tx(&user, dapp.address(), "open", vec![], INVOKE_FEE, tx_id(0x04));
	let diff = transaction_diff(&chain, &config, &Transaction::Invoke(open.clone()))
		.result
		.expect("open succeeds");

	// The id recorded in account data matches the documented derivation.
	let expected_id =
		hashing::lease_id(&open.id, 0, recipient.address().as_bytes(), amount);
	let recorded = &diff.account_data[&dapp.address()]["leaseId"];
	assert_eq!(recorded.value, DataValue::Binary(expected_id.clone()));

	assert!(diff.lease_state[&expected_id].is_active());
	assert_eq!(diff.portfolios[&dapp.address()].lease.lease_out, amount);
	assert_eq!(diff.portfolios[&recipient.address()].lease.lease_in, amount);

	chain.apply(&diff);
	assert_eq!(chain.active_leases(&dapp.address()), vec![expected_id.clone()]);
	assert_eq!(chain.active_leases(&recipient.address()), vec![expected_id.clone()]);

	// Cancel in the next block.
	chain.set_height(1001);
	let close = invoke_tx(
		&user,
		dapp.address(),
		"close",
		vec![Value::ByteStr(expected_id.clone())],
		INVOKE_FEE,
		tx_id(0x05),
	);
	let diff = transaction_diff(&chain, &config, &Transaction::Invoke(close))
		.result
		.expect("close succeeds");
	assert!(!diff.lease_state[&expected_id].is_active());
	chain.apply(&diff);

	assert!(chain.active_leases(&dapp.address()).is_empty());
	assert!(chain.active_leases(&recipient.address()).is_empty());
	assert_eq!(chain.lease_balance(&dapp.address()).lease_out, 0);
	assert_eq!(chain.lease_balance(&recipient.address()).lease_in, 0);

	// Still cancelled after another key block.
	chain.set_height(1002);
	assert!(chain.active_leases(&dapp.address()).is_empty());
}

#[test]
fn payments_move_before_the_callable_runs() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(dapp.public_key(), dapp_with_callable("call", vec![], Expr::reference("nil")));

	let tx = crate::tests::with_payments(
		invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x06)),
		vec![Payment { asset: Asset::Waves, amount: 5 }],
	);
	let diff = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx))
		.result
		.expect("payment accepted");
	assert_eq!(diff.portfolios[&user.address()].balance, -INVOKE_FEE - 5);
	assert_eq!(diff.portfolios[&dapp.address()].balance, 5);
}

#[test]
fn self_payment_is_forbidden_for_v4_scripts() {
	let owner = TestAccount::new(2);
	let chain = blockchain()
		.with_balance(owner.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(owner.public_key(), dapp_with_callable("call", vec![], Expr::reference("nil")));

	let tx = crate::tests::with_payments(
		invoke_tx(&owner, owner.address(), "call", vec![], INVOKE_FEE, tx_id(0x07)),
		vec![Payment { asset: Asset::Waves, amount: 5 }],
	);
	let result = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx)).result;
	match result {
		Err(TransactionError::Rejected(RejectError::GenericError(message))) =>
			assert!(message.contains("self-payment")),
		other => panic!("expected self-payment rejection, got {other:?}"),
	}
}

#[test]
fn nested_invocation_writes_to_the_callee() {
	let user = TestAccount::new(1);
	let proxy = TestAccount::new(2);
	let target = TestAccount::new(4);

	let target_script = dapp_with_callable(
		"give",
		vec![],
		list_of(vec![Expr::user_call("IntegerEntry", vec![
			Expr::string("x"),
			Expr::ConstLong(42),
		])]),
	);
	let proxy_script = dapp_with_callable(
		"call",
		vec![],
		list_of(vec![Expr::user_call("Invoke", vec![
			Expr::user_call("Address", vec![Expr::bytes(target.address().as_bytes())]),
			Expr::string("give"),
			Expr::reference("nil"),
			Expr::reference("nil"),
		])]),
	);
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(proxy.public_key(), proxy_script)
		.with_dapp(target.public_key(), target_script);

	let tx = invoke_tx(&user, proxy.address(), "call", vec![], INVOKE_FEE, tx_id(0x08));
	let diff = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx.clone()))
		.result
		.expect("nested call succeeds");

	assert_eq!(
		diff.account_data[&target.address()]["x"].value,
		DataValue::Int(42),
		"the callee's write lands in the caller's diff"
	);
	let result = &diff.script_results[&tx.id];
	assert_eq!(result.invokes.len(), 1);
	assert_eq!(result.invokes[0].dapp, target.address());
	assert_eq!(result.invokes[0].state_changes.data.len(), 1);

	// The callee is part of the affected set.
	let (_, info) = &diff.transactions[0];
	assert!(info.affected.contains(&target.address()));

	// The result serialises; nested state changes included, no error field.
	let json = serde_json::to_value(result).expect("serialisable result");
	assert!(json.get("error_message").is_none());
	assert_eq!(json["invokes"][0]["state_changes"]["data"][0]["key"], "x");
}

#[test]
fn reentrancy_requires_the_callee_to_allow_it() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);

	let script = DAppScript {
		stdlib_version: StdLibVersion::V5,
		declarations: Vec::new(),
		callables: vec![
			CallableFunction {
				name: "call".to_owned(),
				arg_names: vec![],
				body: list_of(vec![Expr::user_call("Invoke", vec![
					Expr::user_call("Address", vec![Expr::bytes(dapp.address().as_bytes())]),
					Expr::string("noop"),
					Expr::reference("nil"),
					Expr::reference("nil"),
				])]),
			},
			CallableFunction {
				name: "noop".to_owned(),
				arg_names: vec![],
				body: Expr::reference("nil"),
			},
		],
		verifier: None,
		allow_reentrancy: false,
	};
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(dapp.public_key(), script.clone());

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x09));
	let result = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx)).result;
	assert_eq!(result, Err(TransactionError::Rejected(RejectError::ReentrancyDisallowed)));

	// The same shape goes through once the script allows reentrancy.
	let permissive = DAppScript { allow_reentrancy: true, ..script };
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(dapp.public_key(), permissive);
	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x0a));
	assert!(transaction_diff(&chain, &settings(), &Transaction::Invoke(tx)).result.is_ok());
}

#[test]
fn throwing_callable_fails_for_the_fee() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(
			dapp.public_key(),
			dapp_with_callable(
				"call",
				vec![],
				Expr::native(NativeFunction::Throw.id(), vec![Expr::string("no deal")]),
			),
		);

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x0b));
	let diff = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx.clone()))
		.result
		.expect("throw fails for the fee");
	let (_, info) = &diff.transactions[0];
	assert!(!info.applied);
	assert!(diff.script_results[&tx.id]
		.error_message
		.as_deref()
		.unwrap()
		.contains("no deal"));
}

#[test]
fn scripted_asset_gates_transfers_from_callables() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let asset_id = tx_id(0x78);

	// The asset script refuses everything.
	let deny_all = waves_lang::ExpressionScript {
		stdlib_version: StdLibVersion::V5,
		expr: Expr::False,
	};
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_balance(dapp.address(), Asset::IssuedAsset(asset_id.clone()), 100)
		.with_asset(asset_id.clone(), asset_description(&dapp, asset_id.clone(), 100))
		.with_asset_script(&asset_id, deny_all)
		.with_dapp(
			dapp.public_key(),
			dapp_with_callable(
				"call",
				vec![],
				list_of(vec![Expr::user_call("ScriptTransfer", vec![
					Expr::user_call("Address", vec![Expr::bytes(user.address().as_bytes())]),
					Expr::ConstLong(1),
					Expr::bytes(asset_id.as_bytes()),
				])]),
			),
		);

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x0c));
	let traced = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx.clone()));
	let diff = traced.result.expect("denial fails for the fee");
	let (_, info) = &diff.transactions[0];
	assert!(!info.applied);
	assert!(diff.script_results[&tx.id]
		.error_message
		.as_deref()
		.unwrap()
		.contains("not allowed by the script of asset"));
	assert!(traced.trace.iter().any(|step| matches!(
		step,
		TraceStep::AssetVerification { outcome: crate::trace::AssetVerifierOutcome::Denied, .. }
	)));
}

#[test]
fn action_fold_equals_pairwise_combination() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_balance(dapp.address(), Asset::Waves, 10 * WAVES)
		.with_dapp(
			dapp.public_key(),
			dapp_with_callable(
				"call",
				vec![],
				list_of(vec![
					Expr::user_call("IntegerEntry", vec![Expr::string("a"), Expr::ConstLong(1)]),
					Expr::user_call("IntegerEntry", vec![Expr::string("a"), Expr::ConstLong(2)]),
					Expr::user_call("ScriptTransfer", vec![
						Expr::user_call("Address", vec![Expr::bytes(user.address().as_bytes())]),
						Expr::ConstLong(7),
						Expr::reference("unit"),
					]),
				]),
			),
		);

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x0d));
	let diff = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx))
		.result
		.expect("all actions succeed");

	// Last write wins within one invocation.
	assert_eq!(diff.account_data[&dapp.address()]["a"].value, DataValue::Int(2));
	assert_eq!(diff.portfolios[&dapp.address()].balance, -7);
	assert_eq!(diff.portfolios[&user.address()].balance, 7 - INVOKE_FEE);
}

#[test]
fn duplicate_lease_cancel_is_a_dapp_execution_failure() {
	let user = TestAccount::new(1);
	let dapp = TestAccount::new(2);
	let recipient = TestAccount::new(3);

	let lease_id = {
		// An existing active lease created by the dApp.
		hashing::lease_id(&tx_id(0x70), 0, recipient.address().as_bytes(), 100)
	};
	let chain = blockchain()
		.with_balance(user.address(), Asset::Waves, 10 * WAVES)
		.with_lease(
			lease_id.clone(),
			crate::diff::LeaseDetails {
				sender: dapp.public_key(),
				recipient: recipient.address().into(),
				amount: 100,
				status: crate::diff::LeaseStatus::Active,
				source_tx: tx_id(0x70),
				height: 900,
			},
		)
		.with_dapp(
			dapp.public_key(),
			dapp_with_callable(
				"call",
				vec![],
				list_of(vec![
					Expr::user_call("LeaseCancel", vec![Expr::bytes(lease_id.as_bytes())]),
					Expr::user_call("LeaseCancel", vec![Expr::bytes(lease_id.as_bytes())]),
				]),
			),
		);

	let tx = invoke_tx(&user, dapp.address(), "call", vec![], INVOKE_FEE, tx_id(0x0e));
	let diff = transaction_diff(&chain, &settings(), &Transaction::Invoke(tx.clone()))
		.result
		.expect("fails for the fee");
	let error = diff.script_results[&tx.id].error_message.as_deref().unwrap();
	assert!(error.contains("Duplicate LeaseCancel id(s)"), "got: {error}");
}
