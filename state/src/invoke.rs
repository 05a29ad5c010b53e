//! The invoke-script diff computation.
//!
//! One invocation evaluates the target callable, folds the returned actions
//! left-to-right over a composite view that includes every prior action's
//! writes, runs asset scripts for asset-touching actions and payments,
//! executes nested synchronous calls depth-first, and finally settles the
//! fee against the post-hoc minimum.
//!
//! Rejection and fail-for-fee stay strictly apart: a rejection produced
//! inside the fold is never downgraded to a fee-consuming failure. A failed
//! transaction still yields a diff — the fee moves, the transaction is
//! recorded unapplied, and the failure lands in the script result and the
//! trace.

use crate::{
	actions::{actions_from_value, values, CallableAction},
	bindings::{invocation_value, script_context},
	blockchain::Blockchain,
	composite::CompositeBlockchain,
	diff::{
		AssetInfo, AssetStaticInfo, AssetVolumeInfo, Diff, Ior, LeaseBalance, LeaseDetails,
		LeaseStatus, NewAssetInfo, NewTransactionInfo, Portfolio, Sponsorship,
	},
	error::{FailedTransactionError, RejectError, TransactionError},
	fee::invoke_fee,
	limits::{
		max_callable_actions, max_key_size, max_payments, max_write_set_size,
		MAX_TOTAL_WRITE_SET_SIZE_BYTES, TOTAL_COMPLEXITY_LIMIT,
	},
	pseudo_tx::PseudoTx,
	script_result::{
		InvokeScriptResult, ResultBurn, ResultInvoke, ResultIssue, ResultLease,
		ResultLeaseCancel, ResultReissue, ResultSponsorFee, ResultTransfer,
	},
	settings::FunctionalitySettings,
	trace::{AssetVerifierOutcome, Traced, TraceStep},
	transaction::{InvokeScriptTransaction, Payment, Transaction},
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use waves_lang::{evaluate_dapp_function, evaluate_expression, StdLibVersion, Value};
use waves_primitives::{hashing, Address, AddressOrAlias, Asset, ByteStr, PublicKey};

/// Outcome of one dApp frame: its own diff contribution, the serialisable
/// result, and — on the legacy path only — a deferred fee-consuming failure
/// whose partial mutations stay in the diff.
struct FrameOutput {
	diff: Diff,
	result: InvokeScriptResult,
	deferred_failure: Option<FailedTransactionError>,
}

struct DAppEnvironment<'a> {
	blockchain: &'a dyn Blockchain,
	settings: &'a FunctionalitySettings,
	root: &'a InvokeScriptTransaction,
	trace: Vec<TraceStep>,
	/// Complexity spent by callables and asset scripts; drives the fee steps.
	spent_complexity: u64,
	/// Complexity spent by the sender's verifier; recorded but not stepped.
	verifier_complexity: u64,
	scripts_run: u32,
	root_version: Option<StdLibVersion>,
}

pub fn invoke_script_diff(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &InvokeScriptTransaction,
) -> Traced<Diff> {
	let mut env = DAppEnvironment {
		blockchain,
		settings,
		root: tx,
		trace: Vec::new(),
		spent_complexity: 0,
		verifier_complexity: 0,
		scripts_run: 0,
		root_version: None,
	};
	let result = run(&mut env, tx);
	Traced::new(result, env.trace)
}

fn run(
	env: &mut DAppEnvironment,
	tx: &InvokeScriptTransaction,
) -> Result<Diff, TransactionError> {
	let chain_id = env.blockchain.chain_id();
	let sender_address = tx.sender.address(chain_id);

	let verifier = crate::drivers::run_sender_verifier(
		env.blockchain,
		env.settings,
		&Transaction::Invoke(tx.clone()),
	)?;
	env.verifier_complexity += verifier.complexity;
	env.scripts_run += verifier.scripts_run;
	let sender_scripted = verifier.scripted;

	let (fee_diff, fee_in_base_units, fee_asset_scripted) =
		crate::drivers::fee_moves(env.blockchain, &tx.sender, tx.fee, &tx.fee_asset, false)?;

	let mut call_stack = Vec::new();
	let executed = execute_dapp(
		env,
		Diff::empty(),
		sender_address,
		tx.sender,
		&tx.dapp,
		&tx.function,
		tx.args.clone(),
		&tx.payments,
		&mut call_stack,
	);

	match executed {
		Ok(FrameOutput { diff, result, deferred_failure: None }) => {
			let issues = result.issues.iter().filter(|i| !is_nft(i)).count() as u64;
			let extra_scripts = sender_scripted as u64 + fee_asset_scripted as u64;
			let version = env.root_version.unwrap_or(StdLibVersion::V5);
			let details = invoke_fee(env.spent_complexity, version, issues, extra_scripts);
			env.trace.push(TraceStep::MinFee { computed: details.min_fee });
			if fee_in_base_units < details.min_fee {
				let failure = FailedTransactionError::FeeForActions {
					message: format!(
						"Fee in {} for InvokeScriptTransaction ({fee_in_base_units} in base units) with {} invocation steps does not exceed minimal value of {} base units",
						tx.fee_asset, details.steps, details.min_fee
					),
					complexity: env.spent_complexity,
					min_fee: details.min_fee,
				};
				return failed_diff(env, tx, fee_diff, Diff::empty(), failure)
			}

			let total = diff.combine(fee_diff).map_err(|_| RejectError::OverflowError)?;
			validate_balances(env.blockchain, &total)?;
			let total = bind_invoke_transaction(env, tx, total, true, result);
			debug!(tx = %tx.id, spent = env.spent_complexity, "invoke diff assembled");
			Ok(total)
		},
		Ok(FrameOutput { diff, result: _, deferred_failure: Some(failure) }) =>
			failed_diff(env, tx, fee_diff, diff, failure),
		Err(TransactionError::Failed(failure)) =>
			failed_diff(env, tx, fee_diff, Diff::empty(), failure),
		Err(rejected) => Err(rejected),
	}
}

/// The fail-for-fee path: the transaction enters the block unapplied. The
/// diff carries the fee (plus, on the legacy path, the partial mutations);
/// the failure is recorded in the script result and the trace.
fn failed_diff(
	env: &mut DAppEnvironment,
	tx: &InvokeScriptTransaction,
	fee_diff: Diff,
	partial: Diff,
	failure: FailedTransactionError,
) -> Result<Diff, TransactionError> {
	let diff = partial.combine(fee_diff).map_err(|_| RejectError::OverflowError)?;
	validate_balances(env.blockchain, &diff)?;
	let result = InvokeScriptResult::with_error(failure.to_string());
	let diff = bind_invoke_transaction(env, tx, diff, false, result);
	debug!(tx = %tx.id, error = %failure, "invoke failed for fee");
	Ok(diff)
}

#[allow(clippy::too_many_arguments)]
fn execute_dapp(
	env: &mut DAppEnvironment,
	incoming: Diff,
	caller_address: Address,
	caller_public_key: PublicKey,
	dapp: &AddressOrAlias,
	function: &str,
	args: Vec<Value>,
	payments: &[Payment],
	call_stack: &mut Vec<Address>,
) -> Result<FrameOutput, TransactionError> {
	let chain_id = env.blockchain.chain_id();
	let view = CompositeBlockchain::new(env.blockchain, incoming.clone());

	let dapp_address =
		view.resolve_recipient(dapp).ok_or_else(|| reject_unresolved(dapp))?;

	if call_stack.len() as u32 > env.settings.max_sync_dapp_calls {
		return Err(TransactionError::generic(format!(
			"DApp calls limit = {} is exceeded",
			env.settings.max_sync_dapp_calls
		)))
	}

	let script_info = view.account_script(&dapp_address).ok_or_else(|| {
		TransactionError::generic(format!("No contract at address {dapp_address}"))
	})?;
	let dapp_public_key = script_info.public_key;
	let dapp_script = script_info.script.as_dapp().ok_or_else(|| {
		TransactionError::generic(format!(
			"Trying to call a function on the expression script at {dapp_address}"
		))
	})?;
	let version = dapp_script.stdlib_version;
	if env.root_version.is_none() {
		env.root_version = Some(version);
	}

	if call_stack.contains(&dapp_address) && !dapp_script.allow_reentrancy {
		return Err(TransactionError::Rejected(RejectError::ReentrancyDisallowed))
	}

	validate_payments(env, &view, version, caller_address, dapp_address, payments)?;

	let callable = dapp_script.callable(function).ok_or_else(|| {
		TransactionError::generic(format!("Callable function '{function}' not found"))
	})?;
	if callable.arg_names.len() != args.len() {
		return Err(TransactionError::generic(format!(
			"Callable function '{function}' takes {} args but {} were provided",
			callable.arg_names.len(),
			args.len()
		)))
	}

	// Payments move before the callable runs and are visible to it.
	let mut own = Diff::empty();
	let mut working = incoming;
	for payment in payments {
		// Built by merge: a self-payment must not collapse the two legs.
		let payment_diff =
			Diff::from_portfolio(caller_address, asset_portfolio(&payment.asset, -payment.amount))
				.combine(Diff::from_portfolio(
					dapp_address,
					asset_portfolio(&payment.asset, payment.amount),
				))
				.map_err(|_| RejectError::OverflowError)?;
		(own, working) = apply(own, working, payment_diff)?;
		if let Asset::IssuedAsset(asset_id) = &payment.asset {
			let pseudo = PseudoTx::Transfer {
				sender: caller_address,
				sender_public_key: caller_public_key,
				recipient: AddressOrAlias::Address(dapp_address),
				asset: payment.asset.clone(),
				amount: payment.amount,
				tx_id: env.root.id.clone(),
				timestamp: env.root.timestamp,
			};
			verify_asset_script(env, &working, asset_id, &pseudo)?;
		}
	}

	let context =
		script_context(env.blockchain, env.settings, version, Some(env.root.id.clone()))
			.bind("this", values::address(&dapp_address))
			.bind("i", invocation_value(&caller_address, &caller_public_key, payments, env.root));

	let budget = TOTAL_COMPLEXITY_LIMIT.saturating_sub(env.spent_complexity);
	let evaluation = evaluate_dapp_function(dapp_script, callable, args, &context, budget, true);
	env.spent_complexity += evaluation.spent_complexity;
	env.scripts_run += 1;
	env.trace.push(TraceStep::InvokeScript {
		dapp: dapp_address,
		function: function.to_owned(),
		outcome: evaluation.result.as_ref().map(|_| ()).map_err(|e| e.to_string()),
		log: evaluation.log.clone(),
	});

	let value = match evaluation.result {
		Ok(value) => value,
		Err(error) =>
			return Err(TransactionError::Failed(FailedTransactionError::DAppExecution {
				message: error.to_string(),
				complexity: env.spent_complexity,
				log: evaluation.log,
			})),
	};

	let actions = actions_from_value(&value, version, chain_id).map_err(|message| {
		TransactionError::Failed(FailedTransactionError::DAppExecution {
			message,
			complexity: env.spent_complexity,
			log: Vec::new(),
		})
	})?;

	// The action fold proper: left-to-right, every action sees the writes of
	// all earlier ones through the composite view.
	let mut result = InvokeScriptResult::default();
	let mut cancelled_leases = BTreeSet::new();
	call_stack.push(dapp_address);
	for (action_index, action) in actions.into_iter().enumerate() {
		let step = apply_action(
			env,
			&mut result,
			&mut cancelled_leases,
			version,
			dapp_address,
			dapp_public_key,
			action,
			action_index as u32,
			call_stack,
			&working,
		);
		match step {
			Ok(action_diff) => {
				(own, working) = apply(own, working, action_diff)?;
			},
			Err(ActionFailure::Fatal(error)) => {
				call_stack.pop();
				return Err(error)
			},
			Err(ActionFailure::DeferredWithState(action_diff, failure)) => {
				call_stack.pop();
				let (own, _) = apply(own, working, action_diff)?;
				return Ok(FrameOutput { diff: own, result, deferred_failure: Some(failure) })
			},
		}
	}
	call_stack.pop();

	enforce_fold_limits(env, version, &result, &own, dapp_address)?;

	Ok(FrameOutput { diff: own, result, deferred_failure: None })
}

/// What one action produced, or how it failed.
enum ActionFailure {
	Fatal(TransactionError),
	/// Legacy semantics: the failure consumes the fee but its mutations
	/// still land in the diff.
	DeferredWithState(Diff, FailedTransactionError),
}

#[allow(clippy::too_many_arguments)]
fn apply_action(
	env: &mut DAppEnvironment,
	result: &mut InvokeScriptResult,
	cancelled_leases: &mut BTreeSet<ByteStr>,
	version: StdLibVersion,
	dapp_address: Address,
	dapp_public_key: PublicKey,
	action: CallableAction,
	action_index: u32,
	call_stack: &mut Vec<Address>,
	working: &Diff,
) -> Result<Diff, ActionFailure> {
	let view = CompositeBlockchain::new(env.blockchain, working.clone());
	let transfers_check = env.settings.transfers_check_active(env.blockchain.height());
	match action {
		CallableAction::Transfer { recipient, amount, asset } => {
			if amount < 0 {
				let message = format!("Negative transfer amount = {amount}");
				return Err(negative_amount_failure(env, transfers_check, message))
			}
			let to = view
				.resolve_recipient(&recipient)
				.ok_or_else(|| ActionFailure::Fatal(reject_unresolved(&recipient)))?;
			if let Asset::IssuedAsset(asset_id) = &asset {
				if view.asset_description(asset_id).is_none() {
					return Err(ActionFailure::Fatal(TransactionError::Rejected(
						RejectError::UnissuedAsset(asset_id.clone()),
					)))
				}
				let pseudo = PseudoTx::Transfer {
					sender: dapp_address,
					sender_public_key: dapp_public_key,
					recipient: recipient.clone(),
					asset: asset.clone(),
					amount,
					tx_id: env.root.id.clone(),
					timestamp: env.root.timestamp,
				};
				verify_asset_script(env, working, asset_id, &pseudo)
					.map_err(ActionFailure::Fatal)?;
			}
			result.transfers.push(ResultTransfer { address: to, asset: asset.clone(), amount });
			Diff::from_portfolio(dapp_address, asset_portfolio(&asset, -amount))
				.combine(Diff::from_portfolio(to, asset_portfolio(&asset, amount)))
				.map_err(|_| {
					ActionFailure::Fatal(TransactionError::Rejected(RejectError::OverflowError))
				})
		},

		CallableAction::Data(entry) => {
			if entry.key.is_empty() && version >= StdLibVersion::V4 {
				return Err(ActionFailure::Fatal(TransactionError::generic(
					"Data entry key should not be empty",
				)))
			}
			let max_key = max_key_size(version);
			if entry.key.len() > max_key {
				let message =
					format!("Data entry key size = {} bytes exceeds {max_key}", entry.key.len());
				return Err(if transfers_check {
					ActionFailure::Fatal(TransactionError::generic(message))
				} else {
					ActionFailure::Fatal(TransactionError::Failed(
						FailedTransactionError::DAppExecution {
							message,
							complexity: env.spent_complexity,
							log: Vec::new(),
						},
					))
				})
			}
			result.data.push(entry.clone());
			Ok(Diff {
				account_data: BTreeMap::from([(
					dapp_address,
					BTreeMap::from([(entry.key.clone(), entry)]),
				)]),
				..Default::default()
			})
		},

		CallableAction::Issue { name, description, quantity, decimals, reissuable, nonce } => {
			if quantity < 0 {
				let message = format!("Negative issue quantity = {quantity}");
				return Err(negative_amount_failure(env, transfers_check, message))
			}
			let asset_id = issued_asset_id(
				&env.root.id,
				action_index,
				&name,
				&description,
				decimals,
				reissuable,
				nonce,
			);
			if view.asset_description(&asset_id).is_some() {
				return Err(if transfers_check {
					ActionFailure::Fatal(TransactionError::Rejected(
						RejectError::AssetAlreadyExists(asset_id),
					))
				} else {
					ActionFailure::Fatal(TransactionError::Failed(
						FailedTransactionError::DAppExecution {
							message: format!("Asset {asset_id} is already issued"),
							complexity: env.spent_complexity,
							log: Vec::new(),
						},
					))
				})
			}
			let nft = quantity == 1 && decimals == 0 && !reissuable;
			result.issues.push(ResultIssue {
				asset_id: asset_id.clone(),
				name: name.clone(),
				description: description.clone(),
				quantity,
				decimals,
				reissuable,
			});
			Ok(Diff {
				issued_assets: BTreeMap::from([(
					asset_id.clone(),
					NewAssetInfo {
						static_info: AssetStaticInfo {
							source_tx: env.root.id.clone(),
							issuer: dapp_public_key,
							decimals,
							nft,
						},
						info: AssetInfo {
							name,
							description,
							last_updated_height: env.blockchain.height(),
						},
						volume: AssetVolumeInfo {
							is_reissuable: reissuable,
							delta: quantity as i128,
						},
					},
				)]),
				portfolios: BTreeMap::from([(dapp_address, Portfolio::asset(asset_id, quantity))]),
				..Default::default()
			})
		},

		CallableAction::Reissue { asset_id, quantity, reissuable } => {
			if quantity < 0 {
				let message = format!("Negative reissue quantity = {quantity}");
				return Err(negative_amount_failure(env, transfers_check, message))
			}
			let description = view.asset_description(&asset_id).ok_or_else(|| {
				ActionFailure::Fatal(TransactionError::Rejected(RejectError::UnissuedAsset(
					asset_id.clone(),
				)))
			})?;
			if description.issuer != dapp_public_key {
				return Err(ActionFailure::Fatal(TransactionError::generic(
					"Asset was issued by other address",
				)))
			}
			if !description.reissuable {
				return Err(ActionFailure::Fatal(TransactionError::generic(
					"Asset is not reissuable",
				)))
			}
			verify_asset_script(
				env,
				working,
				&asset_id,
				&PseudoTx::Reissue {
					sender: dapp_address,
					sender_public_key: dapp_public_key,
					asset_id: asset_id.clone(),
					quantity,
					reissuable,
					tx_id: env.root.id.clone(),
					timestamp: env.root.timestamp,
				},
			)
			.map_err(ActionFailure::Fatal)?;
			result.reissues.push(ResultReissue {
				asset_id: asset_id.clone(),
				quantity,
				reissuable,
			});
			Ok(Diff {
				updated_assets: BTreeMap::from([(
					asset_id.clone(),
					Ior::Right(AssetVolumeInfo {
						is_reissuable: reissuable,
						delta: quantity as i128,
					}),
				)]),
				portfolios: BTreeMap::from([(dapp_address, Portfolio::asset(asset_id, quantity))]),
				..Default::default()
			})
		},

		CallableAction::Burn { asset_id, quantity } => {
			if quantity < 0 {
				let message = format!("Negative burn quantity = {quantity}");
				if transfers_check {
					return Err(ActionFailure::Fatal(TransactionError::Rejected(
						RejectError::NegativeAmount(message),
					)))
				}
				// Legacy semantics: the negative burn flows through the
				// reissue path, its mutations land, the fee is consumed.
				let partial = Diff {
					updated_assets: BTreeMap::from([(
						asset_id.clone(),
						Ior::Right(AssetVolumeInfo {
							is_reissuable: true,
							delta: -(quantity as i128),
						}),
					)]),
					portfolios: BTreeMap::from([(
						dapp_address,
						Portfolio::asset(asset_id, -quantity),
					)]),
					..Default::default()
				};
				return Err(ActionFailure::DeferredWithState(
					partial,
					FailedTransactionError::DAppExecution {
						message,
						complexity: env.spent_complexity,
						log: Vec::new(),
					},
				))
			}
			if view.asset_description(&asset_id).is_none() {
				return Err(ActionFailure::Fatal(TransactionError::Rejected(
					RejectError::UnissuedAsset(asset_id.clone()),
				)))
			}
			verify_asset_script(
				env,
				working,
				&asset_id,
				&PseudoTx::Burn {
					sender: dapp_address,
					sender_public_key: dapp_public_key,
					asset_id: asset_id.clone(),
					quantity,
					tx_id: env.root.id.clone(),
					timestamp: env.root.timestamp,
				},
			)
			.map_err(ActionFailure::Fatal)?;
			result.burns.push(ResultBurn { asset_id: asset_id.clone(), quantity });
			Ok(Diff {
				updated_assets: BTreeMap::from([(
					asset_id.clone(),
					Ior::Right(AssetVolumeInfo {
						is_reissuable: true,
						delta: -(quantity as i128),
					}),
				)]),
				portfolios: BTreeMap::from([(
					dapp_address,
					Portfolio::asset(asset_id, -quantity),
				)]),
				..Default::default()
			})
		},

		CallableAction::SponsorFee { asset_id, min_sponsored_fee } => {
			if let Some(fee) = min_sponsored_fee {
				if fee < 0 {
					let message = format!("Negative sponsor amount = {fee}");
					return Err(negative_amount_failure(env, transfers_check, message))
				}
			}
			let description = view.asset_description(&asset_id).ok_or_else(|| {
				ActionFailure::Fatal(TransactionError::Rejected(RejectError::UnissuedAsset(
					asset_id.clone(),
				)))
			})?;
			if description.issuer != dapp_public_key {
				return Err(ActionFailure::Fatal(TransactionError::generic(
					"SponsorFee is available only for assets issued by the dApp",
				)))
			}
			verify_asset_script(
				env,
				working,
				&asset_id,
				&PseudoTx::SponsorFee {
					sender: dapp_address,
					sender_public_key: dapp_public_key,
					asset_id: asset_id.clone(),
					min_sponsored_fee,
					tx_id: env.root.id.clone(),
					timestamp: env.root.timestamp,
				},
			)
			.map_err(ActionFailure::Fatal)?;
			result.sponsor_fees.push(ResultSponsorFee {
				asset_id: asset_id.clone(),
				min_sponsored_fee,
			});
			Ok(Diff {
				sponsorship: BTreeMap::from([(
					asset_id,
					Sponsorship::Value(min_sponsored_fee.unwrap_or(0)),
				)]),
				..Default::default()
			})
		},

		CallableAction::Lease { recipient, amount, nonce } => {
			if amount < 0 {
				let message = format!("Negative lease amount = {amount}");
				return Err(negative_amount_failure(env, transfers_check, message))
			}
			if amount == 0 {
				return Err(ActionFailure::Fatal(TransactionError::Rejected(
					RejectError::NonPositiveAmount { amount, of: "waves".to_owned() },
				)))
			}
			let to = view
				.resolve_recipient(&recipient)
				.ok_or_else(|| ActionFailure::Fatal(reject_unresolved(&recipient)))?;
			if to == dapp_address {
				return Err(ActionFailure::Fatal(TransactionError::generic(
					"Cannot lease to self",
				)))
			}
			let lease_id =
				hashing::lease_id(&env.root.id, nonce as u32, &recipient.to_bytes(), amount);
			if view.lease_details(&lease_id).is_some() {
				return Err(ActionFailure::Fatal(TransactionError::generic(format!(
					"Lease with id {lease_id} already exists"
				))))
			}
			result.leases.push(ResultLease {
				lease_id: lease_id.clone(),
				recipient: recipient.clone(),
				amount,
			});
			Ok(Diff {
				lease_state: BTreeMap::from([(
					lease_id,
					LeaseDetails {
						sender: dapp_public_key,
						recipient,
						amount,
						status: LeaseStatus::Active,
						source_tx: env.root.id.clone(),
						height: env.blockchain.height(),
					},
				)]),
				portfolios: BTreeMap::from([
					(
						dapp_address,
						Portfolio::leased(LeaseBalance { lease_in: 0, lease_out: amount }),
					),
					(to, Portfolio::leased(LeaseBalance { lease_in: amount, lease_out: 0 })),
				]),
				..Default::default()
			})
		},

		CallableAction::LeaseCancel { lease_id } => {
			if !cancelled_leases.insert(lease_id.clone()) {
				return Err(ActionFailure::Fatal(TransactionError::Failed(
					FailedTransactionError::DAppExecution {
						message: format!("Duplicate LeaseCancel id(s): {lease_id}"),
						complexity: env.spent_complexity,
						log: Vec::new(),
					},
				)))
			}
			let details = view.lease_details(&lease_id).ok_or_else(|| {
				ActionFailure::Fatal(TransactionError::generic(format!(
					"Lease with id {lease_id} not found"
				)))
			})?;
			if !details.is_active() {
				return Err(ActionFailure::Fatal(TransactionError::generic(format!(
					"Cannot cancel already cancelled lease {lease_id}"
				))))
			}
			if details.sender != dapp_public_key {
				return Err(ActionFailure::Fatal(TransactionError::generic(
					"LeaseCancel can be performed only by the lease sender",
				)))
			}
			let to = view
				.resolve_recipient(&details.recipient)
				.ok_or_else(|| ActionFailure::Fatal(reject_unresolved(&details.recipient)))?;
			result.lease_cancels.push(ResultLeaseCancel { lease_id: lease_id.clone() });
			Ok(Diff {
				lease_state: BTreeMap::from([(
					lease_id,
					LeaseDetails {
						status: LeaseStatus::Cancelled { at_height: env.blockchain.height() },
						..details.clone()
					},
				)]),
				portfolios: BTreeMap::from([
					(
						dapp_address,
						Portfolio::leased(LeaseBalance {
							lease_in: 0,
							lease_out: -details.amount,
						}),
					),
					(
						to,
						Portfolio::leased(LeaseBalance {
							lease_in: -details.amount,
							lease_out: 0,
						}),
					),
				]),
				..Default::default()
			})
		},

		CallableAction::Invoke { dapp, function, args, payments } => {
			let output = execute_dapp(
				env,
				working.clone(),
				dapp_address,
				dapp_public_key,
				&dapp,
				&function,
				args.clone(),
				&payments,
				call_stack,
			)
			.map_err(ActionFailure::Fatal)?;
			if let Some(failure) = output.deferred_failure {
				return Err(ActionFailure::DeferredWithState(output.diff, failure))
			}
			let nested_dapp = view
				.resolve_recipient(&dapp)
				.ok_or_else(|| ActionFailure::Fatal(reject_unresolved(&dapp)))?;
			result.invokes.push(ResultInvoke {
				dapp: nested_dapp,
				function,
				args,
				payments,
				state_changes: Box::new(output.result),
			});
			Ok(output.diff)
		},
	}
}

fn negative_amount_failure(
	env: &DAppEnvironment,
	transfers_check: bool,
	message: String,
) -> ActionFailure {
	if transfers_check {
		ActionFailure::Fatal(TransactionError::Rejected(RejectError::NegativeAmount(message)))
	} else {
		ActionFailure::Fatal(TransactionError::Failed(FailedTransactionError::DAppExecution {
			message,
			complexity: env.spent_complexity,
			log: Vec::new(),
		}))
	}
}

fn enforce_fold_limits(
	env: &DAppEnvironment,
	version: StdLibVersion,
	result: &InvokeScriptResult,
	own: &Diff,
	dapp_address: Address,
) -> Result<(), TransactionError> {
	let action_count = result.transfers.len() +
		result.issues.len() +
		result.reissues.len() +
		result.burns.len() +
		result.sponsor_fees.len() +
		result.leases.len() +
		result.lease_cancels.len();
	if action_count > max_callable_actions(version) {
		return Err(TransactionError::generic(format!(
			"Too many script actions: {action_count} exceeds {}",
			max_callable_actions(version)
		)))
	}
	if result.data.len() > max_write_set_size(version) {
		return Err(TransactionError::generic(format!(
			"WriteSet can not contain more than {} entries",
			max_write_set_size(version)
		)))
	}

	let height = env.blockchain.height();
	let total_bytes: usize = own
		.account_data
		.get(&dapp_address)
		.map(|entries| entries.values().map(|e| e.payload_size()).sum())
		.unwrap_or(0);
	if total_bytes > MAX_TOTAL_WRITE_SET_SIZE_BYTES {
		if env.settings.transfers_check_active(height) {
			return Err(TransactionError::Rejected(RejectError::WriteSetTooLarge {
				size: total_bytes,
				limit: MAX_TOTAL_WRITE_SET_SIZE_BYTES,
			}))
		}
		if env.settings.data_entries_bytes_check_active(height) {
			return Err(TransactionError::Failed(FailedTransactionError::DAppExecution {
				message: format!(
					"WriteSet size {total_bytes} bytes exceeds {MAX_TOTAL_WRITE_SET_SIZE_BYTES}"
				),
				complexity: env.spent_complexity,
				log: Vec::new(),
			}))
		}
	}
	Ok(())
}

fn validate_payments(
	env: &DAppEnvironment,
	view: &CompositeBlockchain,
	version: StdLibVersion,
	caller_address: Address,
	dapp_address: Address,
	payments: &[Payment],
) -> Result<(), TransactionError> {
	if payments.len() > max_payments(version) {
		return Err(TransactionError::generic(format!(
			"Attached payment count = {} exceeds {}",
			payments.len(),
			max_payments(version)
		)))
	}
	if !payments.is_empty() &&
		caller_address == dapp_address &&
		env.settings.disallow_self_payment &&
		version >= StdLibVersion::V4
	{
		return Err(TransactionError::generic("DApp self-payment is forbidden since V4"))
	}
	for payment in payments {
		if payment.amount <= 0 {
			return Err(TransactionError::Rejected(RejectError::NonPositiveAmount {
				amount: payment.amount,
				of: payment.asset.to_string(),
			}))
		}
		if let Asset::IssuedAsset(asset_id) = &payment.asset {
			if view.asset_description(asset_id).is_none() {
				return Err(TransactionError::Rejected(RejectError::UnissuedAsset(
					asset_id.clone(),
				)))
			}
		}
	}
	Ok(())
}

/// Run the asset's script against a pseudo-transaction; only `true` allows
/// the action through.
fn verify_asset_script(
	env: &mut DAppEnvironment,
	working: &Diff,
	asset_id: &ByteStr,
	pseudo: &PseudoTx,
) -> Result<(), TransactionError> {
	let view = CompositeBlockchain::new(env.blockchain, working.clone());
	let Some(script_info) = view.asset_script(asset_id) else { return Ok(()) };

	let context = script_context(
		env.blockchain,
		env.settings,
		script_info.script.stdlib_version,
		Some(pseudo.tx_id().clone()),
	)
	.bind("tx", pseudo.to_value());

	let budget = TOTAL_COMPLEXITY_LIMIT.saturating_sub(env.spent_complexity);
	let evaluation = evaluate_expression(&script_info.script, &context, budget, true);
	env.spent_complexity += evaluation.spent_complexity;
	env.scripts_run += 1;

	match evaluation.result {
		Ok(Value::Bool(true)) => {
			env.trace.push(TraceStep::AssetVerification {
				asset_id: asset_id.clone(),
				outcome: AssetVerifierOutcome::Allowed,
			});
			Ok(())
		},
		Ok(_) => {
			env.trace.push(TraceStep::AssetVerification {
				asset_id: asset_id.clone(),
				outcome: AssetVerifierOutcome::Denied,
			});
			Err(TransactionError::Failed(FailedTransactionError::NotAllowedByAssetInAction {
				complexity: env.spent_complexity,
				log: evaluation.log,
				asset_id: asset_id.clone(),
			}))
		},
		Err(error) => {
			env.trace.push(TraceStep::AssetVerification {
				asset_id: asset_id.clone(),
				outcome: AssetVerifierOutcome::Error(error.to_string()),
			});
			Err(TransactionError::Failed(FailedTransactionError::AssetExecutionInAction {
				message: error.to_string(),
				complexity: env.spent_complexity,
				log: evaluation.log,
				asset_id: asset_id.clone(),
			}))
		},
	}
}

/// Deterministic issued-asset id: a digest over the invocation id, the
/// action position and the issue parameters.
fn issued_asset_id(
	tx_id: &ByteStr,
	index: u32,
	name: &str,
	description: &str,
	decimals: u8,
	reissuable: bool,
	nonce: i64,
) -> ByteStr {
	let mut input = Vec::new();
	input.extend_from_slice(tx_id.as_bytes());
	input.extend_from_slice(&index.to_be_bytes());
	input.extend_from_slice(name.as_bytes());
	input.extend_from_slice(description.as_bytes());
	input.push(decimals);
	input.push(reissuable as u8);
	input.extend_from_slice(&nonce.to_be_bytes());
	ByteStr::from(hashing::blake2b256(&input))
}

fn apply(own: Diff, working: Diff, update: Diff) -> Result<(Diff, Diff), TransactionError> {
	let own = own.combine(update.clone()).map_err(|_| RejectError::OverflowError)?;
	let working = working.combine(update).map_err(|_| RejectError::OverflowError)?;
	Ok((own, working))
}

fn asset_portfolio(asset: &Asset, amount: i64) -> Portfolio {
	match asset {
		Asset::Waves => Portfolio::waves(amount),
		Asset::IssuedAsset(id) => Portfolio::asset(id.clone(), amount),
	}
}

fn reject_unresolved(recipient: &AddressOrAlias) -> TransactionError {
	match recipient {
		AddressOrAlias::Alias(alias) =>
			TransactionError::Rejected(RejectError::AliasDoesNotExist(alias.clone())),
		AddressOrAlias::Address(address) =>
			TransactionError::Rejected(RejectError::InvalidAddress(address.to_string())),
	}
}

/// Every balance the diff touches must stay non-negative on top of the
/// committed snapshot.
pub(crate) fn validate_balances(
	blockchain: &dyn Blockchain,
	diff: &Diff,
) -> Result<(), TransactionError> {
	for (address, portfolio) in &diff.portfolios {
		let resulting = blockchain
			.balance(address, &Asset::Waves)
			.checked_add(portfolio.balance)
			.ok_or(RejectError::OverflowError)?;
		if resulting < 0 {
			return Err(TransactionError::Rejected(RejectError::AccountBalanceError(format!(
				"negative waves balance of {address}: {resulting}"
			))))
		}
		for (asset_id, delta) in &portfolio.assets {
			let resulting = blockchain
				.balance(address, &Asset::IssuedAsset(asset_id.clone()))
				.checked_add(*delta)
				.ok_or(RejectError::OverflowError)?;
			if resulting < 0 {
				return Err(TransactionError::Rejected(RejectError::AccountBalanceError(
					format!("negative balance of asset {asset_id} for {address}: {resulting}"),
				)))
			}
		}
	}
	Ok(())
}

fn bind_invoke_transaction(
	env: &DAppEnvironment,
	tx: &InvokeScriptTransaction,
	mut diff: Diff,
	applied: bool,
	result: InvokeScriptResult,
) -> Diff {
	// `affected` is the union computed after the fold, never before.
	let mut affected: BTreeSet<Address> = diff.portfolios.keys().copied().collect();
	affected.extend(diff.account_data.keys().copied());
	affected.extend(result.called_addresses());
	if let Some(dapp_address) = env.blockchain.resolve_recipient(&tx.dapp) {
		affected.insert(dapp_address);
	}
	diff.transactions.push((
		tx.id.clone(),
		NewTransactionInfo {
			tx: Transaction::Invoke(tx.clone()),
			affected,
			applied,
			spent_complexity: env.spent_complexity,
		},
	));
	diff.scripts_run += env.scripts_run;
	diff.scripts_complexity += env.spent_complexity + env.verifier_complexity;
	diff.script_results.insert(tx.id.clone(), result);
	diff
}

/// NFTs are exempt from the issue fee surcharge.
fn is_nft(issue: &ResultIssue) -> bool {
	issue.quantity == 1 && issue.decimals == 0 && !issue.reissuable
}
