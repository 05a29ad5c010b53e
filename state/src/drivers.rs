//! Per-transaction-kind diff assemblers.
//!
//! Every driver follows the same shape: verify the sender (signature or
//! account script), check static preconditions, build the portfolio and
//! state moves, settle the fee, validate resulting balances, and bind the
//! transaction record with its affected-address set.

use crate::{
	bindings::{script_context, transaction_value},
	blockchain::Blockchain,
	diff::{
		AssetInfo, AssetScriptInfo, AssetStaticInfo, AssetVolumeInfo, Diff, Ior, LeaseBalance,
		LeaseDetails, LeaseStatus, NewAssetInfo, NewTransactionInfo, Portfolio, Sponsorship,
	},
	error::{RejectError, TransactionError},
	fee::base_min_fee,
	invoke::{invoke_script_diff, validate_balances},
	limits::{
		DATA_TX_MAX_BYTES, DATA_TX_MAX_PROTO_BYTES, FEE_UNIT, MAX_ASSET_DESCRIPTION_LENGTH,
		MAX_ASSET_NAME_LENGTH, MAX_DECIMALS, MAX_ENTRY_COUNT, MIN_ASSET_NAME_LENGTH,
		SCRIPT_EXTRA_FEE, TOTAL_COMPLEXITY_LIMIT,
	},
	settings::FunctionalitySettings,
	sponsorship::to_base_units,
	trace::Traced,
	transaction::{
		BurnTransaction, CreateAliasTransaction, DataTransaction, IssueTransaction,
		LeaseCancelTransaction, LeaseTransaction, ReissueTransaction, SponsorFeeTransaction,
		Transaction, TransferTransaction,
	},
};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use waves_lang::{evaluate_dapp_function, evaluate_expression, render_log, Script, Value};
use waves_primitives::{Address, Asset, ByteStr, PublicKey};

/// The single entry point: one transaction in, one diff (or a structured
/// error) out, plus the execution trace.
pub fn transaction_diff(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &Transaction,
) -> Traced<Diff> {
	match tx {
		Transaction::Invoke(invoke) => invoke_script_diff(blockchain, settings, invoke),
		other => Traced::without_trace(plain_diff(blockchain, settings, other)),
	}
}

fn plain_diff(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &Transaction,
) -> Result<Diff, TransactionError> {
	let verifier = run_sender_verifier(blockchain, settings, tx)?;
	debug!(tx = %tx.id(), kind = kind_name(tx), "computing diff");

	let diff = match tx {
		Transaction::Transfer(transfer) =>
			transfer_diff(blockchain, settings, transfer, &verifier)?,
		Transaction::Data(data) => data_diff(blockchain, settings, data, &verifier)?,
		Transaction::Lease(lease) => lease_diff(blockchain, settings, lease, &verifier)?,
		Transaction::LeaseCancel(cancel) =>
			lease_cancel_diff(blockchain, settings, cancel, &verifier)?,
		Transaction::Sponsor(sponsor) => sponsor_diff(blockchain, settings, sponsor, &verifier)?,
		Transaction::Issue(issue) => issue_diff(blockchain, settings, issue, &verifier)?,
		Transaction::Reissue(reissue) => reissue_diff(blockchain, settings, reissue, &verifier)?,
		Transaction::Burn(burn) => burn_diff(blockchain, settings, burn, &verifier)?,
		Transaction::CreateAlias(alias) =>
			create_alias_diff(blockchain, settings, alias, &verifier)?,
		Transaction::Invoke(_) => unreachable!("dispatched in transaction_diff"),
	};
	validate_balances(blockchain, &diff)?;
	Ok(diff)
}

fn kind_name(tx: &Transaction) -> &'static str {
	match tx {
		Transaction::Transfer(_) => "transfer",
		Transaction::Data(_) => "data",
		Transaction::Lease(_) => "lease",
		Transaction::LeaseCancel(_) => "lease-cancel",
		Transaction::Sponsor(_) => "sponsor",
		Transaction::Issue(_) => "issue",
		Transaction::Reissue(_) => "reissue",
		Transaction::Burn(_) => "burn",
		Transaction::CreateAlias(_) => "create-alias",
		Transaction::Invoke(_) => "invoke",
	}
}

/// What running the sender's verifier cost.
pub(crate) struct VerifierRun {
	pub complexity: u64,
	pub scripts_run: u32,
	pub scripted: bool,
}

/// Bare ed25519 check of the first proof against the transaction id.
pub(crate) fn verify_signature(
	sender: &PublicKey,
	id: &ByteStr,
	proofs: &[ByteStr],
) -> Result<(), RejectError> {
	let proof = proofs.first().ok_or(RejectError::InvalidSignature)?;
	let key = VerifyingKey::from_bytes(&sender.0).map_err(|_| RejectError::InvalidSignature)?;
	let signature =
		Signature::from_slice(proof.as_bytes()).map_err(|_| RejectError::InvalidSignature)?;
	key.verify(id.as_bytes(), &signature).map_err(|_| RejectError::InvalidSignature)
}

/// Sender verification: the account script if there is one, the bare
/// signature otherwise. Script falsity or failure rejects the transaction.
pub(crate) fn run_sender_verifier(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &Transaction,
) -> Result<VerifierRun, TransactionError> {
	let sender_address = tx.sender().address(blockchain.chain_id());
	let Some(script_info) = blockchain.account_script(&sender_address) else {
		verify_signature(tx.sender(), tx.id(), tx.proofs())
			.map_err(TransactionError::Rejected)?;
		return Ok(VerifierRun { complexity: 0, scripts_run: 0, scripted: false })
	};

	let tx_value = transaction_value(tx, blockchain.chain_id());
	let evaluation = match &script_info.script {
		Script::Expression(expression) => {
			let context = script_context(
				blockchain,
				settings,
				expression.stdlib_version,
				Some(tx.id().clone()),
			)
			.bind("tx", tx_value);
			evaluate_expression(expression, &context, TOTAL_COMPLEXITY_LIMIT, true)
		},
		Script::DApp(dapp) => match &dapp.verifier {
			Some(verifier) => {
				let context = script_context(
					blockchain,
					settings,
					dapp.stdlib_version,
					Some(tx.id().clone()),
				);
				evaluate_dapp_function(
					dapp,
					verifier,
					vec![tx_value],
					&context,
					TOTAL_COMPLEXITY_LIMIT,
					true,
				)
			},
			// A dApp without a verifier falls back to the bare signature.
			None => {
				verify_signature(tx.sender(), tx.id(), tx.proofs())
					.map_err(TransactionError::Rejected)?;
				return Ok(VerifierRun { complexity: 0, scripts_run: 0, scripted: true })
			},
		},
	};

	match evaluation.result {
		Ok(Value::Bool(true)) => Ok(VerifierRun {
			complexity: evaluation.spent_complexity,
			scripts_run: 1,
			scripted: true,
		}),
		// The rendered log makes the rejection reproducible for the caller.
		Ok(_) => Err(TransactionError::generic(format!(
			"Transaction is not allowed by account script:\n{}",
			render_log(&evaluation.log)
		))),
		Err(error) => Err(TransactionError::generic(format!(
			"Account script failure: {error}\n{}",
			render_log(&evaluation.log)
		))),
	}
}

/// An asset script gating a whole transaction. Any non-`true` outcome
/// rejects.
fn check_asset_script(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	asset_id: &ByteStr,
	tx: &Transaction,
) -> Result<VerifierRun, TransactionError> {
	let Some(script_info) = blockchain.asset_script(asset_id) else {
		return Ok(VerifierRun { complexity: 0, scripts_run: 0, scripted: false })
	};
	let context = script_context(
		blockchain,
		settings,
		script_info.script.stdlib_version,
		Some(tx.id().clone()),
	)
	.bind("tx", transaction_value(tx, blockchain.chain_id()));
	let evaluation =
		evaluate_expression(&script_info.script, &context, TOTAL_COMPLEXITY_LIMIT, true);
	match evaluation.result {
		Ok(Value::Bool(true)) => Ok(VerifierRun {
			complexity: evaluation.spent_complexity,
			scripts_run: 1,
			scripted: true,
		}),
		Ok(_) => Err(TransactionError::generic(format!(
			"Transaction is not allowed by the script of asset {asset_id}"
		))),
		Err(error) => Err(TransactionError::generic(format!(
			"Asset script failure for {asset_id}: {error}"
		))),
	}
}

/// Fee legs: the sender pays in the fee asset; a sponsored fee additionally
/// routes the asset to the issuer who covers the base-unit equivalent.
pub(crate) fn fee_moves(
	blockchain: &dyn Blockchain,
	sender: &PublicKey,
	fee: i64,
	fee_asset: &Asset,
	forbid_scripted_fee_asset: bool,
) -> Result<(Diff, i64, bool), TransactionError> {
	let sender_address = sender.address(blockchain.chain_id());
	match fee_asset {
		Asset::Waves =>
			Ok((Diff::from_portfolio(sender_address, Portfolio::waves(-fee)), fee, false)),
		Asset::IssuedAsset(asset_id) => {
			let description = blockchain
				.asset_description(asset_id)
				.ok_or(RejectError::UnissuedAsset(asset_id.clone()))?;
			if description.sponsorship_rate == 0 {
				return Err(TransactionError::generic(format!(
					"Asset {asset_id} is not sponsored, cannot be used to pay fees"
				)))
			}
			if forbid_scripted_fee_asset && description.script.is_some() {
				return Err(TransactionError::generic(format!(
					"Sponsored fee in the scripted asset {asset_id} is not allowed"
				)))
			}
			let fee_in_base_units = to_base_units(fee, description.sponsorship_rate)
				.map_err(TransactionError::Rejected)?;
			let issuer = description.issuer.address(blockchain.chain_id());
			let diff =
				Diff::from_portfolio(sender_address, Portfolio::asset(asset_id.clone(), -fee))
					.combine(Diff::from_portfolio(
						issuer,
						Portfolio {
							balance: -fee_in_base_units,
							assets: BTreeMap::from([(asset_id.clone(), fee)]),
							..Default::default()
						},
					))
					.map_err(|_| RejectError::OverflowError)?;
			Ok((diff, fee_in_base_units, description.script.is_some()))
		},
	}
}

/// Flat-fee check shared by the non-invoke drivers: attached fee in base
/// units must cover the kind minimum plus one surcharge per script run.
fn check_min_fee(
	tx: &Transaction,
	fee_in_base_units: i64,
	script_runs: u32,
) -> Result<(), TransactionError> {
	let min_fee = base_min_fee(tx) + SCRIPT_EXTRA_FEE * FEE_UNIT * script_runs as i64;
	if fee_in_base_units < min_fee {
		return Err(TransactionError::Rejected(RejectError::InsufficientFee(format!(
			"Fee {fee_in_base_units} in base units does not exceed minimal value of {min_fee}"
		))))
	}
	Ok(())
}

fn bind_transaction(tx: &Transaction, mut diff: Diff, verifier: &VerifierRun, extra: VerifierRun) -> Diff {
	let mut affected: BTreeSet<Address> = diff.portfolios.keys().copied().collect();
	affected.extend(diff.account_data.keys().copied());
	diff.transactions.push((
		tx.id().clone(),
		NewTransactionInfo {
			tx: tx.clone(),
			affected,
			applied: true,
			spent_complexity: verifier.complexity + extra.complexity,
		},
	));
	diff.scripts_run += verifier.scripts_run + extra.scripts_run;
	diff.scripts_complexity += verifier.complexity + extra.complexity;
	diff
}

const NO_EXTRA_SCRIPTS: VerifierRun =
	VerifierRun { complexity: 0, scripts_run: 0, scripted: false };

fn transfer_diff(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &TransferTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	if tx.amount <= 0 {
		return Err(TransactionError::Rejected(RejectError::NonPositiveAmount {
			amount: tx.amount,
			of: tx.asset.to_string(),
		}))
	}
	// The historical fee+amount overflow check predates dApp activation.
	if !settings.ride4dapps_active(blockchain.height()) &&
		tx.asset == tx.fee_asset &&
		tx.amount.checked_add(tx.fee).is_none()
	{
		return Err(TransactionError::Rejected(RejectError::OverflowError))
	}

	let recipient = blockchain
		.resolve_recipient(&tx.recipient)
		.ok_or_else(|| unresolved(&tx.recipient))?;

	let asset_check = match &tx.asset {
		Asset::IssuedAsset(asset_id) => {
			if blockchain.asset_description(asset_id).is_none() {
				return Err(TransactionError::Rejected(RejectError::UnissuedAsset(
					asset_id.clone(),
				)))
			}
			check_asset_script(blockchain, settings, asset_id, &Transaction::Transfer(tx.clone()))?
		},
		Asset::Waves => NO_EXTRA_SCRIPTS,
	};

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &tx.fee_asset, true)?;
	check_min_fee(
		&Transaction::Transfer(tx.clone()),
		fee_in_base_units,
		verifier.scripts_run + asset_check.scripts_run,
	)?;

	let sender_address = tx.sender.address(blockchain.chain_id());
	// Built by merge: a self-transfer must not collapse the two legs.
	let moves = Diff::from_portfolio(sender_address, asset_portfolio(&tx.asset, -tx.amount))
		.combine(Diff::from_portfolio(recipient, asset_portfolio(&tx.asset, tx.amount)))
		.map_err(|_| RejectError::OverflowError)?;
	let diff = moves.combine(fee_diff).map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::Transfer(tx.clone()), diff, verifier, asset_check))
}

fn data_diff(
	blockchain: &dyn Blockchain,
	_settings: &FunctionalitySettings,
	tx: &DataTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	if tx.entries.len() > MAX_ENTRY_COUNT {
		return Err(TransactionError::generic(format!(
			"Data transaction can not contain more than {MAX_ENTRY_COUNT} entries"
		)))
	}
	let mut seen = BTreeSet::new();
	let max_key = if tx.version >= 2 { 400 } else { 100 };
	for entry in &tx.entries {
		if entry.key.is_empty() && tx.version >= 2 {
			return Err(TransactionError::generic("Data entry key should not be empty"))
		}
		if entry.key.len() > max_key {
			return Err(TransactionError::generic(format!(
				"Data entry key size = {} bytes exceeds {max_key}",
				entry.key.len()
			)))
		}
		if entry.is_delete() && tx.version < 2 {
			return Err(TransactionError::generic(
				"Empty data entries are not allowed by this transaction version",
			))
		}
		if !seen.insert(&entry.key) {
			return Err(TransactionError::generic(format!(
				"Duplicate data entry key '{}'",
				entry.key
			)))
		}
	}
	let total_bytes: usize = tx.entries.iter().map(|e| e.payload_size()).sum();
	let limit = if tx.version >= 2 { DATA_TX_MAX_PROTO_BYTES } else { DATA_TX_MAX_BYTES };
	if total_bytes > limit {
		return Err(TransactionError::Rejected(RejectError::WriteSetTooLarge {
			size: total_bytes,
			limit,
		}))
	}

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(&Transaction::Data(tx.clone()), fee_in_base_units, verifier.scripts_run)?;

	let sender_address = tx.sender.address(blockchain.chain_id());
	let entries =
		tx.entries.iter().map(|entry| (entry.key.clone(), entry.clone())).collect();
	let diff = Diff {
		account_data: BTreeMap::from([(sender_address, entries)]),
		..Default::default()
	}
	.combine(fee_diff)
	.map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::Data(tx.clone()), diff, verifier, NO_EXTRA_SCRIPTS))
}

fn lease_diff(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &LeaseTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	if tx.amount <= 0 {
		return Err(TransactionError::Rejected(RejectError::NonPositiveAmount {
			amount: tx.amount,
			of: "waves".to_owned(),
		}))
	}
	if !settings.ride4dapps_active(blockchain.height()) && tx.amount.checked_add(tx.fee).is_none()
	{
		return Err(TransactionError::Rejected(RejectError::OverflowError))
	}
	let sender_address = tx.sender.address(blockchain.chain_id());
	let recipient = blockchain
		.resolve_recipient(&tx.recipient)
		.ok_or_else(|| unresolved(&tx.recipient))?;
	if recipient == sender_address {
		return Err(TransactionError::generic("Cannot lease to self"))
	}
	if blockchain.spendable_balance(&sender_address) < tx.amount + tx.fee {
		return Err(TransactionError::Rejected(RejectError::AccountBalanceError(
			"Cannot lease more than own spendable balance".to_owned(),
		)))
	}

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(&Transaction::Lease(tx.clone()), fee_in_base_units, verifier.scripts_run)?;

	let diff = Diff {
		lease_state: BTreeMap::from([(
			tx.id.clone(),
			LeaseDetails {
				sender: tx.sender,
				recipient: tx.recipient.clone(),
				amount: tx.amount,
				status: LeaseStatus::Active,
				source_tx: tx.id.clone(),
				height: blockchain.height(),
			},
		)]),
		portfolios: BTreeMap::from([
			(
				sender_address,
				Portfolio::leased(LeaseBalance { lease_in: 0, lease_out: tx.amount }),
			),
			(recipient, Portfolio::leased(LeaseBalance { lease_in: tx.amount, lease_out: 0 })),
		]),
		..Default::default()
	}
	.combine(fee_diff)
	.map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::Lease(tx.clone()), diff, verifier, NO_EXTRA_SCRIPTS))
}

fn lease_cancel_diff(
	blockchain: &dyn Blockchain,
	_settings: &FunctionalitySettings,
	tx: &LeaseCancelTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	let details = blockchain.lease_details(&tx.lease_id).ok_or_else(|| {
		TransactionError::generic(format!("Lease with id {} not found", tx.lease_id))
	})?;
	if !details.is_active() {
		return Err(TransactionError::generic(format!(
			"Cannot cancel already cancelled lease {}",
			tx.lease_id
		)))
	}
	if details.sender != tx.sender {
		return Err(TransactionError::generic(
			"LeaseCancel can be performed only by the lease sender",
		))
	}
	let sender_address = tx.sender.address(blockchain.chain_id());
	let recipient = blockchain
		.resolve_recipient(&details.recipient)
		.ok_or_else(|| unresolved(&details.recipient))?;

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(&Transaction::LeaseCancel(tx.clone()), fee_in_base_units, verifier.scripts_run)?;

	let diff = Diff {
		lease_state: BTreeMap::from([(
			tx.lease_id.clone(),
			LeaseDetails {
				status: LeaseStatus::Cancelled { at_height: blockchain.height() },
				..details.clone()
			},
		)]),
		portfolios: BTreeMap::from([
			(
				sender_address,
				Portfolio::leased(LeaseBalance { lease_in: 0, lease_out: -details.amount }),
			),
			(
				recipient,
				Portfolio::leased(LeaseBalance { lease_in: -details.amount, lease_out: 0 }),
			),
		]),
		..Default::default()
	}
	.combine(fee_diff)
	.map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::LeaseCancel(tx.clone()), diff, verifier, NO_EXTRA_SCRIPTS))
}

fn sponsor_diff(
	blockchain: &dyn Blockchain,
	_settings: &FunctionalitySettings,
	tx: &SponsorFeeTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	let description = blockchain
		.asset_description(&tx.asset_id)
		.ok_or(RejectError::UnissuedAsset(tx.asset_id.clone()))?;
	if description.issuer != tx.sender {
		return Err(TransactionError::generic("Asset was issued by other address"))
	}
	if description.script.is_some() {
		return Err(TransactionError::generic("Sponsorship of scripted assets is disabled"))
	}
	if let Some(rate) = tx.min_sponsored_fee {
		if rate <= 0 {
			return Err(TransactionError::Rejected(RejectError::NonPositiveAmount {
				amount: rate,
				of: tx.asset_id.to_string(),
			}))
		}
	}

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(&Transaction::Sponsor(tx.clone()), fee_in_base_units, verifier.scripts_run)?;

	let diff = Diff {
		sponsorship: BTreeMap::from([(
			tx.asset_id.clone(),
			Sponsorship::Value(tx.min_sponsored_fee.unwrap_or(0)),
		)]),
		..Default::default()
	}
	.combine(fee_diff)
	.map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::Sponsor(tx.clone()), diff, verifier, NO_EXTRA_SCRIPTS))
}

fn issue_diff(
	blockchain: &dyn Blockchain,
	_settings: &FunctionalitySettings,
	tx: &IssueTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	if tx.quantity <= 0 {
		return Err(TransactionError::Rejected(RejectError::NonPositiveAmount {
			amount: tx.quantity,
			of: tx.name.clone(),
		}))
	}
	if tx.name.len() < MIN_ASSET_NAME_LENGTH || tx.name.len() > MAX_ASSET_NAME_LENGTH {
		return Err(TransactionError::generic("Invalid asset name length"))
	}
	if tx.description.len() > MAX_ASSET_DESCRIPTION_LENGTH {
		return Err(TransactionError::generic("Asset description is too long"))
	}
	if tx.decimals > MAX_DECIMALS {
		return Err(TransactionError::generic(format!(
			"Asset decimals = {} exceeds {MAX_DECIMALS}",
			tx.decimals
		)))
	}

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(&Transaction::Issue(tx.clone()), fee_in_base_units, verifier.scripts_run)?;

	let sender_address = tx.sender.address(blockchain.chain_id());
	let asset_id = tx.id.clone();
	let nft = tx.quantity == 1 && tx.decimals == 0 && !tx.reissuable;
	let mut diff = Diff {
		issued_assets: BTreeMap::from([(
			asset_id.clone(),
			NewAssetInfo {
				static_info: AssetStaticInfo {
					source_tx: tx.id.clone(),
					issuer: tx.sender,
					decimals: tx.decimals,
					nft,
				},
				info: AssetInfo {
					name: tx.name.clone(),
					description: tx.description.clone(),
					last_updated_height: blockchain.height(),
				},
				volume: AssetVolumeInfo {
					is_reissuable: tx.reissuable,
					delta: tx.quantity as i128,
				},
			},
		)]),
		portfolios: BTreeMap::from([(
			sender_address,
			Portfolio::asset(asset_id.clone(), tx.quantity),
		)]),
		..Default::default()
	};
	if let Some(script) = &tx.script {
		diff.asset_scripts.insert(
			asset_id,
			Some(AssetScriptInfo { script: script.clone(), complexity: 0 }),
		);
	}
	let diff = diff.combine(fee_diff).map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::Issue(tx.clone()), diff, verifier, NO_EXTRA_SCRIPTS))
}

fn reissue_diff(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &ReissueTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	if tx.quantity <= 0 {
		return Err(TransactionError::Rejected(RejectError::NonPositiveAmount {
			amount: tx.quantity,
			of: tx.asset_id.to_string(),
		}))
	}
	let description = blockchain
		.asset_description(&tx.asset_id)
		.ok_or(RejectError::UnissuedAsset(tx.asset_id.clone()))?;
	if description.issuer != tx.sender {
		return Err(TransactionError::generic("Asset was issued by other address"))
	}
	if !description.reissuable {
		return Err(TransactionError::generic("Asset is not reissuable"))
	}
	let asset_check =
		check_asset_script(blockchain, settings, &tx.asset_id, &Transaction::Reissue(tx.clone()))?;

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(
		&Transaction::Reissue(tx.clone()),
		fee_in_base_units,
		verifier.scripts_run + asset_check.scripts_run,
	)?;

	let sender_address = tx.sender.address(blockchain.chain_id());
	let diff = Diff {
		updated_assets: BTreeMap::from([(
			tx.asset_id.clone(),
			Ior::Right(AssetVolumeInfo {
				is_reissuable: tx.reissuable,
				delta: tx.quantity as i128,
			}),
		)]),
		portfolios: BTreeMap::from([(
			sender_address,
			Portfolio::asset(tx.asset_id.clone(), tx.quantity),
		)]),
		..Default::default()
	}
	.combine(fee_diff)
	.map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::Reissue(tx.clone()), diff, verifier, asset_check))
}

fn burn_diff(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	tx: &BurnTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	if tx.quantity <= 0 {
		return Err(TransactionError::Rejected(RejectError::NonPositiveAmount {
			amount: tx.quantity,
			of: tx.asset_id.to_string(),
		}))
	}
	if blockchain.asset_description(&tx.asset_id).is_none() {
		return Err(TransactionError::Rejected(RejectError::UnissuedAsset(tx.asset_id.clone())))
	}
	let asset_check =
		check_asset_script(blockchain, settings, &tx.asset_id, &Transaction::Burn(tx.clone()))?;

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(
		&Transaction::Burn(tx.clone()),
		fee_in_base_units,
		verifier.scripts_run + asset_check.scripts_run,
	)?;

	let sender_address = tx.sender.address(blockchain.chain_id());
	let diff = Diff {
		updated_assets: BTreeMap::from([(
			tx.asset_id.clone(),
			Ior::Right(AssetVolumeInfo { is_reissuable: true, delta: -(tx.quantity as i128) }),
		)]),
		portfolios: BTreeMap::from([(
			sender_address,
			Portfolio::asset(tx.asset_id.clone(), -tx.quantity),
		)]),
		..Default::default()
	}
	.combine(fee_diff)
	.map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::Burn(tx.clone()), diff, verifier, asset_check))
}

fn create_alias_diff(
	blockchain: &dyn Blockchain,
	_settings: &FunctionalitySettings,
	tx: &CreateAliasTransaction,
	verifier: &VerifierRun,
) -> Result<Diff, TransactionError> {
	if blockchain.resolve_alias(&tx.alias).is_some() {
		return Err(TransactionError::generic(format!(
			"Alias '{}' is already claimed",
			tx.alias
		)))
	}

	let (fee_diff, fee_in_base_units, _) =
		fee_moves(blockchain, &tx.sender, tx.fee, &Asset::Waves, false)?;
	check_min_fee(&Transaction::CreateAlias(tx.clone()), fee_in_base_units, verifier.scripts_run)?;

	let sender_address = tx.sender.address(blockchain.chain_id());
	let diff = Diff {
		aliases: BTreeMap::from([(tx.alias.clone(), sender_address)]),
		..Default::default()
	}
	.combine(fee_diff)
	.map_err(|_| RejectError::OverflowError)?;
	Ok(bind_transaction(&Transaction::CreateAlias(tx.clone()), diff, verifier, NO_EXTRA_SCRIPTS))
}

fn asset_portfolio(asset: &Asset, amount: i64) -> Portfolio {
	match asset {
		Asset::Waves => Portfolio::waves(amount),
		Asset::IssuedAsset(id) => Portfolio::asset(id.clone(), amount),
	}
}

fn unresolved(recipient: &waves_primitives::AddressOrAlias) -> TransactionError {
	match recipient {
		waves_primitives::AddressOrAlias::Alias(alias) =>
			TransactionError::Rejected(RejectError::AliasDoesNotExist(alias.clone())),
		waves_primitives::AddressOrAlias::Address(address) =>
			TransactionError::Rejected(RejectError::InvalidAddress(address.to_string())),
	}
}
