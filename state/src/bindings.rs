//! Construction of the evaluation environment: the pre-bound context values
//! a script sees (`tx`, `i`, `this`, `height`, `NETWORKBYTE`) and the
//! case-object form of transactions and pseudo-transactions.

use crate::{
	actions::values,
	blockchain::Blockchain,
	settings::FunctionalitySettings,
	transaction::{InvokeScriptTransaction, Transaction, TransferTransaction},
};
use waves_lang::{EvaluationContext, EvaluationFlags, StdLibVersion, Value};
use waves_primitives::{Address, ByteStr};

/// The shared baseline context: version, semantic flags, chain data and the
/// ambient `height`/`NETWORKBYTE` bindings.
pub fn script_context(
	blockchain: &dyn Blockchain,
	settings: &FunctionalitySettings,
	version: StdLibVersion,
	tx_id: Option<ByteStr>,
) -> EvaluationContext {
	let mut context = EvaluationContext::new(version, blockchain.chain_id())
		.with_flags(EvaluationFlags {
			fix_unicode_functions: settings.fix_unicode_functions,
			use_new_pow_precision: settings.use_new_pow_precision,
		})
		.bind("height", Value::Long(blockchain.height() as i64))
		.bind("NETWORKBYTE", Value::ByteStr(ByteStr::from([blockchain.chain_id()])))
		.bind("unit", Value::Unit)
		.bind("nil", Value::List(Vec::new()));
	if let Some(tx_id) = tx_id {
		context = context.with_tx_id(tx_id);
	}
	context
}

/// The `tx` binding for verifier scripts.
pub fn transaction_value(tx: &Transaction, chain_id: u8) -> Value {
	match tx {
		Transaction::Transfer(tx) => transfer_transaction_value(tx, chain_id),
		other => Value::case(
			transaction_type_name(other),
			vec![
				("id".to_owned(), Value::ByteStr(other.id().clone())),
				("fee".to_owned(), Value::Long(other.fee())),
				("timestamp".to_owned(), Value::Long(other.timestamp() as i64)),
				(
					"sender".to_owned(),
					values::address(&other.sender().address(chain_id)),
				),
				(
					"senderPublicKey".to_owned(),
					Value::ByteStr(ByteStr::from(other.sender().0)),
				),
				(
					"proofs".to_owned(),
					Value::List(
						other.proofs().iter().map(|p| Value::ByteStr(p.clone())).collect(),
					),
				),
			],
		),
	}
}

/// Canonical `TransferTransaction` record. Field order is part of the log
/// rendering contract and must not change.
pub fn transfer_transaction_value(tx: &TransferTransaction, chain_id: u8) -> Value {
	Value::case("TransferTransaction", vec![
		("amount".to_owned(), Value::Long(tx.amount)),
		("recipient".to_owned(), values::recipient(&tx.recipient)),
		("assetId".to_owned(), values::asset(&tx.asset)),
		("feeAssetId".to_owned(), values::asset(&tx.fee_asset)),
		("attachment".to_owned(), Value::ByteStr(tx.attachment.clone())),
		("fee".to_owned(), Value::Long(tx.fee)),
		("timestamp".to_owned(), Value::Long(tx.timestamp as i64)),
		("id".to_owned(), Value::ByteStr(tx.id.clone())),
		("sender".to_owned(), values::address(&tx.sender.address(chain_id))),
		("senderPublicKey".to_owned(), Value::ByteStr(ByteStr::from(tx.sender.0))),
		(
			"proofs".to_owned(),
			Value::List(tx.proofs.iter().map(|p| Value::ByteStr(p.clone())).collect()),
		),
	])
}

/// The `i` binding a callable receives. For nested calls the caller is the
/// invoking dApp and the payments are the frame's own, while the transaction
/// id, fee and fee asset always come from the root transaction.
pub fn invocation_value(
	caller: &Address,
	caller_public_key: &waves_primitives::PublicKey,
	payments: &[crate::transaction::Payment],
	root: &InvokeScriptTransaction,
) -> Value {
	Value::case("Invocation", vec![
		("caller".to_owned(), values::address(caller)),
		(
			"callerPublicKey".to_owned(),
			Value::ByteStr(ByteStr::from(caller_public_key.0)),
		),
		(
			"payments".to_owned(),
			Value::List(payments.iter().map(values::attached_payment).collect()),
		),
		("transactionId".to_owned(), Value::ByteStr(root.id.clone())),
		("fee".to_owned(), Value::Long(root.fee)),
		("feeAssetId".to_owned(), values::asset(&root.fee_asset)),
	])
}

fn transaction_type_name(tx: &Transaction) -> &'static str {
	match tx {
		Transaction::Transfer(_) => "TransferTransaction",
		Transaction::Data(_) => "DataTransaction",
		Transaction::Lease(_) => "LeaseTransaction",
		Transaction::LeaseCancel(_) => "LeaseCancelTransaction",
		Transaction::Sponsor(_) => "SponsorFeeTransaction",
		Transaction::Issue(_) => "IssueTransaction",
		Transaction::Reissue(_) => "ReissueTransaction",
		Transaction::Burn(_) => "BurnTransaction",
		Transaction::CreateAlias(_) => "CreateAliasTransaction",
		Transaction::Invoke(_) => "InvokeScriptTransaction",
	}
}
