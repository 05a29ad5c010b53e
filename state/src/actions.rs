//! Actions a dApp callable returns, and their case-object representation.
//!
//! A callable evaluates to a list of case objects; `actions_from_value`
//! turns that list into typed actions. The inverse constructors in
//! [`values`] build the case objects scripts produce, shared by tests and
//! the pseudo-transaction machinery.

use crate::{
	data_entry::{DataEntry, DataValue},
	transaction::Payment,
};
use waves_lang::{CaseObject, StdLibVersion, Value};
use waves_primitives::{Address, AddressOrAlias, Alias, Asset, ByteStr, ChainId};

#[derive(Debug, Clone, PartialEq)]
pub enum CallableAction {
	Transfer { recipient: AddressOrAlias, amount: i64, asset: Asset },
	Data(DataEntry),
	Issue {
		name: String,
		description: String,
		quantity: i64,
		decimals: u8,
		reissuable: bool,
		nonce: i64,
	},
	Reissue { asset_id: ByteStr, quantity: i64, reissuable: bool },
	Burn { asset_id: ByteStr, quantity: i64 },
	SponsorFee { asset_id: ByteStr, min_sponsored_fee: Option<i64> },
	Lease { recipient: AddressOrAlias, amount: i64, nonce: i64 },
	LeaseCancel { lease_id: ByteStr },
	Invoke { dapp: AddressOrAlias, function: String, args: Vec<Value>, payments: Vec<Payment> },
}

impl CallableAction {
	/// Data writes are counted against the write-set limits, everything else
	/// against the action-count limit.
	pub fn is_data_op(&self) -> bool {
		matches!(self, CallableAction::Data(_))
	}
}

/// Interpret the value a callable evaluated to as an ordered action list.
pub fn actions_from_value(
	value: &Value,
	version: StdLibVersion,
	chain_id: ChainId,
) -> Result<Vec<CallableAction>, String> {
	let elements = match value {
		Value::List(elements) => elements.as_slice(),
		Value::Unit => &[],
		other => return Err(format!("Unexpected callable result type {}", other.type_name())),
	};
	elements.iter().map(|element| action_from_case(element, version, chain_id)).collect()
}

fn action_from_case(
	value: &Value,
	version: StdLibVersion,
	chain_id: ChainId,
) -> Result<CallableAction, String> {
	let obj = match value {
		Value::CaseObject(obj) => obj,
		other => return Err(format!("Unexpected action type {}", other.type_name())),
	};
	match obj.type_name.as_str() {
		"ScriptTransfer" => Ok(CallableAction::Transfer {
			recipient: recipient_from_value(required(obj, "recipient")?, chain_id)?,
			amount: long(obj, "amount")?,
			asset: asset_from_value(required(obj, "asset")?)?,
		}),
		"IntegerEntry" => Ok(CallableAction::Data(DataEntry::new(
			string(obj, "key")?,
			DataValue::Int(long(obj, "value")?),
		))),
		"BooleanEntry" => Ok(CallableAction::Data(DataEntry::new(
			string(obj, "key")?,
			DataValue::Bool(required(obj, "value")?.as_bool().map_err(|e| e.to_string())?),
		))),
		"StringEntry" => Ok(CallableAction::Data(DataEntry::new(
			string(obj, "key")?,
			DataValue::String(string(obj, "value")?),
		))),
		"BinaryEntry" => Ok(CallableAction::Data(DataEntry::new(
			string(obj, "key")?,
			DataValue::Binary(byte_str(obj, "value")?),
		))),
		"DeleteEntry" => Ok(CallableAction::Data(DataEntry::new(
			string(obj, "key")?,
			DataValue::Empty,
		))),
		// The untyped entry shape predates the typed ones and is only
		// accepted from V3 scripts.
		"DataEntry" if version == StdLibVersion::V3 => {
			let value = match required(obj, "value")? {
				Value::Long(n) => DataValue::Int(*n),
				Value::Bool(b) => DataValue::Bool(*b),
				Value::ByteStr(bytes) => DataValue::Binary(bytes.clone()),
				Value::String(s) => DataValue::String(s.clone()),
				other => return Err(format!("Unexpected entry value type {}", other.type_name())),
			};
			Ok(CallableAction::Data(DataEntry::new(string(obj, "key")?, value)))
		},
		"Issue" => Ok(CallableAction::Issue {
			name: string(obj, "name")?,
			description: string(obj, "description")?,
			quantity: long(obj, "quantity")?,
			decimals: long(obj, "decimals")? as u8,
			reissuable: required(obj, "isReissuable")?.as_bool().map_err(|e| e.to_string())?,
			nonce: long(obj, "nonce")?,
		}),
		"Reissue" => Ok(CallableAction::Reissue {
			asset_id: byte_str(obj, "assetId")?,
			quantity: long(obj, "quantity")?,
			reissuable: required(obj, "isReissuable")?.as_bool().map_err(|e| e.to_string())?,
		}),
		"Burn" => Ok(CallableAction::Burn {
			asset_id: byte_str(obj, "assetId")?,
			quantity: long(obj, "quantity")?,
		}),
		"SponsorFee" => Ok(CallableAction::SponsorFee {
			asset_id: byte_str(obj, "assetId")?,
			min_sponsored_fee: match required(obj, "minSponsoredAssetFee")? {
				Value::Unit => None,
				value => Some(value.as_long().map_err(|e| e.to_string())?),
			},
		}),
		"Lease" => Ok(CallableAction::Lease {
			recipient: recipient_from_value(required(obj, "recipient")?, chain_id)?,
			amount: long(obj, "amount")?,
			nonce: long(obj, "nonce")?,
		}),
		"LeaseCancel" => Ok(CallableAction::LeaseCancel { lease_id: byte_str(obj, "leaseId")? }),
		"Invoke" => {
			let payments = required(obj, "payments")?
				.as_list()
				.map_err(|e| e.to_string())?
				.iter()
				.map(payment_from_value)
				.collect::<Result<Vec<_>, _>>()?;
			Ok(CallableAction::Invoke {
				dapp: recipient_from_value(required(obj, "dApp")?, chain_id)?,
				function: string(obj, "function")?,
				args: required(obj, "arguments")?.as_list().map_err(|e| e.to_string())?.to_vec(),
				payments,
			})
		},
		other => Err(format!("Unexpected action type {other}")),
	}
}

fn payment_from_value(value: &Value) -> Result<Payment, String> {
	let obj = value.as_case().map_err(|e| e.to_string())?;
	if obj.type_name != "AttachedPayment" {
		return Err(format!("Unexpected payment type {}", obj.type_name))
	}
	Ok(Payment {
		asset: asset_from_value(required(obj, "assetId")?)?,
		amount: long(obj, "amount")?,
	})
}

pub fn recipient_from_value(value: &Value, chain_id: ChainId) -> Result<AddressOrAlias, String> {
	let obj = value.as_case().map_err(|e| e.to_string())?;
	match obj.type_name.as_str() {
		"Address" => {
			let bytes = byte_str(obj, "bytes")?;
			Address::try_from_bytes(&bytes)
				.map(AddressOrAlias::Address)
				.map_err(|e| e.to_string())
		},
		"Alias" => Alias::new(chain_id, &string(obj, "alias")?)
			.map(AddressOrAlias::Alias)
			.map_err(|e| e.to_string()),
		other => Err(format!("Unexpected recipient type {other}")),
	}
}

pub fn asset_from_value(value: &Value) -> Result<Asset, String> {
	match value {
		Value::Unit => Ok(Asset::Waves),
		Value::ByteStr(id) => Ok(Asset::IssuedAsset(id.clone())),
		other => Err(format!("Unexpected asset type {}", other.type_name())),
	}
}

fn required<'o>(obj: &'o CaseObject, field: &str) -> Result<&'o Value, String> {
	obj.field(field).ok_or_else(|| format!("Missing field {field} on {}", obj.type_name))
}

fn long(obj: &CaseObject, field: &str) -> Result<i64, String> {
	required(obj, field)?.as_long().map_err(|e| e.to_string())
}

fn string(obj: &CaseObject, field: &str) -> Result<String, String> {
	Ok(required(obj, field)?.as_string().map_err(|e| e.to_string())?.to_owned())
}

fn byte_str(obj: &CaseObject, field: &str) -> Result<ByteStr, String> {
	Ok(required(obj, field)?.as_byte_str().map_err(|e| e.to_string())?.clone())
}

/// Constructors for the case objects callables return. Scripts under test
/// and pseudo-transactions are built from these.
pub mod values {
	use super::*;

	pub fn address(address: &Address) -> Value {
		Value::case("Address", vec![(
			"bytes".to_owned(),
			Value::ByteStr(address.to_bytestr()),
		)])
	}

	pub fn alias(alias: &Alias) -> Value {
		Value::case("Alias", vec![("alias".to_owned(), Value::String(alias.name().to_owned()))])
	}

	pub fn recipient(recipient: &AddressOrAlias) -> Value {
		match recipient {
			AddressOrAlias::Address(a) => address(a),
			AddressOrAlias::Alias(a) => alias(a),
		}
	}

	pub fn asset(asset: &Asset) -> Value {
		match asset {
			Asset::Waves => Value::Unit,
			Asset::IssuedAsset(id) => Value::ByteStr(id.clone()),
		}
	}

	pub fn script_transfer(to: &AddressOrAlias, amount: i64, transferring: &Asset) -> Value {
		Value::case("ScriptTransfer", vec![
			("recipient".to_owned(), recipient(to)),
			("amount".to_owned(), Value::Long(amount)),
			("asset".to_owned(), asset(transferring)),
		])
	}

	pub fn integer_entry(key: &str, value: i64) -> Value {
		Value::case("IntegerEntry", vec![
			("key".to_owned(), Value::String(key.to_owned())),
			("value".to_owned(), Value::Long(value)),
		])
	}

	pub fn boolean_entry(key: &str, value: bool) -> Value {
		Value::case("BooleanEntry", vec![
			("key".to_owned(), Value::String(key.to_owned())),
			("value".to_owned(), Value::Bool(value)),
		])
	}

	pub fn string_entry(key: &str, value: &str) -> Value {
		Value::case("StringEntry", vec![
			("key".to_owned(), Value::String(key.to_owned())),
			("value".to_owned(), Value::String(value.to_owned())),
		])
	}

	pub fn binary_entry(key: &str, value: Value) -> Value {
		Value::case("BinaryEntry", vec![
			("key".to_owned(), Value::String(key.to_owned())),
			("value".to_owned(), value),
		])
	}

	pub fn delete_entry(key: &str) -> Value {
		Value::case("DeleteEntry", vec![("key".to_owned(), Value::String(key.to_owned()))])
	}

	pub fn issue(
		name: &str,
		description: &str,
		quantity: i64,
		decimals: u8,
		reissuable: bool,
		nonce: i64,
	) -> Value {
		Value::case("Issue", vec![
			("name".to_owned(), Value::String(name.to_owned())),
			("description".to_owned(), Value::String(description.to_owned())),
			("quantity".to_owned(), Value::Long(quantity)),
			("decimals".to_owned(), Value::Long(decimals as i64)),
			("isReissuable".to_owned(), Value::Bool(reissuable)),
			("nonce".to_owned(), Value::Long(nonce)),
		])
	}

	pub fn reissue(asset_id: &ByteStr, quantity: i64, reissuable: bool) -> Value {
		Value::case("Reissue", vec![
			("assetId".to_owned(), Value::ByteStr(asset_id.clone())),
			("quantity".to_owned(), Value::Long(quantity)),
			("isReissuable".to_owned(), Value::Bool(reissuable)),
		])
	}

	pub fn burn(asset_id: &ByteStr, quantity: i64) -> Value {
		Value::case("Burn", vec![
			("assetId".to_owned(), Value::ByteStr(asset_id.clone())),
			("quantity".to_owned(), Value::Long(quantity)),
		])
	}

	pub fn sponsor_fee(asset_id: &ByteStr, min_sponsored_fee: Option<i64>) -> Value {
		Value::case("SponsorFee", vec![
			("assetId".to_owned(), Value::ByteStr(asset_id.clone())),
			(
				"minSponsoredAssetFee".to_owned(),
				min_sponsored_fee.map(Value::Long).unwrap_or(Value::Unit),
			),
		])
	}

	pub fn lease(to: &AddressOrAlias, amount: i64, nonce: i64) -> Value {
		Value::case("Lease", vec![
			("recipient".to_owned(), recipient(to)),
			("amount".to_owned(), Value::Long(amount)),
			("nonce".to_owned(), Value::Long(nonce)),
		])
	}

	pub fn lease_cancel(lease_id: &ByteStr) -> Value {
		Value::case("LeaseCancel", vec![(
			"leaseId".to_owned(),
			Value::ByteStr(lease_id.clone()),
		)])
	}

	pub fn attached_payment(payment: &Payment) -> Value {
		Value::case("AttachedPayment", vec![
			("assetId".to_owned(), asset(&payment.asset)),
			("amount".to_owned(), Value::Long(payment.amount)),
		])
	}

	pub fn invoke(
		dapp: &AddressOrAlias,
		function: &str,
		args: Vec<Value>,
		payments: &[Payment],
	) -> Value {
		Value::case("Invoke", vec![
			("dApp".to_owned(), recipient(dapp)),
			("function".to_owned(), Value::String(function.to_owned())),
			("arguments".to_owned(), Value::List(args)),
			("payments".to_owned(), Value::List(payments.iter().map(attached_payment).collect())),
		])
	}
}
