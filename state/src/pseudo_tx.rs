//! Pseudo-transactions: the synthetic records handed to an asset script when
//! a dApp action touches the asset. They carry the real invocation's id and
//! timestamp so the verifier log stays attributable.

use crate::actions::values;
use waves_lang::Value;
use waves_primitives::{Address, AddressOrAlias, Asset, ByteStr, PublicKey};

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoTx {
	Transfer {
		sender: Address,
		sender_public_key: PublicKey,
		recipient: AddressOrAlias,
		asset: Asset,
		amount: i64,
		tx_id: ByteStr,
		timestamp: u64,
	},
	Reissue {
		sender: Address,
		sender_public_key: PublicKey,
		asset_id: ByteStr,
		quantity: i64,
		reissuable: bool,
		tx_id: ByteStr,
		timestamp: u64,
	},
	Burn {
		sender: Address,
		sender_public_key: PublicKey,
		asset_id: ByteStr,
		quantity: i64,
		tx_id: ByteStr,
		timestamp: u64,
	},
	SponsorFee {
		sender: Address,
		sender_public_key: PublicKey,
		asset_id: ByteStr,
		min_sponsored_fee: Option<i64>,
		tx_id: ByteStr,
		timestamp: u64,
	},
}

impl PseudoTx {
	pub fn tx_id(&self) -> &ByteStr {
		match self {
			PseudoTx::Transfer { tx_id, .. } |
			PseudoTx::Reissue { tx_id, .. } |
			PseudoTx::Burn { tx_id, .. } |
			PseudoTx::SponsorFee { tx_id, .. } => tx_id,
		}
	}

	/// The `tx` binding the asset script evaluates against.
	pub fn to_value(&self) -> Value {
		match self {
			PseudoTx::Transfer {
				sender,
				sender_public_key,
				recipient,
				asset,
				amount,
				tx_id,
				timestamp,
			} => Value::case("TransferTransaction", vec![
				("amount".to_owned(), Value::Long(*amount)),
				("recipient".to_owned(), values::recipient(recipient)),
				("assetId".to_owned(), values::asset(asset)),
				("id".to_owned(), Value::ByteStr(tx_id.clone())),
				("timestamp".to_owned(), Value::Long(*timestamp as i64)),
				("sender".to_owned(), values::address(sender)),
				(
					"senderPublicKey".to_owned(),
					Value::ByteStr(ByteStr::from(sender_public_key.0)),
				),
			]),
			PseudoTx::Reissue {
				sender,
				sender_public_key,
				asset_id,
				quantity,
				reissuable,
				tx_id,
				timestamp,
			} => Value::case("ReissueTransaction", vec![
				("assetId".to_owned(), Value::ByteStr(asset_id.clone())),
				("quantity".to_owned(), Value::Long(*quantity)),
				("isReissuable".to_owned(), Value::Bool(*reissuable)),
				("id".to_owned(), Value::ByteStr(tx_id.clone())),
				("timestamp".to_owned(), Value::Long(*timestamp as i64)),
				("sender".to_owned(), values::address(sender)),
				(
					"senderPublicKey".to_owned(),
					Value::ByteStr(ByteStr::from(sender_public_key.0)),
				),
			]),
			PseudoTx::Burn { sender, sender_public_key, asset_id, quantity, tx_id, timestamp } =>
				Value::case("BurnTransaction", vec![
					("assetId".to_owned(), Value::ByteStr(asset_id.clone())),
					("quantity".to_owned(), Value::Long(*quantity)),
					("id".to_owned(), Value::ByteStr(tx_id.clone())),
					("timestamp".to_owned(), Value::Long(*timestamp as i64)),
					("sender".to_owned(), values::address(sender)),
					(
						"senderPublicKey".to_owned(),
						Value::ByteStr(ByteStr::from(sender_public_key.0)),
					),
				]),
			PseudoTx::SponsorFee {
				sender,
				sender_public_key,
				asset_id,
				min_sponsored_fee,
				tx_id,
				timestamp,
			} => Value::case("SponsorFeeTransaction", vec![
				("assetId".to_owned(), Value::ByteStr(asset_id.clone())),
				(
					"minSponsoredAssetFee".to_owned(),
					min_sponsored_fee.map(Value::Long).unwrap_or(Value::Unit),
				),
				("id".to_owned(), Value::ByteStr(tx_id.clone())),
				("timestamp".to_owned(), Value::Long(*timestamp as i64)),
				("sender".to_owned(), values::address(sender)),
				(
					"senderPublicKey".to_owned(),
					Value::ByteStr(ByteStr::from(sender_public_key.0)),
				),
			]),
		}
	}
}
