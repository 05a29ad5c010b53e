//! Transaction kinds the engine produces diffs for.
//!
//! The wire format lives upstream: transactions arrive parsed, with their id
//! already computed from the signed body. Proofs are verified against the id.

use crate::data_entry::DataEntry;
use waves_lang::{ExpressionScript, Value};
use waves_primitives::{AddressOrAlias, Alias, Asset, ByteStr, PublicKey};

#[derive(Debug, Clone, PartialEq)]
pub struct TransferTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub recipient: AddressOrAlias,
	pub asset: Asset,
	pub amount: i64,
	pub fee: i64,
	pub fee_asset: Asset,
	pub attachment: ByteStr,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub version: u8,
	pub entries: Vec<DataEntry>,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaseTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub recipient: AddressOrAlias,
	pub amount: i64,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaseCancelTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub lease_id: ByteStr,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SponsorFeeTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub asset_id: ByteStr,
	/// Asset units equivalent to one fee unit; `None` disables sponsorship.
	pub min_sponsored_fee: Option<i64>,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub name: String,
	pub description: String,
	pub quantity: i64,
	pub decimals: u8,
	pub reissuable: bool,
	pub script: Option<ExpressionScript>,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReissueTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub asset_id: ByteStr,
	pub quantity: i64,
	pub reissuable: bool,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurnTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub asset_id: ByteStr,
	pub quantity: i64,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateAliasTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub alias: Alias,
	pub fee: i64,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Payment {
	pub asset: Asset,
	pub amount: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeScriptTransaction {
	pub id: ByteStr,
	pub sender: PublicKey,
	pub dapp: AddressOrAlias,
	pub function: String,
	pub args: Vec<Value>,
	pub payments: Vec<Payment>,
	pub fee: i64,
	pub fee_asset: Asset,
	pub timestamp: u64,
	pub proofs: Vec<ByteStr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
	Transfer(TransferTransaction),
	Data(DataTransaction),
	Lease(LeaseTransaction),
	LeaseCancel(LeaseCancelTransaction),
	Sponsor(SponsorFeeTransaction),
	Issue(IssueTransaction),
	Reissue(ReissueTransaction),
	Burn(BurnTransaction),
	CreateAlias(CreateAliasTransaction),
	Invoke(InvokeScriptTransaction),
}

impl Transaction {
	pub fn id(&self) -> &ByteStr {
		match self {
			Transaction::Transfer(tx) => &tx.id,
			Transaction::Data(tx) => &tx.id,
			Transaction::Lease(tx) => &tx.id,
			Transaction::LeaseCancel(tx) => &tx.id,
			Transaction::Sponsor(tx) => &tx.id,
			Transaction::Issue(tx) => &tx.id,
			Transaction::Reissue(tx) => &tx.id,
			Transaction::Burn(tx) => &tx.id,
			Transaction::CreateAlias(tx) => &tx.id,
			Transaction::Invoke(tx) => &tx.id,
		}
	}

	pub fn sender(&self) -> &PublicKey {
		match self {
			Transaction::Transfer(tx) => &tx.sender,
			Transaction::Data(tx) => &tx.sender,
			Transaction::Lease(tx) => &tx.sender,
			Transaction::LeaseCancel(tx) => &tx.sender,
			Transaction::Sponsor(tx) => &tx.sender,
			Transaction::Issue(tx) => &tx.sender,
			Transaction::Reissue(tx) => &tx.sender,
			Transaction::Burn(tx) => &tx.sender,
			Transaction::CreateAlias(tx) => &tx.sender,
			Transaction::Invoke(tx) => &tx.sender,
		}
	}

	pub fn fee(&self) -> i64 {
		match self {
			Transaction::Transfer(tx) => tx.fee,
			Transaction::Data(tx) => tx.fee,
			Transaction::Lease(tx) => tx.fee,
			Transaction::LeaseCancel(tx) => tx.fee,
			Transaction::Sponsor(tx) => tx.fee,
			Transaction::Issue(tx) => tx.fee,
			Transaction::Reissue(tx) => tx.fee,
			Transaction::Burn(tx) => tx.fee,
			Transaction::CreateAlias(tx) => tx.fee,
			Transaction::Invoke(tx) => tx.fee,
		}
	}

	pub fn fee_asset(&self) -> Asset {
		match self {
			Transaction::Transfer(tx) => tx.fee_asset.clone(),
			Transaction::Invoke(tx) => tx.fee_asset.clone(),
			_ => Asset::Waves,
		}
	}

	pub fn timestamp(&self) -> u64 {
		match self {
			Transaction::Transfer(tx) => tx.timestamp,
			Transaction::Data(tx) => tx.timestamp,
			Transaction::Lease(tx) => tx.timestamp,
			Transaction::LeaseCancel(tx) => tx.timestamp,
			Transaction::Sponsor(tx) => tx.timestamp,
			Transaction::Issue(tx) => tx.timestamp,
			Transaction::Reissue(tx) => tx.timestamp,
			Transaction::Burn(tx) => tx.timestamp,
			Transaction::CreateAlias(tx) => tx.timestamp,
			Transaction::Invoke(tx) => tx.timestamp,
		}
	}

	pub fn proofs(&self) -> &[ByteStr] {
		match self {
			Transaction::Transfer(tx) => &tx.proofs,
			Transaction::Data(tx) => &tx.proofs,
			Transaction::Lease(tx) => &tx.proofs,
			Transaction::LeaseCancel(tx) => &tx.proofs,
			Transaction::Sponsor(tx) => &tx.proofs,
			Transaction::Issue(tx) => &tx.proofs,
			Transaction::Reissue(tx) => &tx.proofs,
			Transaction::Burn(tx) => &tx.proofs,
			Transaction::CreateAlias(tx) => &tx.proofs,
			Transaction::Invoke(tx) => &tx.proofs,
		}
	}
}
