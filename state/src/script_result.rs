//! Serialisable record of what an invoke-script transaction did.

use crate::{data_entry::DataEntry, transaction::Payment};
use serde::Serialize;
use waves_lang::Value;
use waves_primitives::{Address, AddressOrAlias, Asset, ByteStr};

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct InvokeScriptResult {
	pub data: Vec<DataEntry>,
	pub transfers: Vec<ResultTransfer>,
	pub issues: Vec<ResultIssue>,
	pub reissues: Vec<ResultReissue>,
	pub burns: Vec<ResultBurn>,
	pub sponsor_fees: Vec<ResultSponsorFee>,
	pub leases: Vec<ResultLease>,
	pub lease_cancels: Vec<ResultLeaseCancel>,
	pub invokes: Vec<ResultInvoke>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTransfer {
	pub address: Address,
	pub asset: Asset,
	pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultIssue {
	pub asset_id: ByteStr,
	pub name: String,
	pub description: String,
	pub quantity: i64,
	pub decimals: u8,
	pub reissuable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultReissue {
	pub asset_id: ByteStr,
	pub quantity: i64,
	pub reissuable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBurn {
	pub asset_id: ByteStr,
	pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSponsorFee {
	pub asset_id: ByteStr,
	pub min_sponsored_fee: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultLease {
	pub lease_id: ByteStr,
	pub recipient: AddressOrAlias,
	pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultLeaseCancel {
	pub lease_id: ByteStr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultInvoke {
	pub dapp: Address,
	pub function: String,
	#[serde(skip_serializing)]
	pub args: Vec<Value>,
	pub payments: Vec<Payment>,
	pub state_changes: Box<InvokeScriptResult>,
}

impl InvokeScriptResult {
	pub fn with_error(message: String) -> Self {
		InvokeScriptResult { error_message: Some(message), ..Default::default() }
	}

	/// Addresses of every dApp reached through nested invocations.
	pub fn called_addresses(&self) -> Vec<Address> {
		let mut addresses = Vec::new();
		for invoke in &self.invokes {
			addresses.push(invoke.dapp);
			addresses.extend(invoke.state_changes.called_addresses());
		}
		addresses
	}
}
