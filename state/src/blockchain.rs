//! The read-only view of a committed snapshot.
//!
//! The engine only ever reads through this trait; a consistent snapshot for
//! the duration of one `transaction_diff` call is the sole requirement on
//! implementors.

use crate::{
	data_entry::DataEntry,
	diff::{AccountScriptInfo, AssetScriptInfo, LeaseBalance, LeaseDetails},
};
use waves_primitives::{Address, AddressOrAlias, Alias, Asset, ByteStr, ChainId, Height, PublicKey};

/// Everything the engine knows about an issued asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescription {
	pub origin_tx: ByteStr,
	pub issuer: PublicKey,
	pub name: String,
	pub description: String,
	pub decimals: u8,
	pub reissuable: bool,
	pub total_volume: u128,
	pub last_updated_height: Height,
	pub script: Option<AssetScriptInfo>,
	/// Asset units per fee unit; zero means not sponsored.
	pub sponsorship_rate: i64,
	pub nft: bool,
}

pub trait Blockchain {
	fn chain_id(&self) -> ChainId;
	fn height(&self) -> Height;

	fn balance(&self, address: &Address, asset: &Asset) -> i64;
	fn lease_balance(&self, address: &Address) -> LeaseBalance;
	fn asset_description(&self, asset_id: &ByteStr) -> Option<AssetDescription>;
	fn resolve_alias(&self, alias: &Alias) -> Option<Address>;
	fn account_data(&self, address: &Address, key: &str) -> Option<DataEntry>;
	fn account_script(&self, address: &Address) -> Option<AccountScriptInfo>;
	fn asset_script(&self, asset_id: &ByteStr) -> Option<AssetScriptInfo>;
	fn lease_details(&self, lease_id: &ByteStr) -> Option<LeaseDetails>;

	fn resolve_recipient(&self, recipient: &AddressOrAlias) -> Option<Address> {
		match recipient {
			AddressOrAlias::Address(address) => Some(*address),
			AddressOrAlias::Alias(alias) => self.resolve_alias(alias),
		}
	}

	/// Native balance not locked by outgoing leases.
	fn spendable_balance(&self, address: &Address) -> i64 {
		self.balance(address, &Asset::Waves) - self.lease_balance(address).lease_out
	}
}
