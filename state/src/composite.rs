//! A committed snapshot with an in-flight diff overlaid.
//!
//! Reads hit the overlay first and fall through to the snapshot, which is
//! what lets chained actions inside one invocation observe their own writes.
//! The overlay is owned and travels by value through nested call frames; the
//! snapshot stays a shared borrow.

use crate::{
	blockchain::{AssetDescription, Blockchain},
	data_entry::DataEntry,
	diff::{AccountScriptInfo, AssetScriptInfo, Diff, LeaseBalance, LeaseDetails, Sponsorship},
};
use waves_primitives::{Address, Alias, Asset, ByteStr, ChainId, Height};

pub struct CompositeBlockchain<'a> {
	base: &'a dyn Blockchain,
	diff: Diff,
}

impl<'a> CompositeBlockchain<'a> {
	pub fn new(base: &'a dyn Blockchain, diff: Diff) -> Self {
		CompositeBlockchain { base, diff }
	}

	pub fn diff(&self) -> &Diff {
		&self.diff
	}

	pub fn into_diff(self) -> Diff {
		self.diff
	}
}

impl Blockchain for CompositeBlockchain<'_> {
	fn chain_id(&self) -> ChainId {
		self.base.chain_id()
	}

	fn height(&self) -> Height {
		self.base.height()
	}

	fn balance(&self, address: &Address, asset: &Asset) -> i64 {
		let delta =
			self.diff.portfolios.get(address).map(|p| p.balance_of(asset)).unwrap_or(0);
		self.base.balance(address, asset).saturating_add(delta)
	}

	fn lease_balance(&self, address: &Address) -> LeaseBalance {
		let base = self.base.lease_balance(address);
		let delta = self
			.diff
			.portfolios
			.get(address)
			.map(|p| p.lease)
			.unwrap_or_default();
		LeaseBalance {
			lease_in: base.lease_in.saturating_add(delta.lease_in),
			lease_out: base.lease_out.saturating_add(delta.lease_out),
		}
	}

	fn asset_description(&self, asset_id: &ByteStr) -> Option<AssetDescription> {
		let mut description = match self.diff.issued_assets.get(asset_id) {
			Some(new_asset) => AssetDescription {
				origin_tx: new_asset.static_info.source_tx.clone(),
				issuer: new_asset.static_info.issuer,
				name: new_asset.info.name.clone(),
				description: new_asset.info.description.clone(),
				decimals: new_asset.static_info.decimals,
				reissuable: new_asset.volume.is_reissuable,
				total_volume: new_asset.volume.delta.max(0) as u128,
				last_updated_height: new_asset.info.last_updated_height,
				script: None,
				sponsorship_rate: 0,
				nft: new_asset.static_info.nft,
			},
			None => self.base.asset_description(asset_id)?,
		};

		if let Some(update) = self.diff.updated_assets.get(asset_id) {
			if let Some(info) = update.left() {
				description.name = info.name.clone();
				description.description = info.description.clone();
				description.last_updated_height = info.last_updated_height;
			}
			if let Some(volume) = update.right() {
				description.reissuable = volume.is_reissuable;
				description.total_volume =
					(description.total_volume as i128).saturating_add(volume.delta).max(0) as u128;
			}
		}
		if let Some(scripted) = self.diff.asset_scripts.get(asset_id) {
			description.script = scripted.clone();
		} else if description.script.is_none() {
			description.script = self.base.asset_script(asset_id);
		}
		if let Some(sponsorship) = self.diff.sponsorship.get(asset_id) {
			if let Sponsorship::Value(rate) = sponsorship {
				description.sponsorship_rate = *rate;
			}
		}
		Some(description)
	}

	fn resolve_alias(&self, alias: &Alias) -> Option<Address> {
		self.diff.aliases.get(alias).copied().or_else(|| self.base.resolve_alias(alias))
	}

	fn account_data(&self, address: &Address, key: &str) -> Option<DataEntry> {
		match self.diff.account_data.get(address).and_then(|entries| entries.get(key)) {
			Some(entry) if entry.is_delete() => None,
			Some(entry) => Some(entry.clone()),
			None => self.base.account_data(address, key),
		}
	}

	fn account_script(&self, address: &Address) -> Option<AccountScriptInfo> {
		match self.diff.scripts.get(address) {
			Some(entry) => entry.clone(),
			None => self.base.account_script(address),
		}
	}

	fn asset_script(&self, asset_id: &ByteStr) -> Option<AssetScriptInfo> {
		match self.diff.asset_scripts.get(asset_id) {
			Some(entry) => entry.clone(),
			None => self.base.asset_script(asset_id),
		}
	}

	fn lease_details(&self, lease_id: &ByteStr) -> Option<LeaseDetails> {
		self.diff
			.lease_state
			.get(lease_id)
			.cloned()
			.or_else(|| self.base.lease_details(lease_id))
	}
}
