//! An in-memory blockchain for tests: builder-style setup plus a minimal
//! block applier that folds a diff back into the snapshot.

use crate::{
	blockchain::{AssetDescription, Blockchain},
	data_entry::DataEntry,
	diff::{
		AccountScriptInfo, AssetScriptInfo, Diff, LeaseBalance, LeaseDetails, Sponsorship,
	},
};
use std::collections::BTreeMap;
use waves_lang::{
	estimator::{estimate_dapp_callables, estimate_dapp_verifier, estimate_expression},
	DAppScript, EstimatorVersion, ExpressionScript, Script,
};
use waves_primitives::{Address, Alias, Asset, ByteStr, ChainId, Height, PublicKey};

#[derive(Debug, Clone, Default)]
pub struct InMemoryBlockchain {
	chain_id: ChainId,
	height: Height,
	balances: BTreeMap<(Address, Asset), i64>,
	lease_balances: BTreeMap<Address, LeaseBalance>,
	assets: BTreeMap<ByteStr, AssetDescription>,
	aliases: BTreeMap<Alias, Address>,
	data: BTreeMap<Address, BTreeMap<String, DataEntry>>,
	scripts: BTreeMap<Address, AccountScriptInfo>,
	leases: BTreeMap<ByteStr, LeaseDetails>,
}

impl InMemoryBlockchain {
	pub fn new(chain_id: ChainId, height: Height) -> Self {
		InMemoryBlockchain { chain_id, height, ..Default::default() }
	}

	pub fn set_height(&mut self, height: Height) {
		self.height = height;
	}

	pub fn with_balance(mut self, address: Address, asset: Asset, amount: i64) -> Self {
		self.balances.insert((address, asset), amount);
		self
	}

	pub fn with_asset(mut self, asset_id: ByteStr, description: AssetDescription) -> Self {
		self.assets.insert(asset_id, description);
		self
	}

	pub fn with_alias(mut self, alias: Alias, address: Address) -> Self {
		self.aliases.insert(alias, address);
		self
	}

	pub fn with_lease(mut self, lease_id: ByteStr, details: LeaseDetails) -> Self {
		self.leases.insert(lease_id, details);
		self
	}

	/// Install a dApp, estimating its callable complexities with every
	/// estimator version the way the chain would on script set.
	pub fn with_dapp(mut self, public_key: PublicKey, script: DAppScript) -> Self {
		let address = public_key.address(self.chain_id);
		let mut complexities = BTreeMap::new();
		for estimator in
			[EstimatorVersion::V1, EstimatorVersion::V2, EstimatorVersion::V3]
		{
			if let Ok(costs) = estimate_dapp_callables(&script, estimator) {
				complexities.insert(estimator, costs);
			}
		}
		let verifier_complexity = estimate_dapp_verifier(&script, EstimatorVersion::latest())
			.ok()
			.flatten()
			.unwrap_or(0);
		self.scripts.insert(
			address,
			AccountScriptInfo {
				public_key,
				script: Script::DApp(script),
				verifier_complexity,
				complexities_by_estimator: complexities,
			},
		);
		self
	}

	/// Install a plain verifier script on an account.
	pub fn with_account_script(
		mut self,
		public_key: PublicKey,
		script: ExpressionScript,
	) -> Self {
		let address = public_key.address(self.chain_id);
		let verifier_complexity =
			estimate_expression(&script, EstimatorVersion::latest()).unwrap_or(0);
		self.scripts.insert(
			address,
			AccountScriptInfo {
				public_key,
				script: Script::Expression(script),
				verifier_complexity,
				complexities_by_estimator: BTreeMap::new(),
			},
		);
		self
	}

	pub fn with_asset_script(mut self, asset_id: &ByteStr, script: ExpressionScript) -> Self {
		let complexity =
			estimate_expression(&script, EstimatorVersion::latest()).unwrap_or(0);
		if let Some(description) = self.assets.get_mut(asset_id) {
			description.script = Some(AssetScriptInfo { script, complexity });
		}
		self
	}

	/// Fold a diff into the snapshot, the way the block applier would.
	pub fn apply(&mut self, diff: &Diff) {
		for (address, portfolio) in &diff.portfolios {
			*self.balances.entry((*address, Asset::Waves)).or_insert(0) += portfolio.balance;
			for (asset_id, delta) in &portfolio.assets {
				*self
					.balances
					.entry((*address, Asset::IssuedAsset(asset_id.clone())))
					.or_insert(0) += delta;
			}
			let lease = self.lease_balances.entry(*address).or_default();
			lease.lease_in += portfolio.lease.lease_in;
			lease.lease_out += portfolio.lease.lease_out;
		}
		for (asset_id, new_asset) in &diff.issued_assets {
			self.assets.insert(
				asset_id.clone(),
				AssetDescription {
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
			);
		}
		for (asset_id, update) in &diff.updated_assets {
			if let Some(description) = self.assets.get_mut(asset_id) {
				if let Some(info) = update.left() {
					description.name = info.name.clone();
					description.description = info.description.clone();
					description.last_updated_height = info.last_updated_height;
				}
				if let Some(volume) = update.right() {
					description.reissuable = volume.is_reissuable;
					description.total_volume =
						(description.total_volume as i128 + volume.delta).max(0) as u128;
				}
			}
		}
		for (alias, address) in &diff.aliases {
			self.aliases.insert(alias.clone(), *address);
		}
		for (lease_id, details) in &diff.lease_state {
			self.leases.insert(lease_id.clone(), details.clone());
		}
		for (address, entries) in &diff.account_data {
			let stored = self.data.entry(*address).or_default();
			for (key, entry) in entries {
				if entry.is_delete() {
					stored.remove(key);
				} else {
					stored.insert(key.clone(), entry.clone());
				}
			}
		}
		for (address, script) in &diff.scripts {
			match script {
				Some(info) => self.scripts.insert(*address, info.clone()),
				None => self.scripts.remove(address),
			};
		}
		for (asset_id, script) in &diff.asset_scripts {
			if let Some(description) = self.assets.get_mut(asset_id) {
				description.script = script.clone();
			}
		}
		for (asset_id, sponsorship) in &diff.sponsorship {
			if let (Some(description), Sponsorship::Value(rate)) =
				(self.assets.get_mut(asset_id), sponsorship)
			{
				description.sponsorship_rate = *rate;
			}
		}
	}

	/// Active leases where the address is sender or recipient, for listing
	/// assertions.
	pub fn active_leases(&self, address: &Address) -> Vec<ByteStr> {
		self.leases
			.iter()
			.filter(|(_, details)| details.is_active())
			.filter(|(_, details)| {
				details.sender.address(self.chain_id) == *address ||
					self.resolve_recipient(&details.recipient) == Some(*address)
			})
			.map(|(id, _)| id.clone())
			.collect()
	}
}

impl Blockchain for InMemoryBlockchain {
	fn chain_id(&self) -> ChainId {
		self.chain_id
	}

	fn height(&self) -> Height {
		self.height
	}

	fn balance(&self, address: &Address, asset: &Asset) -> i64 {
		self.balances.get(&(*address, asset.clone())).copied().unwrap_or(0)
	}

	fn lease_balance(&self, address: &Address) -> LeaseBalance {
		self.lease_balances.get(address).copied().unwrap_or_default()
	}

	fn asset_description(&self, asset_id: &ByteStr) -> Option<AssetDescription> {
		self.assets.get(asset_id).cloned()
	}

	fn resolve_alias(&self, alias: &Alias) -> Option<Address> {
		self.aliases.get(alias).copied()
	}

	fn account_data(&self, address: &Address, key: &str) -> Option<DataEntry> {
		self.data.get(address).and_then(|entries| entries.get(key)).cloned()
	}

	fn account_script(&self, address: &Address) -> Option<AccountScriptInfo> {
		self.scripts.get(address).cloned()
	}

	fn asset_script(&self, asset_id: &ByteStr) -> Option<AssetScriptInfo> {
		self.assets.get(asset_id).and_then(|description| description.script.clone())
	}

	fn lease_details(&self, lease_id: &ByteStr) -> Option<LeaseDetails> {
		self.leases.get(lease_id).cloned()
	}
}
