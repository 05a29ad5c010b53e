//! The diff data model and its merge algebra.
//!
//! A `Diff` is an immutable description of the state mutations one
//! transaction causes. Diffs combine associatively: portfolios add
//! field-wise with checked arithmetic, map-shaped fields are last-write-wins
//! per key, counters add. An all-zero portfolio is elided so that merging
//! never manufactures empty entries.

use crate::{data_entry::DataEntry, script_result::InvokeScriptResult, transaction::Transaction};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use waves_lang::{EstimatorVersion, ExpressionScript, Script};
use waves_primitives::{Address, AddressOrAlias, Alias, Asset, ByteStr, Height, PublicKey};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Balance sum overflow")]
pub struct BalanceOverflow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeaseBalance {
	pub lease_in: i64,
	pub lease_out: i64,
}

impl LeaseBalance {
	pub fn combine(&self, other: &LeaseBalance) -> Result<LeaseBalance, BalanceOverflow> {
		Ok(LeaseBalance {
			lease_in: self.lease_in.checked_add(other.lease_in).ok_or(BalanceOverflow)?,
			lease_out: self.lease_out.checked_add(other.lease_out).ok_or(BalanceOverflow)?,
		})
	}

	pub fn is_empty(&self) -> bool {
		self.lease_in == 0 && self.lease_out == 0
	}
}

/// Per-address balance deltas: native balance, lease balance and issued
/// asset balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Portfolio {
	pub balance: i64,
	pub lease: LeaseBalance,
	pub assets: BTreeMap<ByteStr, i64>,
}

impl Portfolio {
	pub fn waves(balance: i64) -> Portfolio {
		Portfolio { balance, ..Default::default() }
	}

	pub fn asset(asset_id: ByteStr, amount: i64) -> Portfolio {
		Portfolio { assets: BTreeMap::from([(asset_id, amount)]), ..Default::default() }
	}

	pub fn leased(lease: LeaseBalance) -> Portfolio {
		Portfolio { lease, ..Default::default() }
	}

	pub fn balance_of(&self, asset: &Asset) -> i64 {
		match asset {
			Asset::Waves => self.balance,
			Asset::IssuedAsset(id) => self.assets.get(id).copied().unwrap_or(0),
		}
	}

	pub fn combine(&self, other: &Portfolio) -> Result<Portfolio, BalanceOverflow> {
		let mut assets = self.assets.clone();
		for (asset_id, amount) in &other.assets {
			let entry = assets.entry(asset_id.clone()).or_insert(0);
			*entry = entry.checked_add(*amount).ok_or(BalanceOverflow)?;
		}
		Ok(Portfolio {
			balance: self.balance.checked_add(other.balance).ok_or(BalanceOverflow)?,
			lease: self.lease.combine(&other.lease)?,
			assets,
		})
	}

	pub fn is_empty(&self) -> bool {
		self.balance == 0 && self.lease.is_empty() && self.assets.values().all(|a| *a == 0)
	}
}

/// Immutable facts about an issued asset, fixed at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetStaticInfo {
	pub source_tx: ByteStr,
	pub issuer: PublicKey,
	pub decimals: u8,
	pub nft: bool,
}

/// Mutable description of an issued asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
	pub name: String,
	pub description: String,
	pub last_updated_height: Height,
}

/// Reissuability flag plus a signed volume delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetVolumeInfo {
	pub is_reissuable: bool,
	pub delta: i128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssetInfo {
	pub static_info: AssetStaticInfo,
	pub info: AssetInfo,
	pub volume: AssetVolumeInfo,
}

/// Inclusive-or: an update may touch the info, the volume, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ior<L, R> {
	Left(L),
	Right(R),
	Both(L, R),
}

impl<L, R> Ior<L, R> {
	pub fn left(&self) -> Option<&L> {
		match self {
			Ior::Left(l) | Ior::Both(l, _) => Some(l),
			Ior::Right(_) => None,
		}
	}

	pub fn right(&self) -> Option<&R> {
		match self {
			Ior::Right(r) | Ior::Both(_, r) => Some(r),
			Ior::Left(_) => None,
		}
	}

	/// Key-wise merge: sides present on both operands are combined with the
	/// provided functions, otherwise carried through.
	pub fn combine(
		self,
		other: Ior<L, R>,
		combine_left: impl FnOnce(L, L) -> L,
		combine_right: impl FnOnce(R, R) -> R,
	) -> Ior<L, R> {
		let (l1, r1) = self.into_parts();
		let (l2, r2) = other.into_parts();
		let left = match (l1, l2) {
			(Some(a), Some(b)) => Some(combine_left(a, b)),
			(a, b) => a.or(b),
		};
		let right = match (r1, r2) {
			(Some(a), Some(b)) => Some(combine_right(a, b)),
			(a, b) => a.or(b),
		};
		match (left, right) {
			(Some(l), Some(r)) => Ior::Both(l, r),
			(Some(l), None) => Ior::Left(l),
			(None, Some(r)) => Ior::Right(r),
			(None, None) => unreachable!("an Ior always carries at least one side"),
		}
	}

	fn into_parts(self) -> (Option<L>, Option<R>) {
		match self {
			Ior::Left(l) => (Some(l), None),
			Ior::Right(r) => (None, Some(r)),
			Ior::Both(l, r) => (Some(l), Some(r)),
		}
	}
}

pub type AssetUpdate = Ior<AssetInfo, AssetVolumeInfo>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseStatus {
	Active,
	Cancelled { at_height: Height },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseDetails {
	pub sender: PublicKey,
	pub recipient: AddressOrAlias,
	pub amount: i64,
	pub status: LeaseStatus,
	pub source_tx: ByteStr,
	pub height: Height,
}

impl LeaseDetails {
	pub fn is_active(&self) -> bool {
		matches!(self.status, LeaseStatus::Active)
	}
}

/// An account script with the account's key, its verifier complexity and
/// the per-estimator callable complexity maps.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountScriptInfo {
	pub public_key: PublicKey,
	pub script: Script,
	pub verifier_complexity: u64,
	pub complexities_by_estimator: BTreeMap<EstimatorVersion, BTreeMap<String, u64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetScriptInfo {
	pub script: ExpressionScript,
	pub complexity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sponsorship {
	/// Identity element: carries no information.
	NoInfo,
	/// Sponsorship rate in asset units per fee unit; zero disables.
	Value(i64),
}

impl Sponsorship {
	pub fn combine(self, newer: Sponsorship) -> Sponsorship {
		match newer {
			Sponsorship::NoInfo => self,
			value => value,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeAndFee {
	pub volume: i64,
	pub fee: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionInfo {
	pub tx: Transaction,
	pub affected: BTreeSet<Address>,
	pub applied: bool,
	pub spent_complexity: u64,
}

/// The full mutation bag. See the module docs for the merge rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
	/// Insertion-ordered: the miner and the API depend on this order.
	pub transactions: Vec<(ByteStr, NewTransactionInfo)>,
	pub portfolios: BTreeMap<Address, Portfolio>,
	pub issued_assets: BTreeMap<ByteStr, NewAssetInfo>,
	pub updated_assets: BTreeMap<ByteStr, AssetUpdate>,
	pub aliases: BTreeMap<Alias, Address>,
	pub order_fills: BTreeMap<ByteStr, VolumeAndFee>,
	pub lease_state: BTreeMap<ByteStr, LeaseDetails>,
	pub scripts: BTreeMap<Address, Option<AccountScriptInfo>>,
	pub asset_scripts: BTreeMap<ByteStr, Option<AssetScriptInfo>>,
	pub account_data: BTreeMap<Address, BTreeMap<String, DataEntry>>,
	pub sponsorship: BTreeMap<ByteStr, Sponsorship>,
	pub scripts_run: u32,
	pub scripts_complexity: u64,
	pub script_results: BTreeMap<ByteStr, InvokeScriptResult>,
}

impl Diff {
	pub fn empty() -> Diff {
		Diff::default()
	}

	pub fn from_portfolios(portfolios: BTreeMap<Address, Portfolio>) -> Diff {
		Diff { portfolios, ..Default::default() }
	}

	pub fn from_portfolio(address: Address, portfolio: Portfolio) -> Diff {
		Diff::from_portfolios(BTreeMap::from([(address, portfolio)]))
	}

	pub fn transaction(&self, id: &ByteStr) -> Option<&NewTransactionInfo> {
		self.transactions.iter().find(|(tx_id, _)| tx_id == id).map(|(_, info)| info)
	}

	/// Monoidal merge. The only failure is balance overflow; the caller
	/// decides whether that rejects the transaction or fails it for its fee.
	pub fn combine(mut self, newer: Diff) -> Result<Diff, BalanceOverflow> {
		for (id, info) in newer.transactions {
			match self.transactions.iter_mut().find(|(existing, _)| *existing == id) {
				Some((_, existing)) => *existing = info,
				None => self.transactions.push((id, info)),
			}
		}

		for (address, portfolio) in newer.portfolios {
			let combined = match self.portfolios.remove(&address) {
				Some(existing) => existing.combine(&portfolio)?,
				None => portfolio,
			};
			if !combined.is_empty() {
				self.portfolios.insert(address, combined);
			}
		}

		self.issued_assets.extend(newer.issued_assets);

		for (asset_id, update) in newer.updated_assets {
			let merged = match self.updated_assets.remove(&asset_id) {
				Some(existing) => existing.combine(
					update,
					// Newer info wins; volumes add field-wise.
					|_, newer| newer,
					|older, newer| AssetVolumeInfo {
						is_reissuable: older.is_reissuable && newer.is_reissuable,
						delta: older.delta + newer.delta,
					},
				),
				None => update,
			};
			self.updated_assets.insert(asset_id, merged);
		}

		self.aliases.extend(newer.aliases);
		self.lease_state.extend(newer.lease_state);
		self.scripts.extend(newer.scripts);
		self.asset_scripts.extend(newer.asset_scripts);

		for (order_id, fill) in newer.order_fills {
			let entry = self.order_fills.entry(order_id).or_default();
			entry.volume = entry.volume.checked_add(fill.volume).ok_or(BalanceOverflow)?;
			entry.fee = entry.fee.checked_add(fill.fee).ok_or(BalanceOverflow)?;
		}

		for (address, entries) in newer.account_data {
			self.account_data.entry(address).or_default().extend(entries);
		}

		for (asset_id, sponsorship) in newer.sponsorship {
			let merged = match self.sponsorship.remove(&asset_id) {
				Some(existing) => existing.combine(sponsorship),
				None => sponsorship,
			};
			self.sponsorship.insert(asset_id, merged);
		}

		self.scripts_run += newer.scripts_run;
		self.scripts_complexity += newer.scripts_complexity;
		self.script_results.extend(newer.script_results);

		Ok(self)
	}
}
