//! Chain functionality settings: activation heights and semantic flags.
//!
//! Every height-gated rule in the engine reads these values; nothing is
//! hard-coded. Defaults describe a chain with every feature active from
//! genesis; loading from a TOML file overrides individual fields.

use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::Path;
use waves_primitives::Height;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionalitySettings {
	/// Height from which dApps and the fee/amount overflow-check change
	/// activate.
	pub ride4dapps_height: Height,
	/// Height from which oversized invocation write-sets fail the
	/// transaction for its fee.
	pub data_entries_bytes_check_height: Height,
	/// Height from which negative amounts, duplicate asset ids and
	/// oversized write-sets reject instead of failing for the fee.
	pub transfers_check_height: Height,
	/// Maximum depth of synchronous dApp-to-dApp calls.
	pub max_sync_dapp_calls: u32,
	/// String built-ins operate on characters and invalid UTF-8 is an error.
	pub fix_unicode_functions: bool,
	/// `pow` overflow is an error instead of saturating.
	pub use_new_pow_precision: bool,
	/// Forbid a dApp invoking itself with payments (V4+ scripts only).
	pub disallow_self_payment: bool,
}

impl Default for FunctionalitySettings {
	fn default() -> Self {
		FunctionalitySettings {
			ride4dapps_height: 0,
			data_entries_bytes_check_height: 0,
			transfers_check_height: 0,
			max_sync_dapp_calls: 13,
			fix_unicode_functions: true,
			use_new_pow_precision: true,
			disallow_self_payment: true,
		}
	}
}

impl FunctionalitySettings {
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		Config::builder()
			.add_source(File::from(path))
			.build()?
			.try_deserialize()
	}

	pub fn ride4dapps_active(&self, height: Height) -> bool {
		height >= self.ride4dapps_height
	}

	pub fn data_entries_bytes_check_active(&self, height: Height) -> bool {
		height >= self.data_entries_bytes_check_height
	}

	pub fn transfers_check_active(&self, height: Height) -> bool {
		height >= self.transfers_check_height
	}
}
