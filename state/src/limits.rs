//! Fee constants and per-version resource limits.
//!
//! All fee figures are denominated in the smallest native unit.

use waves_lang::StdLibVersion;

pub const FEE_UNIT: i64 = 100_000;
pub const INVOKE_FEE_BASE: i64 = 5;
pub const ISSUE_FEE_BASE: i64 = 1000;
pub const SCRIPT_EXTRA_FEE: i64 = 4;

pub const DATA_TX_MAX_BYTES: usize = 153_600;
pub const DATA_TX_MAX_PROTO_BYTES: usize = 165_890;
pub const MAX_ENTRY_COUNT: usize = 100;

/// Total bytes a single invocation may write, across all data entries.
pub const MAX_TOTAL_WRITE_SET_SIZE_BYTES: usize = 5 * 1024;

/// Accumulated complexity cap across a whole transaction, nested calls
/// included.
pub const TOTAL_COMPLEXITY_LIMIT: u64 = 52_000;

pub const MAX_ASSET_NAME_LENGTH: usize = 16;
pub const MIN_ASSET_NAME_LENGTH: usize = 4;
pub const MAX_ASSET_DESCRIPTION_LENGTH: usize = 1000;
pub const MAX_DECIMALS: u8 = 8;

pub fn max_key_size(version: StdLibVersion) -> usize {
	match version {
		StdLibVersion::V3 => 100,
		StdLibVersion::V4 | StdLibVersion::V5 => 400,
	}
}

pub fn max_write_set_size(version: StdLibVersion) -> usize {
	match version {
		StdLibVersion::V3 | StdLibVersion::V4 | StdLibVersion::V5 => 100,
	}
}

/// Callable actions per invocation, data entries not counted.
pub fn max_callable_actions(version: StdLibVersion) -> usize {
	match version {
		StdLibVersion::V3 | StdLibVersion::V4 => 10,
		StdLibVersion::V5 => 30,
	}
}

/// The fee-step size: one invocation step covers this much complexity.
pub fn max_complexity(version: StdLibVersion) -> u64 {
	match version {
		StdLibVersion::V3 | StdLibVersion::V4 => 5000,
		StdLibVersion::V5 => 10_000,
	}
}

pub fn max_payments(version: StdLibVersion) -> usize {
	match version {
		StdLibVersion::V3 => 1,
		StdLibVersion::V4 => 2,
		StdLibVersion::V5 => 10,
	}
}
