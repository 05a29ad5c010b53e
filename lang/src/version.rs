use serde::{Deserialize, Serialize};

/// Standard-library version of a compiled script. Selects available
/// functions, per-function costs, size limits and semantic fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StdLibVersion {
	V3,
	V4,
	V5,
}

/// Version of the static complexity estimator. Upgradeable independently of
/// the standard library so that stored per-callable complexities can be
/// recomputed without re-running old scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EstimatorVersion {
	V1,
	V2,
	V3,
}

impl EstimatorVersion {
	pub fn latest() -> Self {
		EstimatorVersion::V3
	}
}
