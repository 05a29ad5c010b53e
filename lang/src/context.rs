use crate::{value::Value, version::StdLibVersion};
use waves_primitives::{ByteStr, ChainId};

/// Semantic fixes that changed historical built-in behaviour. Activated by
/// chain configuration, not inferred from the script version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationFlags {
	/// String built-ins operate on characters instead of raw bytes and
	/// invalid UTF-8 is an error instead of a lossy conversion.
	pub fix_unicode_functions: bool,
	/// `pow` overflow is an error instead of saturating.
	pub use_new_pow_precision: bool,
}

/// Everything the evaluator needs besides the expression itself: the
/// standard-library version, semantic flags, the ambient chain data used by
/// id-deriving built-ins, and the pre-bound environment values.
///
/// The read-only blockchain environment enters evaluation through
/// `bindings`: the caller binds values such as `tx`, `this`, `height` and
/// `NETWORKBYTE` before evaluation starts. Bindings are logged the first
/// time the script forces them.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
	pub stdlib_version: StdLibVersion,
	pub flags: EvaluationFlags,
	pub chain_id: ChainId,
	/// Id of the transaction being processed, for deterministic id
	/// derivation (`calculateLeaseId`).
	pub tx_id: Option<ByteStr>,
	pub bindings: Vec<(String, Value)>,
}

impl EvaluationContext {
	pub fn new(stdlib_version: StdLibVersion, chain_id: ChainId) -> Self {
		EvaluationContext {
			stdlib_version,
			flags: EvaluationFlags::default(),
			chain_id,
			tx_id: None,
			bindings: Vec::new(),
		}
	}

	pub fn with_flags(mut self, flags: EvaluationFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn with_tx_id(mut self, tx_id: ByteStr) -> Self {
		self.tx_id = Some(tx_id);
		self
	}

	pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
		self.bindings.push((name.into(), value));
		self
	}
}
