mod estimator;
mod evaluator;
mod log;

use crate::{context::EvaluationContext, version::StdLibVersion};

pub const MAINNET: u8 = b'W';

pub fn context(version: StdLibVersion) -> EvaluationContext {
	EvaluationContext::new(version, MAINNET)
}
