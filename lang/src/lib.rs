//! The compiled-script subsystem: expression AST, runtime values, the
//! budget-bounded deterministic evaluator and the static complexity
//! estimator.
//!
//! Parsing and type checking live upstream; this crate receives compiled
//! expression trees and produces evaluated values, execution logs and
//! complexity figures.

pub mod ast;
pub mod constructors;
pub mod context;
pub mod costs;
pub mod error;
pub mod estimator;
pub mod evaluator;
pub mod func_ids;
pub mod log;
pub mod natives;
pub mod value;
pub mod version;

#[cfg(test)]
mod tests;

pub use ast::{
	CallableFunction, ConstLimit, DAppScript, Declaration, Expr, ExpressionScript, FunctionHeader,
	Script,
};
pub use context::{EvaluationContext, EvaluationFlags};
pub use error::{EstimationError, ExecutionError};
pub use evaluator::{evaluate_dapp_function, evaluate_expression, Evaluation};
pub use func_ids::NativeFunction;
pub use log::{render_log, ExecutionLog};
pub use value::{CaseObject, Value};
pub use version::{EstimatorVersion, StdLibVersion};
