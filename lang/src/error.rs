use crate::value::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
	#[error("Evaluation complexity limit exceeded")]
	ComplexityLimitExceeded,
	#[error("Evaluation call depth exceeds {0}")]
	StackOverflow(usize),
	#[error("{0}")]
	LimitExceeded(String),
	/// The script terminated itself. This is rejection control flow, not an
	/// internal failure, and must stay a distinct variant all the way up.
	#[error("{0}")]
	Throw(String),
	#[error("Native function {0} not found")]
	FunctionNotFound(u16),
	#[error("User function {0} not found")]
	UserFunctionNotFound(String),
	#[error("Function {name} expects {expected} arguments, got {actual}")]
	WrongArgumentCount { name: String, expected: usize, actual: usize },
	#[error("Reference {0} not found")]
	MissingBinding(String),
	#[error("Field {field} not found on {type_name}")]
	FieldNotFound { type_name: String, field: String },
	#[error("Unexpected type: expected {expected}, got {actual}")]
	TypeMismatch { expected: String, actual: String },
	#[error("{0}")]
	InvalidInput(String),
	#[error("{0}")]
	ArithmeticError(String),
}

impl ExecutionError {
	pub fn type_mismatch(expected: &str, actual: &Value) -> Self {
		ExecutionError::TypeMismatch {
			expected: expected.to_owned(),
			actual: actual.type_name().to_owned(),
		}
	}

	/// Whether the failure was produced by the script itself (a `throw`) as
	/// opposed to a resource or typing violation.
	pub fn is_script_throw(&self) -> bool {
		matches!(self, ExecutionError::Throw(_))
	}
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimationError {
	#[error("Native function {0} not found")]
	FunctionNotFound(u16),
	#[error("User function {0} not found")]
	UserFunctionNotFound(String),
	#[error("Function {0} calls itself")]
	RecursiveFunction(String),
	#[error("Estimated complexity overflows")]
	Overflow,
}
