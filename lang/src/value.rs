//! Runtime values and their canonical textual form.

use crate::error::ExecutionError;
use std::fmt;
use waves_primitives::ByteStr;

/// Byte strings are capped at 32 KiB.
pub const MAX_BYTE_STR_SIZE: usize = 32 * 1024;
/// Strings are capped above the base64 expansion of the largest byte
/// string, so encoding any legal byte string yields a legal string.
pub const MAX_STRING_SIZE: usize = 64 * 1024;
/// Lists are capped at 1000 elements.
pub const MAX_LIST_SIZE: usize = 1000;

/// A case object: a named record with ordered fields. Field order is part of
/// the canonical rendering and must be preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseObject {
	pub type_name: String,
	pub fields: Vec<(String, Value)>,
}

impl CaseObject {
	pub fn new(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
		CaseObject { type_name: type_name.into(), fields }
	}

	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Long(i64),
	Bool(bool),
	ByteStr(ByteStr),
	String(String),
	Unit,
	Tuple(Vec<Value>),
	List(Vec<Value>),
	CaseObject(CaseObject),
}

impl Value {
	/// Size-capped byte string constructor.
	pub fn byte_str(bytes: ByteStr) -> Result<Value, ExecutionError> {
		if bytes.len() > MAX_BYTE_STR_SIZE {
			return Err(ExecutionError::LimitExceeded(format!(
				"Byte string size {} exceeds {MAX_BYTE_STR_SIZE}",
				bytes.len()
			)))
		}
		Ok(Value::ByteStr(bytes))
	}

	/// Size-capped string constructor.
	pub fn string(s: String) -> Result<Value, ExecutionError> {
		if s.len() > MAX_STRING_SIZE {
			return Err(ExecutionError::LimitExceeded(format!(
				"String size {} exceeds {MAX_STRING_SIZE}",
				s.len()
			)))
		}
		Ok(Value::String(s))
	}

	/// Size-capped list constructor.
	pub fn list(elements: Vec<Value>) -> Result<Value, ExecutionError> {
		if elements.len() > MAX_LIST_SIZE {
			return Err(ExecutionError::LimitExceeded(format!(
				"List size {} exceeds {MAX_LIST_SIZE}",
				elements.len()
			)))
		}
		Ok(Value::List(elements))
	}

	pub fn case(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Value {
		Value::CaseObject(CaseObject::new(type_name, fields))
	}

	/// The type name used by `isInstanceOf` and in type errors.
	pub fn type_name(&self) -> &str {
		match self {
			Value::Long(_) => "Int",
			Value::Bool(_) => "Boolean",
			Value::ByteStr(_) => "ByteVector",
			Value::String(_) => "String",
			Value::Unit => "Unit",
			Value::Tuple(_) => "Tuple",
			Value::List(_) => "List",
			Value::CaseObject(obj) => &obj.type_name,
		}
	}

	pub fn as_long(&self) -> Result<i64, ExecutionError> {
		match self {
			Value::Long(n) => Ok(*n),
			other => Err(ExecutionError::type_mismatch("Int", other)),
		}
	}

	pub fn as_bool(&self) -> Result<bool, ExecutionError> {
		match self {
			Value::Bool(b) => Ok(*b),
			other => Err(ExecutionError::type_mismatch("Boolean", other)),
		}
	}

	pub fn as_byte_str(&self) -> Result<&ByteStr, ExecutionError> {
		match self {
			Value::ByteStr(bytes) => Ok(bytes),
			other => Err(ExecutionError::type_mismatch("ByteVector", other)),
		}
	}

	pub fn as_string(&self) -> Result<&str, ExecutionError> {
		match self {
			Value::String(s) => Ok(s),
			other => Err(ExecutionError::type_mismatch("String", other)),
		}
	}

	pub fn as_list(&self) -> Result<&[Value], ExecutionError> {
		match self {
			Value::List(elements) => Ok(elements),
			other => Err(ExecutionError::type_mismatch("List", other)),
		}
	}

	pub fn as_case(&self) -> Result<&CaseObject, ExecutionError> {
		match self {
			Value::CaseObject(obj) => Ok(obj),
			other => Err(ExecutionError::type_mismatch("CaseObject", other)),
		}
	}
}

/// Canonical pretty-print: `base58'…'` for bytes, double-quoted strings,
/// `Name(field = value, …)` for case objects. This form is deterministic and
/// appears verbatim in validation-error messages.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Long(n) => write!(f, "{n}"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::ByteStr(bytes) => write!(f, "base58'{}'", bytes.to_base58()),
			Value::String(s) => write!(f, "\"{s}\""),
			Value::Unit => write!(f, "Unit"),
			Value::Tuple(elements) => {
				write!(f, "(")?;
				for (i, element) in elements.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{element}")?;
				}
				write!(f, ")")
			},
			Value::List(elements) => {
				write!(f, "[")?;
				for (i, element) in elements.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{element}")?;
				}
				write!(f, "]")
			},
			Value::CaseObject(obj) => {
				write!(f, "{}(", obj.type_name)?;
				for (i, (name, value)) in obj.fields.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{name} = {value}")?;
				}
				write!(f, ")")
			},
		}
	}
}
