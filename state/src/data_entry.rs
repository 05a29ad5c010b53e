use serde::{Deserialize, Serialize};
use waves_primitives::ByteStr;

/// A typed key-value write to account storage. `Empty` deletes the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEntry {
	pub key: String,
	pub value: DataValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DataValue {
	Bool(bool),
	Int(i64),
	Binary(ByteStr),
	String(String),
	Empty,
}

impl DataEntry {
	pub fn new(key: impl Into<String>, value: DataValue) -> Self {
		DataEntry { key: key.into(), value }
	}

	pub fn is_delete(&self) -> bool {
		matches!(self.value, DataValue::Empty)
	}

	/// Storage footprint used by the write-set byte limits: key bytes plus
	/// the payload bytes of the value.
	pub fn payload_size(&self) -> usize {
		self.key.len() +
			match &self.value {
				DataValue::Bool(_) => 1,
				DataValue::Int(_) => 8,
				DataValue::Binary(bytes) => bytes.len(),
				DataValue::String(s) => s.len(),
				DataValue::Empty => 0,
			}
	}
}
