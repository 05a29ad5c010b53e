use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref, str::FromStr};

/// An opaque immutable byte string.
///
/// Equality and ordering are by content. The textual form everywhere (logs,
/// serde, errors) is base58 without a checksum.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteStr(Vec<u8>);

impl ByteStr {
	pub const fn empty() -> Self {
		ByteStr(Vec::new())
	}

	pub fn new(bytes: Vec<u8>) -> Self {
		ByteStr(bytes)
	}

	pub fn from_slice(bytes: &[u8]) -> Self {
		ByteStr(bytes.to_vec())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}

	/// First `n` bytes; saturates at the end of the string.
	pub fn take(&self, n: usize) -> ByteStr {
		ByteStr(self.0[..n.min(self.0.len())].to_vec())
	}

	/// Everything after the first `n` bytes; saturates to empty.
	pub fn drop(&self, n: usize) -> ByteStr {
		ByteStr(self.0[n.min(self.0.len())..].to_vec())
	}

	pub fn concat(&self, other: &ByteStr) -> ByteStr {
		let mut out = self.0.clone();
		out.extend_from_slice(&other.0);
		ByteStr(out)
	}

	pub fn to_base58(&self) -> String {
		bs58::encode(&self.0).into_string()
	}
}

impl Deref for ByteStr {
	type Target = [u8];

	fn deref(&self) -> &[u8] {
		&self.0
	}
}

impl AsRef<[u8]> for ByteStr {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl From<Vec<u8>> for ByteStr {
	fn from(bytes: Vec<u8>) -> Self {
		ByteStr(bytes)
	}
}

impl From<&[u8]> for ByteStr {
	fn from(bytes: &[u8]) -> Self {
		ByteStr::from_slice(bytes)
	}
}

impl<const N: usize> From<[u8; N]> for ByteStr {
	fn from(bytes: [u8; N]) -> Self {
		ByteStr(bytes.to_vec())
	}
}

impl fmt::Display for ByteStr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_base58())
	}
}

impl fmt::Debug for ByteStr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "base58'{}'", self.to_base58())
	}
}

impl FromStr for ByteStr {
	type Err = bs58::decode::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(ByteStr(bs58::decode(s).into_vec()?))
	}
}

impl Serialize for ByteStr {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_base58())
	}
}

impl<'de> Deserialize<'de> for ByteStr {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		use serde::de::{self, Unexpected, Visitor};

		struct ByteStrVisitor;

		impl Visitor<'_> for ByteStrVisitor {
			type Value = ByteStr;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				write!(formatter, "a base58 string")
			}

			fn visit_str<E: de::Error>(self, s: &str) -> Result<ByteStr, E> {
				s.parse().map_err(|_| de::Error::invalid_value(Unexpected::Str(s), &self))
			}
		}

		deserializer.deserialize_str(ByteStrVisitor)
	}
}
