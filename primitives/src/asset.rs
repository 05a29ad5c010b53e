use crate::ByteStr;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The native chain asset or an issued one identified by a 32-byte id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Asset {
	Waves,
	IssuedAsset(ByteStr),
}

impl Asset {
	pub fn from_id(id: Option<ByteStr>) -> Self {
		match id {
			Some(id) => Asset::IssuedAsset(id),
			None => Asset::Waves,
		}
	}

	pub fn is_native(&self) -> bool {
		matches!(self, Asset::Waves)
	}

	pub fn issued_id(&self) -> Option<&ByteStr> {
		match self {
			Asset::Waves => None,
			Asset::IssuedAsset(id) => Some(id),
		}
	}
}

impl fmt::Display for Asset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Asset::Waves => write!(f, "WAVES"),
			Asset::IssuedAsset(id) => write!(f, "{id}"),
		}
	}
}

impl fmt::Debug for Asset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{self}")
	}
}

impl FromStr for Asset {
	type Err = bs58::decode::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"WAVES" | "Waves" | "waves" => Ok(Asset::Waves),
			id => Ok(Asset::IssuedAsset(id.parse()?)),
		}
	}
}

impl Serialize for Asset {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Asset::Waves => serializer.serialize_none(),
			Asset::IssuedAsset(id) => serializer.serialize_some(id),
		}
	}
}

impl<'de> Deserialize<'de> for Asset {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(Asset::from_id(Option::<ByteStr>::deserialize(deserializer)?))
	}
}

impl From<ByteStr> for Asset {
	fn from(id: ByteStr) -> Self {
		Asset::IssuedAsset(id)
	}
}
