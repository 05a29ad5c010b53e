use crate::{hashing::secure_hash, ByteStr, ChainId};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const ADDRESS_LENGTH: usize = 26;
pub const ADDRESS_VERSION: u8 = 1;
const PUBLIC_KEY_HASH_LENGTH: usize = 20;
const CHECKSUM_LENGTH: usize = 4;

pub const ALIAS_MIN_LENGTH: usize = 4;
pub const ALIAS_MAX_LENGTH: usize = 30;
const ALIAS_ALPHABET: &str = "-.0123456789@_abcdefghijklmnopqrstuvwxyz";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
	#[error("Invalid address length {0}, expected {ADDRESS_LENGTH}")]
	InvalidLength(usize),
	#[error("Invalid address version {0}, expected {ADDRESS_VERSION}")]
	InvalidVersion(u8),
	#[error("Invalid address checksum")]
	InvalidChecksum,
	#[error("Invalid base58 string")]
	InvalidBase58,
	#[error("Alias '{0}' length must be between {ALIAS_MIN_LENGTH} and {ALIAS_MAX_LENGTH}")]
	InvalidAliasLength(String),
	#[error("Alias '{0}' contains characters outside of [{ALIAS_ALPHABET}]")]
	InvalidAliasCharset(String),
	#[error("Invalid public key length {0}, expected 32")]
	InvalidPublicKeyLength(usize),
}

/// An ed25519 account public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
	pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
		let bytes: [u8; 32] =
			bytes.try_into().map_err(|_| AddressError::InvalidPublicKeyLength(bytes.len()))?;
		Ok(PublicKey(bytes))
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Derive the account address on the given chain.
	pub fn address(&self, chain_id: ChainId) -> Address {
		Address::from_public_key(chain_id, &self.0)
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", bs58::encode(&self.0).into_string())
	}
}

impl fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PublicKey({self})")
	}
}

impl From<[u8; 32]> for PublicKey {
	fn from(bytes: [u8; 32]) -> Self {
		PublicKey(bytes)
	}
}

/// A 26-byte account address: version byte, chain byte, 20-byte public key
/// hash and a 4-byte checksum over the first 22 bytes.
///
/// Only validated addresses exist: every constructor checks length, version
/// and checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
	pub fn from_public_key(chain_id: ChainId, public_key: &[u8]) -> Self {
		let mut bytes = [0u8; ADDRESS_LENGTH];
		bytes[0] = ADDRESS_VERSION;
		bytes[1] = chain_id;
		bytes[2..2 + PUBLIC_KEY_HASH_LENGTH]
			.copy_from_slice(&secure_hash(public_key)[..PUBLIC_KEY_HASH_LENGTH]);
		let checksum = secure_hash(&bytes[..ADDRESS_LENGTH - CHECKSUM_LENGTH]);
		bytes[ADDRESS_LENGTH - CHECKSUM_LENGTH..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);
		Address(bytes)
	}

	pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
		let bytes: [u8; ADDRESS_LENGTH] =
			bytes.try_into().map_err(|_| AddressError::InvalidLength(bytes.len()))?;
		if bytes[0] != ADDRESS_VERSION {
			return Err(AddressError::InvalidVersion(bytes[0]))
		}
		let checksum = secure_hash(&bytes[..ADDRESS_LENGTH - CHECKSUM_LENGTH]);
		if bytes[ADDRESS_LENGTH - CHECKSUM_LENGTH..] != checksum[..CHECKSUM_LENGTH] {
			return Err(AddressError::InvalidChecksum)
		}
		Ok(Address(bytes))
	}

	pub fn chain_id(&self) -> ChainId {
		self.0[1]
	}

	pub fn public_key_hash(&self) -> &[u8] {
		&self.0[2..2 + PUBLIC_KEY_HASH_LENGTH]
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn to_bytestr(&self) -> ByteStr {
		ByteStr::from_slice(&self.0)
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", bs58::encode(&self.0).into_string())
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Address({self})")
	}
}

impl FromStr for Address {
	type Err = AddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = bs58::decode(s).into_vec().map_err(|_| AddressError::InvalidBase58)?;
		Address::try_from_bytes(&bytes)
	}
}

impl Serialize for Address {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// A short account name registered on chain. Validated charset and length.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Alias {
	chain_id: ChainId,
	name: String,
}

impl Alias {
	pub fn new(chain_id: ChainId, name: &str) -> Result<Self, AddressError> {
		if name.len() < ALIAS_MIN_LENGTH || name.len() > ALIAS_MAX_LENGTH {
			return Err(AddressError::InvalidAliasLength(name.to_owned()))
		}
		if !name.chars().all(|c| ALIAS_ALPHABET.contains(c)) {
			return Err(AddressError::InvalidAliasCharset(name.to_owned()))
		}
		Ok(Alias { chain_id, name: name.to_owned() })
	}

	pub fn chain_id(&self) -> ChainId {
		self.chain_id
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

impl fmt::Display for Alias {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "alias:{}:{}", self.chain_id as char, self.name)
	}
}

impl fmt::Debug for Alias {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Alias({self})")
	}
}

/// A transaction recipient: either a concrete address or an alias that the
/// blockchain view resolves at diff time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressOrAlias {
	Address(Address),
	Alias(Alias),
}

impl AddressOrAlias {
	pub fn chain_id(&self) -> ChainId {
		match self {
			AddressOrAlias::Address(address) => address.chain_id(),
			AddressOrAlias::Alias(alias) => alias.chain_id(),
		}
	}

	/// The byte form used in deterministic id derivation (lease ids).
	pub fn to_bytes(&self) -> Vec<u8> {
		match self {
			AddressOrAlias::Address(address) => address.as_bytes().to_vec(),
			AddressOrAlias::Alias(alias) => {
				let name = alias.name().as_bytes();
				let mut bytes = Vec::with_capacity(4 + name.len());
				bytes.push(2);
				bytes.push(alias.chain_id());
				bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
				bytes.extend_from_slice(name);
				bytes
			},
		}
	}
}

impl fmt::Display for AddressOrAlias {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AddressOrAlias::Address(address) => write!(f, "{address}"),
			AddressOrAlias::Alias(alias) => write!(f, "{alias}"),
		}
	}
}

impl From<Address> for AddressOrAlias {
	fn from(address: Address) -> Self {
		AddressOrAlias::Address(address)
	}
}

impl From<Alias> for AddressOrAlias {
	fn from(alias: Alias) -> Self {
		AddressOrAlias::Alias(alias)
	}
}
