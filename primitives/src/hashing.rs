//! Fixed hash helpers used across the engine.

use crate::ByteStr;
use blake2::{digest::consts::U32, Blake2b, Digest};
use sha2::Sha256;
use sha3::Keccak256;

pub const DIGEST_LENGTH: usize = 32;

pub fn blake2b256(bytes: &[u8]) -> [u8; DIGEST_LENGTH] {
	let mut hasher = Blake2b::<U32>::new();
	hasher.update(bytes);
	hasher.finalize().into()
}

pub fn keccak256(bytes: &[u8]) -> [u8; DIGEST_LENGTH] {
	let mut hasher = Keccak256::new();
	hasher.update(bytes);
	hasher.finalize().into()
}

pub fn sha256(bytes: &[u8]) -> [u8; DIGEST_LENGTH] {
	let mut hasher = Sha256::new();
	hasher.update(bytes);
	hasher.finalize().into()
}

/// The chained hash used for address checksums and key derivation.
pub fn secure_hash(bytes: &[u8]) -> [u8; DIGEST_LENGTH] {
	keccak256(&blake2b256(bytes))
}

/// Deterministic lease id:
/// `blake2b256(tx_id || u32_le(nonce) || recipient_bytes || i64_be(amount))`.
pub fn lease_id(tx_id: &ByteStr, nonce: u32, recipient_bytes: &[u8], amount: i64) -> ByteStr {
	let mut input = Vec::with_capacity(tx_id.len() + 4 + recipient_bytes.len() + 8);
	input.extend_from_slice(tx_id.as_bytes());
	input.extend_from_slice(&nonce.to_le_bytes());
	input.extend_from_slice(recipient_bytes);
	input.extend_from_slice(&amount.to_be_bytes());
	ByteStr::from(blake2b256(&input))
}
