//! Value types shared by the script subsystem and the diff engine.
//!
//! Everything in this crate is an immutable value with structural equality.
//! Balance arithmetic stays in `i64` with checked addition; hashing is
//! delegated to the digest crates and exposed through a handful of fixed
//! helpers.

mod address;
mod asset;
mod bytestr;
pub mod hashing;

#[cfg(test)]
mod tests;

pub use address::{Address, AddressError, AddressOrAlias, Alias, PublicKey};
pub use asset::Asset;
pub use bytestr::ByteStr;

/// Chain (network) discriminator byte embedded in addresses and aliases.
pub type ChainId = u8;

/// Block height.
pub type Height = u32;
