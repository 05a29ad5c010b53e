//! Sponsored-fee arithmetic.
//!
//! Intermediate products run in unbounded integers; only the final value is
//! converted back to `i64`, exactly, with overflow surfaced as an error.

use crate::{error::RejectError, limits::FEE_UNIT};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Convert an asset-denominated fee to native units using the issuer's
/// declared rate: `floor(asset_fee * FEE_UNIT / rate)`.
///
/// A zero rate means "not sponsored"; the conversion returns `i64::MAX` as
/// the unusable sentinel so a fee check against it always fails.
pub fn to_base_units(asset_fee: i64, rate: i64) -> Result<i64, RejectError> {
	if rate == 0 {
		return Ok(i64::MAX)
	}
	let result = BigInt::from(asset_fee) * FEE_UNIT / rate;
	result.to_i64().ok_or(RejectError::OverflowError)
}

/// Inverse conversion: `floor(base_fee * rate / FEE_UNIT)`.
pub fn from_base_units(base_fee: i64, rate: i64) -> Result<i64, RejectError> {
	let result = BigInt::from(base_fee) * rate / FEE_UNIT;
	result.to_i64().ok_or(RejectError::OverflowError)
}
