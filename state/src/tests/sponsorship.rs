use crate::{
	error::RejectError,
	limits::FEE_UNIT,
	sponsorship::{from_base_units, to_base_units},
};

#[test]
fn conversion_uses_floor_division() {
	// rate 3: 2 asset units are worth floor(2 * 100_000 / 3) base units.
	assert_eq!(to_base_units(2, 3), Ok(66_666));
	assert_eq!(from_base_units(66_666, 3), Ok(1));
	assert_eq!(to_base_units(0, 3), Ok(0));
}

#[test]
fn rate_one_is_the_fee_unit() {
	assert_eq!(to_base_units(1, 1), Ok(FEE_UNIT));
	assert_eq!(from_base_units(FEE_UNIT, 1), Ok(1));
}

#[test]
fn zero_rate_is_the_unusable_sentinel() {
	assert_eq!(to_base_units(100, 0), Ok(i64::MAX));
}

#[test]
fn overflowing_conversion_is_an_error() {
	assert_eq!(to_base_units(i64::MAX, 1), Err(RejectError::OverflowError));
	assert_eq!(from_base_units(i64::MAX, i64::MAX), Err(RejectError::OverflowError));
}

#[test]
fn unbounded_intermediate_products() {
	// i64::MAX * FEE_UNIT overflows i64 but the result fits after division.
	assert_eq!(to_base_units(i64::MAX, FEE_UNIT), Ok(i64::MAX));
}
