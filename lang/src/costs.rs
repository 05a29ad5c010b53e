//! Documented per-version complexity of the built-in functions.
//!
//! These numbers are the contract between the estimator, the evaluator and
//! the fee scheme; the benchmark harness exercises the native
//! implementations against them.

use crate::{func_ids::NativeFunction, version::StdLibVersion};

pub fn native_cost(function: NativeFunction, version: StdLibVersion) -> u64 {
	use NativeFunction::*;
	use StdLibVersion::*;

	match function {
		Eq | IsInstanceOf | Throw => 1,

		ToBase58 | FromBase58 | ToBase64 | FromBase64 => 10,

		SumLong | SubLong | MulLong | DivLong | ModLong | GtLong | GeLong => 1,
		SumString | SumBytes => match version {
			V3 | V4 => 10,
			V5 => 2,
		},
		Fraction => match version {
			V3 | V4 => 1,
			V5 => 14,
		},
		Pow => match version {
			V3 | V4 => 100,
			V5 => 28,
		},
		Log => match version {
			V3 | V4 => 100,
			V5 => 25,
		},

		SizeBytes | SizeString | SizeList => 2,
		TakeBytes | DropBytes | TakeString | DropString => match version {
			V3 | V4 => 1,
			V5 => 6,
		},
		IndexOf => 20,
		SplitStr => match version {
			V3 | V4 => 100,
			V5 => 75,
		},
		ParseIntValue => match version {
			V3 | V4 => 20,
			V5 => 2,
		},
		Contains => 20,

		LongToBytes | StringToBytes | BytesToLong | LongToString => 1,
		Utf8String => match version {
			V3 | V4 => 20,
			V5 => 7,
		},

		Blake2b256 => match version {
			V3 => 10,
			V4 | V5 => 136,
		},
		Sha256 => match version {
			V3 => 10,
			V4 | V5 => 118,
		},
		Keccak256 => match version {
			V3 => 10,
			V4 | V5 => 195,
		},
		SigVerify => match version {
			V3 => 100,
			V4 | V5 => 181,
		},

		CreateList => 2,
		GetList => 2,
		AppendList => 3,
		ConcatList => 10,
		CalculateLeaseId => 1,
	}
}
