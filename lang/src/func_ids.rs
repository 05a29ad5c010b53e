//! The stable native-function id table.
//!
//! Ids are part of the compiled-script wire format. The values are explicitly
//! given and must never be changed.

use crate::version::StdLibVersion;
use lazy_static::lazy_static;
use std::collections::HashMap;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeFunction {
	Eq = 0,
	IsInstanceOf = 1,
	Throw = 2,

	ToBase58 = 100,
	FromBase58 = 101,
	ToBase64 = 102,
	FromBase64 = 103,

	SumLong = 200,
	SubLong = 201,
	SumString = 202,
	SumBytes = 203,
	MulLong = 204,
	DivLong = 205,
	ModLong = 206,
	Fraction = 207,
	Pow = 208,
	Log = 209,
	GtLong = 210,
	GeLong = 211,

	SizeBytes = 300,
	TakeBytes = 301,
	DropBytes = 302,
	SizeString = 303,
	TakeString = 304,
	DropString = 305,
	IndexOf = 306,
	SplitStr = 307,
	ParseIntValue = 308,
	Contains = 309,

	LongToBytes = 400,
	StringToBytes = 401,
	BytesToLong = 402,
	Utf8String = 403,
	LongToString = 404,

	Blake2b256 = 500,
	Sha256 = 501,
	Keccak256 = 502,
	SigVerify = 503,

	CreateList = 1100,
	GetList = 1101,
	AppendList = 1102,
	ConcatList = 1103,
	SizeList = 1104,
	CalculateLeaseId = 1105,
}

pub const ALL_NATIVE_FUNCTIONS: &[NativeFunction] = &[
	NativeFunction::Eq,
	NativeFunction::IsInstanceOf,
	NativeFunction::Throw,
	NativeFunction::ToBase58,
	NativeFunction::FromBase58,
	NativeFunction::ToBase64,
	NativeFunction::FromBase64,
	NativeFunction::SumLong,
	NativeFunction::SubLong,
	NativeFunction::SumString,
	NativeFunction::SumBytes,
	NativeFunction::MulLong,
	NativeFunction::DivLong,
	NativeFunction::ModLong,
	NativeFunction::Fraction,
	NativeFunction::Pow,
	NativeFunction::Log,
	NativeFunction::GtLong,
	NativeFunction::GeLong,
	NativeFunction::SizeBytes,
	NativeFunction::TakeBytes,
	NativeFunction::DropBytes,
	NativeFunction::SizeString,
	NativeFunction::TakeString,
	NativeFunction::DropString,
	NativeFunction::IndexOf,
	NativeFunction::SplitStr,
	NativeFunction::ParseIntValue,
	NativeFunction::Contains,
	NativeFunction::LongToBytes,
	NativeFunction::StringToBytes,
	NativeFunction::BytesToLong,
	NativeFunction::Utf8String,
	NativeFunction::LongToString,
	NativeFunction::Blake2b256,
	NativeFunction::Sha256,
	NativeFunction::Keccak256,
	NativeFunction::SigVerify,
	NativeFunction::CreateList,
	NativeFunction::GetList,
	NativeFunction::AppendList,
	NativeFunction::ConcatList,
	NativeFunction::SizeList,
	NativeFunction::CalculateLeaseId,
];

lazy_static! {
	static ref BY_ID: HashMap<u16, NativeFunction> =
		ALL_NATIVE_FUNCTIONS.iter().map(|f| (*f as u16, *f)).collect();
}

impl NativeFunction {
	pub fn from_id(id: u16) -> Option<NativeFunction> {
		BY_ID.get(&id).copied()
	}

	pub fn id(self) -> u16 {
		self as u16
	}

	pub fn name(self) -> &'static str {
		match self {
			NativeFunction::Eq => "==",
			NativeFunction::IsInstanceOf => "_isInstanceOf",
			NativeFunction::Throw => "throw",
			NativeFunction::ToBase58 => "toBase58String",
			NativeFunction::FromBase58 => "fromBase58String",
			NativeFunction::ToBase64 => "toBase64String",
			NativeFunction::FromBase64 => "fromBase64String",
			NativeFunction::SumLong => "+",
			NativeFunction::SubLong => "-",
			NativeFunction::SumString => "+(String)",
			NativeFunction::SumBytes => "+(ByteVector)",
			NativeFunction::MulLong => "*",
			NativeFunction::DivLong => "/",
			NativeFunction::ModLong => "%",
			NativeFunction::Fraction => "fraction",
			NativeFunction::Pow => "pow",
			NativeFunction::Log => "log",
			NativeFunction::GtLong => ">",
			NativeFunction::GeLong => ">=",
			NativeFunction::SizeBytes => "size(ByteVector)",
			NativeFunction::TakeBytes => "take(ByteVector)",
			NativeFunction::DropBytes => "drop(ByteVector)",
			NativeFunction::SizeString => "size(String)",
			NativeFunction::TakeString => "take(String)",
			NativeFunction::DropString => "drop(String)",
			NativeFunction::IndexOf => "indexOf",
			NativeFunction::SplitStr => "split",
			NativeFunction::ParseIntValue => "parseIntValue",
			NativeFunction::Contains => "contains",
			NativeFunction::LongToBytes => "toBytes(Int)",
			NativeFunction::StringToBytes => "toBytes(String)",
			NativeFunction::BytesToLong => "toInt",
			NativeFunction::Utf8String => "toUtf8String",
			NativeFunction::LongToString => "toString(Int)",
			NativeFunction::Blake2b256 => "blake2b256",
			NativeFunction::Sha256 => "sha256",
			NativeFunction::Keccak256 => "keccak256",
			NativeFunction::SigVerify => "sigVerify",
			NativeFunction::CreateList => "cons",
			NativeFunction::GetList => "getElement",
			NativeFunction::AppendList => ":+",
			NativeFunction::ConcatList => "++",
			NativeFunction::SizeList => "size(List)",
			NativeFunction::CalculateLeaseId => "calculateLeaseId",
		}
	}

	/// The earliest standard-library version where the function exists.
	pub fn available_since(self) -> StdLibVersion {
		match self {
			NativeFunction::Contains => StdLibVersion::V4,
			NativeFunction::CalculateLeaseId => StdLibVersion::V5,
			_ => StdLibVersion::V3,
		}
	}
}
