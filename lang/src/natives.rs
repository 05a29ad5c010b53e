//! Implementations of the built-in functions.
//!
//! Every built-in is pure and deterministic. Historical behaviour saturates
//! where the inputs run past the data (slicing, byte decoding); the strict
//! variants are gated on `StdLibVersion::V5` or the explicit semantic flags,
//! never inferred.

use crate::{
	context::EvaluationContext,
	error::ExecutionError,
	func_ids::NativeFunction,
	value::{CaseObject, Value, MAX_BYTE_STR_SIZE},
	version::StdLibVersion,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use waves_primitives::{hashing, ByteStr};

/// Longest byte string `toBase58String` accepts.
pub const MAX_BASE58_BYTES: usize = 64;
/// Longest base58 string `fromBase58String` accepts.
pub const MAX_BASE58_STRING: usize = 100;
/// Longest base64 string `fromBase64String` accepts.
pub const MAX_BASE64_STRING: usize = 44 * 1024;
/// Largest exponent `pow` accepts.
const MAX_POW_EXPONENT: i64 = 512;

pub fn call_native(
	function: NativeFunction,
	args: Vec<Value>,
	context: &EvaluationContext,
) -> Result<Value, ExecutionError> {
	use NativeFunction::*;

	if context.stdlib_version < function.available_since() {
		return Err(ExecutionError::FunctionNotFound(function.id()))
	}

	match function {
		Eq => {
			let [a, b] = take_args(function, args)?;
			Ok(Value::Bool(a == b))
		},
		IsInstanceOf => {
			let [value, type_name] = take_args(function, args)?;
			Ok(Value::Bool(value.type_name() == type_name.as_string()?))
		},
		Throw => match args.len() {
			0 => Err(ExecutionError::Throw("Explicit script termination".to_owned())),
			_ => {
				let [message] = take_args(function, args)?;
				Err(ExecutionError::Throw(message.as_string()?.to_owned()))
			},
		},

		ToBase58 => {
			let [bytes] = take_args(function, args)?;
			let bytes = bytes.as_byte_str()?;
			if bytes.len() > MAX_BASE58_BYTES {
				return Err(ExecutionError::LimitExceeded(format!(
					"toBase58String input {} bytes exceeds {MAX_BASE58_BYTES}",
					bytes.len()
				)))
			}
			Value::string(bytes.to_base58())
		},
		FromBase58 => {
			let [s] = take_args(function, args)?;
			let s = s.as_string()?;
			if s.len() > MAX_BASE58_STRING {
				return Err(ExecutionError::LimitExceeded(format!(
					"fromBase58String input {} characters exceeds {MAX_BASE58_STRING}",
					s.len()
				)))
			}
			let bytes: ByteStr = s
				.parse()
				.map_err(|_| ExecutionError::InvalidInput(format!("Invalid base58 string '{s}'")))?;
			Value::byte_str(bytes)
		},
		ToBase64 => {
			let [bytes] = take_args(function, args)?;
			let bytes = bytes.as_byte_str()?;
			if bytes.len() > MAX_BYTE_STR_SIZE {
				return Err(ExecutionError::LimitExceeded(format!(
					"toBase64String input {} bytes exceeds {MAX_BYTE_STR_SIZE}",
					bytes.len()
				)))
			}
			Value::string(BASE64.encode(bytes.as_bytes()))
		},
		FromBase64 => {
			let [s] = take_args(function, args)?;
			let s = s.as_string()?;
			if s.len() > MAX_BASE64_STRING {
				return Err(ExecutionError::LimitExceeded(format!(
					"fromBase64String input {} characters exceeds {MAX_BASE64_STRING}",
					s.len()
				)))
			}
			let decoded = BASE64
				.decode(s)
				.map_err(|_| ExecutionError::InvalidInput(format!("Invalid base64 string '{s}'")))?;
			Value::byte_str(ByteStr::new(decoded))
		},

		SumLong => checked_binary_op(function, args, i64::checked_add, "+"),
		SubLong => checked_binary_op(function, args, i64::checked_sub, "-"),
		MulLong => checked_binary_op(function, args, i64::checked_mul, "*"),
		DivLong => checked_binary_op(function, args, i64::checked_div, "/"),
		ModLong => checked_binary_op(function, args, i64::checked_rem, "%"),
		GtLong => {
			let [a, b] = take_args(function, args)?;
			Ok(Value::Bool(a.as_long()? > b.as_long()?))
		},
		GeLong => {
			let [a, b] = take_args(function, args)?;
			Ok(Value::Bool(a.as_long()? >= b.as_long()?))
		},
		SumString => {
			let [a, b] = take_args(function, args)?;
			Value::string(format!("{}{}", a.as_string()?, b.as_string()?))
		},
		SumBytes => {
			let [a, b] = take_args(function, args)?;
			Value::byte_str(a.as_byte_str()?.concat(b.as_byte_str()?))
		},
		Fraction => {
			let [a, b, c] = take_args(function, args)?;
			let (a, b, c) = (a.as_long()?, b.as_long()?, c.as_long()?);
			if c == 0 {
				return Err(ExecutionError::ArithmeticError("Fraction: division by zero".into()))
			}
			let result = BigInt::from(a) * BigInt::from(b) / BigInt::from(c);
			result.to_i64().map(Value::Long).ok_or_else(|| {
				ExecutionError::ArithmeticError(format!("Fraction result {result} out of range"))
			})
		},
		Pow => {
			let [base, exponent] = take_args(function, args)?;
			pow(base.as_long()?, exponent.as_long()?, context)
		},
		Log => {
			let [value, base] = take_args(function, args)?;
			log(value.as_long()?, base.as_long()?, context)
		},

		SizeBytes => {
			let [bytes] = take_args(function, args)?;
			Ok(Value::Long(bytes.as_byte_str()?.len() as i64))
		},
		TakeBytes => {
			let [bytes, n] = take_args(function, args)?;
			let bytes = bytes.as_byte_str()?;
			let n = slice_count(n.as_long()?, bytes.len(), context.stdlib_version, "take")?;
			Ok(Value::ByteStr(bytes.take(n)))
		},
		DropBytes => {
			let [bytes, n] = take_args(function, args)?;
			let bytes = bytes.as_byte_str()?;
			let n = slice_count(n.as_long()?, bytes.len(), context.stdlib_version, "drop")?;
			Ok(Value::ByteStr(bytes.drop(n)))
		},
		SizeString => {
			let [s] = take_args(function, args)?;
			let s = s.as_string()?;
			let size =
				if context.flags.fix_unicode_functions { s.chars().count() } else { s.len() };
			Ok(Value::Long(size as i64))
		},
		TakeString => {
			let [s, n] = take_args(function, args)?;
			take_string(s.as_string()?, n.as_long()?, context)
		},
		DropString => {
			let [s, n] = take_args(function, args)?;
			drop_string(s.as_string()?, n.as_long()?, context)
		},
		IndexOf => {
			let [s, sub] = take_args(function, args)?;
			let (s, sub) = (s.as_string()?, sub.as_string()?);
			Ok(match s.find(sub) {
				Some(byte_index) if context.flags.fix_unicode_functions =>
					Value::Long(s[..byte_index].chars().count() as i64),
				Some(byte_index) => Value::Long(byte_index as i64),
				None => Value::Unit,
			})
		},
		SplitStr => {
			let [s, separator] = take_args(function, args)?;
			let (s, separator) = (s.as_string()?, separator.as_string()?);
			let parts: Result<Vec<Value>, _> = if separator.is_empty() {
				s.chars().map(|c| Value::string(c.to_string())).collect()
			} else {
				s.split(separator).map(|part| Value::string(part.to_owned())).collect()
			};
			Value::list(parts?)
		},
		ParseIntValue => {
			let [s] = take_args(function, args)?;
			let s = s.as_string()?;
			s.parse::<i64>().map(Value::Long).map_err(|_| {
				ExecutionError::Throw(format!("Error while parsing string '{s}' to integer"))
			})
		},
		Contains => {
			let [s, sub] = take_args(function, args)?;
			Ok(Value::Bool(s.as_string()?.contains(sub.as_string()?)))
		},

		LongToBytes => {
			let [n] = take_args(function, args)?;
			Ok(Value::ByteStr(ByteStr::from(n.as_long()?.to_be_bytes())))
		},
		StringToBytes => {
			let [s] = take_args(function, args)?;
			Value::byte_str(ByteStr::from_slice(s.as_string()?.as_bytes()))
		},
		BytesToLong => {
			let [bytes] = take_args(function, args)?;
			let bytes = bytes.as_byte_str()?;
			if bytes.len() < 8 ||
				(context.stdlib_version >= StdLibVersion::V5 && bytes.len() != 8)
			{
				return Err(ExecutionError::InvalidInput(format!(
					"toInt input must be 8 bytes, got {}",
					bytes.len()
				)))
			}
			let mut buffer = [0u8; 8];
			buffer.copy_from_slice(&bytes.as_bytes()[..8]);
			Ok(Value::Long(i64::from_be_bytes(buffer)))
		},
		Utf8String => {
			let [bytes] = take_args(function, args)?;
			let bytes = bytes.as_byte_str()?;
			if context.flags.fix_unicode_functions {
				let s = std::str::from_utf8(bytes.as_bytes()).map_err(|_| {
					ExecutionError::InvalidInput("Invalid UTF-8 sequence".to_owned())
				})?;
				Value::string(s.to_owned())
			} else {
				Value::string(String::from_utf8_lossy(bytes.as_bytes()).into_owned())
			}
		},
		LongToString => {
			let [n] = take_args(function, args)?;
			Value::string(n.as_long()?.to_string())
		},

		Blake2b256 => {
			let [bytes] = take_args(function, args)?;
			Ok(Value::ByteStr(ByteStr::from(hashing::blake2b256(bytes.as_byte_str()?))))
		},
		Sha256 => {
			let [bytes] = take_args(function, args)?;
			Ok(Value::ByteStr(ByteStr::from(hashing::sha256(bytes.as_byte_str()?))))
		},
		Keccak256 => {
			let [bytes] = take_args(function, args)?;
			Ok(Value::ByteStr(ByteStr::from(hashing::keccak256(bytes.as_byte_str()?))))
		},
		SigVerify => {
			let [message, signature, public_key] = take_args(function, args)?;
			Ok(Value::Bool(sig_verify(
				message.as_byte_str()?,
				signature.as_byte_str()?,
				public_key.as_byte_str()?,
			)))
		},

		CreateList => {
			let [head, tail] = take_args(function, args)?;
			let mut elements = vec![head];
			elements.extend_from_slice(tail.as_list()?);
			Value::list(elements)
		},
		GetList => {
			let [list, index] = take_args(function, args)?;
			let list = list.as_list()?;
			let index = index.as_long()?;
			usize::try_from(index)
				.ok()
				.and_then(|i| list.get(i))
				.cloned()
				.ok_or_else(|| {
					ExecutionError::ArithmeticError(format!(
						"Index {index} out of bounds for list of size {}",
						list.len()
					))
				})
		},
		AppendList => {
			let [list, element] = take_args(function, args)?;
			let mut elements = list.as_list()?.to_vec();
			elements.push(element);
			Value::list(elements)
		},
		ConcatList => {
			let [a, b] = take_args(function, args)?;
			let mut elements = a.as_list()?.to_vec();
			elements.extend_from_slice(b.as_list()?);
			Value::list(elements)
		},
		SizeList => {
			let [list] = take_args(function, args)?;
			Ok(Value::Long(list.as_list()?.len() as i64))
		},
		CalculateLeaseId => {
			let [lease] = take_args(function, args)?;
			calculate_lease_id(lease.as_case()?, context)
		},
	}
}

fn take_args<const N: usize>(
	function: NativeFunction,
	args: Vec<Value>,
) -> Result<[Value; N], ExecutionError> {
	let actual = args.len();
	args.try_into().map_err(|_| ExecutionError::WrongArgumentCount {
		name: function.name().to_owned(),
		expected: N,
		actual,
	})
}

fn checked_binary_op(
	function: NativeFunction,
	args: Vec<Value>,
	op: fn(i64, i64) -> Option<i64>,
	symbol: &str,
) -> Result<Value, ExecutionError> {
	let [a, b] = take_args(function, args)?;
	let (a, b) = (a.as_long()?, b.as_long()?);
	op(a, b).map(Value::Long).ok_or_else(|| {
		ExecutionError::ArithmeticError(format!("Integer overflow or invalid operation: {a} {symbol} {b}"))
	})
}

/// Saturating slice count before V5, strict bounds from V5 on.
fn slice_count(
	n: i64,
	len: usize,
	version: StdLibVersion,
	operation: &str,
) -> Result<usize, ExecutionError> {
	if version >= StdLibVersion::V5 && (n < 0 || n as usize > len) {
		return Err(ExecutionError::InvalidInput(format!(
			"Invalid {operation} count {n} for input of size {len}"
		)))
	}
	Ok(n.clamp(0, len as i64) as usize)
}

fn take_string(s: &str, n: i64, context: &EvaluationContext) -> Result<Value, ExecutionError> {
	if context.flags.fix_unicode_functions {
		let n = slice_count(n, s.chars().count(), context.stdlib_version, "take")?;
		Value::string(s.chars().take(n).collect())
	} else {
		let n = slice_count(n, s.len(), context.stdlib_version, "take")?;
		Value::string(String::from_utf8_lossy(&s.as_bytes()[..n]).into_owned())
	}
}

fn drop_string(s: &str, n: i64, context: &EvaluationContext) -> Result<Value, ExecutionError> {
	if context.flags.fix_unicode_functions {
		let n = slice_count(n, s.chars().count(), context.stdlib_version, "drop")?;
		Value::string(s.chars().skip(n).collect())
	} else {
		let n = slice_count(n, s.len(), context.stdlib_version, "drop")?;
		Value::string(String::from_utf8_lossy(&s.as_bytes()[n..]).into_owned())
	}
}

fn pow(base: i64, exponent: i64, context: &EvaluationContext) -> Result<Value, ExecutionError> {
	if exponent < 0 {
		return Err(ExecutionError::ArithmeticError(format!("Negative exponent {exponent}")))
	}
	if exponent > MAX_POW_EXPONENT {
		return Err(ExecutionError::ArithmeticError(format!(
			"Exponent {exponent} exceeds {MAX_POW_EXPONENT}"
		)))
	}
	let result = BigInt::from(base).pow(exponent as u32);
	match result.to_i64() {
		Some(n) => Ok(Value::Long(n)),
		None if context.flags.use_new_pow_precision =>
			Err(ExecutionError::ArithmeticError(format!("pow({base}, {exponent}) out of range"))),
		// Historical behaviour: out-of-range powers saturate.
		None =>
			Ok(Value::Long(if result.sign() == num_bigint::Sign::Minus {
				i64::MIN
			} else {
				i64::MAX
			})),
	}
}

fn log(value: i64, base: i64, context: &EvaluationContext) -> Result<Value, ExecutionError> {
	if value <= 0 || base <= 1 {
		return Err(ExecutionError::ArithmeticError(format!("Invalid log({value}, {base})")))
	}
	let mut result: i64 = 0;
	let mut accumulator = BigInt::from(1);
	let big_base = BigInt::from(base);
	let big_value = BigInt::from(value);
	while &accumulator * &big_base <= big_value {
		accumulator *= &big_base;
		result += 1;
	}
	if !context.flags.use_new_pow_precision {
		// Historical rounding: nearest instead of floor, decided in exact
		// integer arithmetic via value^2 >= base^(2k+1).
		if &big_value * &big_value >= &accumulator * &accumulator * &big_base {
			result += 1;
		}
	}
	Ok(Value::Long(result))
}

fn sig_verify(message: &ByteStr, signature: &ByteStr, public_key: &ByteStr) -> bool {
	let Ok(key_bytes) = <[u8; 32]>::try_from(public_key.as_bytes()) else { return false };
	let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else { return false };
	let Ok(signature) = Signature::from_slice(signature.as_bytes()) else { return false };
	key.verify(message.as_bytes(), &signature).is_ok()
}

/// `calculateLeaseId` over a `Lease` case object, using the transaction id
/// from the ambient context.
fn calculate_lease_id(
	lease: &CaseObject,
	context: &EvaluationContext,
) -> Result<Value, ExecutionError> {
	let tx_id = context.tx_id.as_ref().ok_or_else(|| {
		ExecutionError::InvalidInput("calculateLeaseId outside of a transaction".to_owned())
	})?;
	let recipient = lease
		.field("recipient")
		.ok_or_else(|| ExecutionError::FieldNotFound {
			type_name: lease.type_name.clone(),
			field: "recipient".to_owned(),
		})?
		.as_case()?;
	let recipient_bytes = recipient_bytes(recipient, context)?;
	let amount = field_long(lease, "amount")?;
	let nonce = field_long(lease, "nonce")?;
	Ok(Value::ByteStr(hashing::lease_id(tx_id, nonce as u32, &recipient_bytes, amount)))
}

fn recipient_bytes(
	recipient: &CaseObject,
	context: &EvaluationContext,
) -> Result<Vec<u8>, ExecutionError> {
	match recipient.type_name.as_str() {
		"Address" => Ok(recipient
			.field("bytes")
			.ok_or_else(|| ExecutionError::FieldNotFound {
				type_name: "Address".to_owned(),
				field: "bytes".to_owned(),
			})?
			.as_byte_str()?
			.as_bytes()
			.to_vec()),
		"Alias" => {
			let name = recipient
				.field("alias")
				.ok_or_else(|| ExecutionError::FieldNotFound {
					type_name: "Alias".to_owned(),
					field: "alias".to_owned(),
				})?
				.as_string()?
				.to_owned();
			let mut bytes = Vec::with_capacity(4 + name.len());
			bytes.push(2);
			bytes.push(context.chain_id);
			bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
			bytes.extend_from_slice(name.as_bytes());
			Ok(bytes)
		},
		other => Err(ExecutionError::TypeMismatch {
			expected: "Address|Alias".to_owned(),
			actual: other.to_owned(),
		}),
	}
}

fn field_long(obj: &CaseObject, field: &str) -> Result<i64, ExecutionError> {
	obj.field(field)
		.ok_or_else(|| ExecutionError::FieldNotFound {
			type_name: obj.type_name.clone(),
			field: field.to_owned(),
		})?
		.as_long()
}
