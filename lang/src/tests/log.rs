use crate::{log::render_log, value::Value};
use waves_primitives::ByteStr;

#[test]
fn renders_one_tab_prefixed_line_per_entry() {
	let log = vec![
		("NETWORKBYTE".to_owned(), Value::ByteStr(ByteStr::from([b'W']))),
		("@p".to_owned(), Value::Bool(false)),
	];
	assert_eq!(render_log(&log), "\tNETWORKBYTE = base58'2W'\n\t@p = false");
}

#[test]
fn case_objects_render_fields_in_declaration_order() {
	let recipient = ByteStr::from([1u8; 4]);
	let value = Value::case(
		"TransferTransaction",
		vec![
			("amount".to_owned(), Value::Long(100_000_000)),
			("recipient".to_owned(), Value::case("Address", vec![(
				"bytes".to_owned(),
				Value::ByteStr(recipient.clone()),
			)])),
			("attachment".to_owned(), Value::Unit),
		],
	);
	assert_eq!(
		value.to_string(),
		format!(
			"TransferTransaction(amount = 100000000, recipient = Address(bytes = base58'{}'), attachment = Unit)",
			recipient.to_base58()
		)
	);
}

#[test]
fn strings_and_collections_render_canonically() {
	assert_eq!(Value::String("key".to_owned()).to_string(), "\"key\"");
	assert_eq!(
		Value::List(vec![Value::Long(1), Value::Bool(true)]).to_string(),
		"[1, true]"
	);
	assert_eq!(
		Value::Tuple(vec![Value::Long(1), Value::Unit]).to_string(),
		"(1, Unit)"
	);
}
