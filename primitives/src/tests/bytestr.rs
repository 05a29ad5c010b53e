use crate::ByteStr;
use proptest::prelude::*;

#[test]
fn base58_round_trip() {
	for input in [
		"96yeNG1KYJKAVnfKqfkfktkXuPj1CLPEsgCDkm42VcaT",
		"7TecQdLbPuxt3mWukbZ1g1dTZeA6rxgjMxfS9MRURaEP",
		"2W",
		"",
	] {
		let parsed: ByteStr = input.parse().expect("parse error");
		assert_eq!(parsed.to_base58(), input);
	}
}

#[test]
fn network_byte_renders_as_2w() {
	// 0x57 is the mainnet chain byte; its base58 form shows up in logs.
	assert_eq!(format!("{:?}", ByteStr::from([b'W'])), "base58'2W'");
}

#[test]
fn take_and_drop_saturate() {
	let bytes = ByteStr::from_slice(&[1, 2, 3]);
	assert_eq!(bytes.take(2), ByteStr::from_slice(&[1, 2]));
	assert_eq!(bytes.take(10), bytes);
	assert_eq!(bytes.drop(2), ByteStr::from_slice(&[3]));
	assert_eq!(bytes.drop(10), ByteStr::empty());
}

#[test]
fn serde_as_base58_string() {
	let bytes = ByteStr::from_slice(&[0xcf; 4]);
	let json = serde_json::to_string(&bytes).expect("serialize");
	assert_eq!(serde_json::from_str::<ByteStr>(&json).expect("deserialize"), bytes);
}

proptest! {
	#[test]
	fn display_from_str_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
		let original = ByteStr::new(bytes);
		let parsed: ByteStr = original.to_string().parse().unwrap();
		prop_assert_eq!(parsed, original);
	}
}
