use crate::{Address, AddressError, Alias, PublicKey};

const MAINNET: u8 = b'W';

#[test]
fn derived_address_is_valid() {
	let address = Address::from_public_key(MAINNET, &[7u8; 32]);
	assert_eq!(address.chain_id(), MAINNET);
	assert_eq!(Address::try_from_bytes(address.as_bytes()).expect("valid"), address);
}

#[test]
fn display_from_str_round_trip() {
	let address = PublicKey([0xcf; 32]).address(MAINNET);
	let parsed: Address = address.to_string().parse().expect("parse error");
	assert_eq!(parsed, address);
}

#[test]
fn corrupted_checksum_is_rejected() {
	let address = Address::from_public_key(MAINNET, &[7u8; 32]);
	let mut bytes = address.as_bytes().to_vec();
	*bytes.last_mut().unwrap() ^= 0xff;
	assert_eq!(Address::try_from_bytes(&bytes), Err(AddressError::InvalidChecksum));
}

#[test]
fn wrong_length_is_rejected() {
	assert_eq!(Address::try_from_bytes(&[1u8; 25]), Err(AddressError::InvalidLength(25)));
}

#[test]
fn wrong_version_is_rejected() {
	let address = Address::from_public_key(MAINNET, &[7u8; 32]);
	let mut bytes = address.as_bytes().to_vec();
	bytes[0] = 9;
	assert_eq!(Address::try_from_bytes(&bytes), Err(AddressError::InvalidVersion(9)));
}

#[test]
fn alias_charset_and_length() {
	assert!(Alias::new(MAINNET, "valid-alias_42@x.y").is_ok());
	assert!(matches!(Alias::new(MAINNET, "abc"), Err(AddressError::InvalidAliasLength(_))));
	assert!(matches!(
		Alias::new(MAINNET, &"a".repeat(31)),
		Err(AddressError::InvalidAliasLength(_))
	));
	assert!(matches!(Alias::new(MAINNET, "UPPER"), Err(AddressError::InvalidAliasCharset(_))));
	assert!(matches!(Alias::new(MAINNET, "with space"), Err(AddressError::InvalidAliasCharset(_))));
}

#[test]
fn alias_display() {
	let alias = Alias::new(MAINNET, "merry").expect("valid alias");
	assert_eq!(alias.to_string(), "alias:W:merry");
}
