use crate::{
	blockchain::Blockchain,
	composite::CompositeBlockchain,
	data_entry::{DataEntry, DataValue},
	diff::{Diff, Portfolio, Sponsorship},
	tests::{blockchain, TestAccount, MAINNET},
};
use std::collections::BTreeMap;
use waves_primitives::{Alias, Asset, ByteStr};

#[test]
fn balances_overlay_additively() {
	let account = TestAccount::new(1);
	let base = blockchain().with_balance(account.address(), Asset::Waves, 100);
	let view = CompositeBlockchain::new(
		&base,
		Diff::from_portfolio(account.address(), Portfolio::waves(-30)),
	);
	assert_eq!(view.balance(&account.address(), &Asset::Waves), 70);

	// Reads not covered by the overlay fall through.
	let other = TestAccount::new(2);
	assert_eq!(view.balance(&other.address(), &Asset::Waves), 0);
}

#[test]
fn alias_overlay_wins() {
	let account = TestAccount::new(1);
	let other = TestAccount::new(2);
	let alias = Alias::new(MAINNET, "merry").unwrap();
	let base = blockchain().with_alias(alias.clone(), account.address());
	let overlay = Diff {
		aliases: BTreeMap::from([(alias.clone(), other.address())]),
		..Default::default()
	};
	let view = CompositeBlockchain::new(&base, overlay);
	assert_eq!(view.resolve_alias(&alias), Some(other.address()));
}

#[test]
fn deleted_data_entry_reads_as_absent() {
	let account = TestAccount::new(1);
	let base = blockchain();
	let overlay = Diff {
		account_data: BTreeMap::from([(
			account.address(),
			BTreeMap::from([
				("kept".to_owned(), DataEntry::new("kept", DataValue::Int(1))),
				("gone".to_owned(), DataEntry::new("gone", DataValue::Empty)),
			]),
		)]),
		..Default::default()
	};
	let view = CompositeBlockchain::new(&base, overlay);
	assert_eq!(
		view.account_data(&account.address(), "kept"),
		Some(DataEntry::new("kept", DataValue::Int(1)))
	);
	assert_eq!(view.account_data(&account.address(), "gone"), None);
}

#[test]
fn script_removal_overrides_the_snapshot() {
	let account = TestAccount::new(1);
	let base = blockchain().with_account_script(
		account.public_key(),
		waves_lang::ExpressionScript {
			stdlib_version: waves_lang::StdLibVersion::V5,
			expr: waves_lang::Expr::True,
		},
	);
	assert!(base.account_script(&account.address()).is_some());

	let overlay =
		Diff { scripts: BTreeMap::from([(account.address(), None)]), ..Default::default() };
	let view = CompositeBlockchain::new(&base, overlay);
	assert!(view.account_script(&account.address()).is_none());
}

#[test]
fn sponsorship_overlay_shows_in_asset_description() {
	let issuer = TestAccount::new(1);
	let asset_id = ByteStr::from([5u8; 32]);
	let base = blockchain().with_asset(
		asset_id.clone(),
		crate::blockchain::AssetDescription {
			origin_tx: asset_id.clone(),
			issuer: issuer.public_key(),
			name: "token".to_owned(),
			description: String::new(),
			decimals: 2,
			reissuable: true,
			total_volume: 1000,
			last_updated_height: 1,
			script: None,
			sponsorship_rate: 0,
			nft: false,
		},
	);
	let overlay = Diff {
		sponsorship: BTreeMap::from([(asset_id.clone(), Sponsorship::Value(40))]),
		..Default::default()
	};
	let view = CompositeBlockchain::new(&base, overlay);
	assert_eq!(view.asset_description(&asset_id).unwrap().sponsorship_rate, 40);
}
