mod composite;
mod fee;
mod invoke;
mod settings;
mod sponsorship;

use crate::{
	testing::InMemoryBlockchain,
	transaction::{InvokeScriptTransaction, Payment, TransferTransaction},
};
use ed25519_dalek::{Signer, SigningKey};
use waves_lang::{CallableFunction, DAppScript, Expr, NativeFunction, StdLibVersion, Value};
use waves_primitives::{Address, AddressOrAlias, Asset, ByteStr, PublicKey};

pub const MAINNET: u8 = b'W';

/// A keypair-backed test account: addresses derive from the real public key
/// and proofs verify against transaction ids.
pub struct TestAccount {
	key: SigningKey,
}

impl TestAccount {
	pub fn new(seed: u8) -> TestAccount {
		TestAccount { key: SigningKey::from_bytes(&[seed; 32]) }
	}

	pub fn public_key(&self) -> PublicKey {
		PublicKey(self.key.verifying_key().to_bytes())
	}

	pub fn address(&self) -> Address {
		self.public_key().address(MAINNET)
	}

	pub fn sign(&self, id: &ByteStr) -> Vec<ByteStr> {
		vec![ByteStr::from(self.key.sign(id.as_bytes()).to_bytes())]
	}
}

pub fn tx_id(seed: u8) -> ByteStr {
	ByteStr::from([seed; 32])
}

pub fn blockchain() -> InMemoryBlockchain {
	InMemoryBlockchain::new(MAINNET, 1000)
}

pub fn transfer_tx(
	sender: &TestAccount,
	recipient: Address,
	amount: i64,
	fee: i64,
) -> TransferTransaction {
	let id = tx_id(0xaa);
	TransferTransaction {
		id: id.clone(),
		sender: sender.public_key(),
		recipient: AddressOrAlias::Address(recipient),
		asset: Asset::Waves,
		amount,
		fee,
		fee_asset: Asset::Waves,
		attachment: ByteStr::empty(),
		timestamp: 1_600_000_000_000,
		proofs: sender.sign(&id),
	}
}

pub fn invoke_tx(
	sender: &TestAccount,
	dapp: Address,
	function: &str,
	args: Vec<Value>,
	fee: i64,
	id: ByteStr,
) -> InvokeScriptTransaction {
	InvokeScriptTransaction {
		id: id.clone(),
		sender: sender.public_key(),
		dapp: AddressOrAlias::Address(dapp),
		function: function.to_owned(),
		args,
		payments: Vec::new(),
		fee,
		fee_asset: Asset::Waves,
		timestamp: 1_600_000_000_000,
		proofs: sender.sign(&id),
	}
}

pub fn with_payments(
	mut tx: InvokeScriptTransaction,
	payments: Vec<Payment>,
) -> InvokeScriptTransaction {
	tx.payments = payments;
	tx
}

/// A single-callable dApp returning whatever the body evaluates to.
pub fn dapp_with_callable(name: &str, arg_names: Vec<String>, body: Expr) -> DAppScript {
	DAppScript {
		stdlib_version: StdLibVersion::V5,
		declarations: Vec::new(),
		callables: vec![CallableFunction { name: name.to_owned(), arg_names, body }],
		verifier: None,
		allow_reentrancy: false,
	}
}

/// Build a script-level list literal: a `cons` chain ending in `nil`.
pub fn list_of(items: Vec<Expr>) -> Expr {
	items.into_iter().rev().fold(Expr::reference("nil"), |tail, head| {
		Expr::native(NativeFunction::CreateList.id(), vec![head, tail])
	})
}
