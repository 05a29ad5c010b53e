//! Case-object constructors.
//!
//! A user-style call whose name matches no declared function resolves
//! against this table and builds a case object with the canonical field
//! names. The field order here is the order the objects render in logs.

pub fn constructor_fields(name: &str) -> Option<&'static [&'static str]> {
	Some(match name {
		"Address" => &["bytes"],
		"Alias" => &["alias"],
		"AttachedPayment" => &["assetId", "amount"],
		"ScriptTransfer" => &["recipient", "amount", "asset"],
		"IntegerEntry" | "BooleanEntry" | "StringEntry" | "BinaryEntry" | "DataEntry" =>
			&["key", "value"],
		"DeleteEntry" => &["key"],
		"Issue" => &["name", "description", "quantity", "decimals", "isReissuable", "nonce"],
		"Reissue" => &["assetId", "quantity", "isReissuable"],
		"Burn" => &["assetId", "quantity"],
		"SponsorFee" => &["assetId", "minSponsoredAssetFee"],
		"Lease" => &["recipient", "amount", "nonce"],
		"LeaseCancel" => &["leaseId"],
		"Invoke" => &["dApp", "function", "arguments", "payments"],
		_ => return None,
	})
}
