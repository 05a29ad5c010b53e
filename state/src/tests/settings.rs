use crate::settings::FunctionalitySettings;
use anyhow::Result;
use std::io::Write;

#[test]
fn defaults_activate_everything_from_genesis() {
	let settings = FunctionalitySettings::default();
	assert!(settings.transfers_check_active(0));
	assert!(settings.data_entries_bytes_check_active(0));
	assert!(settings.ride4dapps_active(0));
	assert!(settings.fix_unicode_functions);
	assert!(settings.use_new_pow_precision);
	assert!(settings.disallow_self_payment);
}

#[test]
fn load_from_toml_overrides_selected_fields() -> Result<()> {
	let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
	writeln!(
		file,
		"transfers_check_height = 500000\nfix_unicode_functions = false\nmax_sync_dapp_calls = 5"
	)?;

	let settings = FunctionalitySettings::from_file(file.path())?;
	assert_eq!(settings.transfers_check_height, 500_000);
	assert!(!settings.fix_unicode_functions);
	assert_eq!(settings.max_sync_dapp_calls, 5);
	// Untouched fields keep their defaults.
	assert_eq!(settings.data_entries_bytes_check_height, 0);
	assert!(settings.use_new_pow_precision);

	assert!(!settings.transfers_check_active(499_999));
	assert!(settings.transfers_check_active(500_000));
	Ok(())
}

#[test]
fn unknown_fields_are_rejected() -> Result<()> {
	let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
	writeln!(file, "no_such_setting = true")?;
	assert!(FunctionalitySettings::from_file(file.path()).is_err());
	Ok(())
}
