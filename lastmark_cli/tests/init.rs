use lastmark_core::AnyEmptyResult;
use lastmark_core::Settings;

mod common;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::lastmark_cmd();
	let _ = cmd
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created lastmark.toml"))
		.stdout(predicates::str::contains("<!--START_LASTFM_TRACKS"));

	let settings_path = tmp.path().join("lastmark.toml");
	let content = std::fs::read_to_string(&settings_path)?;
	assert!(content.contains("readme = \"README.md\""));
	assert_eq!(Settings::load(tmp.path())?, Some(Settings::default()));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let settings_path = tmp.path().join(".lastmark.toml");
	std::fs::write(&settings_path, "user = \"rj\"\n")?;

	let mut cmd = common::lastmark_cmd();
	let _ = cmd
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Settings file already exists: .lastmark.toml",
		));

	assert_eq!(std::fs::read_to_string(&settings_path)?, "user = \"rj\"\n");
	assert!(!tmp.path().join("lastmark.toml").exists());

	Ok(())
}
