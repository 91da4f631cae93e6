use assert_cmd::Command;

#[allow(dead_code)]
pub const PROFILE: &str = r#"# Hi there

<!--START_LASTFM_TRACKS:{"rows": 5, "period": "1month"}-->
<!--END_LASTFM_TRACKS-->

<!--START_LASTFM_USER_INFO:{"display": ["playcount", "registered"]}-->
<!--END_LASTFM_USER_INFO-->
"#;

pub fn lastmark_cmd() -> Command {
	let mut cmd = Command::cargo_bin("lastmark").unwrap_or_else(|e| panic!("{e}"));
	cmd.env("NO_COLOR", "1")
		.env_remove("LASTFM_API_KEY")
		.env_remove("LASTFM_USER")
		.env_remove("RUST_LOG");
	cmd
}
