use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Keep Last.fm listening charts in your markdown up to date.",
	long_about = "lastmark renders your Last.fm listening history into marked regions of a \
	              markdown document, such as a GitHub profile README.\n\nRegions are delimited \
	              by comments like `<!--START_LASTFM_TRACKS-->` and \
	              `<!--END_LASTFM_TRACKS-->`. Everything outside the regions is left \
	              untouched.\n\nQuick start:\n  lastmark init    Create a lastmark.toml \
	              file\n  lastmark check   Validate every region marker\n  lastmark update  \
	              Fetch listening data and rewrite the regions"
)]
pub struct LastmarkCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Markdown document to process, relative to the project root. Overrides
	/// `readme` in lastmark.toml.
	#[arg(long, short, global = true)]
	pub readme: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `lastmark.toml` in the project root.
	///
	/// If a settings file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// List every region found in the document.
	///
	/// Prints each region with its line number and effective configuration.
	/// No listening data is fetched.
	List,
	/// Validate every region marker and its inline configuration.
	///
	/// Exits with a non-zero status code when a marker is unpaired or a
	/// configuration is malformed. No listening data is fetched, which makes
	/// this suitable for CI pipelines.
	Check,
	/// Fetch listening data and rewrite every region.
	///
	/// The document is written once, and only when its content changed. Use
	/// `--dry-run` to preview the result without writing.
	Update {
		/// Last.fm user whose listening history is rendered. Overrides `user`
		/// in lastmark.toml.
		#[arg(long, short, env = "LASTFM_USER")]
		user: Option<String>,

		/// Last.fm API key.
		#[arg(long, env = "LASTFM_API_KEY", hide_env_values = true)]
		api_key: Option<String>,

		/// Locale used to group play counts, e.g. `en-US` or `de-DE`.
		#[arg(long)]
		locale: Option<String>,

		/// Pattern for the registration date, e.g. `dd.MM.yyyy`.
		#[arg(long)]
		date_format: Option<String>,

		/// Do not render the logo and title above each region.
		#[arg(long, default_value_t = false)]
		no_title: bool,

		/// Preview changes without writing the document.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Show a line diff of the changes. Most useful with `--dry-run`.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}
