use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::DEFAULT_DATE_FORMAT;
use crate::DEFAULT_LOCALE;
use crate::Formats;
use crate::LastmarkError;
use crate::LastmarkResult;

/// Supported settings file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"lastmark.toml",
	".lastmark.toml",
	".config/lastmark.toml",
];

/// Document updated when no `readme` is configured.
pub const DEFAULT_README: &str = "README.md";

/// Settings file written by `lastmark init`.
pub const SAMPLE_SETTINGS: &str = r#"# Last.fm account whose listening history is rendered.
# user = "your-lastfm-username"

# Markdown document containing the LASTFM regions, relative to the project root.
readme = "README.md"

# Locale used to group play counts, e.g. "en-US" renders 1,234.
locale = "en-US"

# Pattern used for the registration date of the user info region.
date_format = "MM/dd/yyyy"

# Render the Last.fm logo and a title above every region.
show_title = true
"#;

/// Settings loaded from a `lastmark.toml` file.
///
/// ```toml
/// user = "rj"
/// readme = "docs/README.md"
/// locale = "de-DE"
/// date_format = "dd.MM.yyyy"
/// show_title = false
/// ```
///
/// The Last.fm API key is never read from this file. It is only accepted from
/// the command line or the `LASTFM_API_KEY` environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Last.fm user name.
	pub user: Option<String>,
	/// Path of the document to update, relative to the project root.
	pub readme: PathBuf,
	/// BCP 47 locale tag for number grouping.
	pub locale: String,
	/// Unicode style date pattern.
	pub date_format: String,
	/// Whether regions get a logo and title banner.
	pub show_title: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			user: None,
			readme: PathBuf::from(DEFAULT_README),
			locale: DEFAULT_LOCALE.to_string(),
			date_format: DEFAULT_DATE_FORMAT.to_string(),
			show_title: true,
		}
	}
}

impl Settings {
	/// Resolve the first existing settings file in `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the settings from the first discovered file in `root`.
	/// Returns `None` if there is no settings file.
	pub fn load(root: &Path) -> LastmarkResult<Option<Settings>> {
		let Some(settings_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!("loading settings from {}", settings_path.display());
		let content = std::fs::read_to_string(&settings_path)?;
		let settings = Self::parse(&content)?;

		Ok(Some(settings))
	}

	/// Like [`Settings::load`] but falls back to the defaults.
	pub fn load_or_default(root: &Path) -> LastmarkResult<Settings> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn parse(content: &str) -> LastmarkResult<Settings> {
		let settings: Settings =
			toml::from_str(content).map_err(|e| LastmarkError::ConfigParse(e.to_string()))?;
		settings.validate()?;

		Ok(settings)
	}

	pub fn validate(&self) -> LastmarkResult<()> {
		if self.readme.as_os_str().is_empty() {
			return Err(LastmarkError::InvalidSettings(
				"`readme` must not be empty".to_string(),
			));
		}

		if self.user.as_deref().is_some_and(|user| user.trim().is_empty()) {
			return Err(LastmarkError::InvalidSettings(
				"`user` must not be empty".to_string(),
			));
		}

		if self.locale.trim().is_empty() {
			return Err(LastmarkError::InvalidSettings(
				"`locale` must not be empty".to_string(),
			));
		}

		Ok(())
	}

	/// Build the number and date formats described by these settings.
	pub fn formats(&self) -> LastmarkResult<Formats> {
		Formats::new(&self.locale, &self.date_format)
	}
}
