use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum LastmarkError {
	#[error(transparent)]
	#[diagnostic(code(lastmark::io_error))]
	Io(#[from] std::io::Error),

	#[error("malformed configuration in `{marker}`: {reason}")]
	#[diagnostic(
		code(lastmark::malformed_configuration),
		help(
			"the configuration must be a single-line JSON object, e.g. \
			 `<!--START_LASTFM_TRACKS:{{\"rows\": 5, \"period\": \"1month\"}}-->`"
		)
	)]
	MalformedConfiguration { marker: String, reason: String },

	#[error("end tag found without a corresponding start tag: `{0}`")]
	#[diagnostic(
		code(lastmark::end_without_start),
		help("add the matching `<!--START_...-->` line above this end tag or remove it")
	)]
	EndWithoutStart(String),

	#[error("start tag found without a corresponding end tag: `{}`", .0.join("`, `"))]
	#[diagnostic(
		code(lastmark::start_without_end),
		help("add the matching `<!--END_...-->` line below each unclosed start tag")
	)]
	StartWithoutEnd(Vec<String>),

	#[error("failed to fetch listening data: {0}")]
	#[diagnostic(code(lastmark::data_source))]
	DataSource(String),

	#[error("document store failure: {0}")]
	#[diagnostic(code(lastmark::store))]
	Store(String),

	#[error("document `{0}` changed since it was read")]
	#[diagnostic(
		code(lastmark::store_conflict),
		help("another writer updated the document; run `lastmark update` again")
	)]
	StoreConflict(String),

	#[error("failed to parse settings file: {0}")]
	#[diagnostic(
		code(lastmark::config_parse),
		help("check that lastmark.toml is valid TOML with `user`, `readme`, `locale`, `date_format` and `show_title` keys")
	)]
	ConfigParse(String),

	#[error("invalid settings: {0}")]
	#[diagnostic(code(lastmark::invalid_settings))]
	InvalidSettings(String),

	#[error("invalid date pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(lastmark::invalid_date_pattern),
		help("supported tokens: yyyy, yy, MMMM, MMM, MM, M, dd, d, HH, H, mm, ss and 'quoted text'")
	)]
	InvalidDatePattern { pattern: String, reason: String },
}

impl From<reqwest::Error> for LastmarkError {
	fn from(error: reqwest::Error) -> Self {
		Self::DataSource(error.to_string())
	}
}

pub type LastmarkResult<T> = Result<T, LastmarkError>;
pub type AnyEmptyResult = Result<(), Box<dyn std::error::Error>>;
