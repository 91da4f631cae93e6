use serde::Deserialize;
use serde::Serialize;

use crate::LastmarkError;
use crate::LastmarkResult;

/// Row cap used when a region does not set `rows`.
pub const DEFAULT_ROWS: usize = 8;
/// Smallest accepted `rows` value.
pub const MIN_ROWS: i64 = 1;
/// Largest accepted `rows` value.
pub const MAX_ROWS: i64 = 50;

/// Aggregation window for the ranked families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
	#[default]
	#[serde(rename = "7day")]
	Week,
	#[serde(rename = "1month")]
	Month,
	#[serde(rename = "3month")]
	Quarter,
	#[serde(rename = "6month")]
	HalfYear,
	#[serde(rename = "12month")]
	Year,
	#[serde(rename = "overall")]
	Overall,
}

impl Period {
	/// The value sent to the Last.fm API and accepted in region configuration.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Week => "7day",
			Self::Month => "1month",
			Self::Quarter => "3month",
			Self::HalfYear => "6month",
			Self::Year => "12month",
			Self::Overall => "overall",
		}
	}

	/// Human readable label used in section titles.
	pub fn readable(self) -> &'static str {
		match self {
			Self::Week => "Past Week",
			Self::Month => "Past Month",
			Self::Quarter => "Past 3 Months",
			Self::HalfYear => "Past 6 Months",
			Self::Year => "Past Year",
			Self::Overall => "All Time",
		}
	}
}

impl std::fmt::Display for Period {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A field of the user info summary that can be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayField {
	Registered,
	Playcount,
	ArtistCount,
	AlbumCount,
	TrackCount,
}

impl DisplayField {
	/// Canonical field order, also the default selection.
	pub const ALL: [DisplayField; 5] = [
		DisplayField::Registered,
		DisplayField::Playcount,
		DisplayField::ArtistCount,
		DisplayField::AlbumCount,
		DisplayField::TrackCount,
	];

	/// Label rendered in front of the value.
	pub fn label(self) -> &'static str {
		match self {
			Self::Registered => "Registered",
			Self::Playcount => "Playcount",
			Self::ArtistCount => "Artists",
			Self::AlbumCount => "Albums",
			Self::TrackCount => "Tracks",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Registered => "registered",
			Self::Playcount => "playcount",
			Self::ArtistCount => "artistCount",
			Self::AlbumCount => "albumCount",
			Self::TrackCount => "trackCount",
		}
	}
}

impl std::fmt::Display for DisplayField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Configuration as written inside a start marker, before defaults apply.
///
/// ```md
/// <!--START_LASTFM_ARTISTS:{"rows": 5, "period": "1month"}-->
/// ```
///
/// Unknown keys are ignored. A key that is present must hold a value of the
/// right type, `null` included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRegionConfig {
	#[serde(default, deserialize_with = "present")]
	pub rows: Option<i64>,
	#[serde(default, deserialize_with = "present")]
	pub period: Option<Period>,
	#[serde(default, deserialize_with = "present")]
	pub display: Option<Vec<DisplayField>>,
}

/// Only called for keys that exist, so `None` always means the key was
/// missing.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: serde::Deserializer<'de>,
	T: Deserialize<'de>,
{
	T::deserialize(deserializer).map(Some)
}

impl RawRegionConfig {
	/// Check the schema constraints that serde cannot express.
	pub fn validate(&self) -> Result<(), String> {
		if let Some(rows) = self.rows {
			if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
				return Err(format!(
					"`rows` must be between {MIN_ROWS} and {MAX_ROWS}, got {rows}"
				));
			}
		}

		Ok(())
	}

	/// Apply defaults once, producing the configuration every later step
	/// reads from.
	pub fn normalize(self) -> RegionConfig {
		RegionConfig {
			rows: self
				.rows
				.and_then(|rows| usize::try_from(rows).ok())
				.unwrap_or(DEFAULT_ROWS),
			period: self.period.unwrap_or_default(),
			display: self.display.unwrap_or_else(|| DisplayField::ALL.to_vec()),
		}
	}
}

/// Validated region configuration with all defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionConfig {
	/// Effective row cap.
	pub rows: usize,
	/// Aggregation window for ranked families.
	pub period: Period,
	/// User info fields to render, in order.
	pub display: Vec<DisplayField>,
}

impl Default for RegionConfig {
	fn default() -> Self {
		RawRegionConfig::default().normalize()
	}
}

/// Parse, validate and normalize the configuration blob of a start marker.
///
/// `marker` is the full start marker line and is only used for error
/// reporting. A missing blob is equivalent to `{}`.
pub fn parse_region_config(marker: &str, blob: Option<&str>) -> LastmarkResult<RegionConfig> {
	let malformed = |reason: String| {
		LastmarkError::MalformedConfiguration {
			marker: marker.to_string(),
			reason,
		}
	};

	let raw: RawRegionConfig = match blob {
		Some(blob) => serde_json::from_str(blob).map_err(|e| malformed(e.to_string()))?,
		None => RawRegionConfig::default(),
	};
	raw.validate().map_err(malformed)?;

	Ok(raw.normalize())
}
