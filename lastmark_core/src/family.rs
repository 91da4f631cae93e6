use serde::Deserialize;
use serde::Serialize;

use crate::Period;

/// The kind of content occupying a marked region.
///
/// Every family owns its own pair of marker comments. The marker name is the
/// part after `START_` / `END_`, e.g. `LASTFM_TRACKS` for
/// `<!--START_LASTFM_TRACKS-->`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Family {
	/// Recently played tracks.
	Recent,
	/// Most played tracks for a period.
	Tracks,
	/// Most played artists for a period.
	Artists,
	/// Most played albums for a period.
	Albums,
	/// A summary of the account.
	UserInfo,
}

impl Family {
	/// Families in the order a document is processed.
	pub const ALL: [Family; 5] = [
		Family::Tracks,
		Family::Artists,
		Family::Albums,
		Family::Recent,
		Family::UserInfo,
	];

	/// The marker name used inside the start and end comments.
	pub fn marker_name(self) -> &'static str {
		match self {
			Self::Recent => "LASTFM_RECENT",
			Self::Tracks => "LASTFM_TRACKS",
			Self::Artists => "LASTFM_ARTISTS",
			Self::Albums => "LASTFM_ALBUMS",
			Self::UserInfo => "LASTFM_USER_INFO",
		}
	}

	/// Look up a family from its marker name.
	pub fn from_marker_name(name: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|family| family.marker_name() == name)
	}

	/// The literal prefix of a start marker line for this family.
	pub fn start_prefix(self) -> String {
		format!("<!--START_{}", self.marker_name())
	}

	/// The literal prefix of an end marker line for this family.
	pub fn end_prefix(self) -> String {
		format!("<!--END_{}", self.marker_name())
	}

	/// The data source request that feeds this family.
	pub fn fetch_kind(self) -> FetchKind {
		match self {
			Self::Recent => FetchKind::RecentTracks,
			Self::Tracks => FetchKind::TopTracks,
			Self::Artists => FetchKind::TopArtists,
			Self::Albums => FetchKind::TopAlbums,
			Self::UserInfo => FetchKind::UserInfo,
		}
	}

	/// The title shown in the banner above a rendered region.
	pub fn title(self, period: Period, user: &str) -> String {
		match self {
			Self::Recent => "Recent Tracks".to_string(),
			Self::Tracks => format!("Top Tracks - {}", period.readable()),
			Self::Artists => format!("Top Artists - {}", period.readable()),
			Self::Albums => format!("Top Albums - {}", period.readable()),
			Self::UserInfo => {
				format!("[User Info - {user}](https://www.last.fm/user/{user})")
			}
		}
	}
}

impl std::fmt::Display for Family {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Recent => write!(f, "recent"),
			Self::Tracks => write!(f, "tracks"),
			Self::Artists => write!(f, "artists"),
			Self::Albums => write!(f, "albums"),
			Self::UserInfo => write!(f, "user info"),
		}
	}
}

/// A request kind understood by a [`ListeningSource`](crate::ListeningSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
	RecentTracks,
	TopArtists,
	TopTracks,
	TopAlbums,
	UserInfo,
}

impl std::fmt::Display for FetchKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::RecentTracks => write!(f, "RecentTracks"),
			Self::TopArtists => write!(f, "TopArtists"),
			Self::TopTracks => write!(f, "TopTracks"),
			Self::TopAlbums => write!(f, "TopAlbums"),
			Self::UserInfo => write!(f, "UserInfo"),
		}
	}
}
