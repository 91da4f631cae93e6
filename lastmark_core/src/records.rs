use serde::Deserialize;
use serde::Serialize;

use crate::Family;

/// An artist reference with a link to its Last.fm page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistLink {
	pub name: String,
	pub url: String,
}

/// A recently played track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentTrack {
	pub name: String,
	pub url: String,
	/// Artist name. Recent plays are rendered without an artist link.
	pub artist: String,
	/// Unix seconds of the scrobble. `None` while the track is still playing.
	pub played_at: Option<i64>,
}

/// A ranked track with its play count for the requested period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrack {
	pub name: String,
	pub url: String,
	pub playcount: u64,
	pub artist: ArtistLink,
}

/// A ranked artist with its play count for the requested period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtist {
	pub name: String,
	pub url: String,
	pub playcount: u64,
}

/// A ranked album with its play count for the requested period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAlbum {
	pub name: String,
	pub url: String,
	pub playcount: u64,
	pub artist: ArtistLink,
}

/// Account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
	/// Unix seconds of the registration.
	pub registered: i64,
	pub playcount: u64,
	pub artist_count: u64,
	pub album_count: u64,
	pub track_count: u64,
}

/// Records returned by a [`ListeningSource`](crate::ListeningSource), one
/// variant per family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Listening {
	Recent(Vec<RecentTrack>),
	Tracks(Vec<TopTrack>),
	Artists(Vec<TopArtist>),
	Albums(Vec<TopAlbum>),
	UserInfo(Option<UserInfo>),
}

impl Listening {
	/// The family these records are rendered for.
	pub fn family(&self) -> Family {
		match self {
			Self::Recent(_) => Family::Recent,
			Self::Tracks(_) => Family::Tracks,
			Self::Artists(_) => Family::Artists,
			Self::Albums(_) => Family::Albums,
			Self::UserInfo(_) => Family::UserInfo,
		}
	}

	/// Number of records before any row cap is applied.
	pub fn len(&self) -> usize {
		match self {
			Self::Recent(tracks) => tracks.len(),
			Self::Tracks(tracks) => tracks.len(),
			Self::Artists(artists) => artists.len(),
			Self::Albums(albums) => albums.len(),
			Self::UserInfo(info) => usize::from(info.is_some()),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
