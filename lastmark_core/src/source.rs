use async_trait::async_trait;
use serde::Deserialize;
use serde::Deserializer;

use crate::ArtistLink;
use crate::FetchKind;
use crate::LastmarkError;
use crate::LastmarkResult;
use crate::Listening;
use crate::RecentTrack;
use crate::RegionConfig;
use crate::TopAlbum;
use crate::TopArtist;
use crate::TopTrack;
use crate::UserInfo;

/// Default endpoint of the Last.fm web service.
pub const LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Supplies the records a region is rendered from.
#[async_trait]
pub trait ListeningSource: Send + Sync {
	/// Fetch the records of `kind` for `user`, honoring the row cap and period
	/// in `config` where they apply.
	async fn fetch(
		&self,
		kind: FetchKind,
		user: &str,
		config: &RegionConfig,
	) -> LastmarkResult<Listening>;
}

/// [`ListeningSource`] backed by the Last.fm web service.
#[derive(Clone)]
pub struct LastFmClient {
	client: reqwest::Client,
	api_key: String,
	base_url: String,
}

impl std::fmt::Debug for LastFmClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LastFmClient")
			.field("base_url", &self.base_url)
			.finish_non_exhaustive()
	}
}

impl LastFmClient {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self::with_base_url(api_key, LASTFM_API_URL)
	}

	/// Point the client at another endpoint, e.g. a local mock server.
	pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
		Self {
			client: reqwest::Client::new(),
			api_key: api_key.into(),
			base_url: base_url.to_string(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	async fn call(&self, method: &str, params: &[(&str, String)]) -> LastmarkResult<String> {
		tracing::debug!("calling {method}");

		let response = self
			.client
			.get(&self.base_url)
			.query(&[
				("method", method),
				("api_key", self.api_key.as_str()),
				("format", "json"),
			])
			.query(params)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		// Last.fm reports most failures as `{"error": n, "message": "..."}`,
		// sometimes with a 200 status.
		if let Ok(failure) = serde_json::from_str::<ApiFailure>(&body) {
			return Err(LastmarkError::DataSource(format!(
				"{method} failed with error {}: {}",
				failure.error, failure.message
			)));
		}

		if !status.is_success() {
			return Err(LastmarkError::DataSource(format!(
				"{method} failed with status {status}"
			)));
		}

		Ok(body)
	}
}

#[async_trait]
impl ListeningSource for LastFmClient {
	async fn fetch(
		&self,
		kind: FetchKind,
		user: &str,
		config: &RegionConfig,
	) -> LastmarkResult<Listening> {
		let limit = config.rows.to_string();
		let period = config.period.as_str().to_string();
		let user = user.to_string();

		match kind {
			FetchKind::RecentTracks => {
				let params = [
					("user", user),
					("limit", limit),
					("extended", "1".to_string()),
				];
				let body = self.call("user.getrecenttracks", &params).await?;
				parse_recent_tracks(&body)
			}
			FetchKind::TopTracks => {
				let params = [("user", user), ("limit", limit), ("period", period)];
				let body = self.call("user.gettoptracks", &params).await?;
				parse_top_tracks(&body)
			}
			FetchKind::TopArtists => {
				let params = [("user", user), ("limit", limit), ("period", period)];
				let body = self.call("user.gettopartists", &params).await?;
				parse_top_artists(&body)
			}
			FetchKind::TopAlbums => {
				let params = [("user", user), ("limit", limit), ("period", period)];
				let body = self.call("user.gettopalbums", &params).await?;
				parse_top_albums(&body)
			}
			FetchKind::UserInfo => {
				let body = self.call("user.getinfo", &[("user", user)]).await?;
				parse_user_info(&body)
			}
		}
	}
}

/// Parse a `user.getrecenttracks` response. The track currently playing has
/// no `date` and keeps `played_at` empty.
pub fn parse_recent_tracks(body: &str) -> LastmarkResult<Listening> {
	let response: RecentTracksResponse = parse_body("user.getrecenttracks", body)?;
	let tracks = response
		.recenttracks
		.track
		.into_vec()
		.into_iter()
		.map(|track| {
			RecentTrack {
				name: track.name,
				url: track.url,
				artist: track.artist.name.or(track.artist.text).unwrap_or_default(),
				played_at: track.date.map(|date| date.uts),
			}
		})
		.collect();

	Ok(Listening::Recent(tracks))
}

/// Parse a `user.gettoptracks` response.
pub fn parse_top_tracks(body: &str) -> LastmarkResult<Listening> {
	let response: TopTracksResponse = parse_body("user.gettoptracks", body)?;
	let tracks = response
		.toptracks
		.track
		.into_vec()
		.into_iter()
		.map(|track| {
			TopTrack {
				name: track.name,
				url: track.url,
				playcount: track.playcount,
				artist: track.artist.into(),
			}
		})
		.collect();

	Ok(Listening::Tracks(tracks))
}

/// Parse a `user.gettopartists` response.
pub fn parse_top_artists(body: &str) -> LastmarkResult<Listening> {
	let response: TopArtistsResponse = parse_body("user.gettopartists", body)?;
	let artists = response
		.topartists
		.artist
		.into_vec()
		.into_iter()
		.map(|artist| {
			TopArtist {
				name: artist.name,
				url: artist.url,
				playcount: artist.playcount,
			}
		})
		.collect();

	Ok(Listening::Artists(artists))
}

/// Parse a `user.gettopalbums` response.
pub fn parse_top_albums(body: &str) -> LastmarkResult<Listening> {
	let response: TopAlbumsResponse = parse_body("user.gettopalbums", body)?;
	let albums = response
		.topalbums
		.album
		.into_vec()
		.into_iter()
		.map(|album| {
			TopAlbum {
				name: album.name,
				url: album.url,
				playcount: album.playcount,
				artist: album.artist.into(),
			}
		})
		.collect();

	Ok(Listening::Albums(albums))
}

/// Parse a `user.getinfo` response.
pub fn parse_user_info(body: &str) -> LastmarkResult<Listening> {
	let response: UserInfoResponse = parse_body("user.getinfo", body)?;
	let user = response.user;

	Ok(Listening::UserInfo(Some(UserInfo {
		registered: user.registered.unixtime,
		playcount: user.playcount,
		artist_count: user.artist_count,
		album_count: user.album_count,
		track_count: user.track_count,
	})))
}

fn parse_body<'de, T: Deserialize<'de>>(method: &str, body: &'de str) -> LastmarkResult<T> {
	serde_json::from_str(body).map_err(|e| {
		LastmarkError::DataSource(format!("unexpected {method} response: {e}"))
	})
}

#[derive(Deserialize)]
struct ApiFailure {
	error: i64,
	#[serde(default)]
	message: String,
}

/// Single results are sometimes returned as a bare object instead of a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
	Many(Vec<T>),
	One(T),
}

impl<T> Default for OneOrMany<T> {
	fn default() -> Self {
		Self::Many(vec![])
	}
}

impl<T> OneOrMany<T> {
	fn into_vec(self) -> Vec<T> {
		match self {
			Self::Many(items) => items,
			Self::One(item) => vec![item],
		}
	}
}

#[derive(Deserialize)]
struct RecentTracksResponse {
	recenttracks: RecentTracksPage,
}

#[derive(Deserialize)]
struct RecentTracksPage {
	#[serde(default)]
	track: OneOrMany<WireRecentTrack>,
}

#[derive(Deserialize)]
struct WireRecentTrack {
	name: String,
	url: String,
	artist: WireRecentArtist,
	date: Option<WireDate>,
}

/// `extended=1` returns `name`, plain responses only `#text`.
#[derive(Deserialize)]
struct WireRecentArtist {
	name: Option<String>,
	#[serde(rename = "#text")]
	text: Option<String>,
}

#[derive(Deserialize)]
struct WireDate {
	#[serde(deserialize_with = "number_from_any")]
	uts: i64,
}

#[derive(Deserialize)]
struct TopTracksResponse {
	toptracks: TopTracksPage,
}

#[derive(Deserialize)]
struct TopTracksPage {
	#[serde(default)]
	track: OneOrMany<WireRankedWithArtist>,
}

#[derive(Deserialize)]
struct TopAlbumsResponse {
	topalbums: TopAlbumsPage,
}

#[derive(Deserialize)]
struct TopAlbumsPage {
	#[serde(default)]
	album: OneOrMany<WireRankedWithArtist>,
}

#[derive(Deserialize)]
struct WireRankedWithArtist {
	name: String,
	url: String,
	#[serde(deserialize_with = "number_from_any")]
	playcount: u64,
	artist: WireArtist,
}

#[derive(Deserialize)]
struct TopArtistsResponse {
	topartists: TopArtistsPage,
}

#[derive(Deserialize)]
struct TopArtistsPage {
	#[serde(default)]
	artist: OneOrMany<WireRankedArtist>,
}

#[derive(Deserialize)]
struct WireRankedArtist {
	name: String,
	url: String,
	#[serde(deserialize_with = "number_from_any")]
	playcount: u64,
}

#[derive(Deserialize)]
struct WireArtist {
	name: String,
	#[serde(default)]
	url: String,
}

impl From<WireArtist> for ArtistLink {
	fn from(artist: WireArtist) -> Self {
		Self {
			name: artist.name,
			url: artist.url,
		}
	}
}

#[derive(Deserialize)]
struct UserInfoResponse {
	user: WireUser,
}

#[derive(Deserialize)]
struct WireUser {
	registered: WireRegistered,
	#[serde(deserialize_with = "number_from_any")]
	playcount: u64,
	#[serde(deserialize_with = "number_from_any")]
	artist_count: u64,
	#[serde(deserialize_with = "number_from_any")]
	album_count: u64,
	#[serde(deserialize_with = "number_from_any")]
	track_count: u64,
}

#[derive(Deserialize)]
struct WireRegistered {
	#[serde(deserialize_with = "number_from_any")]
	unixtime: i64,
}

/// Last.fm encodes most numbers as strings.
fn number_from_any<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: std::str::FromStr + TryFrom<u64> + TryFrom<i64>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Unsigned(u64),
		Signed(i64),
		Text(String),
	}

	let invalid = || serde::de::Error::custom("number out of range");
	match Raw::deserialize(deserializer)? {
		Raw::Unsigned(value) => <T as TryFrom<u64>>::try_from(value).map_err(|_| invalid()),
		Raw::Signed(value) => <T as TryFrom<i64>>::try_from(value).map_err(|_| invalid()),
		Raw::Text(text) => {
			text.trim()
				.parse()
				.map_err(|_| serde::de::Error::custom(format!("`{text}` is not a number")))
		}
	}
}
