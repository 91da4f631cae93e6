use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::ArtistLink;
use crate::DocumentStore;
use crate::DocumentVersion;
use crate::FetchKind;
use crate::LastmarkError;
use crate::LastmarkResult;
use crate::Listening;
use crate::ListeningSource;
use crate::RecentTrack;
use crate::RegionConfig;
use crate::StoredDocument;
use crate::TopAlbum;
use crate::TopArtist;
use crate::TopTrack;
use crate::UserInfo;

pub const OK_COMPUTER_DOCUMENT: &str = "<!--START_LASTFM_ALBUMS-->\n<!--END_LASTFM_ALBUMS-->";

pub const OK_COMPUTER_EXPECTED: &str = "<!--START_LASTFM_ALBUMS-->
<a href=\"https://last.fm\" target=\"_blank\"><img src=\"https://user-images.githubusercontent.com/17434202/215290617-e793598d-d7c9-428f-9975-156db1ba89cc.svg\" alt=\"Last.fm Logo\" width=\"18\" height=\"13\"/></a> **Top Albums**

> `89 ▶️` ∙ **[OK Computer](https://x/a)** - [Radiohead](https://x/r)<br/>
<!--END_LASTFM_ALBUMS-->";

pub const PROFILE_DOCUMENT: &str = r#"# Hi there

## Listening

<!--START_LASTFM_TRACKS:{"rows": 2}-->
stale tracks
<!--END_LASTFM_TRACKS-->

Some text between the charts.

<!--START_LASTFM_RECENT:{"rows": 3}-->
<!--END_LASTFM_RECENT-->

<!--START_LASTFM_USER_INFO:{"display": ["playcount", "registered"]}-->
<!--END_LASTFM_USER_INFO-->

Footer.
"#;

pub fn radiohead() -> ArtistLink {
	ArtistLink {
		name: "Radiohead".to_string(),
		url: "https://x/r".to_string(),
	}
}

pub fn ok_computer() -> TopAlbum {
	TopAlbum {
		name: "OK Computer".to_string(),
		url: "https://x/a".to_string(),
		playcount: 89,
		artist: radiohead(),
	}
}

pub fn top_track(name: &str, playcount: u64) -> TopTrack {
	TopTrack {
		name: name.to_string(),
		url: format!("https://x/t/{name}"),
		playcount,
		artist: radiohead(),
	}
}

pub fn top_artist(name: &str, playcount: u64) -> TopArtist {
	TopArtist {
		name: name.to_string(),
		url: format!("https://x/{name}"),
		playcount,
	}
}

pub fn recent_tracks(count: usize) -> Vec<RecentTrack> {
	(1..=count)
		.map(|index| {
			RecentTrack {
				name: format!("Track {index}"),
				url: format!("https://x/recent/{index}"),
				artist: "Radiohead".to_string(),
				played_at: Some(1_700_000_000 - i64::try_from(index).unwrap_or_default() * 60),
			}
		})
		.collect()
}

pub fn user_info() -> UserInfo {
	UserInfo {
		registered: 1_037_793_040,
		playcount: 123_456,
		artist_count: 1_234,
		album_count: 567,
		track_count: 8_910,
	}
}

/// In-memory [`ListeningSource`] answering every kind with canned records.
#[derive(Default)]
pub struct FakeSource {
	responses: HashMap<FetchKind, Listening>,
	failing: Option<FetchKind>,
	pub calls: Mutex<Vec<(FetchKind, String, usize)>>,
}

impl FakeSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, kind: FetchKind, listening: Listening) -> Self {
		self.responses.insert(kind, listening);
		self
	}

	pub fn failing_on(mut self, kind: FetchKind) -> Self {
		self.failing = Some(kind);
		self
	}

	/// Source answering every family of [`PROFILE_DOCUMENT`].
	pub fn profile() -> Self {
		Self::new()
			.with(
				FetchKind::TopTracks,
				Listening::Tracks(vec![
					top_track("Airbag", 1_234),
					top_track("Lucky", 12),
					top_track("Karma Police", 3),
				]),
			)
			.with(FetchKind::RecentTracks, Listening::Recent(recent_tracks(4)))
			.with(FetchKind::UserInfo, Listening::UserInfo(Some(user_info())))
	}

	pub fn calls(&self) -> Vec<(FetchKind, String, usize)> {
		self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
	}
}

#[async_trait]
impl ListeningSource for FakeSource {
	async fn fetch(
		&self,
		kind: FetchKind,
		user: &str,
		config: &RegionConfig,
	) -> LastmarkResult<Listening> {
		if let Ok(mut calls) = self.calls.lock() {
			calls.push((kind, user.to_string(), config.rows));
		}

		if self.failing == Some(kind) {
			return Err(LastmarkError::DataSource(format!("{kind} unavailable")));
		}

		Ok(self.responses.get(&kind).cloned().unwrap_or_else(|| {
			match kind {
				FetchKind::RecentTracks => Listening::Recent(vec![]),
				FetchKind::TopTracks => Listening::Tracks(vec![]),
				FetchKind::TopArtists => Listening::Artists(vec![]),
				FetchKind::TopAlbums => Listening::Albums(vec![]),
				FetchKind::UserInfo => Listening::UserInfo(None),
			}
		}))
	}
}

/// Answer one HTTP request on a local port with `status` (e.g. `200 OK`) and a
/// JSON `body`. Returns the base url to connect to and a handle resolving to
/// the request line that was received.
pub async fn serve_once(
	status: &'static str,
	body: &'static str,
) -> LastmarkResult<(String, JoinHandle<String>)> {
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let base_url = format!("http://{}/", listener.local_addr()?);

	let handle = tokio::spawn(async move {
		let Ok((mut stream, _)) = listener.accept().await else {
			return String::new();
		};

		let mut request = Vec::new();
		let mut buffer = [0_u8; 1024];
		while !request.windows(4).any(|window| window == b"\r\n\r\n") {
			match stream.read(&mut buffer).await {
				Ok(0) | Err(_) => break,
				Ok(read) => request.extend_from_slice(&buffer[..read]),
			}
		}

		let response = format!(
			"HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: \
			 {}\r\nconnection: close\r\n\r\n{body}",
			body.len()
		);
		stream.write_all(response.as_bytes()).await.ok();
		stream.shutdown().await.ok();

		String::from_utf8_lossy(&request)
			.lines()
			.next()
			.unwrap_or_default()
			.to_string()
	});

	Ok((base_url, handle))
}

/// In-memory [`DocumentStore`] holding a single document.
pub struct MemoryStore {
	content: Mutex<String>,
	pub writes: Mutex<usize>,
}

impl MemoryStore {
	pub fn new(content: &str) -> Self {
		Self {
			content: Mutex::new(content.to_string()),
			writes: Mutex::new(0),
		}
	}

	pub fn content(&self) -> String {
		self.content.lock().map(|c| c.clone()).unwrap_or_default()
	}

	pub fn write_count(&self) -> usize {
		self.writes.lock().map(|w| *w).unwrap_or_default()
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	async fn read(&self, _locator: &str) -> LastmarkResult<StoredDocument> {
		let content = self.content();
		let version = DocumentVersion::of_content(&content);

		Ok(StoredDocument { content, version })
	}

	async fn write(
		&self,
		locator: &str,
		content: &str,
		version: &DocumentVersion,
	) -> LastmarkResult<()> {
		let mut current = self
			.content
			.lock()
			.map_err(|e| LastmarkError::Store(e.to_string()))?;
		if DocumentVersion::of_content(&current) != *version {
			return Err(LastmarkError::StoreConflict(locator.to_string()));
		}
		*current = content.to_string();

		let mut writes = self
			.writes
			.lock()
			.map_err(|e| LastmarkError::Store(e.to_string()))?;
		*writes += 1;

		Ok(())
	}
}

pub const RECENT_TRACKS_JSON: &str = r##"{
  "recenttracks": {
    "track": [
      {
        "artist": { "url": "https://www.last.fm/music/Radiohead", "name": "Radiohead", "mbid": "" },
        "name": "Reckoner",
        "url": "https://www.last.fm/music/Radiohead/_/Reckoner",
        "@attr": { "nowplaying": "true" }
      },
      {
        "artist": { "url": "https://www.last.fm/music/Portishead", "name": "Portishead", "mbid": "" },
        "name": "Roads",
        "url": "https://www.last.fm/music/Portishead/_/Roads",
        "date": { "uts": "1700000000", "#text": "14 Nov 2023, 22:13" }
      }
    ],
    "@attr": { "user": "rj", "totalPages": "1", "page": "1", "perPage": "2", "total": "2" }
  }
}"##;

pub const TOP_TRACKS_JSON: &str = r##"{
  "toptracks": {
    "track": [
      {
        "name": "Airbag",
        "url": "https://www.last.fm/music/Radiohead/_/Airbag",
        "playcount": "1234",
        "artist": { "name": "Radiohead", "url": "https://www.last.fm/music/Radiohead", "mbid": "" },
        "@attr": { "rank": "1" }
      }
    ],
    "@attr": { "user": "rj", "page": "1", "perPage": "1" }
  }
}"##;

pub const TOP_ARTISTS_SINGLE_JSON: &str = r##"{
  "topartists": {
    "artist": {
      "name": "Radiohead",
      "url": "https://www.last.fm/music/Radiohead",
      "playcount": 42
    },
    "@attr": { "user": "rj" }
  }
}"##;

pub const TOP_ALBUMS_EMPTY_JSON: &str = r#"{ "topalbums": { "album": [], "@attr": { "user": "rj" } } }"#;

pub const USER_INFO_JSON: &str = r##"{
  "user": {
    "name": "rj",
    "playcount": "150316",
    "artist_count": "12749",
    "album_count": "28457",
    "track_count": "57895",
    "registered": { "unixtime": "1037793040", "#text": 1037793040 }
  }
}"##;
