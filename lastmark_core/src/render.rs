use crate::ArtistLink;
use crate::DisplayField;
use crate::Formats;
use crate::Listening;
use crate::RecentTrack;
use crate::RegionConfig;
use crate::UserInfo;

/// Body rendered when a source returns no records.
pub const EMPTY_DATA_MESSAGE: &str = "No listening data found for the selected time period.";

/// Logo link placed in front of the title banner.
pub const LASTFM_LOGO: &str = r#"<a href="https://last.fm" target="_blank"><img src="https://user-images.githubusercontent.com/17434202/215290617-e793598d-d7c9-428f-9975-156db1ba89cc.svg" alt="Last.fm Logo" width="18" height="13"/></a>"#;

const PLAY_BULLET: &str = "∙";
const MORE_PLAYS_BULLET: &str = "🎶";

/// Render the body of a region, one line per record joined with `\n`.
///
/// Every family is capped at `config.rows` lines. The body is not wrapped in
/// markers, see [`wrap`].
pub fn render(config: &RegionConfig, listening: &Listening, formats: &Formats) -> String {
	if listening.is_empty() {
		return EMPTY_DATA_MESSAGE.to_string();
	}

	let lines: Vec<String> = match listening {
		Listening::Tracks(tracks) => {
			tracks
				.iter()
				.take(config.rows)
				.map(|track| {
					ranked_line(
						formats,
						track.playcount,
						&track.name,
						&track.url,
						Some(&track.artist),
					)
				})
				.collect()
		}
		Listening::Artists(artists) => {
			artists
				.iter()
				.take(config.rows)
				.map(|artist| ranked_line(formats, artist.playcount, &artist.name, &artist.url, None))
				.collect()
		}
		Listening::Albums(albums) => {
			albums
				.iter()
				.take(config.rows)
				.map(|album| {
					ranked_line(
						formats,
						album.playcount,
						&album.name,
						&album.url,
						Some(&album.artist),
					)
				})
				.collect()
		}
		Listening::Recent(tracks) => recent_lines(config, tracks),
		Listening::UserInfo(info) => {
			info.as_ref()
				.map(|info| user_info_lines(config, info, formats))
				.unwrap_or_default()
		}
	};

	lines.join("\n")
}

/// Wrap a rendered body with its original marker lines and, when
/// `show_title` is set, a title banner followed by a blank line.
///
/// ```md
/// <!--START_LASTFM_ALBUMS-->
/// <logo> **Top Albums - Past Week**
///
/// > `89 ▶️` ∙ **[OK Computer](...)** - [Radiohead](...)<br/>
/// <!--END_LASTFM_ALBUMS-->
/// ```
pub fn wrap(start_marker: &str, end_marker: &str, title: &str, show_title: bool, body: &str) -> String {
	if show_title {
		format!("{start_marker}\n{LASTFM_LOGO} **{title}**\n\n{body}\n{end_marker}")
	} else {
		format!("{start_marker}\n{body}\n{end_marker}")
	}
}

fn ranked_line(
	formats: &Formats,
	playcount: u64,
	name: &str,
	url: &str,
	artist: Option<&ArtistLink>,
) -> String {
	let plays = formats.numbers.format(playcount);
	let suffix = artist
		.map(|artist| format!(" - [{}]({})", artist.name, artist.url))
		.unwrap_or_default();

	format!("> `{plays} ▶️` {PLAY_BULLET} **[{name}]({url})**{suffix}<br/>")
}

fn recent_lines(config: &RegionConfig, tracks: &[RecentTrack]) -> Vec<String> {
	// Decided on the full list so a cut off history is still flagged.
	let has_more = tracks.len() > config.rows;

	tracks
		.iter()
		.take(config.rows)
		.enumerate()
		.map(|(index, track)| {
			let bullet = if index == 0 && has_more {
				MORE_PLAYS_BULLET
			} else {
				PLAY_BULLET
			};
			format!(
				"> {bullet} **[{}]({})** - {}<br/>",
				track.name, track.url, track.artist
			)
		})
		.collect()
}

fn user_info_lines(config: &RegionConfig, info: &UserInfo, formats: &Formats) -> Vec<String> {
	config
		.display
		.iter()
		.map(|field| {
			let value = match field {
				DisplayField::Registered => formats.dates.format(info.registered),
				DisplayField::Playcount => formats.numbers.format(info.playcount),
				DisplayField::ArtistCount => formats.numbers.format(info.artist_count),
				DisplayField::AlbumCount => formats.numbers.format(info.album_count),
				DisplayField::TrackCount => formats.numbers.format(info.track_count),
			};
			format!("> **{}**: {value}<br/>", field.label())
		})
		.collect()
}
