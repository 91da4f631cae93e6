use std::collections::VecDeque;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::Family;
use crate::LastmarkError;
use crate::LastmarkResult;
use crate::RegionConfig;
use crate::parse_region_config;

/// Start marker patterns, one per family. The optional `config` group holds
/// the inline JSON object between `:` and the closing `-->`.
static START_PATTERNS: LazyLock<Vec<(Family, Regex)>> = LazyLock::new(|| {
	Family::ALL
		.into_iter()
		.map(|family| {
			let pattern = format!(
				r"^{}(?::(?<config>\{{.*\}}))?-->",
				regex::escape(&family.start_prefix())
			);
			let regex = Regex::new(&pattern).expect("start marker pattern is a valid regex");
			(family, regex)
		})
		.collect()
});

fn start_pattern(family: Family) -> &'static Regex {
	START_PATTERNS
		.iter()
		.find_map(|(candidate, regex)| (*candidate == family).then_some(regex))
		.expect("every family has a start pattern")
}

/// One paired start/end marker span found in a document.
///
/// ```md
/// <!--START_LASTFM_TRACKS:{"rows": 3}-->
/// previously rendered lines
/// <!--END_LASTFM_TRACKS-->
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
	/// The family whose markers delimit this region.
	pub family: Family,
	/// The start marker line, echoed back verbatim when the region is
	/// rewritten.
	pub start_marker: String,
	/// The end marker line, echoed back verbatim when the region is
	/// rewritten.
	pub end_marker: String,
	/// Raw lines between the two markers.
	pub body_lines: Vec<String>,
	/// The start marker, body lines and end marker joined with `\n`. This is
	/// the text that gets replaced.
	pub full_text: String,
	/// Byte range of `full_text` in the scanned document.
	pub span: Range<usize>,
	/// Normalized configuration from the start marker.
	pub config: RegionConfig,
}

impl Region {
	/// The 1-indexed line of the start marker within `document`.
	pub fn line_in(&self, document: &str) -> usize {
		document
			.get(..self.span.start)
			.map_or(1, |before| before.matches('\n').count() + 1)
	}
}

struct RegionCreator {
	start_marker: String,
	start_offset: usize,
	body_lines: Vec<String>,
	config: RegionConfig,
	closing: Option<(String, usize)>,
}

impl RegionCreator {
	fn into_region(self, family: Family) -> LastmarkResult<Region> {
		let Some((end_marker, end_offset)) = self.closing else {
			return Err(LastmarkError::StartWithoutEnd(vec![self.start_marker]));
		};

		let full_text = if self.body_lines.is_empty() {
			format!("{}\n{end_marker}", self.start_marker)
		} else {
			format!(
				"{}\n{}\n{end_marker}",
				self.start_marker,
				self.body_lines.join("\n")
			)
		};

		Ok(Region {
			family,
			start_marker: self.start_marker,
			end_marker,
			body_lines: self.body_lines,
			full_text,
			span: self.start_offset..end_offset,
			config: self.config,
		})
	}
}

/// Find every region of `family` in `document`, in the order they were
/// opened.
///
/// Regions of the same family are paired first-in-first-out: an end marker
/// closes the oldest region that is still open. Body lines are only collected
/// while exactly one region is open. Lines belonging to other families are
/// treated as plain content.
///
/// An empty vector means no region of this family exists. Any malformed
/// configuration or unpaired marker aborts the whole scan.
pub fn scan(family: Family, document: &str) -> LastmarkResult<Vec<Region>> {
	tracing::debug!("searching for {} regions", family.marker_name());

	let start_prefix = family.start_prefix();
	let end_prefix = family.end_prefix();
	let mut creators: Vec<RegionCreator> = vec![];
	let mut open: VecDeque<usize> = VecDeque::new();
	let mut offset = 0;

	for line in document.split('\n') {
		let line_start = offset;
		offset += line.len() + 1;

		if line.starts_with(&start_prefix) {
			let Some(captures) = start_pattern(family).captures(line) else {
				return Err(LastmarkError::MalformedConfiguration {
					marker: line.to_string(),
					reason: format!(
						"start marker does not match `{start_prefix}[:{{...}}]-->`"
					),
				});
			};
			let blob = captures.name("config").map(|m| m.as_str());
			let config = parse_region_config(line, blob)?;

			open.push_back(creators.len());
			creators.push(RegionCreator {
				start_marker: line.to_string(),
				start_offset: line_start,
				body_lines: vec![],
				config,
				closing: None,
			});
		} else if line.starts_with(&end_prefix) {
			let Some(index) = open.pop_front() else {
				return Err(LastmarkError::EndWithoutStart(line.to_string()));
			};
			creators[index].closing = Some((line.to_string(), line_start + line.len()));
		} else if let [index] = open.make_contiguous() {
			creators[*index].body_lines.push(line.to_string());
		}
	}

	if !open.is_empty() {
		let unclosed = open
			.into_iter()
			.map(|index| creators[index].start_marker.clone())
			.collect();
		return Err(LastmarkError::StartWithoutEnd(unclosed));
	}

	let regions = creators
		.into_iter()
		.map(|creator| creator.into_region(family))
		.collect::<LastmarkResult<Vec<_>>>()?;

	tracing::debug!(
		"found {} {} region(s)",
		regions.len(),
		family.marker_name()
	);

	Ok(regions)
}
