use chrono::DateTime;

use crate::LastmarkError;
use crate::LastmarkResult;

/// Locale tag used when none is configured.
pub const DEFAULT_LOCALE: &str = "en-US";
/// Date pattern used when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "MM/dd/yyyy";

const NARROW_NO_BREAK_SPACE: &str = "\u{202f}";
const NO_BREAK_SPACE: &str = "\u{a0}";

/// The formatting parameters threaded through every render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formats {
	pub numbers: NumberFormat,
	pub dates: DatePattern,
}

impl Formats {
	pub fn new(locale: &str, date_pattern: &str) -> LastmarkResult<Self> {
		Ok(Self {
			numbers: NumberFormat::for_locale(locale),
			dates: DatePattern::parse(date_pattern)?,
		})
	}
}

impl Default for Formats {
	fn default() -> Self {
		Self {
			numbers: NumberFormat::for_locale(DEFAULT_LOCALE),
			dates: DatePattern {
				source: DEFAULT_DATE_FORMAT.to_string(),
				strftime: "%m/%d/%Y".to_string(),
			},
		}
	}
}

/// Integer formatting with the digit grouping of a locale.
///
/// Only the grouping separator, the size of the groups above the thousands
/// and the minimum number of digits before grouping kicks in vary between
/// locales; digits are always ASCII.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
	separator: &'static str,
	min_grouping_digits: usize,
	secondary_group: usize,
}

impl NumberFormat {
	/// Resolve the grouping rules for a BCP 47 tag such as `en-US` or
	/// `de_DE`. Unknown languages group with `,`.
	pub fn for_locale(tag: &str) -> Self {
		let mut subtags = tag.split(['-', '_']).filter(|subtag| !subtag.is_empty());
		let language = subtags.next().unwrap_or_default().to_ascii_lowercase();
		let region = subtags
			.find(|subtag| subtag.len() == 2 || subtag.chars().all(|c| c.is_ascii_digit()))
			.map(str::to_ascii_uppercase);

		let (separator, min_grouping_digits, secondary_group) =
			match (language.as_str(), region.as_deref()) {
				("de" | "it", Some("CH" | "LI")) => ("\u{2019}", 1, 3),
				("de", Some("AT")) => (NO_BREAK_SPACE, 1, 3),
				("en" | "hi", Some("IN")) => (",", 1, 2),
				("pt", Some("PT")) => (NO_BREAK_SPACE, 2, 3),
				("es", _) => (".", 2, 3),
				("pl", _) => (NO_BREAK_SPACE, 2, 3),
				(
					"de" | "it" | "pt" | "nl" | "da" | "tr" | "id" | "el" | "ro" | "hr" | "sl"
					| "sr" | "vi",
					_,
				) => (".", 1, 3),
				("fr", _) => (NARROW_NO_BREAK_SPACE, 1, 3),
				(
					"ru" | "uk" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "hu" | "bg" | "lt"
					| "lv" | "et",
					_,
				) => (NO_BREAK_SPACE, 1, 3),
				_ => (",", 1, 3),
			};

		Self {
			separator,
			min_grouping_digits,
			secondary_group,
		}
	}

	pub fn format(&self, value: u64) -> String {
		let digits = value.to_string();
		// Grouping starts once the leading group would hold at least
		// `min_grouping_digits` digits, e.g. `1234` stays ungrouped in `es`.
		if digits.len() < 3 + self.min_grouping_digits {
			return digits;
		}

		// The last three digits form the first group, e.g. `12,34,567` in `en-IN`.
		let (mut rest, thousands) = digits.split_at(digits.len() - 3);
		let mut groups = vec![thousands];
		while rest.len() > self.secondary_group {
			let (head, group) = rest.split_at(rest.len() - self.secondary_group);
			groups.push(group);
			rest = head;
		}
		groups.push(rest);
		groups.reverse();

		groups.join(self.separator)
	}
}

/// A date pattern written with Unicode style tokens (`MM/dd/yyyy`,
/// `d. MMMM yyyy`, ...), compiled to a `chrono` format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
	source: String,
	strftime: String,
}

impl DatePattern {
	pub fn parse(pattern: &str) -> LastmarkResult<Self> {
		let invalid = |reason: String| {
			LastmarkError::InvalidDatePattern {
				pattern: pattern.to_string(),
				reason,
			}
		};

		let chars: Vec<char> = pattern.chars().collect();
		let mut strftime = String::with_capacity(pattern.len() * 2);
		let mut index = 0;

		while index < chars.len() {
			let current = chars[index];

			if current == '\'' {
				// `''` is an escaped quote, otherwise copy until the closing quote.
				if chars.get(index + 1) == Some(&'\'') {
					strftime.push('\'');
					index += 2;
					continue;
				}
				let Some(length) = chars[index + 1..].iter().position(|&c| c == '\'') else {
					return Err(invalid("unterminated quoted text".to_string()));
				};
				for &literal in &chars[index + 1..index + 1 + length] {
					push_literal(&mut strftime, literal);
				}
				index += length + 2;
				continue;
			}

			if !current.is_ascii_alphabetic() {
				push_literal(&mut strftime, current);
				index += 1;
				continue;
			}

			let run = chars[index..]
				.iter()
				.take_while(|&&c| c == current)
				.count();
			let specifier = match (current, run) {
				('y', 2) => "%y",
				('y', _) => "%Y",
				('M', 1) => "%-m",
				('M', 2) => "%m",
				('M', 3) => "%b",
				('M', _) => "%B",
				('d', 1) => "%-d",
				('d', _) => "%d",
				('E', 1..=3) => "%a",
				('E', _) => "%A",
				('H', 1) => "%-H",
				('H', _) => "%H",
				('h', 1) => "%-I",
				('h', _) => "%I",
				('m', 1) => "%-M",
				('m', _) => "%M",
				('s', 1) => "%-S",
				('s', _) => "%S",
				('a', _) => "%p",
				_ => {
					let token = current.to_string().repeat(run);
					return Err(invalid(format!("unsupported token `{token}`")));
				}
			};
			strftime.push_str(specifier);
			index += run;
		}

		Ok(Self {
			source: pattern.to_string(),
			strftime,
		})
	}

	/// The pattern as configured.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Format a Unix timestamp (seconds, UTC). Timestamps outside the range
	/// `chrono` can represent are rendered as the raw number.
	pub fn format(&self, unix_seconds: i64) -> String {
		DateTime::from_timestamp(unix_seconds, 0).map_or_else(
			|| unix_seconds.to_string(),
			|date| date.format(&self.strftime).to_string(),
		)
	}
}

fn push_literal(strftime: &mut String, literal: char) {
	if literal == '%' {
		strftime.push_str("%%");
	} else {
		strftime.push(literal);
	}
}
