use crate::Region;

/// Replace `region` inside `document` with `replacement`.
///
/// The byte span captured by the scanner is used while it still points at
/// the region's `full_text`. Otherwise the first occurrence of `full_text` is
/// replaced. When neither matches the document is returned unchanged.
pub fn splice(document: &str, region: &Region, replacement: &str) -> String {
	let span = region.span.clone();

	if document.get(span.clone()) == Some(region.full_text.as_str()) {
		let mut result =
			String::with_capacity(document.len() - span.len() + replacement.len());
		result.push_str(&document[..span.start]);
		result.push_str(replacement);
		result.push_str(&document[span.end..]);
		return result;
	}

	tracing::debug!(
		"span of {} region moved, falling back to text search",
		region.family
	);
	replace_first(document, &region.full_text, replacement)
}

/// Literal replacement of the first occurrence of `needle`.
pub fn replace_first(document: &str, needle: &str, replacement: &str) -> String {
	if needle.is_empty() {
		return document.to_string();
	}

	document.replacen(needle, replacement, 1)
}
