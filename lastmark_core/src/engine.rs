use serde::Serialize;

use crate::DocumentStore;
use crate::Family;
use crate::Formats;
use crate::LastmarkResult;
use crate::Listening;
use crate::ListeningSource;
use crate::Region;
use crate::render;
use crate::scan;
use crate::splice;
use crate::wrap;

/// Everything a region needs to be rendered apart from its records.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
	/// Last.fm user whose listening history is rendered.
	pub user: String,
	/// Render the logo and title banner above each region.
	pub show_title: bool,
	pub formats: Formats,
	/// Compute the new document without writing it back.
	pub dry_run: bool,
}

impl UpdateOptions {
	pub fn new(user: impl Into<String>) -> Self {
		Self {
			user: user.into(),
			show_title: true,
			formats: Formats::default(),
			dry_run: false,
		}
	}
}

/// Outcome for a single region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionUpdate {
	pub family: Family,
	pub start_marker: String,
	/// 1-indexed line of the start marker at the time it was processed.
	pub line: usize,
	/// Number of records returned by the source, before the row cap.
	pub records: usize,
	/// Whether the rendered text differs from what was there before.
	pub changed: bool,
}

/// The document before and after every region was regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpdate {
	pub original: String,
	pub updated: String,
	pub regions: Vec<RegionUpdate>,
}

impl DocumentUpdate {
	pub fn is_changed(&self) -> bool {
		self.original != self.updated
	}

	/// Number of regions whose text changed.
	pub fn changed_count(&self) -> usize {
		self.regions.iter().filter(|region| region.changed).count()
	}
}

/// Summary of [`update_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
	pub update: DocumentUpdate,
	/// Whether the store was written to.
	pub written: bool,
}

/// Scan `document` for every family in processing order.
///
/// Fails on the first malformed or unpaired marker of any family.
pub fn scan_all(document: &str) -> LastmarkResult<Vec<Region>> {
	let mut regions = vec![];
	for family in Family::ALL {
		regions.extend(scan(family, document)?);
	}

	Ok(regions)
}

/// Render `listening` for `region`, including its original markers and the
/// optional banner. The result replaces the region's `full_text`.
pub fn render_region(region: &Region, listening: &Listening, options: &UpdateOptions) -> String {
	let title = region.family.title(region.config.period, &options.user);
	let body = render(&region.config, listening, &options.formats);

	wrap(
		&region.start_marker,
		&region.end_marker,
		&title,
		options.show_title,
		&body,
	)
}

/// Regenerate every region of `document`.
///
/// Families are processed in [`Family::ALL`] order, each one scanned from the
/// document produced by the previous family. Records are fetched one region
/// at a time in the order the regions were opened. Any error aborts the whole
/// update and no partial document is returned.
pub async fn compute_update(
	document: &str,
	source: &dyn ListeningSource,
	options: &UpdateOptions,
) -> LastmarkResult<DocumentUpdate> {
	// Reject malformed documents before any data is fetched.
	scan_all(document)?;

	let mut working = document.to_string();
	let mut updates = vec![];

	for family in Family::ALL {
		let regions = scan(family, &working)?;
		if regions.is_empty() {
			continue;
		}

		let mut replacements = Vec::with_capacity(regions.len());
		for region in regions {
			tracing::debug!(
				"fetching {} for `{}` (rows: {}, period: {})",
				family.fetch_kind(),
				options.user,
				region.config.rows,
				region.config.period
			);
			let listening = source
				.fetch(family.fetch_kind(), &options.user, &region.config)
				.await?;
			let replacement = render_region(&region, &listening, options);

			updates.push(RegionUpdate {
				family,
				start_marker: region.start_marker.clone(),
				line: region.line_in(&working),
				records: listening.len(),
				changed: replacement != region.full_text,
			});
			replacements.push((region, replacement));
		}

		// Later spans first so earlier spans stay valid.
		replacements.sort_by(|(a, _), (b, _)| b.span.start.cmp(&a.span.start));
		for (region, replacement) in replacements {
			working = splice(&working, &region, &replacement);
		}
	}

	Ok(DocumentUpdate {
		original: document.to_string(),
		updated: working,
		regions: updates,
	})
}

/// Read the document at `locator`, regenerate its regions and write it back
/// once if anything changed.
///
/// Nothing is written when the content is unchanged, when `dry_run` is set,
/// or when any step fails.
pub async fn update_document(
	source: &dyn ListeningSource,
	store: &dyn DocumentStore,
	locator: &str,
	options: &UpdateOptions,
) -> LastmarkResult<UpdateReport> {
	let stored = store.read(locator).await?;
	let update = compute_update(&stored.content, source, options).await?;

	if !update.is_changed() {
		tracing::info!("{locator} is up to date");
		return Ok(UpdateReport {
			update,
			written: false,
		});
	}

	if options.dry_run {
		tracing::info!("dry run, not writing {locator}");
		return Ok(UpdateReport {
			update,
			written: false,
		});
	}

	store
		.write(locator, &update.updated, &stored.version)
		.await?;
	tracing::info!(
		"updated {} region(s) in {locator}",
		update.changed_count()
	);

	Ok(UpdateReport {
		update,
		written: true,
	})
}
