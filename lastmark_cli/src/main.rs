use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use lastmark_cli::Commands;
use lastmark_cli::LastmarkCli;
use lastmark_core::AnyEmptyResult;
use lastmark_core::CONFIG_FILE_CANDIDATES;
use lastmark_core::Family;
use lastmark_core::FileStore;
use lastmark_core::LastFmClient;
use lastmark_core::LastmarkError;
use lastmark_core::LastmarkResult;
use lastmark_core::SAMPLE_SETTINGS;
use lastmark_core::Settings;
use lastmark_core::UpdateOptions;
use lastmark_core::scan_all;
use lastmark_core::update_document;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = LastmarkCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::List) => run_list(&args),
		Some(Commands::Check) => run_check(&args),
		Some(Commands::Update { .. }) => run_update(&args),
		None => {
			eprintln!("No subcommand specified. Run `lastmark --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<LastmarkError>() {
			Ok(lastmark_err) => {
				let report: miette::Report = (*lastmark_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(verbose)
		.try_init()
		.ok();
}

fn resolve_root(args: &LastmarkCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Settings from the project's lastmark.toml with the command line applied
/// on top.
fn resolve_settings(args: &LastmarkCli, root: &Path) -> LastmarkResult<Settings> {
	let mut settings = Settings::load_or_default(root)?;

	if let Some(readme) = &args.readme {
		settings.readme.clone_from(readme);
	}

	if let Some(Commands::Update {
		user,
		locale,
		date_format,
		no_title,
		..
	}) = &args.command
	{
		if user.is_some() {
			settings.user.clone_from(user);
		}
		if let Some(locale) = locale {
			settings.locale.clone_from(locale);
		}
		if let Some(date_format) = date_format {
			settings.date_format.clone_from(date_format);
		}
		if *no_title {
			settings.show_title = false;
		}
	}

	settings.validate()?;
	Ok(settings)
}

fn read_document(root: &Path, readme: &Path) -> LastmarkResult<String> {
	let path = root.join(readme);
	std::fs::read_to_string(&path)
		.map_err(|e| LastmarkError::Store(format!("failed to read {}: {e}", path.display())))
}

fn run_init(args: &LastmarkCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = Settings::resolve_path(&root) {
		println!(
			"Settings file already exists: {}",
			make_relative(&existing, &root)
		);
		return Ok(());
	}

	let settings_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	std::fs::write(&settings_path, SAMPLE_SETTINGS)?;
	println!("Created {}", CONFIG_FILE_CANDIDATES[0]);

	println!();
	println!("Next steps:");
	println!("  1. Set `user` in {}", CONFIG_FILE_CANDIDATES[0]);
	println!("  2. Add a region to your README:");
	println!("     <!--START_LASTFM_TRACKS:{{\"rows\": 5, \"period\": \"1month\"}}-->");
	println!("     <!--END_LASTFM_TRACKS-->");
	println!("  3. Run `LASTFM_API_KEY=... lastmark update` to render it");

	Ok(())
}

fn run_list(args: &LastmarkCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let settings = resolve_settings(args, &root)?;
	let document = read_document(&root, &settings.readme)?;
	let regions = scan_all(&document)?;
	let readme = settings.readme.display().to_string();

	if regions.is_empty() {
		println!("No Last.fm regions found in {readme}.");
		return Ok(());
	}

	println!("{}", colored!(format!("Regions in {readme}:"), bold));
	for region in &regions {
		let line = region.line_in(&document);
		let details = match region.family {
			Family::Recent => format!("rows: {}", region.config.rows),
			Family::UserInfo => {
				let display: Vec<&str> = region
					.config
					.display
					.iter()
					.map(|field| field.as_str())
					.collect();
				format!("display: {}", display.join(", "))
			}
			_ => {
				format!(
					"rows: {}, period: {}",
					region.config.rows, region.config.period
				)
			}
		};
		println!(
			"  {} {readme}:{line} ({details})",
			region.family.marker_name()
		);
	}

	Ok(())
}

fn run_check(args: &LastmarkCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let settings = resolve_settings(args, &root)?;
	settings.formats()?;

	let document = read_document(&root, &settings.readme)?;
	let regions = scan_all(&document)?;
	let readme = settings.readme.display().to_string();

	if regions.is_empty() {
		println!("No Last.fm regions found in {readme}.");
		return Ok(());
	}

	println!(
		"{}",
		colored!(
			format!("All {} region(s) in {readme} are valid.", regions.len()),
			green
		)
	);

	Ok(())
}

fn run_update(args: &LastmarkCli) -> AnyEmptyResult {
	let Some(Commands::Update {
		api_key,
		dry_run,
		diff,
		..
	}) = &args.command
	else {
		return Ok(());
	};

	let root = resolve_root(args);
	let settings = resolve_settings(args, &root)?;
	let formats = settings.formats()?;
	let readme = settings.readme.display().to_string();

	// Nothing to fetch for a document without regions.
	let document = read_document(&root, &settings.readme)?;
	if scan_all(&document)?.is_empty() {
		println!("No Last.fm regions found in {readme}. {readme} is up to date.");
		return Ok(());
	}

	let Some(user) = settings.user.clone() else {
		return Err(LastmarkError::InvalidSettings(
			"no Last.fm user configured, set `user` in lastmark.toml, pass `--user` or set \
			 `LASTFM_USER`"
				.to_string(),
		)
		.into());
	};
	let Some(api_key) = api_key.clone().filter(|key| !key.trim().is_empty()) else {
		return Err(LastmarkError::InvalidSettings(
			"no Last.fm API key, pass `--api-key` or set `LASTFM_API_KEY`".to_string(),
		)
		.into());
	};

	let options = UpdateOptions {
		user,
		show_title: settings.show_title,
		formats,
		dry_run: *dry_run,
	};
	let source = LastFmClient::new(api_key);
	let store = FileStore::new(&root);
	let locator = settings.readme.to_string_lossy().to_string();

	let runtime = tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?;
	let report = runtime.block_on(update_document(&source, &store, &locator, &options))?;

	for region in &report.update.regions {
		let status = if region.changed {
			colored!("updated", yellow)
		} else {
			colored!("unchanged", green)
		};
		println!(
			"  {} {readme}:{} ({} record(s)) {status}",
			region.family.marker_name(),
			region.line,
			region.records
		);
	}

	if *diff && report.update.is_changed() {
		print_diff(&report.update.original, &report.update.updated);
	}

	let changed = report.update.changed_count();
	if report.written {
		println!(
			"{}",
			colored!(format!("Updated {changed} region(s) in {readme}."), green)
		);
	} else if report.update.is_changed() {
		println!(
			"{}",
			colored!(
				format!("Dry run: {changed} region(s) in {readme} would be updated."),
				yellow
			)
		);
	} else {
		println!("{}", colored!(format!("{readme} is up to date."), green));
	}

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
