//! `lastmark_core` keeps Last.fm listening charts up to date inside markdown
//! documents. Regions are delimited by paired marker comments carrying an
//! optional inline JSON configuration. Everything outside the regions is left
//! untouched.
//!
//! ```md
//! <!--START_LASTFM_TRACKS:{"rows": 5, "period": "1month"}-->
//! <!--END_LASTFM_TRACKS-->
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown document
//!   → Scanner (pairs start/end markers per family, validates the inline configuration)
//!   → Listening source (fetches records for each region, one region at a time)
//!   → Renderer (formats one line per record, wraps the body with markers and banner)
//!   → Splicer (replaces the region's previous text in the working document)
//!   → Document store (single write, only when the document changed)
//! ```
//!
//! ## Families
//!
//! | Marker name        | Content                      |
//! | ------------------ | ---------------------------- |
//! | `LASTFM_TRACKS`    | most played tracks           |
//! | `LASTFM_ARTISTS`   | most played artists          |
//! | `LASTFM_ALBUMS`    | most played albums           |
//! | `LASTFM_RECENT`    | recently played tracks       |
//! | `LASTFM_USER_INFO` | account summary              |
//!
//! ## Region Configuration
//!
//! - `rows`: number of lines, 1 to 50, defaults to 8.
//! - `period`: `7day` (default), `1month`, `3month`, `6month`, `12month` or
//!   `overall`.
//! - `display`: user info fields, any of `registered`, `playcount`,
//!   `artistCount`, `albumCount` and `trackCount`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lastmark_core::{FileStore, LastFmClient, Settings, UpdateOptions, update_document};
//! use std::path::Path;
//!
//! # async fn run() -> lastmark_core::LastmarkResult<()> {
//! let settings = Settings::load_or_default(Path::new("."))?;
//! let source = LastFmClient::new("api-key");
//! let store = FileStore::new(".");
//! let mut options = UpdateOptions::new("rj");
//! options.formats = settings.formats()?;
//!
//! let report = update_document(&source, &store, "README.md", &options).await?;
//! println!("{} region(s) changed", report.update.changed_count());
//! # Ok(())
//! # }
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use family::*;
pub use format::*;
pub use records::*;
pub use render::*;
pub use scanner::*;
pub use settings::*;
pub use source::*;
pub use splice::*;
pub use store::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod family;
pub mod format;
mod records;
mod render;
mod scanner;
pub mod settings;
pub mod source;
mod splice;
pub mod store;

#[cfg(test)]
mod __fixtures;
