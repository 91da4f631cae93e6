use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use sha2::Digest;
use sha2::Sha256;

use crate::LastmarkError;
use crate::LastmarkResult;

/// Opaque token identifying the revision of a document that was read. It is
/// handed back unchanged on write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentVersion(String);

impl DocumentVersion {
	/// Version derived from the SHA-256 of the content.
	pub fn of_content(content: &str) -> Self {
		let mut hasher = Sha256::new();
		hasher.update(content.as_bytes());
		Self(format!("{:x}", hasher.finalize()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for DocumentVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// A document as read from a [`DocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
	pub content: String,
	pub version: DocumentVersion,
}

/// Where documents are read from and written back to.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	async fn read(&self, locator: &str) -> LastmarkResult<StoredDocument>;

	/// Replace the document. Implementations reject the write with
	/// [`LastmarkError::StoreConflict`] when `version` is no longer current.
	async fn write(
		&self,
		locator: &str,
		content: &str,
		version: &DocumentVersion,
	) -> LastmarkResult<()>;
}

/// [`DocumentStore`] over files below a root directory. Locators are paths
/// relative to the root.
#[derive(Debug, Clone)]
pub struct FileStore {
	root: PathBuf,
}

impl FileStore {
	pub fn new(root: impl AsRef<Path>) -> Self {
		Self {
			root: root.as_ref().to_path_buf(),
		}
	}

	pub fn resolve(&self, locator: &str) -> PathBuf {
		self.root.join(locator)
	}
}

#[async_trait]
impl DocumentStore for FileStore {
	async fn read(&self, locator: &str) -> LastmarkResult<StoredDocument> {
		let path = self.resolve(locator);
		let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
			LastmarkError::Store(format!("failed to read {}: {e}", path.display()))
		})?;
		let version = DocumentVersion::of_content(&content);

		Ok(StoredDocument { content, version })
	}

	async fn write(
		&self,
		locator: &str,
		content: &str,
		version: &DocumentVersion,
	) -> LastmarkResult<()> {
		let path = self.resolve(locator);
		let current = tokio::fs::read_to_string(&path).await.map_err(|e| {
			LastmarkError::Store(format!("failed to read {}: {e}", path.display()))
		})?;

		if DocumentVersion::of_content(&current) != *version {
			return Err(LastmarkError::StoreConflict(locator.to_string()));
		}

		let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
		temp_name.push(".lastmark.tmp");
		let temp_path = path.with_file_name(temp_name);

		tokio::fs::write(&temp_path, content).await.map_err(|e| {
			LastmarkError::Store(format!("failed to write {}: {e}", temp_path.display()))
		})?;
		if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
			tokio::fs::remove_file(&temp_path).await.ok();
			return Err(LastmarkError::Store(format!(
				"failed to replace {}: {e}",
				path.display()
			)));
		}
		tracing::info!("wrote {}", path.display());

		Ok(())
	}
}
