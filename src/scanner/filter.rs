//! Pure path predicates: directory deny-list, hidden entries and file
//! categories.
//!
//! Nothing here touches the filesystem. The walker asks
//! [`PathFilter::should_skip_directory`] before descending and
//! [`FileCategory::matches`] before recording a file.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Segments never worth scanning for user duplicates.
///
/// Matched as lower-cased substrings of the `/`-joined path below the scan
/// root, wrapped in `/` on both sides, so `"/node_modules/"` only matches a
/// whole segment.
const DENY_LIST: &[&str] = &[
    // version control metadata
    "/.git/",
    "/.svn/",
    "/.hg/",
    // build artifacts and dependency trees
    "/node_modules/",
    "/__pycache__/",
    "/target/debug/",
    "/target/release/",
    "/.gradle/",
    "/.next/",
    "/bower_components/",
    "/site-packages/",
    // OS and system directories
    "/$recycle.bin/",
    "/system volume information/",
    "/windows/system32/",
    "/windows/winsxs/",
    "/program files/",
    "/program files (x86)/",
    "/proc/",
    "/sys/",
    // application caches
    "/library/caches/",
    "/appdata/local/temp/",
    "/appdata/local/microsoft/windows/inetcache/",
    "/.cache/",
    "/.trash/",
];

/// Directory skip policy for one scan root.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: PathBuf,
    extra_patterns: Vec<String>,
}

impl PathFilter {
    /// Create a filter for directories below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extra_patterns: Vec::new(),
        }
    }

    /// Add caller-supplied deny patterns (plain substrings, case-insensitive).
    #[must_use]
    pub fn with_extra_patterns(mut self, patterns: &[String]) -> Self {
        self.extra_patterns = patterns
            .iter()
            .map(|p| p.to_lowercase().replace('\\', "/"))
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Whether the walker should not descend into `path`.
    ///
    /// The root itself is never skipped. Below it, a directory is skipped if
    /// its name is hidden or the path below the root contains a deny-listed
    /// segment.
    #[must_use]
    pub fn should_skip_directory(&self, path: &Path) -> bool {
        let relative = match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => return false,
            Ok(rel) => rel,
            Err(_) => path,
        };

        if path
            .file_name()
            .is_some_and(|name| is_hidden(&name.to_string_lossy()))
        {
            return true;
        }

        let normalized = normalize(relative);
        DENY_LIST.iter().any(|denied| normalized.contains(denied))
            || self
                .extra_patterns
                .iter()
                .any(|pattern| normalized.contains(pattern.as_str()))
    }
}

/// Lower-case `/`-joined form of `path` with a leading and trailing `/`.
fn normalize(path: &Path) -> String {
    let mut out = String::from("/");
    for component in path.components() {
        if let Component::Normal(part) = component {
            out.push_str(&part.to_string_lossy().to_lowercase());
            out.push('/');
        }
    }
    out
}

/// Whether an entry name is hidden (starts with `.`, other than `.`/`..`).
#[must_use]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// File category a scan can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Every file
    #[default]
    All,
    /// Raster and vector images, camera RAW
    Images,
    /// Video containers
    Videos,
    /// Office documents, PDFs, text
    Documents,
    /// Audio files
    Audio,
    /// Compressed archives and disk images
    Archives,
}

impl FileCategory {
    /// Every category, in display order.
    pub const ALL: [FileCategory; 6] = [
        FileCategory::All,
        FileCategory::Images,
        FileCategory::Videos,
        FileCategory::Documents,
        FileCategory::Audio,
        FileCategory::Archives,
    ];

    /// Lower-cased extensions belonging to this category.
    ///
    /// Empty for [`FileCategory::All`], which matches everything.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileCategory::All => &[],
            FileCategory::Images => &[
                "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "heic", "heif", "svg",
                "ico", "raw", "cr2", "nef", "arw", "dng",
            ],
            FileCategory::Videos => &[
                "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp",
            ],
            FileCategory::Documents => &[
                "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "rtf",
                "txt", "md", "csv", "epub",
            ],
            FileCategory::Audio => &[
                "mp3", "wav", "flac", "aac", "ogg", "m4a", "wma", "opus", "aiff",
            ],
            FileCategory::Archives => &[
                "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "tgz", "iso", "dmg",
            ],
        }
    }

    /// Whether a lower-cased extension (no dot) belongs to this category.
    #[must_use]
    pub fn matches(self, extension: &str) -> bool {
        self == FileCategory::All || self.extensions().contains(&extension)
    }

    /// Identifier used on the command line and in output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::All => "all",
            FileCategory::Images => "images",
            FileCategory::Videos => "videos",
            FileCategory::Documents => "documents",
            FileCategory::Audio => "audio",
            FileCategory::Archives => "archives",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown category identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of: all, images, videos, documents, audio, archives)")]
pub struct ParseCategoryError(pub String);

impl FromStr for FileCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FileCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Whether `extension` matches `category`.
#[must_use]
pub fn matches_category(extension: &str, category: FileCategory) -> bool {
    category.matches(&extension.to_lowercase())
}
