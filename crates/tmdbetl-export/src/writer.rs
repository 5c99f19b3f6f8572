//! CSV table writer and output file layout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use csv::WriterBuilder;

use super::records::{Detail, PopularItem, Review, TableRecord};

/// Placeholder replaced by the media type key in file name patterns.
pub const MEDIA_PLACEHOLDER: &str = "{media}";

/// The three tables written per media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Popular listing (`raw_<type>s.csv`).
    Items,
    /// Reviews (`reviews_<type>s.csv`).
    Reviews,
    /// Details (`details_<type>s.csv`).
    Details,
}

/// Output directory and file name patterns.
///
/// Patterns must contain `{media}` so runs for different
/// media types do not overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory holding all tables. Created if absent.
    pub dir: PathBuf,
    /// File name pattern for the items table.
    pub items_file: String,
    /// File name pattern for the reviews table.
    pub reviews_file: String,
    /// File name pattern for the details table.
    pub details_file: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data").join("raw"),
            items_file: String::from("raw_{media}s.csv"),
            reviews_file: String::from("reviews_{media}s.csv"),
            details_file: String::from("details_{media}s.csv"),
        }
    }
}

impl OutputLayout {
    /// Creates a layout with default file names under `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Checks that every file name pattern is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern lacks `{media}` or contains a path separator.
    pub fn validate(&self) -> Result<()> {
        for (table, pattern) in [
            ("items", &self.items_file),
            ("reviews", &self.reviews_file),
            ("details", &self.details_file),
        ] {
            if !pattern.contains(MEDIA_PLACEHOLDER) {
                bail!("{table} file name pattern must contain {MEDIA_PLACEHOLDER}: {pattern}");
            }
            if pattern.contains('/') || pattern.contains('\\') {
                bail!("{table} file name pattern must not contain a path separator: {pattern}");
            }
        }
        Ok(())
    }

    /// Resolves the file path of a table for a media type key.
    #[must_use]
    pub fn path_for(&self, table: Table, media: &str) -> PathBuf {
        let pattern = match table {
            Table::Items => &self.items_file,
            Table::Reviews => &self.reviews_file,
            Table::Details => &self.details_file,
        };
        self.dir.join(pattern.replace(MEDIA_PLACEHOLDER, media))
    }
}

/// Paths and row counts of one set of written tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTables {
    /// Items table path.
    pub items_path: PathBuf,
    /// Rows written to the items table.
    pub items: usize,
    /// Reviews table path.
    pub reviews_path: PathBuf,
    /// Rows written to the reviews table.
    pub reviews: usize,
    /// Details table path.
    pub details_path: PathBuf,
    /// Rows written to the details table.
    pub details: usize,
}

/// Writes records to `path` as CSV, replacing any existing file.
///
/// The header row is always written, so an empty slice yields a
/// header-only file. Returns the number of data rows written.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a row cannot be written.
pub fn write_table<R: TableRecord>(path: &Path, records: &[R]) -> Result<usize> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer
        .write_record(R::HEADERS)
        .with_context(|| format!("failed to write header to {}", path.display()))?;

    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows = records.len(), "table written");

    Ok(records.len())
}

/// Writes the items, reviews and details tables for one media type,
/// creating the output directory if needed.
///
/// # Errors
///
/// Returns an error if directory creation or any table write fails.
pub fn write_tables(
    layout: &OutputLayout,
    media: &str,
    items: &[PopularItem],
    reviews: &[Review],
    details: &[Detail],
) -> Result<WrittenTables> {
    std::fs::create_dir_all(&layout.dir)
        .with_context(|| format!("failed to create directory {}", layout.dir.display()))?;

    let items_path = layout.path_for(Table::Items, media);
    let reviews_path = layout.path_for(Table::Reviews, media);
    let details_path = layout.path_for(Table::Details, media);

    let items = write_table(&items_path, items)?;
    let reviews = write_table(&reviews_path, reviews)?;
    let details = write_table(&details_path, details)?;

    Ok(WrittenTables {
        items_path,
        items,
        reviews_path,
        reviews,
        details_path,
        details,
    })
}
