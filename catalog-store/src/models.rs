use crate::category::Category;
use serde::{Deserialize, Serialize};

/// Metadata of one marketplace listing.
///
/// Written twice at publish time (owner-scoped and category-scoped copy) and
/// never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub project_id: String,
    pub title: String,
    pub category: Category,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(rename = "displayName", default)]
    pub owner_display_name: String,
}

/// Public URLs of one project's images
pub type AssetUrlSet = Vec<String>;

/// Result of loading one category.
///
/// `asset_urls[i]` always belongs to `records[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    records: Vec<ProjectRecord>,
    asset_urls: Vec<AssetUrlSet>,
}

impl CatalogPage {
    /// Builds a page, padding or truncating the URL sets to the record count
    pub fn new(records: Vec<ProjectRecord>, mut asset_urls: Vec<AssetUrlSet>) -> Self {
        if asset_urls.len() != records.len() {
            log::warn!(
                "Asset URL sets ({}) not aligned with records ({}), normalizing",
                asset_urls.len(),
                records.len()
            );
            asset_urls.resize_with(records.len(), Vec::new);
        }
        Self {
            records,
            asset_urls,
        }
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn asset_urls(&self) -> &[AssetUrlSet] {
        &self.asset_urls
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records paired with their URL sets
    pub fn entries(&self) -> impl Iterator<Item = (&ProjectRecord, &AssetUrlSet)> {
        self.records.iter().zip(self.asset_urls.iter())
    }
}

/// The signed-in user a project is published for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub display_name: String,
}

/// Kind of an uploaded file; selects its storage folder and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Image,
    Video,
    Document,
}

impl FileKind {
    /// Folder below the project id in object storage
    pub fn folder(&self) -> &'static str {
        match self {
            FileKind::Image => "images",
            FileKind::Video => "videos",
            FileKind::Document => "documents",
        }
    }

    /// Accepted lowercase file extensions
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileKind::Image => &["jpeg", "jpg", "png", "gif", "svg", "webp"],
            FileKind::Video => &["mp4", "mov"],
            FileKind::Document => &["docx", "pdf", "csv", "txt"],
        }
    }

    /// Maximum size in bytes
    pub fn max_bytes(&self) -> usize {
        match self {
            FileKind::Image => 10 * 1024 * 1024,    // 10 MiB
            FileKind::Video => 100 * 1024 * 1024,   // 100 MiB
            FileKind::Document => 15 * 1024 * 1024, // 15 MiB
        }
    }

    /// Content type guessed from the extension
    pub fn content_type(&self, file_name: &str) -> Option<&'static str> {
        let ext = extension_of(file_name)?;
        let mime = match ext.as_str() {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "svg" => "image/svg+xml",
            "webp" => "image/webp",
            "mp4" => "video/mp4",
            "mov" => "video/quicktime",
            "pdf" => "application/pdf",
            "csv" => "text/csv",
            "txt" => "text/plain",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            _ => return None,
        };
        Some(mime)
    }
}

/// A file selected in the submission form
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub kind: FileKind,
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(kind: FileKind, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            name: name.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ProjectRecord {
        ProjectRecord {
            project_id: id.to_string(),
            title: "Logo design".to_string(),
            category: Category::Design,
            price: 25.0,
            description: String::new(),
            owner_id: "u1".to_string(),
            owner_display_name: "Ada".to_string(),
        }
    }

    #[test]
    fn test_record_wire_names() {
        let value = serde_json::to_value(record("p1")).unwrap();
        assert_eq!(value["projectId"], "p1");
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["displayName"], "Ada");
        assert_eq!(value["category"], "Design");
        assert!(value["price"].is_number());
    }

    #[test]
    fn test_page_pads_missing_url_sets() {
        let page = CatalogPage::new(vec![record("p1"), record("p2")], vec![vec![]]);
        assert_eq!(page.asset_urls().len(), 2);
        assert!(page.asset_urls()[1].is_empty());
    }

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(FileKind::Image.content_type("a.PNG"), Some("image/png"));
        assert_eq!(FileKind::Video.content_type("clip.mov"), Some("video/quicktime"));
        assert_eq!(FileKind::Document.content_type("noext"), None);
    }
}
