//! Storage path conventions
//!
//! Document store layout:
//! ```text
//! users/
//! └── students/
//!     └── <owner-id>/
//!         └── <project-id>      # owner-scoped copy
//! <Category>/
//! └── <project-id>              # category-scoped copy
//! ```
//!
//! Object storage layout:
//! ```text
//! <project-id>/
//! ├── images/<file>
//! ├── videos/<file>
//! └── documents/<file>
//! ```

use crate::category::Category;
use crate::models::FileKind;
use std::collections::HashSet;

/// Root collection for owner-scoped records
pub const USERS_COLLECTION: &str = "users";

/// Document below `users` grouping all sellers
pub const STUDENTS_DOC: &str = "students";

/// Owner-scoped record path
pub fn owner_record_path(owner_id: &str, project_id: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        USERS_COLLECTION, STUDENTS_DOC, owner_id, project_id
    )
}

/// Category-scoped record path
pub fn category_record_path(category: Category, project_id: &str) -> String {
    format!("{}/{}", category.collection(), project_id)
}

/// Prefix listed to find a project's assets of one kind (with trailing slash)
pub fn asset_prefix(project_id: &str, kind: FileKind) -> String {
    format!("{}/{}/", project_id, kind.folder())
}

/// Object key of an uploaded file
pub fn asset_key(project_id: &str, kind: FileKind, file_name: &str) -> String {
    format!("{}{}", asset_prefix(project_id, kind), base_name(file_name))
}

/// Object key of an uploaded file that is not yet in `taken`.
///
/// Files whose names only differ in their directories would share a key;
/// later ones get a numeric suffix before the extension (`photo-1.png`).
pub fn unique_asset_key(
    project_id: &str,
    kind: FileKind,
    file_name: &str,
    taken: &HashSet<String>,
) -> String {
    let key = asset_key(project_id, kind, file_name);
    if !taken.contains(&key) {
        return key;
    }

    let name = base_name(file_name);
    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let prefix = asset_prefix(project_id, kind);
    (1..)
        .map(|n| format!("{}{}-{}{}", prefix, stem, n, extension))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(key)
}

/// Public URL of an object in an S3 bucket
pub fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Final path component of a client-supplied file name
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_record_path() {
        assert_eq!(owner_record_path("u1", "p1"), "users/students/u1/p1");
    }

    #[test]
    fn test_category_record_path() {
        let path = category_record_path(Category::WebDevelopment, "p1");
        assert_eq!(path, "Web Development/p1");
    }

    #[test]
    fn test_asset_key_uses_kind_folder() {
        assert_eq!(asset_key("p1", FileKind::Image, "x.png"), "p1/images/x.png");
        assert_eq!(asset_key("p1", FileKind::Video, "a.mp4"), "p1/videos/a.mp4");
        assert_eq!(
            asset_key("p1", FileKind::Document, "brief.pdf"),
            "p1/documents/brief.pdf"
        );
    }

    #[test]
    fn test_asset_key_strips_directories() {
        assert_eq!(
            asset_key("p1", FileKind::Image, "C:\\photos\\x.png"),
            "p1/images/x.png"
        );
        assert_eq!(asset_key("p1", FileKind::Image, "../../x.png"), "p1/images/x.png");
    }

    #[test]
    fn test_unique_asset_key_suffixes_collisions() {
        let mut taken = HashSet::new();
        let first = unique_asset_key("p1", FileKind::Image, "front/photo.png", &taken);
        taken.insert(first.clone());
        let second = unique_asset_key("p1", FileKind::Image, "back/photo.png", &taken);
        taken.insert(second.clone());
        let third = unique_asset_key("p1", FileKind::Image, "photo.png", &taken);

        assert_eq!(first, "p1/images/photo.png");
        assert_eq!(second, "p1/images/photo-1.png");
        assert_eq!(third, "p1/images/photo-2.png");
    }

    #[test]
    fn test_unique_asset_key_without_extension() {
        let taken = HashSet::from(["p1/documents/README".to_string()]);
        assert_eq!(
            unique_asset_key("p1", FileKind::Document, "README", &taken),
            "p1/documents/README-1"
        );
        let taken = HashSet::from(["p1/images/.hidden".to_string()]);
        assert_eq!(
            unique_asset_key("p1", FileKind::Image, ".hidden", &taken),
            "p1/images/.hidden-1"
        );
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("bucket", "p1/images/x.png"),
            "https://bucket.s3.amazonaws.com/p1/images/x.png"
        );
    }
}
