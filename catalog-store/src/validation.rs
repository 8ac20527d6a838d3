//! Submission form validation
//!
//! Rules:
//! - title: required, 5 to 75 characters
//! - category: required, one of [`Category::all`]
//! - price: required, numeric, not negative
//! - description: optional, at least 10 characters when given
//! - files: extension and size limits per [`FileKind`]

use crate::category::Category;
use crate::models::{FileKind, UploadFile};
use std::collections::BTreeMap;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 75;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Form field an error is reported on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Category,
    Price,
    Description,
    Images,
    Videos,
    Documents,
}

impl FormField {
    pub fn for_kind(kind: FileKind) -> Self {
        match kind {
            FileKind::Image => FormField::Images,
            FileKind::Video => FormField::Videos,
            FileKind::Document => FormField::Documents,
        }
    }
}

/// Field-level validation messages; at most one message per field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` unless the field already has an error
    pub fn add(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.add(field, message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FormField, &String)> {
        self.0.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{:?}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Raw form values as entered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub category: String,
    pub price: String,
    pub description: String,
}

/// Form values that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProject {
    pub title: String,
    pub category: Category,
    pub price: f64,
    pub description: String,
}

impl ProjectDraft {
    /// Validates every field and collects all errors
    pub fn validate(&self) -> Result<ValidProject, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        let title_len = title.chars().count();
        if title.is_empty() {
            errors.add(FormField::Title, "Required");
        } else if title_len < TITLE_MIN_CHARS {
            errors.add(FormField::Title, "Too Short!");
        } else if title_len > TITLE_MAX_CHARS {
            errors.add(FormField::Title, "Too Long!");
        }

        let category = if self.category.trim().is_empty() {
            errors.add(FormField::Category, "Required");
            None
        } else {
            let parsed = Category::from_str(&self.category);
            if parsed.is_none() {
                errors.add(FormField::Category, "Unknown category");
            }
            parsed
        };

        let price = match parse_price(&self.price) {
            Ok(price) => Some(price),
            Err(message) => {
                errors.add(FormField::Price, message);
                None
            }
        };

        let description = self.description.trim();
        if !description.is_empty() && description.chars().count() < DESCRIPTION_MIN_CHARS {
            errors.add(FormField::Description, "Too Short");
        }

        match (category, price) {
            (Some(category), Some(price)) if errors.is_empty() => Ok(ValidProject {
                title: title.to_string(),
                category,
                price,
                description: description.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Parses a price entered as text ("100", "12.50")
fn parse_price(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Required");
    }
    let price: f64 = raw.parse().map_err(|_| "Must be a number")?;
    if !price.is_finite() {
        return Err("Must be a number");
    }
    if price < 0.0 {
        return Err("Must not be negative");
    }
    Ok(price)
}

/// Checks extension and size limits of the selected files
pub fn validate_files(files: &[UploadFile]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for file in files {
        let field = FormField::for_kind(file.kind);
        let extension_ok = file
            .extension()
            .map(|ext| file.kind.extensions().contains(&ext.as_str()))
            .unwrap_or(false);

        if !extension_ok {
            errors.add(
                field,
                format!(
                    "{}: unsupported file type (allowed: {})",
                    file.name,
                    file.kind.extensions().join(", ")
                ),
            );
        } else if file.bytes.len() > file.kind.max_bytes() {
            errors.add(
                field,
                format!(
                    "{}: exceeds {} MB",
                    file.name,
                    file.kind.max_bytes() / (1024 * 1024)
                ),
            );
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            title: "Build me a website".to_string(),
            category: "Web Development".to_string(),
            price: "100".to_string(),
            description: "Full responsive site build".to_string(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let valid = draft().validate().unwrap();
        assert_eq!(valid.category, Category::WebDevelopment);
        assert_eq!(valid.price, 100.0);
    }

    #[test]
    fn test_title_bounds() {
        let mut d = draft();
        d.title = "abcd".to_string();
        assert_eq!(d.validate().unwrap_err().get(FormField::Title), Some("Too Short!"));

        d.title = "x".repeat(76);
        assert_eq!(d.validate().unwrap_err().get(FormField::Title), Some("Too Long!"));

        d.title = "x".repeat(75);
        assert!(d.validate().is_ok());

        d.title = "   ".to_string();
        assert_eq!(d.validate().unwrap_err().get(FormField::Title), Some("Required"));
    }

    #[test]
    fn test_price_rules() {
        let mut d = draft();
        d.price = "25".to_string();
        assert_eq!(d.validate().unwrap().price, 25.0);

        d.price = String::new();
        assert_eq!(d.validate().unwrap_err().get(FormField::Price), Some("Required"));

        d.price = "twenty".to_string();
        assert_eq!(
            d.validate().unwrap_err().get(FormField::Price),
            Some("Must be a number")
        );

        d.price = "-1".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_description_optional_but_min_length() {
        let mut d = draft();
        d.description = String::new();
        assert!(d.validate().is_ok());

        d.description = "short".to_string();
        assert_eq!(
            d.validate().unwrap_err().get(FormField::Description),
            Some("Too Short")
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = ProjectDraft::default().validate().unwrap_err();
        assert_eq!(errors.get(FormField::Title), Some("Required"));
        assert_eq!(errors.get(FormField::Category), Some("Required"));
        assert_eq!(errors.get(FormField::Price), Some("Required"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_file_limits() {
        let files = vec![
            UploadFile::new(FileKind::Image, "ok.png", vec![0; 16]),
            UploadFile::new(FileKind::Video, "clip.avi", vec![0; 16]),
            UploadFile::new(FileKind::Document, "big.pdf", vec![0; 15 * 1024 * 1024 + 1]),
        ];
        let errors = validate_files(&files);
        assert!(errors.get(FormField::Images).is_none());
        assert!(errors.get(FormField::Videos).unwrap().contains("unsupported"));
        assert!(errors.get(FormField::Documents).unwrap().contains("exceeds 15 MB"));
    }
}
