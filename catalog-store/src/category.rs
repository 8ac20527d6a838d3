use serde::{Deserialize, Serialize};

/// Marketplace category. The label doubles as the document collection name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "Art")]
    Art,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Consulting")]
    Consulting,
    #[serde(rename = "Design")]
    Design,
    #[serde(rename = "Digital Marketing")]
    DigitalMarketing,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Videography")]
    Videography,
    #[serde(rename = "Virtual Reality")]
    VirtualReality,
    #[serde(rename = "Web Development")]
    WebDevelopment,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::Art => "Art",
            Category::Business => "Business",
            Category::Consulting => "Consulting",
            Category::Design => "Design",
            Category::DigitalMarketing => "Digital Marketing",
            Category::Education => "Education",
            Category::Videography => "Videography",
            Category::VirtualReality => "Virtual Reality",
            Category::WebDevelopment => "Web Development",
        }
    }

    /// Parses a label, ignoring case and surrounding whitespace
    pub fn from_str(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Collection that holds the category-scoped copy of each record
    pub fn collection(&self) -> &'static str {
        self.as_str()
    }

    /// All categories in display order
    pub fn all() -> &'static [Category] {
        static ALL: [Category; 10] = [
            Category::Ai,
            Category::Art,
            Category::Business,
            Category::Consulting,
            Category::Design,
            Category::DigitalMarketing,
            Category::Education,
            Category::Videography,
            Category::VirtualReality,
            Category::WebDevelopment,
        ];
        &ALL
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_ignores_case() {
        assert_eq!(Category::from_str("ai"), Some(Category::Ai));
        assert_eq!(
            Category::from_str(" web development "),
            Some(Category::WebDevelopment)
        );
        assert_eq!(Category::from_str("Cooking"), None);
        assert_eq!(Category::from_str(""), None);
    }

    #[test]
    fn test_labels_round_trip() {
        for category in Category::all() {
            assert_eq!(Category::from_str(category.as_str()), Some(*category));
        }
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Category::VirtualReality).unwrap();
        assert_eq!(json, "\"Virtual Reality\"");
    }
}
