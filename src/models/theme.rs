use serde::{Deserialize, Serialize};

/// App-wide color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Page background and text color
    pub fn page_style(&self) -> &'static str {
        match self {
            Theme::Light => "background: #f5f5f5; color: #333;",
            Theme::Dark => "background: #1e1e1e; color: #eee;",
        }
    }

    /// Card background
    pub fn card_style(&self) -> &'static str {
        match self {
            Theme::Light => "background: #ffffff; color: #333;",
            Theme::Dark => "background: #2b2b2b; color: #eee;",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_conversion() {
        assert_eq!(Theme::from_str("dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_str(" Light "), Some(Theme::Light));
        assert_eq!(Theme::from_str("sepia"), None);
        assert_eq!(Theme::Dark.as_str(), "dark");
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
