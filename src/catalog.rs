//! Read-only tables of the categories and languages the news API accepts.
//!
//! The tables are built once, on first use, and shared for the life of the
//! process. [`Category`] and [`Language`] are the typed keys; their display
//! names and flags are looked up here rather than carried on the enums.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::HeadlineError;

/// Headline categories understood by the `top-headlines` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

/// Article languages, as two-letter codes the API expects.
///
/// `Ud` is the API's code for Urdu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ar,
    De,
    En,
    Es,
    Fr,
    He,
    It,
    Nl,
    No,
    Pt,
    Ru,
    Sv,
    Ud,
    Zh,
}

/// Display metadata for one language.
#[derive(Debug)]
pub struct LanguageInfo {
    pub name: &'static str,
    pub flag: &'static str,
}

/// Every category, in display order.
pub static CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| Category::value_variants().to_vec());

static LANGUAGES: Lazy<HashMap<Language, LanguageInfo>> = Lazy::new(|| {
    [
        (Language::Ar, "Arabic", "🇸🇦"),
        (Language::De, "German", "🇩🇪"),
        (Language::En, "English", "🇺🇸"),
        (Language::Es, "Spanish", "🇪🇸"),
        (Language::Fr, "French", "🇫🇷"),
        (Language::He, "Hebrew", "🇮🇱"),
        (Language::It, "Italian", "🇮🇹"),
        (Language::Nl, "Dutch", "🇳🇱"),
        (Language::No, "Norwegian", "🇳🇴"),
        (Language::Pt, "Portuguese", "🇵🇹"),
        (Language::Ru, "Russian", "🇷🇺"),
        (Language::Sv, "Swedish", "🇸🇪"),
        (Language::Ud, "Urdu", "🇵🇰"),
        (Language::Zh, "Chinese", "🇨🇳"),
    ]
    .into_iter()
    .map(|(language, name, flag)| (language, LanguageInfo { name, flag }))
    .collect()
});

impl Category {
    /// The value sent as the `category` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl Language {
    /// The value sent as the `language` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::De => "de",
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::He => "he",
            Language::It => "it",
            Language::Nl => "nl",
            Language::No => "no",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Sv => "sv",
            Language::Ud => "ud",
            Language::Zh => "zh",
        }
    }

    /// Display name and flag for this language.
    pub fn info(&self) -> &'static LanguageInfo {
        // Every variant is inserted above.
        &LANGUAGES[self]
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn flag(&self) -> &'static str {
        self.info().flag
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = HeadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Category as ValueEnum>::from_str(s.trim(), true).map_err(|_| {
            HeadlineError::InvalidInput(format!(
                "unknown category '{}' (expected one of: {})",
                s.trim(),
                CATEGORIES.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
            ))
        })
    }
}

impl FromStr for Language {
    type Err = HeadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Language as ValueEnum>::from_str(s.trim(), true).map_err(|_| {
            HeadlineError::InvalidInput(format!("unknown language code '{}'", s.trim()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_categories() {
        assert_eq!(CATEGORIES.len(), 7);
        assert_eq!(CATEGORIES[0], Category::Business);
        assert_eq!(CATEGORIES[6], Category::Technology);
    }

    #[test]
    fn test_every_language_has_info() {
        for language in Language::value_variants() {
            let info = language.info();
            assert!(!info.name.is_empty());
            assert!(!info.flag.is_empty());
        }
        assert_eq!(Language::value_variants().len(), 14);
    }

    #[test]
    fn test_language_lookup() {
        assert_eq!(Language::En.name(), "English");
        assert_eq!(Language::Ud.name(), "Urdu");
        assert_eq!(Language::De.flag(), "🇩🇪");
    }

    #[test]
    fn test_parse_category_case_insensitive() {
        assert_eq!("Technology".parse::<Category>().unwrap(), Category::Technology);
        assert_eq!(" sports ".parse::<Category>().unwrap(), Category::Sports);
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("NO".parse::<Language>().unwrap(), Language::No);
        assert!("xx".parse::<Language>().is_err());
    }

    #[test]
    fn test_codes_match_value_enum_names() {
        for language in Language::value_variants() {
            let pv = language.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), language.code());
        }
        for category in Category::value_variants() {
            let pv = category.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), category.as_str());
        }
    }
}
