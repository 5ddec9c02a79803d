//! Area selection for listing crawls
//!
//! The site organises listings as prefecture → middle area → small area. This
//! module turns display names picked by the user into the path codes the URL
//! builder needs, and exposes the cascade of choices a front end offers.

mod catalog;
mod prefectures;

pub use catalog::{AreaCatalog, MiddleArea, Prefecture, SmallArea};

use thiserror::Error;

/// Display name meaning "no area selected"
pub const NATIONWIDE: &str = "全国";

/// Errors raised while resolving an area selection
#[derive(Debug, Error)]
pub enum AreaError {
    #[error("Unknown prefecture: {0}")]
    UnknownPrefecture(String),

    #[error("Unknown middle area '{middle}' in {prefecture}")]
    UnknownMiddle { prefecture: String, middle: String },

    #[error("Unknown small area '{small}' in {middle}")]
    UnknownSmall { middle: String, small: String },

    #[error("Small area '{small}' refers to unknown middle area '{middle}'")]
    OrphanSmall { middle: String, small: String },

    #[error("Sub-area '{0}' selected without its parent area")]
    MissingParent(String),

    #[error("Failed to read area catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse area catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Area chosen for a crawl, by display name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AreaSelection {
    #[default]
    Nationwide,
    Region {
        prefecture: String,
        middle: Option<String>,
        small: Option<String>,
    },
}

impl AreaSelection {
    /// Builds a selection from optional display names
    ///
    /// No prefecture, or the [`NATIONWIDE`] name, selects the whole country.
    /// Sub-areas require their parent level.
    pub fn from_names(
        prefecture: Option<&str>,
        middle: Option<&str>,
        small: Option<&str>,
    ) -> Result<Self, AreaError> {
        let prefecture = prefecture.filter(|p| !p.is_empty() && *p != NATIONWIDE);
        let middle = middle.filter(|m| !m.is_empty());
        let small = small.filter(|s| !s.is_empty());

        match (prefecture, middle, small) {
            (None, None, None) => Ok(Self::Nationwide),
            (None, Some(orphan), _) | (None, None, Some(orphan)) => {
                Err(AreaError::MissingParent(orphan.to_string()))
            }
            (Some(_), None, Some(orphan)) => Err(AreaError::MissingParent(orphan.to_string())),
            (Some(prefecture), middle, small) => Ok(Self::Region {
                prefecture: prefecture.to_string(),
                middle: middle.map(str::to_string),
                small: small.map(str::to_string),
            }),
        }
    }

    /// Display names used in output filenames
    pub fn name_parts(&self) -> Vec<&str> {
        match self {
            Self::Nationwide => vec![NATIONWIDE],
            Self::Region {
                prefecture,
                middle,
                small,
            } => [Some(prefecture.as_str()), middle.as_deref(), small.as_deref()]
                .into_iter()
                .flatten()
                .collect(),
        }
    }
}

/// Listing-path codes for a selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedArea {
    /// Prefecture code, empty for nationwide
    pub area_code: String,
    pub middle_code: Option<String>,
    pub small_code: Option<String>,
}

impl ResolvedArea {
    pub fn nationwide() -> Self {
        Self::default()
    }
}

/// Choices available at each level of the area cascade
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AreaOptions {
    pub prefectures: Vec<String>,
    pub middle: Vec<String>,
    pub small: Vec<String>,
}
