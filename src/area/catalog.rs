//! Area catalog: display names to listing-path codes

use crate::area::prefectures::PREFECTURES;
use crate::area::{AreaError, AreaOptions, AreaSelection, ResolvedArea, NATIONWIDE};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// A prefecture and its path code
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Prefecture {
    pub name: String,
    pub code: String,
}

/// A middle area (city or district group) inside a prefecture
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MiddleArea {
    pub prefecture: String,
    pub name: String,
    pub code: String,
}

/// A small area (station or neighbourhood) inside a middle area
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmallArea {
    pub middle: String,
    pub name: String,
    pub code: String,
}

/// On-disk catalog layout
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    middle: Vec<MiddleArea>,
    #[serde(default)]
    small: Vec<SmallArea>,
}

/// Lookup table for the three-level area hierarchy
///
/// Prefectures are built in. Middle and small areas are loaded from a TOML
/// file because the site has several thousand of them:
///
/// ```toml
/// [[middle]]
/// prefecture = "東京都"
/// name = "銀座・新橋・有楽町"
/// code = "A1301"
///
/// [[small]]
/// middle = "銀座・新橋・有楽町"
/// name = "銀座"
/// code = "A130101"
/// ```
#[derive(Debug, Clone)]
pub struct AreaCatalog {
    prefectures: Vec<Prefecture>,
    middle: Vec<MiddleArea>,
    small: Vec<SmallArea>,
}

impl Default for AreaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AreaCatalog {
    /// Catalog with the 47 prefectures and no sub-areas
    pub fn builtin() -> Self {
        let prefectures = PREFECTURES
            .iter()
            .map(|(name, code)| Prefecture {
                name: name.to_string(),
                code: code.to_string(),
            })
            .collect();

        Self {
            prefectures,
            middle: Vec::new(),
            small: Vec::new(),
        }
    }

    /// Built-in prefectures plus the sub-areas in `path`
    pub fn load(path: &Path) -> Result<Self, AreaError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Built-in prefectures plus the sub-areas in a TOML string
    ///
    /// Every middle area must name a built-in prefecture and every small area
    /// must name a middle area from the same file.
    pub fn parse(content: &str) -> Result<Self, AreaError> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut catalog = Self::builtin();

        for entry in &file.middle {
            if catalog.prefecture(&entry.prefecture).is_none() {
                return Err(AreaError::UnknownPrefecture(entry.prefecture.clone()));
            }
        }

        let middle_names: HashSet<&str> = file.middle.iter().map(|m| m.name.as_str()).collect();
        if let Some(orphan) = file
            .small
            .iter()
            .find(|entry| !middle_names.contains(entry.middle.as_str()))
        {
            return Err(AreaError::OrphanSmall {
                middle: orphan.middle.clone(),
                small: orphan.name.clone(),
            });
        }

        catalog.middle = file.middle;
        catalog.small = file.small;

        tracing::debug!(
            "Loaded area catalog: {} middle areas, {} small areas",
            catalog.middle.len(),
            catalog.small.len()
        );

        Ok(catalog)
    }

    /// Looks up a prefecture by display name
    pub fn prefecture(&self, name: &str) -> Option<&Prefecture> {
        self.prefectures.iter().find(|p| p.name == name)
    }

    /// Looks up a middle area by prefecture and display name
    pub fn middle_area(&self, prefecture: &str, name: &str) -> Option<&MiddleArea> {
        self.middle
            .iter()
            .find(|m| m.prefecture == prefecture && m.name == name)
    }

    /// Looks up a small area by its middle area and display name
    pub fn small_area(&self, middle: &str, name: &str) -> Option<&SmallArea> {
        self.small.iter().find(|s| s.middle == middle && s.name == name)
    }

    /// Choices available at each level for the current selection
    ///
    /// Middle choices appear only once a concrete prefecture is selected;
    /// small choices only once a middle area is selected.
    pub fn available_options(&self, selection: &AreaSelection) -> AreaOptions {
        let mut prefectures = vec![NATIONWIDE.to_string()];
        prefectures.extend(self.prefectures.iter().map(|p| p.name.clone()));

        let (middle, small) = match selection {
            AreaSelection::Nationwide => (Vec::new(), Vec::new()),
            AreaSelection::Region {
                prefecture, middle, ..
            } => {
                let middle_options = self
                    .middle
                    .iter()
                    .filter(|m| &m.prefecture == prefecture)
                    .map(|m| m.name.clone())
                    .collect();

                let small_options = match middle {
                    Some(middle) => self
                        .small
                        .iter()
                        .filter(|s| &s.middle == middle)
                        .map(|s| s.name.clone())
                        .collect(),
                    None => Vec::new(),
                };

                (middle_options, small_options)
            }
        };

        AreaOptions {
            prefectures,
            middle,
            small,
        }
    }

    /// Maps a selection to listing-path codes
    pub fn resolve(&self, selection: &AreaSelection) -> Result<ResolvedArea, AreaError> {
        let AreaSelection::Region {
            prefecture,
            middle,
            small,
        } = selection
        else {
            return Ok(ResolvedArea::nationwide());
        };

        let prefecture_entry = self
            .prefecture(prefecture)
            .ok_or_else(|| AreaError::UnknownPrefecture(prefecture.clone()))?;

        let middle_code = match middle {
            Some(name) => Some(
                self.middle_area(prefecture, name)
                    .ok_or_else(|| AreaError::UnknownMiddle {
                        prefecture: prefecture.clone(),
                        middle: name.clone(),
                    })?
                    .code
                    .clone(),
            ),
            None => None,
        };

        let small_code = match (middle, small) {
            (Some(middle), Some(name)) => Some(
                self.small_area(middle, name)
                    .ok_or_else(|| AreaError::UnknownSmall {
                        middle: middle.clone(),
                        small: name.clone(),
                    })?
                    .code
                    .clone(),
            ),
            (None, Some(name)) => return Err(AreaError::MissingParent(name.clone())),
            (_, None) => None,
        };

        Ok(ResolvedArea {
            area_code: prefecture_entry.code.clone(),
            middle_code,
            small_code,
        })
    }
}
