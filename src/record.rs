//! Shop records produced by the detail extractor
//!
//! A [`ShopRecord`] always carries every field. Missing data is represented
//! by the [`NO_DATA`] sentinel, never by an empty or absent value.

use std::fmt;

/// Placeholder written whenever a field could not be extracted
pub const NO_DATA: &str = "記載なし";

/// The fixed set of fields, in output column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopField {
    Name,
    Genre,
    Address,
    OpenedDate,
    Phone,
    DetailUrl,
    Hours,
    SocialLink,
    Service,
}

impl ShopField {
    /// All fields in column order
    pub const ALL: [ShopField; 9] = [
        Self::Name,
        Self::Genre,
        Self::Address,
        Self::OpenedDate,
        Self::Phone,
        Self::DetailUrl,
        Self::Hours,
        Self::SocialLink,
        Self::Service,
    ];

    /// Column header used in the output file
    pub fn header(&self) -> &'static str {
        match self {
            Self::Name => "店舗名",
            Self::Genre => "ジャンル",
            Self::Address => "住所",
            Self::OpenedDate => "オープン日",
            Self::Phone => "電話番号",
            Self::DetailUrl => "URL",
            Self::Hours => "営業時間/定休日",
            Self::SocialLink => "公式アカウント",
            Self::Service => "サービス",
        }
    }
}

impl fmt::Display for ShopField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One restaurant, extracted from exactly one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopRecord {
    pub name: String,
    pub genre: String,
    pub address: String,
    pub opened_date: String,
    pub phone: String,
    pub detail_url: String,
    pub hours: String,
    pub social_link: String,
    pub service: String,
}

impl ShopRecord {
    /// Builds the all-sentinel record used when a detail page could not be
    /// fetched. Only the URL is kept.
    pub fn empty(detail_url: &str) -> Self {
        Self {
            name: NO_DATA.to_string(),
            genre: NO_DATA.to_string(),
            address: NO_DATA.to_string(),
            opened_date: NO_DATA.to_string(),
            phone: NO_DATA.to_string(),
            detail_url: detail_url.to_string(),
            hours: NO_DATA.to_string(),
            social_link: NO_DATA.to_string(),
            service: NO_DATA.to_string(),
        }
    }

    /// Returns the value of a single field
    pub fn get(&self, field: ShopField) -> &str {
        match field {
            ShopField::Name => &self.name,
            ShopField::Genre => &self.genre,
            ShopField::Address => &self.address,
            ShopField::OpenedDate => &self.opened_date,
            ShopField::Phone => &self.phone,
            ShopField::DetailUrl => &self.detail_url,
            ShopField::Hours => &self.hours,
            ShopField::SocialLink => &self.social_link,
            ShopField::Service => &self.service,
        }
    }

    /// Returns all values in column order
    pub fn values(&self) -> [&str; 9] {
        ShopField::ALL.map(|field| self.get(field))
    }

    /// True if the shop name could not be extracted. Such records are kept
    /// during the crawl but dropped when writing.
    pub fn is_nameless(&self) -> bool {
        self.name == NO_DATA
    }
}
