//! Listing type definitions

use serde::{Deserialize, Deserializer, Serialize};

/// Read a string field that providers may send as `null`
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Provider-agnostic search hit, before any price extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl RawSearchResult {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Marketplace a listing was found on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    #[serde(rename = "eBay")]
    Ebay,
    Mercari,
    Amazon,
    Facebook,
    #[default]
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ebay => "eBay",
            Self::Mercari => "Mercari",
            Self::Amazon => "Amazon",
            Self::Facebook => "Facebook",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Item condition as advertised in the listing text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Condition {
    New,
    Good,
    Fair,
    #[default]
    Used,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Used => "Used",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether the listing is still for sale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ListingStatus {
    #[default]
    Active,
    Sold,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Sold => "Sold",
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A priced marketplace listing.
///
/// The price is always strictly positive: [`Listing::new`] refuses to build
/// a listing without one, and the fields are only reachable through getters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    platform: Platform,
    price: f64,
    condition: Condition,
    status: ListingStatus,
    url: String,
    title: String,
}

impl Listing {
    /// Create a listing, or `None` when the price is not a positive number
    pub fn new(
        platform: Platform,
        price: f64,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Option<Self> {
        if !price.is_finite() || price <= 0.0 {
            return None;
        }

        Some(Self {
            platform,
            price,
            condition: Condition::default(),
            status: ListingStatus::default(),
            url: url.into(),
            title: title.into(),
        })
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Price in USD
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn status(&self) -> ListingStatus {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}
