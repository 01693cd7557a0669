// src/catalog/mod.rs
// Catalog core: the item model, bounds derivation, the filter engine and the dual-range selector.

pub mod bounds;
pub mod brands;
pub mod filter;
pub mod range;

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::errors::ShowroomError;

pub use bounds::Bounds;
pub use filter::{Condition, FilterEngine, ViewContext};
pub use range::{DualRange, Handle};

/// Inclusive `(low, high)` pair used by every numeric filter.
pub type Range = (i64, i64);

/// How many featured items the homepage strip shows.
pub const FEATURED_LIMIT: usize = 6;

// CMS drafts export unset text fields as `null`.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single catalog entry as exported by the CMS.
///
/// `displacement` and `kilometers` may be absent or zero; both mean "not applicable".
/// `title` and `slug` may be absent or `null` and then read as empty.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Motorcycle {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    pub brand: String,
    pub year: i32,
    pub price: u32,
    #[serde(default)]
    pub displacement: Option<u32>,
    #[serde(default)]
    pub is_used: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub kilometers: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub catchphrase: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Motorcycle {
    pub fn is_used(&self) -> bool {
        self.is_used.unwrap_or(false)
    }

    pub fn is_featured(&self) -> bool {
        self.is_featured.unwrap_or(false)
    }

    /// Displacement in cc, `None` when absent or zero.
    pub fn displacement_cc(&self) -> Option<u32> {
        self.displacement.filter(|cc| *cc > 0)
    }

    /// "12.500 km" for used bikes, "New" otherwise.
    pub fn condition_label(&self) -> String {
        if self.is_used() {
            format!("{} km", format_thousands(u64::from(self.kilometers.unwrap_or(0))))
        } else {
            "New".to_string()
        }
    }

    fn sanitize(&mut self) {
        self.title = strip_ansi_escapes::strip_str(&self.title);
        self.brand = strip_ansi_escapes::strip_str(&self.brand);
        for field in [
            &mut self.description,
            &mut self.catchphrase,
            &mut self.summary,
        ] {
            if let Some(text) = field.as_mut() {
                *text = strip_ansi_escapes::strip_str(text.as_str());
            }
        }
    }
}

/// Numeric filter dimensions shared by bounds, filter state and the sliders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Year,
    Price,
    Displacement,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Year, Dimension::Price, Dimension::Displacement];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Price => "Price",
            Dimension::Displacement => "Displacement",
        }
    }

    pub fn format_value(&self, value: i64) -> String {
        match self {
            Dimension::Year => value.to_string(),
            Dimension::Price => format_price(value),
            Dimension::Displacement => format!("{}cc", value),
        }
    }
}

/// Reads the CMS export at `path`. Items missing a required field reject the whole file.
pub fn load_catalog(path: &Path) -> Result<Vec<Motorcycle>, ShowroomError> {
    info!("Loading catalog from {}", path.display());
    let raw = std::fs::read_to_string(path).map_err(|source| ShowroomError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_catalog(&raw).map_err(|source| ShowroomError::CatalogParse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Catalog loaded: {} motorcycles", items.len());
    Ok(items)
}

pub fn parse_catalog(raw: &str) -> Result<Vec<Motorcycle>, serde_json::Error> {
    let mut items: Vec<Motorcycle> = serde_json::from_str(raw)?;
    for item in items.iter_mut() {
        item.sanitize();
    }
    debug!("Parsed {} catalog entries", items.len());
    Ok(items)
}

/// Items without a slug are never found.
pub fn find_by_slug<'a>(items: &'a [Motorcycle], slug: &str) -> Option<&'a Motorcycle> {
    items.iter().find(|m| !m.slug.is_empty() && m.slug == slug)
}

/// The first `limit` featured items, in catalog order.
pub fn featured<'a>(items: impl IntoIterator<Item = &'a Motorcycle>, limit: usize) -> Vec<&'a Motorcycle> {
    items.into_iter().filter(|m| m.is_featured()).take(limit).collect()
}

/// Italian digit grouping: 12500 -> "12.500".
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn format_price(value: i64) -> String {
    let grouped = format_thousands(value.unsigned_abs());
    if value < 0 {
        format!("-€ {}", grouped)
    } else {
        format!("€ {}", grouped)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Motorcycle;

    pub fn moto(id: &str, brand: &str, year: i32, price: u32, displacement: Option<u32>) -> Motorcycle {
        Motorcycle {
            id: id.to_string(),
            title: format!("{} {}", brand, id),
            slug: id.to_lowercase(),
            brand: brand.to_string(),
            year,
            price,
            displacement,
            is_used: None,
            is_featured: None,
            kilometers: None,
            description: None,
            catchphrase: None,
            summary: None,
            image_url: None,
        }
    }

    pub fn used(mut m: Motorcycle, kilometers: u32) -> Motorcycle {
        m.is_used = Some(true);
        m.kilometers = Some(kilometers);
        m
    }
}
