// src/catalog/brands.rs
// Static brand registry: URL slug -> display title, accent colour and tagline.

use serde::{Deserialize, Serialize};

/// Accent colours a brand page may use. Orange is the default.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Orange,
    Blue,
    Yellow,
    Green,
    Red,
    Fuchsia,
    Teal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandTheme {
    pub slug: &'static str,
    /// Matches the brand name stored on items (compared case-insensitively).
    pub title: &'static str,
    pub color: ThemeColor,
    pub subtitle: &'static str,
}

pub const BRAND_THEMES: &[BrandTheme] = &[
    BrandTheme { slug: "ktm", title: "KTM", color: ThemeColor::Orange, subtitle: "Ready to Race. Prestazioni senza compromessi." },
    BrandTheme { slug: "husqvarna", title: "Husqvarna", color: ThemeColor::Blue, subtitle: "Pioneering Since 1903. Stile svedese, tecnologia all'avanguardia." },
    BrandTheme { slug: "voge", title: "Voge", color: ThemeColor::Yellow, subtitle: "Spark Your Dream. Qualità premium, accessibile a tutti." },
    BrandTheme { slug: "kymco", title: "Kymco", color: ThemeColor::Green, subtitle: "Win My Heart. Soluzioni di mobilità urbana affidabili e innovative." },
    BrandTheme { slug: "beta", title: "Beta", color: ThemeColor::Red, subtitle: "The Play Bike. Eccellenza italiana nell'enduro e trial." },
    BrandTheme { slug: "fantic", title: "Fantic", color: ThemeColor::Fuchsia, subtitle: "Caballero e non solo. Lo stile italiano incontra le prestazioni." },
    BrandTheme { slug: "honda", title: "Honda", color: ThemeColor::Red, subtitle: "The Power of Dreams. Tecnologia e affidabilità giapponese." },
    BrandTheme { slug: "ducati", title: "Ducati", color: ThemeColor::Red, subtitle: "Style, Sophistication, Performance. L'eccellenza italiana." },
    BrandTheme { slug: "bmw", title: "BMW", color: ThemeColor::Blue, subtitle: "Make Life a Ride. Tecnologia tedesca e spirito d'avventura." },
    BrandTheme { slug: "piaggio", title: "Piaggio", color: ThemeColor::Blue, subtitle: "Move Beautifully. L'icona della mobilità urbana italiana." },
];

pub fn lookup(slug: &str) -> Option<&'static BrandTheme> {
    let slug = slug.trim().to_lowercase();
    BRAND_THEMES.iter().find(|t| t.slug == slug)
}

/// Accent for an item's brand name, orange when the brand has no page.
pub fn color_for_brand(brand: &str) -> ThemeColor {
    lookup(brand).map_or(ThemeColor::Orange, |t| t.color)
}

/// Brands with at least one new bike, in the order they first appear. Feeds the brand menu.
pub fn brands_with_new_bikes(items: &[super::Motorcycle]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items.iter().filter(|m| !m.is_used()) {
        if !seen.iter().any(|b| b.eq_ignore_ascii_case(&item.brand)) {
            seen.push(item.brand.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{moto, used};

    #[test]
    fn lookup_is_case_insensitive() {
        let theme = lookup("KTM").unwrap();
        assert_eq!(theme.title, "KTM");
        assert_eq!(theme.color, ThemeColor::Orange);
        assert_eq!(lookup(" Husqvarna ").map(|t| t.color), Some(ThemeColor::Blue));
    }

    #[test]
    fn unknown_slug_has_no_page() {
        assert!(lookup("harley").is_none());
    }

    #[test]
    fn colour_fallback_is_orange() {
        assert_eq!(color_for_brand("Kymco"), ThemeColor::Green);
        assert_eq!(color_for_brand("Moto Guzzi"), ThemeColor::Orange);
    }

    #[test]
    fn new_bike_brands_skip_used_only_brands() {
        let items = vec![
            moto("a", "KTM", 2023, 9000, Some(390)),
            used(moto("b", "Ducati", 2016, 7000, Some(821)), 30000),
            moto("c", "Voge", 2024, 5000, Some(525)),
            moto("d", "ktm", 2024, 9500, Some(390)),
        ];
        assert_eq!(brands_with_new_bikes(&items), vec!["KTM".to_string(), "Voge".to_string()]);
    }
}
