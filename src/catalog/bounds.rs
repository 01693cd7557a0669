// src/catalog/bounds.rs
// Derives the numeric extent of each filter dimension from the item collection.

use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use super::{Dimension, Motorcycle, Range};

const YEAR_WIDENING: i64 = 1;
const PRICE_WIDENING: i64 = 1000;
const DISPLACEMENT_WIDENING: i64 = 100;

const FALLBACK_YEAR_MIN: i64 = 2000;
const FALLBACK_PRICE: Span = Span { min: 0, max: 50_000 };
// Empty catalog vs. catalog whose items all lack a displacement.
const FALLBACK_DISPLACEMENT_EMPTY: Span = Span { min: 50, max: 2000 };
const FALLBACK_DISPLACEMENT: Span = Span { min: 50, max: 1200 };

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub min: i64,
    pub max: i64,
}

impl Span {
    fn widened(min: i64, max: i64, widening: i64) -> Self {
        if min == max {
            Span { min, max: min + widening }
        } else {
            Span { min, max }
        }
    }

    fn over(values: impl Iterator<Item = i64>, widening: i64) -> Option<Self> {
        let (min, max) = values.fold(None, |acc: Option<(i64, i64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
        Some(Self::widened(min, max, widening))
    }

    pub fn as_range(&self) -> Range {
        (self.min, self.max)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub year: Span,
    pub price: Span,
    pub displacement: Span,
}

impl Bounds {
    /// Used when the catalog is empty; not derived from data.
    pub fn fallback() -> Self {
        let this_year = i64::from(chrono::Local::now().year());
        Bounds {
            year: Span { min: FALLBACK_YEAR_MIN, max: this_year.max(FALLBACK_YEAR_MIN + YEAR_WIDENING) },
            price: FALLBACK_PRICE,
            displacement: FALLBACK_DISPLACEMENT_EMPTY,
        }
    }

    pub fn from_items(items: &[Motorcycle]) -> Self {
        if items.is_empty() {
            debug!("Empty catalog, using fallback bounds");
            return Self::fallback();
        }

        // Non-empty, so both folds yield a value.
        let year = Span::over(items.iter().map(|m| i64::from(m.year)), YEAR_WIDENING)
            .unwrap_or(Self::fallback().year);
        let price = Span::over(items.iter().map(|m| i64::from(m.price)), PRICE_WIDENING)
            .unwrap_or(FALLBACK_PRICE);
        let displacement = Span::over(
            items.iter().filter_map(|m| m.displacement_cc()).map(i64::from),
            DISPLACEMENT_WIDENING,
        )
        .unwrap_or_else(|| {
            debug!("No item carries a displacement, using fallback displacement bounds");
            FALLBACK_DISPLACEMENT
        });

        Bounds { year, price, displacement }
    }

    pub fn get(&self, dimension: Dimension) -> Span {
        match dimension {
            Dimension::Year => self.year,
            Dimension::Price => self.price,
            Dimension::Displacement => self.displacement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::moto;
    use proptest::prelude::*;

    #[test]
    fn empty_collection_uses_fallback() {
        let b = Bounds::from_items(&[]);
        assert_eq!(b, Bounds::fallback());
        assert_eq!(b.year.min, 2000);
        assert_eq!(b.price, Span { min: 0, max: 50_000 });
        assert_eq!(b.displacement, Span { min: 50, max: 2000 });
    }

    #[test]
    fn two_item_scenario() {
        let items = vec![
            moto("k", "KTM", 2020, 5000, Some(250)),
            moto("h", "Honda", 2023, 12000, Some(0)),
        ];
        let b = Bounds::from_items(&items);
        assert_eq!(b.year, Span { min: 2020, max: 2023 });
        assert_eq!(b.price, Span { min: 5000, max: 12000 });
        assert_eq!(b.displacement, Span { min: 250, max: 350 });
    }

    #[test]
    fn degenerate_year_and_price_are_widened() {
        let items = vec![moto("a", "BMW", 2022, 9000, None), moto("b", "BMW", 2022, 9000, None)];
        let b = Bounds::from_items(&items);
        assert_eq!(b.year, Span { min: 2022, max: 2023 });
        assert_eq!(b.price, Span { min: 9000, max: 10000 });
    }

    #[test]
    fn missing_displacements_use_fallback() {
        let items = vec![moto("a", "KYMCO", 2018, 1500, None), moto("b", "KYMCO", 2019, 1700, Some(0))];
        assert_eq!(Bounds::from_items(&items).displacement, Span { min: 50, max: 1200 });
    }

    #[test]
    fn zero_displacement_does_not_pull_min_down() {
        let items = vec![moto("a", "KTM", 2021, 6000, Some(0)), moto("b", "KTM", 2021, 7000, Some(390)), moto("c", "KTM", 2021, 8000, Some(690))];
        assert_eq!(Bounds::from_items(&items).displacement, Span { min: 390, max: 690 });
    }

    proptest! {
        #[test]
        fn bounds_are_ordered_and_never_degenerate(
            rows in prop::collection::vec((1990i32..2030, 0u32..100_000, prop::option::of(0u32..2000)), 1..40)
        ) {
            let items: Vec<Motorcycle> = rows
                .iter()
                .enumerate()
                .map(|(i, (year, price, cc))| moto(&i.to_string(), "KTM", *year, *price, *cc))
                .collect();
            let b = Bounds::from_items(&items);
            for span in [b.year, b.price, b.displacement] {
                prop_assert!(span.min < span.max);
            }
            let inside = |span: Span, value: i64| span.min <= value && value <= span.max;
            for m in &items {
                prop_assert!(inside(b.year, i64::from(m.year)));
                prop_assert!(inside(b.price, i64::from(m.price)));
                if let Some(cc) = m.displacement_cc() {
                    prop_assert!(inside(b.displacement, i64::from(cc)));
                }
            }
        }
    }
}
