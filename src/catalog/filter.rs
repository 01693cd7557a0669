// src/catalog/filter.rs
// Filter Engine: owns the user's filter selections and derives the visible items.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::{Bounds, Dimension, Motorcycle, Range};

/// New/used scoping imposed by the hosting page.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Any,
    NewOnly,
    UsedOnly,
}

/// Page-level scoping applied before any user filter. Not mutable by the user.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ViewContext {
    pub brand: Option<String>,
    pub condition: Condition,
}

impl ViewContext {
    /// The full catalog: every brand, new and used.
    pub fn catalog() -> Self {
        Self::default()
    }

    /// A brand page lists only that brand's new bikes.
    pub fn brand_page(brand_title: impl Into<String>) -> Self {
        ViewContext {
            brand: Some(brand_title.into()),
            condition: Condition::NewOnly,
        }
    }

    pub fn used_page() -> Self {
        ViewContext {
            brand: None,
            condition: Condition::UsedOnly,
        }
    }

    pub fn is_brand_scoped(&self) -> bool {
        self.brand.is_some()
    }

    /// "KTM - New", "KTM - Used", "Used" or "Catalog".
    pub fn page_title(&self) -> String {
        match (&self.brand, self.condition) {
            (Some(brand), Condition::NewOnly) => format!("{} - New", brand),
            (Some(brand), Condition::UsedOnly) => format!("{} - Used", brand),
            (Some(brand), Condition::Any) => brand.clone(),
            (None, Condition::UsedOnly) => "Used".to_string(),
            (None, _) => "Catalog".to_string(),
        }
    }

    pub fn admits(&self, item: &Motorcycle) -> bool {
        if let Some(brand) = &self.brand {
            if item.brand.to_lowercase() != brand.to_lowercase() {
                return false;
            }
        }
        match self.condition {
            Condition::Any => true,
            Condition::NewOnly => !item.is_used(),
            Condition::UsedOnly => item.is_used(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    pub year_range: Range,
    pub price_range: Range,
    pub displacement_range: Range,
    pub selected_brands: BTreeSet<String>,
}

impl FilterState {
    pub fn from_bounds(bounds: &Bounds) -> Self {
        FilterState {
            search_query: String::new(),
            year_range: bounds.year.as_range(),
            price_range: bounds.price.as_range(),
            displacement_range: bounds.displacement.as_range(),
            selected_brands: BTreeSet::new(),
        }
    }

    pub fn range(&self, dimension: Dimension) -> Range {
        match dimension {
            Dimension::Year => self.year_range,
            Dimension::Price => self.price_range,
            Dimension::Displacement => self.displacement_range,
        }
    }

    fn range_mut(&mut self, dimension: Dimension) -> &mut Range {
        match dimension {
            Dimension::Year => &mut self.year_range,
            Dimension::Price => &mut self.price_range,
            Dimension::Displacement => &mut self.displacement_range,
        }
    }

    fn reset_ranges(&mut self, bounds: &Bounds) {
        for dimension in Dimension::ALL {
            *self.range_mut(dimension) = bounds.get(dimension).as_range();
        }
    }
}

fn within((low, high): Range, value: i64) -> bool {
    low <= value && value <= high
}

/// Case-insensitive substring match against title, brand and description.
/// `query_lower` must already be lowercased; an empty query matches everything.
fn matches_search(item: &Motorcycle, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }
    item.title.to_lowercase().contains(query_lower)
        || item.brand.to_lowercase().contains(query_lower)
        || item
            .description
            .as_ref()
            .map_or(false, |d| d.to_lowercase().contains(query_lower))
}

fn passes(state: &FilterState, query_lower: &str, item: &Motorcycle, context: &ViewContext) -> bool {
    if !context.admits(item) {
        return false;
    }
    if !matches_search(item, query_lower) {
        return false;
    }
    if !context.is_brand_scoped()
        && !state.selected_brands.is_empty()
        && !state.selected_brands.contains(&item.brand)
    {
        return false;
    }
    if !within(state.year_range, i64::from(item.year)) {
        return false;
    }
    if !within(state.price_range, i64::from(item.price)) {
        return false;
    }
    // Absent or zero displacement never fails this check.
    match item.displacement_cc() {
        Some(cc) => within(state.displacement_range, i64::from(cc)),
        None => true,
    }
}

/// Stable filter: the result keeps the collection's relative order.
pub fn compute_visible<'a>(
    state: &FilterState,
    items: &'a [Motorcycle],
    context: &ViewContext,
) -> Vec<&'a Motorcycle> {
    let query_lower = state.search_query.to_lowercase();
    items
        .iter()
        .filter(|item| passes(state, &query_lower, item, context))
        .collect()
}

/// Distinct brands of the whole unfiltered collection, alphabetically.
pub fn available_brands(items: &[Motorcycle]) -> Vec<String> {
    items
        .iter()
        .map(|m| m.brand.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Owns the collection, its bounds, the page context and the user's selections.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    items: Vec<Motorcycle>,
    context: ViewContext,
    bounds: Bounds,
    state: FilterState,
}

impl FilterEngine {
    pub fn new(items: Vec<Motorcycle>, context: ViewContext) -> Self {
        let bounds = Bounds::from_items(&items);
        let state = FilterState::from_bounds(&bounds);
        debug!(?bounds, ?context, "Filter engine initialised over {} items", items.len());
        FilterEngine { items, context, bounds, state }
    }

    /// Swaps the collection. Bounds are recomputed and the three ranges reset to them;
    /// search text and brand selection survive.
    pub fn replace_items(&mut self, items: Vec<Motorcycle>) {
        self.items = items;
        self.bounds = Bounds::from_items(&self.items);
        self.state.reset_ranges(&self.bounds);
        debug!(bounds = ?self.bounds, "Catalog replaced, ranges reset to new bounds");
    }

    pub fn items(&self) -> &[Motorcycle] {
        &self.items
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn set_range(&mut self, dimension: Dimension, range: Range) {
        debug!(?dimension, ?range, "set_range");
        *self.state.range_mut(dimension) = range;
    }

    /// No-op on a brand-scoped view.
    pub fn toggle_brand(&mut self, name: &str) {
        if self.context.is_brand_scoped() {
            debug!("Ignoring brand toggle for '{}' on a brand-scoped view", name);
            return;
        }
        if !self.state.selected_brands.remove(name) {
            self.state.selected_brands.insert(name.to_string());
        }
        debug!(selected = ?self.state.selected_brands, "toggle_brand");
    }

    pub fn is_brand_selected(&self, name: &str) -> bool {
        self.state.selected_brands.contains(name)
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.state.search_query = text.into();
    }

    pub fn clear(&mut self) {
        self.state = FilterState::from_bounds(&self.bounds);
        debug!("Filters cleared");
    }

    /// Whether any range or brand selection departs from the defaults. Search text is not counted.
    pub fn is_dirty(&self) -> bool {
        Dimension::ALL
            .iter()
            .any(|d| self.state.range(*d) != self.bounds.get(*d).as_range())
            || !self.state.selected_brands.is_empty()
    }

    pub fn compute_visible(&self) -> Vec<&Motorcycle> {
        compute_visible(&self.state, &self.items, &self.context)
    }

    /// Same derivation as [`FilterEngine::compute_visible`], as positions into [`FilterEngine::items`].
    pub fn visible_indices(&self) -> Vec<usize> {
        let query_lower = self.state.search_query.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| passes(&self.state, &query_lower, item, &self.context))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn available_brands(&self) -> Vec<String> {
        available_brands(&self.items)
    }
}
