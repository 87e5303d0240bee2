//! Filtering, sorting and paging of the recipe list.

use std::cmp::Ordering;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::store::model::RecipeRecord;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Product,
    Variant,
    LastSaved,
}

/// Sort order of the recipe list as stored in the sort mode tag.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum SortMode {
    IdAsc = 0,
    IdDesc = 1,
    ProductAsc = 2,
    ProductDesc = 3,
    VariantAsc = 4,
    VariantDesc = 5,
    LastSavedAsc = 6,
    LastSavedDesc = 7,
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::IdAsc
    }
}

impl SortMode {
    /// Unknown values sort by id.
    pub fn from_tag(value: i64) -> Self {
        SortMode::from_i64(value).unwrap_or_default()
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn ascending(key: SortKey) -> Self {
        match key {
            SortKey::Id => SortMode::IdAsc,
            SortKey::Product => SortMode::ProductAsc,
            SortKey::Variant => SortMode::VariantAsc,
            SortKey::LastSaved => SortMode::LastSavedAsc,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        match key {
            SortKey::Id => SortMode::IdDesc,
            SortKey::Product => SortMode::ProductDesc,
            SortKey::Variant => SortMode::VariantDesc,
            SortKey::LastSaved => SortMode::LastSavedDesc,
        }
    }

    /// Descending if the list is already sorted ascending by `key`, ascending otherwise.
    pub fn toggle(self, key: SortKey) -> Self {
        if self == SortMode::ascending(key) {
            SortMode::descending(key)
        } else {
            SortMode::ascending(key)
        }
    }

    pub fn compare(&self, a: &RecipeRecord, b: &RecipeRecord) -> Ordering {
        match self {
            SortMode::IdAsc => a.recipe_id.cmp(&b.recipe_id),
            SortMode::IdDesc => b.recipe_id.cmp(&a.recipe_id),
            SortMode::ProductAsc => a.product_name.cmp(&b.product_name),
            SortMode::ProductDesc => b.product_name.cmp(&a.product_name),
            SortMode::VariantAsc => a.variant_name.cmp(&b.variant_name),
            SortMode::VariantDesc => b.variant_name.cmp(&a.variant_name),
            SortMode::LastSavedAsc => a.last_saved.cmp(&b.last_saved),
            SortMode::LastSavedDesc => b.last_saved.cmp(&a.last_saved),
        }
    }
}

/// Case-insensitive substring match, an empty filter matches everything.
pub fn matches_filter(recipe: &RecipeRecord, filter_product: &str, filter_variant: &str) -> bool {
    contains_ignore_case(&recipe.product_name, filter_product)
        && contains_ignore_case(&recipe.variant_name, filter_variant)
}

fn contains_ignore_case(text: &str, filter: &str) -> bool {
    filter.is_empty() || text.to_lowercase().contains(&filter.to_lowercase())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipePage {
    /// 1-based, clamped into `1..=page_count`.
    pub page: usize,
    pub page_count: usize,
    pub recipes: Vec<RecipeRecord>,
}

pub fn list_page(
    recipes: &[RecipeRecord],
    page: usize,
    sort_mode: SortMode,
    filter_product: &str,
    filter_variant: &str,
) -> RecipePage {
    let mut matching: Vec<&RecipeRecord> = recipes
        .iter()
        .filter(|r| matches_filter(r, filter_product, filter_variant))
        .collect();
    matching.sort_by(|a, b| sort_mode.compare(a, b));

    let page_count = ((matching.len() + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page = page.max(1).min(page_count);
    let recipes = matching
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    RecipePage {
        page,
        page_count,
        recipes,
    }
}
