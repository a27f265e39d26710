//! Catalog filtering: a pure function over an in-memory vehicle list.
//! Network state never enters here; handlers fetch, this narrows.

use super::models::{Brand, CarDetail, Color};
use serde::Deserialize;

/// Filter criteria as they arrive from the query string. Absent fields
/// impose no constraint; present bounds are inclusive. Both camelCase and
/// snake_case parameter names are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilter {
    // ---
    #[serde(alias = "brand_id")]
    pub brand_id: Option<i64>,
    #[serde(alias = "color_id")]
    pub color_id: Option<i64>,
    #[serde(alias = "min_year")]
    pub min_year: Option<i32>,
    #[serde(alias = "max_year")]
    pub max_year: Option<i32>,
    #[serde(alias = "min_price")]
    pub min_price: Option<f64>,
    #[serde(alias = "max_price")]
    pub max_price: Option<f64>,
}

impl CatalogFilter {
    /// True when no field constrains anything.
    pub fn is_empty(&self) -> bool {
        // ---
        self.brand_id.is_none()
            && self.color_id.is_none()
            && self.min_year.is_none()
            && self.max_year.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

/// Apply `filter` to `cars`.
///
/// Brand and color are matched by resolved *name* equality against the
/// reference lists, because the listing entity exposes denormalized names
/// rather than raw ids. A brand/color id that resolves to nothing matches
/// nothing. Inverted ranges (`max < min`) degenerate to an empty result by
/// construction; that is a validation concern surfaced to the user, not
/// silently swapped here.
pub fn apply_filter(
    cars: Vec<CarDetail>,
    filter: &CatalogFilter,
    brands: &[Brand],
    colors: &[Color],
) -> Vec<CarDetail> {
    // ---
    let brand_name = filter
        .brand_id
        .map(|id| brands.iter().find(|b| b.brand_id == id).map(|b| b.brand_name.as_str()));
    let color_name = filter
        .color_id
        .map(|id| colors.iter().find(|c| c.color_id == id).map(|c| c.color_name.as_str()));

    cars.into_iter()
        .filter(|car| {
            // ---
            let brand_match = match &brand_name {
                None => true,
                Some(resolved) => resolved.is_some_and(|name| car.brand_name == name),
            };
            let color_match = match &color_name {
                None => true,
                Some(resolved) => resolved.is_some_and(|name| car.color_name == name),
            };
            let year_match = filter.min_year.is_none_or(|min| car.model_year >= min)
                && filter.max_year.is_none_or(|max| car.model_year <= max);
            let price_match = filter.min_price.is_none_or(|min| car.daily_price >= min)
                && filter.max_price.is_none_or(|max| car.daily_price <= max);

            brand_match && color_match && year_match && price_match
        })
        .collect()
}
