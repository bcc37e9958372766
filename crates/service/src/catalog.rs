//! In-memory product filtering for the storefront listing.
//!
//! Handlers fetch the active products once, resolve slugs in the query
//! string to ids, and hand both to [`apply_filter`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::product;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "name_asc" => Ok(Self::NameAsc),
            other => Err(format!("unknown sort '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    pub category: Option<Uuid>,
    pub color: Option<Uuid>,
    pub cap_pattern: Option<Uuid>,
    pub tiedye_pattern: Option<Uuid>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub search: Option<String>,
    pub featured_only: bool,
    pub in_stock_only: bool,
    pub sort: ProductSort,
}

impl ProductFilter {
    pub fn matches(&self, p: &product::Model) -> bool {
        if self.category.is_some() && p.category_id != self.category { return false; }
        if self.color.is_some() && p.color_id != self.color { return false; }
        if self.cap_pattern.is_some() && p.cap_pattern_id != self.cap_pattern { return false; }
        if self.tiedye_pattern.is_some() && p.tiedye_pattern_id != self.tiedye_pattern { return false; }
        if self.min_price.is_some_and(|min| p.price < min) { return false; }
        if self.max_price.is_some_and(|max| p.price > max) { return false; }
        if self.featured_only && !p.is_featured { return false; }
        if self.in_stock_only && !p.in_stock() { return false; }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                p.name.to_lowercase().contains(&term)
                    || p.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

/// Filter then sort. Ties fall back to name so pages stay stable.
pub fn apply_filter(products: Vec<product::Model>, filter: &ProductFilter) -> Vec<product::Model> {
    if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
        if min > max {
            return Vec::new();
        }
    }
    let mut out: Vec<_> = products.into_iter().filter(|p| filter.matches(p)).collect();
    match filter.sort {
        ProductSort::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.name.cmp(&b.name))),
        ProductSort::PriceAsc => out.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name))),
        ProductSort::PriceDesc => out.sort_by(|a, b| b.price.cmp(&a.price).then_with(|| a.name.cmp(&b.name))),
        ProductSort::NameAsc => out.sort_by_key(|p| p.name.to_lowercase()),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn product(name: &str, price: i64, stock: i32, age_days: i64) -> product::Model {
        let ts = (Utc::now() - Duration::days(age_days)).into();
        product::Model {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: common::slug::slugify(name),
            description: Some(format!("{name} cap tangan")),
            price,
            stock,
            category_id: None,
            color_id: None,
            cap_pattern_id: None,
            tiedye_pattern_id: None,
            image_url: None,
            gallery: serde_json::json!([]),
            is_featured: false,
            is_active: true,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn names(v: &[product::Model]) -> Vec<&str> { v.iter().map(|p| p.name.as_str()).collect() }

    #[test]
    fn default_sort_is_newest_first() {
        let items = vec![product("Lama", 10, 1, 9), product("Baru", 20, 1, 1), product("Tengah", 30, 1, 5)];
        let out = apply_filter(items, &ProductFilter::default());
        assert_eq!(names(&out), vec!["Baru", "Tengah", "Lama"]);
    }

    #[test]
    fn price_bounds_inclusive_and_inverted_is_empty() {
        let items = vec![product("A", 100, 1, 1), product("B", 200, 1, 2), product("C", 300, 1, 3)];
        let f = ProductFilter { min_price: Some(100), max_price: Some(200), sort: ProductSort::PriceDesc, ..Default::default() };
        assert_eq!(names(&apply_filter(items.clone(), &f)), vec!["B", "A"]);

        let inverted = ProductFilter { min_price: Some(300), max_price: Some(100), ..Default::default() };
        assert!(apply_filter(items, &inverted).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let mut sogan = product("Sogan Solo", 100, 1, 1);
        sogan.description = Some("Warna COKLAT klasik".into());
        let items = vec![sogan, product("Mega Mendung", 100, 1, 2)];
        let by_desc = ProductFilter { search: Some("coklat".into()), ..Default::default() };
        assert_eq!(names(&apply_filter(items.clone(), &by_desc)), vec!["Sogan Solo"]);
        let by_name = ProductFilter { search: Some("MEGA".into()), ..Default::default() };
        assert_eq!(names(&apply_filter(items, &by_name)), vec!["Mega Mendung"]);
    }

    #[test]
    fn attribute_stock_and_featured_filters() {
        let color = Uuid::new_v4();
        let mut merah = product("Merah", 100, 0, 1);
        merah.color_id = Some(color);
        let mut biru = product("Biru", 100, 4, 2);
        biru.color_id = Some(color);
        biru.is_featured = true;
        let items = vec![merah, biru, product("Polos", 100, 2, 3)];

        let by_color = ProductFilter { color: Some(color), sort: ProductSort::NameAsc, ..Default::default() };
        assert_eq!(names(&apply_filter(items.clone(), &by_color)), vec!["Biru", "Merah"]);

        let in_stock = ProductFilter { color: Some(color), in_stock_only: true, ..Default::default() };
        assert_eq!(names(&apply_filter(items.clone(), &in_stock)), vec!["Biru"]);

        let featured = ProductFilter { featured_only: true, ..Default::default() };
        assert_eq!(names(&apply_filter(items, &featured)), vec!["Biru"]);
    }

    #[test]
    fn sort_parsing() {
        assert_eq!("price_asc".parse::<ProductSort>().unwrap(), ProductSort::PriceAsc);
        assert_eq!("".parse::<ProductSort>().unwrap(), ProductSort::Newest);
        assert!("cheapest".parse::<ProductSort>().is_err());
    }
}
