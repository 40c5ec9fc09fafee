//! # Catalog Filtering
//!
//! The product grid's search predicate: case-insensitive substring match
//! on the name or the category, combined with an optional category
//! selector (exact match). Pure functions over the catalog slice; the
//! catalog itself is fetched once per session and treated as read-only.

use warung_core::Product;

/// Whether a product passes the search box and category selector.
///
/// The query matches as a substring of the name or the category; the
/// selector is an equality filter on the category.
pub fn matches(product: &Product, query: &str, category: Option<&str>) -> bool {
    let needle = query.trim().to_lowercase();
    let query_ok = needle.is_empty()
        || product.name.to_lowercase().contains(&needle)
        || product.category.to_lowercase().contains(&needle);

    let category_ok = match category {
        Some(selected) => product.category.eq_ignore_ascii_case(selected),
        None => true,
    };

    query_ok && category_ok
}

/// Filters the catalog for display.
pub fn filter<'a>(
    products: &'a [Product],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| matches(p, query, category))
        .collect()
}

/// Distinct categories in first-seen order, for the category selector.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.iter().any(|c: &String| c == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use warung_core::Money;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: 0,
            name: name.to_string(),
            price: Money::from_rupiah(10_000),
            category: category.to_string(),
            unit: "porsi".to_string(),
            is_package: false,
            image: None,
        }
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let p = product("Nasi Goreng Spesial", "makanan");
        assert!(matches(&p, "goreng", None));
        assert!(matches(&p, "GORENG", None));
        assert!(matches(&p, "  nasi ", None));
        assert!(!matches(&p, "bakso", None));
    }

    #[test]
    fn test_query_matches_category_substring() {
        let p = product("Es Teh", "minuman");
        assert!(matches(&p, "minu", None));
        assert!(matches(&p, "MINUMAN", None));
        assert!(!matches(&p, "makanan", None));
    }

    #[test]
    fn test_empty_query_matches_all() {
        let p = product("Es Teh", "minuman");
        assert!(matches(&p, "", None));
        assert!(matches(&p, "   ", None));
    }

    #[test]
    fn test_category_filter() {
        let p = product("Es Teh", "minuman");
        assert!(matches(&p, "", Some("minuman")));
        assert!(matches(&p, "", Some("MINUMAN")));
        assert!(!matches(&p, "", Some("makanan")));
    }

    #[test]
    fn test_filter_combines_both() {
        let catalog = vec![
            product("Nasi Goreng", "makanan"),
            product("Mie Goreng", "makanan"),
            product("Es Goreng???", "minuman"),
        ];

        let hits = filter(&catalog, "goreng", Some("makanan"));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_categories_distinct_in_order() {
        let catalog = vec![
            product("A", "makanan"),
            product("B", "minuman"),
            product("C", "makanan"),
        ];
        assert_eq!(categories(&catalog), vec!["makanan", "minuman"]);
    }
}
