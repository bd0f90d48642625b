//! Built-in product catalog used by the mock data sources.

use snack_commerce::catalog::Product;
use snack_commerce::Money;

fn image(photo: &str) -> String {
    format!(
        "https://images.unsplash.com/photo-{}?w=500&h=500&fit=crop",
        photo
    )
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: u64,
    producer: &str,
    name: &str,
    cents: i64,
    quantity: u32,
    allergens: &[&str],
    free_from: &[&str],
    photo: &str,
) -> Product {
    Product::new(id, producer, name, Money::usd(cents))
        .with_available_quantity(quantity)
        .with_allergens(allergens.iter().copied())
        .with_free_from(free_from.iter().copied())
        .with_image_url(image(photo))
}

/// The eight fixture products, ids 101 to 108, in display order.
pub fn products() -> Vec<Product> {
    vec![
        product(
            101,
            "PROD-001",
            "Organic Tomatoes",
            499,
            150,
            &[],
            &["Gluten", "Dairy", "Nuts"],
            "1546470427-e26264be0b93",
        ),
        product(
            102,
            "PROD-002",
            "Fresh Mozzarella",
            850,
            80,
            &["Dairy"],
            &["Gluten", "Nuts", "Soy"],
            "1486297678162-eb2a19b0a32d",
        ),
        product(
            103,
            "PROD-001",
            "Whole Wheat Flour",
            325,
            200,
            &["Gluten"],
            &["Dairy", "Nuts", "Eggs"],
            "1574323347407-f5e1ad6d020b",
        ),
        product(
            104,
            "PROD-003",
            "Extra Virgin Olive Oil",
            1299,
            60,
            &[],
            &["Gluten", "Dairy", "Nuts", "Soy"],
            "1474979266404-7eaacbcd87c5",
        ),
        product(
            105,
            "PROD-004",
            "Almond Butter",
            975,
            45,
            &["Nuts"],
            &["Gluten", "Dairy", "Soy"],
            "1520803483588-2c8a8a7ccffa",
        ),
        product(
            106,
            "PROD-002",
            "Free-Range Eggs",
            550,
            120,
            &["Eggs"],
            &["Gluten", "Dairy", "Nuts"],
            "1582722872445-44dc5f7e3c8f",
        ),
        product(
            107,
            "PROD-005",
            "Sourdough Bread",
            625,
            90,
            &["Gluten"],
            &["Dairy", "Nuts", "Eggs"],
            "1509440159596-0249088772ff",
        ),
        product(
            108,
            "PROD-003",
            "Greek Yogurt",
            475,
            110,
            &["Dairy"],
            &["Gluten", "Nuts", "Soy"],
            "1488477181946-6428a0291777",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let ids: Vec<u64> = products().iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, (101..=108).collect::<Vec<_>>());
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn test_allergen_tags() {
        let all = products();
        let nuts: Vec<&str> = all
            .iter()
            .filter(|p| p.contains_allergen("Nuts"))
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(nuts, vec!["Almond Butter"]);
        assert!(all[0].image_url.contains("1546470427"));
    }
}
