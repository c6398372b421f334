use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A storefront catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
}

/// The demo catalogue seeded into empty stores.
pub fn demo_products() -> Vec<Product> {
    [
        (
            "Premium Wireless Headphones",
            "Active noise cancellation, 30hr battery",
            199.99,
            "photo-1505740420928-5e560c06d30e",
            "Electronics",
        ),
        (
            "Ultra-thin Laptop",
            "Intel i7, 16GB RAM, 512GB SSD",
            1299.99,
            "photo-1496181133206-80ce9b88a853",
            "Computers",
        ),
        (
            "Smart Fitness Watch",
            "Heart rate monitor, GPS, waterproof",
            299.99,
            "photo-1523275335684-37898b6baf30",
            "Wearables",
        ),
        (
            "Professional Camera",
            "24MP, 4K video, weather sealed",
            899.99,
            "photo-1526170375885-4d8ecf77b99f",
            "Photography",
        ),
        (
            "Gaming Mouse Pro",
            "RGB lighting, 12000 DPI, wireless",
            89.99,
            "photo-1527864550417-7fd91fc51a46",
            "Gaming",
        ),
        (
            "Flagship Smartphone",
            "128GB, Triple camera, 5G ready",
            799.99,
            "photo-1511707171634-5f897ff02aa9",
            "Mobile",
        ),
    ]
    .into_iter()
    .map(|(name, description, price, photo, category)| Product {
        id: Uuid::now_v7(),
        name: name.into(),
        description: description.into(),
        price,
        image_url: format!(
            "https://images.unsplash.com/{photo}?ixlib=rb-4.0.3&auto=format&fit=crop&w=400&h=300"
        ),
        category: category.into(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalogue_has_six_products() {
        let products = demo_products();
        assert_eq!(products.len(), 6);
        assert!(products.iter().all(|p| p.price > 0.0));
        assert!(products[0].image_url.starts_with("https://images.unsplash.com/"));
    }

    #[test]
    fn product_uses_camel_case_fields() {
        let json = serde_json::to_value(&demo_products()[0]).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("image_url").is_none());
    }
}
