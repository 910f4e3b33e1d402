//! Product catalog used by the in-memory backend

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;

use crate::integrations::{Product, SearchQuery};

static SAMPLE_PRODUCTS: Lazy<Vec<Product>> = Lazy::new(|| {
    [
        ("organic apples", "FreshFarm", 2.5),
        ("colgate toothpaste", "Colgate", 3.5),
        ("toothpaste", "Generic", 1.99),
        ("almond milk", "NutAlly", 4.0),
        ("multigrain bread", "Bakers", 2.0),
        ("watermelon", "FarmFresh", 5.0),
    ]
    .into_iter()
    .map(|(item, brand, price)| Product {
        item: item.to_string(),
        brand: brand.to_string(),
        price,
        currency: "USD".to_string(),
    })
    .collect()
});

/// Catalog file structure
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// Searchable product list
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::sample()
    }
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Built-in sample catalog
    pub fn sample() -> Self {
        Self::new(SAMPLE_PRODUCTS.clone())
    }

    /// Load a catalog from a JSON file of the form `{"products": [...]}`
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self::new(file.products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive substring match on item or brand, then brand and
    /// price filters, cheapest first
    pub fn search(&self, query: &SearchQuery) -> Vec<Product> {
        let text = query.text.trim().to_lowercase();
        let brand = query.brand.as_ref().map(|b| b.trim().to_lowercase());

        let mut results: Vec<Product> = self
            .products
            .iter()
            .filter(|p| {
                p.item.to_lowercase().contains(&text) || p.brand.to_lowercase().contains(&text)
            })
            .filter(|p| match &brand {
                Some(b) => p.brand.to_lowercase().contains(b.as_str()),
                None => true,
            })
            .filter(|p| query.max_price.map_or(true, |max| p.price <= max))
            .cloned()
            .collect();

        results.sort_by(|a, b| a.price.total_cmp(&b.price));
        results
    }
}
