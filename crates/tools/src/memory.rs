//! In-process shopping list backend
//!
//! Keeps the list in memory, optionally mirrored to a JSON file of the
//! form `{"shoppingList": [...]}`. Saves go through a temp file in the
//! same directory followed by a rename, so a crash never leaves a
//! half-written list behind. File writes run on the blocking pool, one at
//! a time and in mutation order.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::integrations::{
    Category, IntegrationError, ListItem, Product, SearchQuery, ShoppingListIntegration,
    Suggestion, SuggestionKind, Suggestions,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ListFile {
    #[serde(rename = "shoppingList", default)]
    shopping_list: Vec<ListItem>,
}

/// Shopping list held in memory
pub struct InMemoryShoppingList {
    items: RwLock<Vec<ListItem>>,
    catalog: Catalog,
    data_file: Option<PathBuf>,
    // held from mutation until its save completes
    save_lock: tokio::sync::Mutex<()>,
}

impl Default for InMemoryShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryShoppingList {
    /// Empty, non-persistent list over the sample catalog
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            catalog: Catalog::sample(),
            data_file: None,
            save_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// List persisted to `path`
    ///
    /// An existing file is loaded; a missing or unreadable file is logged
    /// and the list starts empty.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match load_list(&path) {
            Ok(items) => {
                tracing::info!(path = %path.display(), items = items.len(), "Loaded shopping list");
                items
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load shopping list");
                Vec::new()
            },
        };

        Self {
            items: RwLock::new(items),
            catalog: Catalog::sample(),
            data_file: Some(path),
            save_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn save(&self, items: Vec<ListItem>) {
        let Some(path) = self.data_file.clone() else {
            return;
        };
        let target = path.clone();
        let result = tokio::task::spawn_blocking(move || save_list(&target, &items))
            .await
            .unwrap_or_else(|e| Err(IntegrationError::Internal(e.to_string())));
        if let Err(e) = result {
            tracing::error!(path = %path.display(), error = %e, "Failed to save shopping list");
        }
    }
}

fn item_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn load_list(path: &Path) -> Result<Vec<ListItem>, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    let file: ListFile = serde_json::from_str(&content)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(file.shopping_list)
}

fn save_list(path: &Path, items: &[ListItem]) -> Result<(), IntegrationError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file = ListFile {
        shopping_list: items.to_vec(),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| IntegrationError::Storage(e.to_string()))?;
    serde_json::to_writer_pretty(&mut tmp, &file)
        .map_err(|e| IntegrationError::Storage(e.to_string()))?;
    tmp.flush()
        .map_err(|e| IntegrationError::Storage(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| IntegrationError::Storage(e.error.to_string()))?;
    Ok(())
}

/// Built-in suggestions: purchase history, seasonal produce, items on sale
pub fn default_suggestions() -> Suggestions {
    let groups: [(SuggestionKind, &[&str]); 3] = [
        (SuggestionKind::History, &["milk", "bread", "eggs"]),
        (SuggestionKind::Seasonal, &["mangoes", "watermelon", "corn"]),
        (SuggestionKind::Sale, &["toothpaste", "chips"]),
    ];
    let suggestions = groups
        .into_iter()
        .flat_map(|(kind, items)| {
            items.iter().map(move |item| Suggestion {
                kind,
                item: item.to_string(),
            })
        })
        .collect();

    let substitutes: BTreeMap<String, String> = [
        ("milk", "almond milk"),
        ("bread", "multigrain bread"),
        ("butter", "ghee"),
        ("sugar", "jaggery"),
        ("eggs", "plant-based egg substitute"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect();

    Suggestions {
        suggestions,
        substitutes,
    }
}

#[async_trait]
impl ShoppingListIntegration for InMemoryShoppingList {
    async fn add_item(&self, name: &str, quantity: u32) -> Result<Vec<ListItem>, IntegrationError> {
        let key = item_key(name);
        if key.is_empty() {
            return Err(IntegrationError::InvalidRequest("Item is required".to_string()));
        }
        let quantity = quantity.max(1);

        let _saving = self.save_lock.lock().await;
        let snapshot = {
            let mut items = self.items.write();
            match items.iter_mut().find(|i| i.item == key) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
                None => items.push(ListItem {
                    category: Category::for_item(&key),
                    item: key.clone(),
                    quantity,
                }),
            }
            items.clone()
        };
        self.save(snapshot.clone()).await;

        tracing::info!(item = %key, quantity, "Item added");
        Ok(snapshot)
    }

    async fn remove_item(&self, name: &str) -> Result<Vec<ListItem>, IntegrationError> {
        let key = item_key(name);
        if key.is_empty() {
            return Err(IntegrationError::InvalidRequest("Item is required".to_string()));
        }

        let _saving = self.save_lock.lock().await;
        let (snapshot, removed) = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|i| i.item != key);
            (items.clone(), before - items.len())
        };
        if removed > 0 {
            self.save(snapshot.clone()).await;
        }

        tracing::info!(item = %key, removed, "Item removed");
        Ok(snapshot)
    }

    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Product>, IntegrationError> {
        let results = self.catalog.search(query);
        tracing::debug!(query = %query.text, results = results.len(), "Catalog search");
        Ok(results)
    }

    async fn list_items(&self) -> Result<Vec<ListItem>, IntegrationError> {
        Ok(self.items.read().clone())
    }

    async fn clear(&self) -> Result<Vec<ListItem>, IntegrationError> {
        let _saving = self.save_lock.lock().await;
        self.items.write().clear();
        self.save(Vec::new()).await;
        Ok(Vec::new())
    }

    async fn suggestions(&self) -> Result<Suggestions, IntegrationError> {
        Ok(default_suggestions())
    }
}
