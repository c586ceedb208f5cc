//! # Catalog
//!
//! Static, read-only menu data: loaded once at startup, then shared by the
//! composition engine and the cart aggregator through `Arc<Catalog>`.
//!
//! ## Sources
//! ```text
//! Catalog::santto_menu()   built-in menu (the house burger, add-ons, drinks)
//! Catalog::from_json(..)   JSON array supplied by the catalog provider
//! Catalog::new(entries)    anything else, validated
//! ```
//!
//! Lookups that miss return `NotFound`. The UI only offers ids it read from
//! this catalog, so a miss is a programming or data error, never a customer
//! mistake.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CatalogEntry, Category};
use crate::validation::{validate_display_name, validate_entry_id, validate_price};

/// The immutable menu.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Declaration order is preserved; `by_category` relies on it.
    entries: Vec<Arc<CatalogEntry>>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from entries, validating each one.
    ///
    /// ## Rules
    /// - ids are valid and unique
    /// - names are non-empty
    /// - prices are non-negative
    pub fn new(entries: Vec<CatalogEntry>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in &entries {
            validate_entry_id(&entry.id)?;
            validate_display_name(&entry.name)?;
            validate_price(entry.price)?;

            if !seen.insert(entry.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "catalog id".to_string(),
                    value: entry.id.clone(),
                }
                .into());
            }
        }

        Ok(Self::build(entries))
    }

    /// Parses a JSON array of entries.
    ///
    /// Prices are decimal strings; `stackOrder` may also be spelled `zIndex`
    /// and categories accept the legacy `burger` / `drink` names.
    ///
    /// ```rust
    /// use santto_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::from_json(r#"[
    ///     { "id": "base_burger", "name": "Hambúrguer Clássico", "price": "17.00", "category": "base" },
    ///     { "id": "bacon", "name": "Bacon", "price": "3.50", "category": "burger", "zIndex": 30 }
    /// ]"#).unwrap();
    ///
    /// assert_eq!(catalog.len(), 2);
    /// assert_eq!(catalog.lookup("bacon").unwrap().price.cents(), 350);
    /// ```
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let records: Vec<CatalogRecord> =
            serde_json::from_str(json).map_err(|e| ValidationError::InvalidFormat {
                field: "catalog".to_string(),
                reason: e.to_string(),
            })?;

        let entries = records
            .into_iter()
            .map(CatalogRecord::into_entry)
            .collect::<CoreResult<Vec<_>>>()?;

        Self::new(entries)
    }

    /// The Santto house menu.
    ///
    /// | id            | category | price  |
    /// |---------------|----------|--------|
    /// | lettuce       | addon    |  1.00  |
    /// | tomato        | addon    |  1.50  |
    /// | pineapple     | addon    |  2.00  |
    /// | sauce         | addon    |  2.00  |
    /// | bacon         | addon    |  3.50  |
    /// | cheese        | addon    |  2.50  |
    /// | base_burger   | base     | 17.00  |
    /// | coke          | beverage |  6.00  |
    /// | guarana       | beverage |  5.50  |
    /// | orange_juice  | beverage |  8.00  |
    pub fn santto_menu() -> Self {
        let entry = |id: &str, name: &str, cents: i64, category: Category, stack: i32| {
            CatalogEntry::new(id, name, Money::from_cents(cents), category)
                .with_asset(format!("/{}.png", id))
                .with_stack_order(stack)
        };

        Self::build(vec![
            entry("lettuce", "Alface", 100, Category::Addon, 60),
            entry("tomato", "Tomate", 150, Category::Addon, 50),
            entry("pineapple", "Abacaxi Assado", 200, Category::Addon, 45),
            entry("sauce", "Molho Especial", 200, Category::Addon, 40),
            entry("bacon", "Bacon", 350, Category::Addon, 30),
            entry("cheese", "Queijo Cheddar", 250, Category::Addon, 20),
            entry("base_burger", "Hambúrguer Clássico", 1700, Category::Base, 10)
                .with_asset("/hamburgue.png"),
            entry("coke", "Coca-Cola 350ml", 600, Category::Beverage, 0),
            entry("guarana", "Guaraná 350ml", 550, Category::Beverage, 0),
            entry("orange_juice", "Suco de Laranja", 800, Category::Beverage, 0),
        ])
    }

    fn build(entries: Vec<CatalogEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id.clone(), i))
            .collect();

        Catalog {
            entries: entries.into_iter().map(Arc::new).collect(),
            index,
        }
    }

    /// Looks up an entry by id.
    pub fn lookup(&self, id: &str) -> CoreResult<Arc<CatalogEntry>> {
        self.get(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Catalog entry", id))
    }

    /// Borrowing lookup; `None` when absent.
    pub fn get(&self, id: &str) -> Option<&Arc<CatalogEntry>> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Entries of one category, in declaration order.
    pub fn by_category(&self, category: Category) -> Vec<Arc<CatalogEntry>> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .cloned()
            .collect()
    }

    /// All entries, in declaration order.
    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Wire shape of one catalog entry in JSON input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRecord {
    id: String,
    name: String,
    price: String,
    /// Legacy spellings (`burger`, `drink`) go through `Category::from_str`;
    /// menus written before categories existed only listed toppings.
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    asset: String,
    #[serde(default, alias = "zIndex")]
    stack_order: i32,
}

impl CatalogRecord {
    fn into_entry(self) -> CoreResult<CatalogEntry> {
        let price = Money::parse_decimal(&self.price)?;
        let category = match self.category.as_deref() {
            Some(raw) => raw.parse::<Category>()?,
            None => Category::Addon,
        };
        Ok(CatalogEntry::new(self.id, self.name, price, category)
            .with_asset(self.asset)
            .with_stack_order(self.stack_order))
    }
}
