//! Bread Catalog
//!
//! Resolves bread names to catalog items and prices selections. Pricing
//! rules (discounts, promotions) live entirely behind this boundary; the
//! reservation core only consumes the final figure.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::prelude::*;

use shared::models::{Bread, BreadSelection};
use shared::util::snowflake_id;

use crate::db::{RepoError, RepoResult};

/// Bread catalog collaborator.
#[async_trait]
pub trait BreadCatalog: Send + Sync {
    /// Resolve breads by name, preserving input order. `NotFound` if any
    /// name is unmatched.
    async fn find_many_by_names(&self, names: &[String]) -> RepoResult<Vec<Bread>>;

    /// Final price for a whole selection.
    async fn final_price(&self, selection: &[BreadSelection]) -> RepoResult<f64>;
}

/// In-memory bread catalog, keyed by name.
#[derive(Default)]
pub struct MemoryBreadCatalog {
    breads: DashMap<String, Bread>,
}

impl MemoryBreadCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bread and return it.
    pub fn insert(&self, name: impl Into<String>, price: f64) -> Bread {
        let name = name.into();
        let bread = Bread {
            id: snowflake_id(),
            name: name.clone(),
            price,
            is_active: true,
        };
        self.breads.insert(name, bread.clone());
        bread
    }

    fn lookup(&self, name: &str) -> RepoResult<Bread> {
        self.breads
            .get(name)
            .filter(|b| b.is_active)
            .map(|b| b.clone())
            .ok_or_else(|| RepoError::NotFound(format!("Bread {}", name)))
    }
}

#[async_trait]
impl BreadCatalog for MemoryBreadCatalog {
    async fn find_many_by_names(&self, names: &[String]) -> RepoResult<Vec<Bread>> {
        names.iter().map(|name| self.lookup(name)).collect()
    }

    async fn final_price(&self, selection: &[BreadSelection]) -> RepoResult<f64> {
        // Sum unit_price * count in Decimal, round once at the end
        let mut total = Decimal::ZERO;
        for line in selection {
            let bread = self.lookup(&line.name)?;
            let unit = Decimal::from_f64(bread.price).ok_or_else(|| {
                RepoError::Validation(format!("Bread {} has a non-finite price", bread.name))
            })?;
            total += unit * Decimal::from(line.count);
        }
        Ok(total.round_dp(2).to_f64().unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_in_input_order() {
        let catalog = MemoryBreadCatalog::new();
        catalog.insert("Rye", 3.0);
        catalog.insert("Baguette", 5.0);

        let names = vec!["Baguette".to_string(), "Rye".to_string()];
        let breads = catalog.find_many_by_names(&names).await.unwrap();
        assert_eq!(breads[0].name, "Baguette");
        assert_eq!(breads[1].name, "Rye");
    }

    #[tokio::test]
    async fn unknown_name_fails_whole_lookup() {
        let catalog = MemoryBreadCatalog::new();
        catalog.insert("Rye", 3.0);

        let names = vec!["Rye".to_string(), "Ciabatta".to_string()];
        let err = catalog.find_many_by_names(&names).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn prices_selection_with_counts() {
        let catalog = MemoryBreadCatalog::new();
        catalog.insert("Baguette", 5.0);
        catalog.insert("Rye", 3.25);

        let selection = vec![
            BreadSelection {
                name: "Baguette".to_string(),
                count: 2,
            },
            BreadSelection {
                name: "Rye".to_string(),
                count: 3,
            },
        ];
        let price = catalog.final_price(&selection).await.unwrap();
        assert_eq!(price, 19.75);
    }
}
