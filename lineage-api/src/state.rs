//! Shared application state: a `Clone`-able struct of `Arc`-wrapped,
//! request-shared resources handed to every handler via Axum's `State`
//! extractor.

use std::sync::Arc;

use lineage_engine::{InMemoryAdjacencyStore, TaxonomyRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<TaxonomyRegistry>,
    pub adapter: Arc<InMemoryAdjacencyStore>,
}

impl AppState {
    pub fn new(registry: TaxonomyRegistry, adapter: InMemoryAdjacencyStore) -> Self {
        AppState {
            registry: Arc::new(registry),
            adapter: Arc::new(adapter),
        }
    }
}
