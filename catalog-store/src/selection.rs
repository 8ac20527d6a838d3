//! Category selection state
//!
//! Each selection starts a fetch carrying a [`FetchTicket`]. Tickets come from a
//! shared [`FetchGeneration`] counter and only the most recently issued ticket
//! may commit its result, so a slow fetch for an earlier selection can never
//! overwrite the page of a later one.

use crate::category::Category;
use crate::error::StoreError;
use crate::models::CatalogPage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter issuing fetch tickets
#[derive(Debug, Clone, Default)]
pub struct FetchGeneration {
    latest: Arc<AtomicU64>,
}

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one
    pub fn begin(&self) -> FetchTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            generation,
            latest: self.latest.clone(),
        }
    }
}

/// Proof that a fetch was started; valid until a newer ticket is issued
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while no newer fetch has been started
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// Loading status of the catalog view
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// No category selected yet
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// View state of the marketplace: selection, highlights and the committed page
#[derive(Debug, Clone)]
pub struct CatalogState {
    selection: Option<Category>,
    page: CatalogPage,
    status: LoadStatus,
    generation: FetchGeneration,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            selection: None,
            page: CatalogPage::default(),
            status: LoadStatus::Idle,
            generation: FetchGeneration::new(),
        }
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<Category> {
        self.selection
    }

    pub fn page(&self) -> &CatalogPage {
        &self.page
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Selects `category` and returns the ticket of the fetch it triggers.
    ///
    /// Re-selecting the active category starts a new fetch as well.
    pub fn select(&mut self, category: Category) -> FetchTicket {
        self.selection = Some(category);
        self.status = LoadStatus::Loading;
        let ticket = self.generation.begin();
        log::debug!(
            "Selected category {} (fetch #{})",
            category,
            ticket.generation()
        );
        ticket
    }

    /// Every category with its highlight flag; at most one is highlighted
    pub fn highlights(&self) -> Vec<(Category, bool)> {
        Category::all()
            .iter()
            .map(|category| (*category, self.selection == Some(*category)))
            .collect()
    }

    /// Applies the outcome of a fetch. Returns false if the ticket is stale.
    ///
    /// Records and URL sets are replaced together; on failure the previous
    /// page is cleared so no results of another category stay visible.
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<CatalogPage, StoreError>) -> bool {
        if !ticket.is_current() {
            log::debug!(
                "Discarding stale fetch #{} result",
                ticket.generation()
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.page = page;
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                log::error!("Failed to load category: {}", e);
                self.page = CatalogPage::default();
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        true
    }
}
