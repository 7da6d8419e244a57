//! Search-as-you-type pickers (category search, spot search).
//!
//! Every non-empty query gets a new generation; a response is applied only if
//! its generation is still the latest, so the last *issued* search wins even
//! when responses arrive out of order.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Category, Spot};
use crate::selection::{Keyed, SelectionSet};
use crate::traits::AdminApi;

/// Remote lookup backing a picker.
#[async_trait]
pub trait CandidateSource<T>: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<T>>;
}

/// `GET /category/list/search/typeless?query=`
pub struct CategoryCandidates(pub Arc<dyn AdminApi>);

#[async_trait]
impl CandidateSource<Category> for CategoryCandidates {
    async fn search(&self, query: &str) -> Result<Vec<Category>> {
        self.0.search_categories(query).await
    }
}

/// `GET /spot/list/search?query=`
pub struct SpotCandidates(pub Arc<dyn AdminApi>);

#[async_trait]
impl CandidateSource<Spot> for SpotCandidates {
    async fn search(&self, query: &str) -> Result<Vec<Spot>> {
        self.0.search_spots(query).await
    }
}

/// Handle for one issued search; give it back to [`SearchPicker::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct SearchPicker<T> {
    query: String,
    candidates: Vec<T>,
    generation: u64,
}

impl<T> Default for SearchPicker<T> {
    fn default() -> Self {
        Self { query: String::new(), candidates: Vec::new(), generation: 0 }
    }
}

impl<T: Keyed + Clone> SearchPicker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records a query change. Blank input clears the candidates and needs no
    /// request; anything else returns the ticket to search with.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        self.query = query.to_string();
        self.generation += 1;
        if query.trim().is_empty() {
            self.candidates.clear();
            return None;
        }
        Some(SearchTicket { generation: self.generation, query: query.trim().to_string() })
    }

    /// Applies a response. Returns `Ok(false)` when the ticket was superseded
    /// and the response (or its error) was dropped.
    pub fn complete(&mut self, ticket: &SearchTicket, response: Result<Vec<T>>) -> Result<bool> {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale search #{} for {:?} (latest #{})",
                ticket.generation,
                ticket.query,
                self.generation
            );
            return Ok(false);
        }
        self.candidates = response?;
        Ok(true)
    }

    /// Moves a candidate into `selection`. The query and candidates are
    /// cleared whatever the outcome.
    pub fn select(&mut self, key: i64, selection: &mut SelectionSet<T>) -> Result<()> {
        let picked = self.candidates.iter().find(|c| c.key() == key).cloned();
        self.reset();
        let picked = picked.ok_or_else(|| AppError::NotFound("candidate".into(), key.to_string()))?;
        selection.insert(picked)?;
        Ok(())
    }

    /// Clears local state; any in-flight response becomes stale.
    pub fn reset(&mut self) {
        self.query.clear();
        self.candidates.clear();
        self.generation += 1;
    }

    /// Begin, await and complete in one go, for owners that hold the picker
    /// across the request.
    pub async fn search_with<S>(&mut self, source: &S, query: &str) -> Result<bool>
    where
        S: CandidateSource<T> + ?Sized,
    {
        match self.begin(query) {
            Some(ticket) => {
                let response = source.search(&ticket.query).await;
                self.complete(&ticket, response)
            }
            None => Ok(true),
        }
    }
}
