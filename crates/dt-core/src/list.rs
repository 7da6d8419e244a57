//! # Resource list controller
//!
//! One generic controller behind every management screen: it fetches a page
//! for `(query, page, size)`, replaces its state with the response, and after
//! any mutation re-fetches the current page whether the mutation worked or not.

use std::fmt;

use async_trait::async_trait;

use crate::error::{Result, ValidationError};
use crate::models::{ListPage, PageRequest};
use crate::pagination::Pagination;

/// Fetch function plus mutation set of one resource.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    type Item: Clone + Send + Sync;
    type Action: fmt::Debug + Send;

    /// Short name used in logs (e.g. "members").
    fn name(&self) -> &'static str;

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<Self::Item>>;

    async fn apply(&self, action: Self::Action) -> Result<()>;
}

/// Results of a mutation and of the reload that follows it, kept apart so a
/// failed reload is never mistaken for a failed submission.
#[derive(Debug)]
pub struct MutationOutcome {
    pub applied: Result<()>,
    pub reloaded: Result<()>,
}

impl MutationOutcome {
    /// The mutation's error wins over the reload's.
    pub fn into_result(self) -> Result<()> {
        self.applied.and(self.reloaded)
    }
}

pub struct ResourceListController<S: ResourceSource> {
    source: S,
    query: String,
    page_size: usize,
    page: ListPage<S::Item>,
    loaded: bool,
}

impl<S: ResourceSource> ResourceListController<S> {
    pub fn new(source: S, page_size: usize) -> Self {
        Self {
            source,
            query: String::new(),
            page_size,
            page: ListPage::default(),
            loaded: false,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn items(&self) -> &[S::Item] {
        &self.page.items
    }

    pub fn page(&self) -> &ListPage<S::Item> {
        &self.page
    }

    pub fn page_index(&self) -> usize {
        self.page.current
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page.current, self.page.total_pages)
    }

    /// (Re-)fetches the current page.
    pub async fn load(&mut self) -> Result<()> {
        self.fetch_at(self.page.current).await
    }

    /// Fetches `index`. Once loaded, only indices inside the known page range
    /// are accepted.
    pub async fn go_to(&mut self, index: usize) -> Result<()> {
        let total = self.page.total_pages;
        let in_range = index < total || (total == 0 && index == 0);
        if self.loaded && !in_range {
            return Err(ValidationError::PageOutOfRange { requested: index, total }.into());
        }
        self.fetch_at(index).await
    }

    /// Changes the query string and starts over at the first page.
    pub async fn search(&mut self, query: &str) -> Result<()> {
        self.query = query.trim().to_string();
        self.fetch_at(0).await
    }

    /// Sends a mutating request, then re-fetches the current page regardless
    /// of its outcome. If the reload finds the list shrank past the current
    /// page, it lands on the new last page, which costs a second fetch.
    pub async fn mutate(&mut self, action: S::Action) -> MutationOutcome {
        log::debug!("{}: applying {:?}", self.source.name(), action);
        let applied = self.source.apply(action).await;
        if let Err(e) = &applied {
            log::warn!("{}: mutation failed: {}", self.source.name(), e);
        }
        let reloaded = self.load().await;
        if let Err(e) = &reloaded {
            log::warn!("{}: reload after mutation failed: {}", self.source.name(), e);
        }
        MutationOutcome { applied, reloaded }
    }

    /// Looks up a row of the current page.
    pub fn find(&self, matches: impl Fn(&S::Item) -> bool) -> Option<&S::Item> {
        self.page.items.iter().find(|item| matches(item))
    }

    async fn fetch_at(&mut self, index: usize) -> Result<()> {
        let request = PageRequest::new(index, self.page_size).with_query(self.query.clone());
        log::debug!("{}: fetching page {}", self.source.name(), index);
        let mut page = self.source.fetch_page(&request).await?;

        // The list shrank under us (e.g. the last row of the last page was
        // deleted): land on the new last page instead.
        if page.total_pages > 0 && index >= page.total_pages {
            let last = page.total_pages - 1;
            let request = PageRequest::new(last, self.page_size).with_query(self.query.clone());
            page = self.source.fetch_page(&request).await?;
        }
        page.current = if page.total_pages == 0 { 0 } else { page.current.min(page.total_pages - 1) };

        self.page = page;
        self.loaded = true;
        Ok(())
    }
}
