//! List synchronization over a [`MailGateway`].
//!
//! [`ListSync`] owns the mail list for the currently selected mailbox and
//! drives it through select, incremental load-more, and periodic polling.
//! Poll results never clobber pagination state: new mail is prepended and
//! the loaded window keeps its offsets.

use crate::error::Result;
use crate::gateway::{CachePolicy, MailGateway, PageQuery, DEFAULT_PAGE_SIZE};
use crate::mail::{MailPage, ParsedMail, Selector};
use std::collections::HashSet;

/// Lifecycle of the mail list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No selection yet.
    #[default]
    Idle,
    /// First page for a fresh selection is in flight.
    Loading,
    /// List is live and renderable.
    Loaded,
    /// A further page is in flight; the current list stays visible.
    LoadingMore,
    /// Initial load failed; the list is empty.
    Errored(String),
}

/// Emitted when a poll pass found mail the list had not seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMailNotice {
    /// Number of newly arrived messages.
    pub count: usize,
}

/// Synchronizes one mailbox selection against the backend.
#[derive(Debug)]
pub struct ListSync<G> {
    gateway: G,
    selector: Selector,
    page_size: u64,
    mails: Vec<ParsedMail>,
    state: LoadState,
    has_more: bool,
    offset: u64,
    watermark: u64,
    new_ids: HashSet<u64>,
    generation: u64,
    last_error: Option<String>,
    total: Option<u64>,
}

impl<G: MailGateway> ListSync<G> {
    /// Builds a synchronizer with the default page size.
    pub fn new(gateway: G) -> Self {
        Self::with_page_size(gateway, DEFAULT_PAGE_SIZE)
    }

    /// Builds a synchronizer with a custom page size.
    pub fn with_page_size(gateway: G, page_size: u64) -> Self {
        Self {
            gateway,
            selector: Selector::All,
            page_size,
            mails: Vec::new(),
            state: LoadState::Idle,
            has_more: false,
            offset: 0,
            watermark: 0,
            new_ids: HashSet::new(),
            generation: 0,
            last_error: None,
            total: None,
        }
    }

    /// Switches to a selector and loads its first page.
    ///
    /// Any in-flight response for a previous selection is discarded when
    /// it lands.
    pub async fn select(&mut self, selector: Selector) {
        self.generation += 1;
        let generation = self.generation;

        self.selector = selector.clone();
        self.mails.clear();
        self.new_ids.clear();
        self.has_more = false;
        self.offset = 0;
        self.watermark = 0;
        self.last_error = None;
        self.total = None;
        self.state = LoadState::Loading;

        let result = self
            .gateway
            .fetch_page(&selector, PageQuery::first(self.page_size), CachePolicy::Use)
            .await;
        self.apply_first_page(generation, result);
    }

    /// Loads the next page and appends it. No-op unless the list is
    /// `Loaded` with more pages known to exist.
    pub async fn load_more(&mut self) {
        if !self.can_load_more() {
            return;
        }
        let generation = self.generation;
        self.state = LoadState::LoadingMore;

        let selector = self.selector.clone();
        let query = PageQuery {
            limit: self.page_size,
            offset: self.offset,
        };
        let result = self.gateway.fetch_page(&selector, query, CachePolicy::Use).await;
        self.apply_next_page(generation, result);
    }

    /// One poll pass: refetches the first page past the cache and merges
    /// anything newer than the watermark to the front.
    ///
    /// Returns a notice when new mail arrived. Poll failures are logged
    /// and swallowed; the next pass retries.
    pub async fn poll(&mut self) -> Option<NewMailNotice> {
        if !matches!(self.state, LoadState::Loaded | LoadState::LoadingMore) {
            return None;
        }
        let generation = self.generation;

        let selector = self.selector.clone();
        let result = self
            .gateway
            .fetch_page(&selector, PageQuery::first(self.page_size), CachePolicy::Bypass)
            .await;

        match result {
            Ok(page) => self.merge_poll_page(generation, page),
            Err(error) => {
                tracing::warn!(selector = %self.selector, %error, "poll pass failed");
                None
            }
        }
    }

    fn apply_first_page(&mut self, generation: u64, result: Result<MailPage>) {
        if generation != self.generation {
            tracing::debug!(selector = %self.selector, "discarding response for stale selection");
            return;
        }
        match result {
            Ok(page) => {
                let fetched = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
                self.has_more = fetched == self.page_size;
                self.offset = fetched;
                self.watermark = page.items.iter().map(|mail| mail.id).max().unwrap_or(0);
                self.total = page.total;
                self.mails = page.items;
                self.state = LoadState::Loaded;
            }
            Err(error) => {
                tracing::error!(selector = %self.selector, %error, "initial mail load failed");
                self.state = LoadState::Errored(error.to_string());
            }
        }
    }

    fn apply_next_page(&mut self, generation: u64, result: Result<MailPage>) {
        if generation != self.generation {
            return;
        }
        match result {
            Ok(page) => {
                let fetched = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
                self.has_more = fetched == self.page_size;
                self.offset += fetched;
                if page.total.is_some() {
                    self.total = page.total;
                }
                self.mails.extend(page.items);
                self.last_error = None;
                self.state = LoadState::Loaded;
            }
            Err(error) => {
                // The loaded window stays intact; only the extension failed
                tracing::warn!(selector = %self.selector, %error, "load-more failed");
                self.last_error = Some(error.to_string());
                self.state = LoadState::Loaded;
            }
        }
    }

    fn merge_poll_page(&mut self, generation: u64, page: MailPage) -> Option<NewMailNotice> {
        if generation != self.generation {
            return None;
        }
        if page.total.is_some() {
            self.total = page.total;
        }

        let fresh: Vec<ParsedMail> = page
            .items
            .into_iter()
            .filter(|mail| mail.id > self.watermark)
            .collect();
        if fresh.is_empty() {
            return None;
        }

        let count = fresh.len();
        if let Some(highest) = fresh.iter().map(|mail| mail.id).max() {
            self.watermark = self.watermark.max(highest);
        }
        for mail in &fresh {
            self.new_ids.insert(mail.id);
        }
        self.mails.splice(0..0, fresh);
        tracing::info!(selector = %self.selector, count, "new mail arrived");
        Some(NewMailNotice { count })
    }

    /// Whether a load-more pass would do anything right now.
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        self.has_more && self.state == LoadState::Loaded
    }

    /// Clears the unseen marker for a message.
    pub fn mark_seen(&mut self, id: u64) {
        self.new_ids.remove(&id);
    }

    /// Whether a message arrived via poll and has not been opened yet.
    #[must_use]
    pub fn is_new(&self, id: u64) -> bool {
        self.new_ids.contains(&id)
    }

    /// Looks a loaded message up by id.
    #[must_use]
    pub fn mail(&self, id: u64) -> Option<&ParsedMail> {
        self.mails.iter().find(|mail| mail.id == id)
    }

    /// Resets to `Idle` with nothing loaded.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.mails.clear();
        self.new_ids.clear();
        self.has_more = false;
        self.offset = 0;
        self.watermark = 0;
        self.last_error = None;
        self.total = None;
        self.state = LoadState::Idle;
    }

    /// The loaded list in display order, newest first.
    #[must_use]
    pub fn mails(&self) -> &[ParsedMail] {
        &self.mails
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Current selector.
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Best-known total for the selector, when the backend reports one.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Error from the most recent failed load-more pass, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Direct access to the gateway, e.g. for mailbox management.
    pub const fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }
}
