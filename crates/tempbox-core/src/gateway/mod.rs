//! Remote mail gateway.
//!
//! [`MailGateway`] is the seam between the sync layer and the wire:
//! [`HttpGateway`] talks to the hosted API, [`Cached`] wraps any gateway
//! with a read-through page cache.

mod cache;
mod http;

pub use cache::Cached;
pub use http::HttpGateway;

use crate::error::Result;
use crate::mail::{MailPage, MailboxInfo, ParsedMail, Selector, ServerSettings};

/// Page size used by the list view.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// One page window into a mail listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageQuery {
    /// Maximum number of rows to return.
    pub limit: u64,
    /// Number of rows to skip.
    pub offset: u64,
}

impl PageQuery {
    /// The first page at the given size.
    #[must_use]
    pub const fn first(limit: u64) -> Self {
        Self { limit, offset: 0 }
    }
}

/// Whether a fetch may be served from cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve from cache when a snapshot exists.
    Use,
    /// Always hit the backend; the response still refreshes the cache.
    Bypass,
}

/// Operations against the hosted mailbox service.
#[allow(async_fn_in_trait)]
pub trait MailGateway {
    /// Fetches one decoded page of mail for the selector.
    ///
    /// # Errors
    ///
    /// Returns an error when the client is unconfigured or the backend
    /// request fails.
    async fn fetch_page(
        &mut self,
        selector: &Selector,
        query: PageQuery,
        policy: CachePolicy,
    ) -> Result<MailPage>;

    /// Lists all mailboxes on the server with their running totals.
    ///
    /// # Errors
    ///
    /// Returns an error when the client is unconfigured or the backend
    /// request fails.
    async fn list_mailboxes(&mut self) -> Result<Vec<MailboxInfo>>;

    /// Creates a mailbox from a name prefix and domain.
    ///
    /// # Errors
    ///
    /// Returns an error when the client is unconfigured or the backend
    /// request fails.
    async fn create_mailbox(&mut self, name: &str, domain: &str) -> Result<MailboxInfo>;

    /// Deletes a mailbox by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the client is unconfigured or the backend
    /// request fails.
    async fn delete_mailbox(&mut self, id: i64) -> Result<()>;

    /// Fetches the server's public settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend request fails.
    async fn server_settings(&mut self) -> Result<ServerSettings>;

    /// Looks a single message up on the first page of the selector.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MailNotFound`] when the id is not on the
    /// first page, or any fetch error.
    async fn get_mail(&mut self, selector: &Selector, id: u64) -> Result<ParsedMail> {
        let page = self
            .fetch_page(selector, PageQuery::first(DEFAULT_PAGE_SIZE), CachePolicy::Use)
            .await?;
        page.items
            .into_iter()
            .find(|mail| mail.id == id)
            .ok_or(crate::Error::MailNotFound(id))
    }
}


#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, VecDeque};

    use super::{CachePolicy, MailGateway, PageQuery};
    use crate::error::{Error, Result};
    use crate::mail::{MailPage, MailboxInfo, ParsedMail, Selector, ServerSettings};

    /// Scripted gateway for sync and cache tests.
    ///
    /// Responses come from `queue` first, then from `by_key`; everything
    /// else is a miss. Every fetch is logged to `calls`.
    #[derive(Debug, Default)]
    pub struct MockGateway {
        pub by_key: HashMap<(Selector, u64, u64), MailPage>,
        pub queue: VecDeque<Result<MailPage>>,
        pub calls: Vec<(Selector, PageQuery, CachePolicy)>,
    }

    impl MockGateway {
        pub fn with_page(selector: &Selector, query: PageQuery, page: MailPage) -> Self {
            let mut gateway = Self::default();
            gateway.insert(selector, query, page);
            gateway
        }

        pub fn insert(&mut self, selector: &Selector, query: PageQuery, page: MailPage) {
            self.by_key
                .insert((selector.clone(), query.offset, query.limit), page);
        }

        pub fn push(&mut self, response: Result<MailPage>) {
            self.queue.push_back(response);
        }

        pub fn fetch_count(&self) -> usize {
            self.calls.len()
        }
    }

    impl MailGateway for MockGateway {
        async fn fetch_page(
            &mut self,
            selector: &Selector,
            query: PageQuery,
            policy: CachePolicy,
        ) -> Result<MailPage> {
            self.calls.push((selector.clone(), query, policy));
            if let Some(response) = self.queue.pop_front() {
                return response;
            }
            self.by_key
                .get(&(selector.clone(), query.offset, query.limit))
                .cloned()
                .ok_or_else(|| Error::Config("no scripted page".to_string()))
        }

        async fn list_mailboxes(&mut self) -> Result<Vec<MailboxInfo>> {
            Ok(Vec::new())
        }

        async fn create_mailbox(&mut self, _name: &str, _domain: &str) -> Result<MailboxInfo> {
            Err(Error::Config("not scripted".to_string()))
        }

        async fn delete_mailbox(&mut self, _id: i64) -> Result<()> {
            Ok(())
        }

        async fn server_settings(&mut self) -> Result<ServerSettings> {
            Err(Error::Config("not scripted".to_string()))
        }
    }

    /// A minimal decoded mail with the given id.
    pub fn mail(id: u64) -> ParsedMail {
        ParsedMail {
            id,
            address: "box@tmp.example.com".to_string(),
            created_at: "2026-08-30T10:00:00Z".to_string(),
            sender: "sender@example.com".to_string(),
            subject: format!("mail {id}"),
            html_body: None,
            text_body: Some("body".to_string()),
            attachments: Vec::new(),
            raw: String::new(),
        }
    }

    /// A page holding mails with the given ids.
    pub fn page(ids: &[u64], total: Option<u64>) -> MailPage {
        MailPage {
            items: ids.iter().copied().map(mail).collect(),
            total,
        }
    }
}
