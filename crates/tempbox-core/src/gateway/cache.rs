//! Read-through page cache over any [`MailGateway`].

use std::collections::HashMap;

use super::{CachePolicy, MailGateway, PageQuery};
use crate::error::Result;
use crate::mail::{MailPage, MailboxInfo, Selector, ServerSettings};

type PageKey = (Selector, u64, u64);

/// Caches page snapshots keyed by `(selector, offset, limit)` and carries
/// the best-known total per selector forward when a response omits it.
///
/// Mailbox create/delete invalidate the whole cache, since either can
/// change what any selector would return.
#[derive(Debug)]
pub struct Cached<G> {
    inner: G,
    pages: HashMap<PageKey, MailPage>,
    totals: HashMap<Selector, u64>,
}

impl<G> Cached<G> {
    /// Wraps a gateway with an empty cache.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            pages: HashMap::new(),
            totals: HashMap::new(),
        }
    }

    /// The wrapped gateway.
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    /// Mutable access to the wrapped gateway.
    pub const fn inner_mut(&mut self) -> &mut G {
        &mut self.inner
    }

    /// Drops every cached page and remembered total.
    pub fn invalidate_all(&mut self) {
        self.pages.clear();
        self.totals.clear();
    }
}

impl<G: MailGateway> MailGateway for Cached<G> {
    async fn fetch_page(
        &mut self,
        selector: &Selector,
        query: PageQuery,
        policy: CachePolicy,
    ) -> Result<MailPage> {
        let key = (selector.clone(), query.offset, query.limit);

        if policy == CachePolicy::Use {
            if let Some(cached) = self.pages.get(&key) {
                tracing::trace!(%selector, offset = query.offset, "page cache hit");
                return Ok(cached.clone());
            }
        }

        let mut page = self.inner.fetch_page(selector, query, policy).await?;

        match page.total {
            Some(total) => {
                self.totals.insert(selector.clone(), total);
            }
            // Backend omitted the count; fall back to the last one seen
            None => page.total = self.totals.get(selector).copied(),
        }

        self.pages.insert(key, page.clone());
        Ok(page)
    }

    async fn list_mailboxes(&mut self) -> Result<Vec<MailboxInfo>> {
        self.inner.list_mailboxes().await
    }

    async fn create_mailbox(&mut self, name: &str, domain: &str) -> Result<MailboxInfo> {
        let created = self.inner.create_mailbox(name, domain).await?;
        self.invalidate_all();
        Ok(created)
    }

    async fn delete_mailbox(&mut self, id: i64) -> Result<()> {
        self.inner.delete_mailbox(id).await?;
        self.invalidate_all();
        Ok(())
    }

    async fn server_settings(&mut self) -> Result<ServerSettings> {
        self.inner.server_settings().await
    }
}
