//! HTTP transport against the hosted mailbox API.

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::{CachePolicy, MailGateway, PageQuery};
use crate::error::Result;
use crate::mail::{decode, MailPage, MailboxInfo, ParsedMail, RawMailRow, Selector, ServerSettings};
use crate::settings::ClientSettings;

/// Talks to the admin API. Holds no cache; wrap in
/// [`Cached`](super::Cached) for read-through behavior.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    settings: ClientSettings,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct MailListResponse {
    results: Vec<RawMailRow>,
    #[serde(default)]
    count: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewMailboxRequest<'a> {
    enable_prefix: bool,
    name: &'a str,
    domain: &'a str,
}

impl HttpGateway {
    /// Builds a gateway over the given settings.
    #[must_use]
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            settings,
            http: Client::new(),
        }
    }

    /// Read access to the client settings.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Mutable access to the client settings.
    pub const fn settings_mut(&mut self) -> &mut ClientSettings {
        &mut self.settings
    }

    /// Starts a request against `path`, failing fast when the client is
    /// not configured.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let (base_url, token) = self.settings.require()?;
        let url = format!("{base_url}{path}");
        tracing::trace!(%method, %url, "api request");
        Ok(self
            .http
            .request(method, url)
            .header("x-admin-auth", token))
    }

    async fn fetch_rows(&self, selector: &Selector, query: PageQuery) -> Result<MailListResponse> {
        let mut request = self.request(Method::GET, "/admin/mails")?.query(&[
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ]);
        if let Selector::Address(address) = selector {
            request = request.query(&[("address", address.as_str())]);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

impl MailGateway for HttpGateway {
    async fn fetch_page(
        &mut self,
        selector: &Selector,
        query: PageQuery,
        _policy: CachePolicy,
    ) -> Result<MailPage> {
        let response = self.fetch_rows(selector, query).await?;
        let items: Vec<ParsedMail> = response.results.iter().map(decode::decode_row).collect();
        tracing::debug!(
            %selector,
            offset = query.offset,
            rows = items.len(),
            "fetched mail page"
        );
        Ok(MailPage {
            items,
            total: response.count,
        })
    }

    async fn list_mailboxes(&mut self) -> Result<Vec<MailboxInfo>> {
        let response = self
            .request(Method::GET, "/admin/address")?
            .query(&[("limit", "100"), ("offset", "0")])
            .send()
            .await?
            .error_for_status()?;

        #[derive(Deserialize)]
        struct AddressListResponse {
            results: Vec<MailboxInfo>,
        }

        let list: AddressListResponse = response.json().await?;
        Ok(list.results)
    }

    async fn create_mailbox(&mut self, name: &str, domain: &str) -> Result<MailboxInfo> {
        let response = self
            .request(Method::POST, "/admin/new_address")?
            .json(&NewMailboxRequest {
                enable_prefix: true,
                name,
                domain,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn delete_mailbox(&mut self, id: i64) -> Result<()> {
        self.request(Method::DELETE, &format!("/admin/delete_address/{id}"))?
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn server_settings(&mut self) -> Result<ServerSettings> {
        let response = self
            .request(Method::GET, "/open_api/settings")?
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_fails_before_any_request() {
        let mut gateway = HttpGateway::new(ClientSettings::unconfigured());
        let err = gateway
            .fetch_page(
                &Selector::All,
                PageQuery::first(20),
                CachePolicy::Use,
            )
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_unconfigured_delete_fails_fast() {
        let mut gateway = HttpGateway::new(ClientSettings::unconfigured());
        assert!(gateway.delete_mailbox(1).await.unwrap_err().is_config());
    }
}
