//! `tempbox` - Terminal watcher for a hosted temporary-mailbox service
//!
//! Connects to the admin API, lists the selected mailbox, and keeps it
//! synchronized with a 30-second poll loop, raising a desktop
//! notification when new mail lands.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tempbox_core::sync::NewMailNotice;
use tempbox_core::{
    Cached, ClientSettings, HttpGateway, ListSync, LoadState, MailGateway, RemoteGateway, Selector,
};

const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempbox=info,tempbox_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tempbox");

    let settings = settings_from_env()?;
    let selector = match std::env::var("TEMPBOX_ADDRESS") {
        Ok(address) if !address.is_empty() => Selector::Address(address),
        _ => Selector::All,
    };

    let gateway: RemoteGateway = Cached::new(HttpGateway::new(settings));
    let mut sync = ListSync::new(gateway);

    report_mailboxes(&mut sync).await;

    sync.select(selector.clone()).await;
    match sync.state() {
        LoadState::Errored(reason) => {
            anyhow::bail!("initial load for {selector} failed: {reason}");
        }
        _ => {
            info!(
                %selector,
                loaded = sync.mails().len(),
                total = ?sync.total(),
                "mailbox loaded"
            );
        }
    }
    print_list(&sync);

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(notice) = sync.poll().await {
                    announce(&sync, notice);
                    print_list(&sync);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn settings_from_env() -> anyhow::Result<ClientSettings> {
    let api_base_url = std::env::var("TEMPBOX_API_URL")
        .context("TEMPBOX_API_URL is not set")?;
    let auth_token = std::env::var("TEMPBOX_API_TOKEN")
        .context("TEMPBOX_API_TOKEN is not set")?;
    Ok(ClientSettings::new(api_base_url, auth_token))
}

async fn report_mailboxes(sync: &mut ListSync<RemoteGateway>) {
    match sync.gateway_mut().server_settings().await {
        Ok(settings) => info!(
            version = %settings.version,
            domains = ?settings.domains,
            "connected"
        ),
        Err(error) => warn!(%error, "could not read server settings"),
    }

    match sync.gateway_mut().list_mailboxes().await {
        Ok(mailboxes) => {
            info!(count = mailboxes.len(), "mailboxes on server");
            for mailbox in mailboxes {
                info!(
                    address = %mailbox.name,
                    mails = ?mailbox.mail_count,
                    sent = mailbox.send_count,
                    "mailbox"
                );
            }
        }
        Err(error) => warn!(%error, "could not list mailboxes"),
    }
}

fn print_list(sync: &ListSync<RemoteGateway>) {
    for mail in sync.mails() {
        let marker = if sync.is_new(mail.id) { "*" } else { " " };
        println!(
            "{marker} {:>6}  {}  {:<30}  {}",
            mail.id,
            mail.created_at_local(),
            mail.sender,
            mail.subject
        );
    }
}

fn announce(sync: &ListSync<RemoteGateway>, notice: NewMailNotice) {
    info!(count = notice.count, selector = %sync.selector(), "new mail");

    let summary = if notice.count == 1 {
        "New mail".to_string()
    } else {
        format!("{} new mails", notice.count)
    };
    let body = sync
        .mails()
        .first()
        .map(|mail| format!("{}: {}", mail.sender, mail.subject))
        .unwrap_or_default();

    // Desktop notification is best-effort; headless setups run without it
    if let Err(error) = notify_rust::Notification::new()
        .summary(&summary)
        .body(&body)
        .show()
    {
        debug!(%error, "desktop notification failed");
    }
}
