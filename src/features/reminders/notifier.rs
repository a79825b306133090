//! Reminder delivery
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Notifier trait and Discord thread delivery

use async_trait::async_trait;
use log::debug;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use crate::core::{CareError, CareResult};

/// Sends a text message to a plant thread
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, destination: u64, text: &str) -> CareResult<()>;
}

/// Posts reminders into Discord threads over the REST API
#[derive(Clone)]
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordNotifier { http }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, destination: u64, text: &str) -> CareResult<()> {
        let message = ChannelId(destination)
            .say(&self.http, text)
            .await
            .map_err(|e| CareError::DeliveryFailure(format!("thread {destination}: {e}")))?;

        debug!("Delivered message {} to thread {destination}", message.id);
        Ok(())
    }
}
