//! Shared context for command handlers
//!
//! - **Version**: 2.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.1.0: Channel lookup failures surface as errors instead of "not a thread"
//! - 2.0.0: Carry the care tracker instead of AI services
//! - 1.0.0: Initial implementation with core shared state

use anyhow::Result;
use log::debug;
use serenity::model::id::ChannelId;

use crate::core::{CareError, CareResult};
use crate::features::care::CareTracker;

/// Shared context for all command handlers
///
/// Holds the long-lived services a handler needs:
/// - CareTracker (and through it the store and metric catalog)
/// - Bot start time for uptime reporting
#[derive(Clone)]
pub struct CommandContext {
    pub tracker: CareTracker,
    pub start_time: std::time::Instant,
}

impl CommandContext {
    pub fn new(tracker: CareTracker) -> Self {
        Self {
            tracker,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Check if a channel is a thread (public or private)
pub async fn is_in_thread_channel(
    serenity_ctx: &serenity::prelude::Context,
    channel_id: ChannelId,
) -> Result<bool> {
    use serenity::model::channel::{Channel, ChannelType};

    match serenity_ctx.http.get_channel(channel_id.0).await? {
        Channel::Guild(guild_channel) => Ok(matches!(
            guild_channel.kind,
            ChannelType::PublicThread | ChannelType::PrivateThread
        )),
        _ => Ok(false),
    }
}

/// Resolve the plant thread a command was invoked in
///
/// Returns `Ok(None)` outside of threads. Joins the thread so the bot keeps
/// receiving it.
pub async fn resolve_plant_thread(
    serenity_ctx: &serenity::prelude::Context,
    channel_id: ChannelId,
) -> CareResult<Option<u64>> {
    let lookup = is_in_thread_channel(serenity_ctx, channel_id).await;
    let Some(thread_id) = plant_thread_from_lookup(channel_id, lookup)? else {
        return Ok(None);
    };

    if let Err(e) = channel_id.join_thread(&serenity_ctx.http).await {
        debug!("Could not join thread {channel_id}: {e}");
    }

    Ok(Some(thread_id))
}

fn plant_thread_from_lookup(channel_id: ChannelId, lookup: Result<bool>) -> CareResult<Option<u64>> {
    match lookup {
        Ok(true) => Ok(Some(channel_id.0)),
        Ok(false) => Ok(None),
        Err(e) => Err(CareError::DeliveryFailure(format!(
            "could not look up channel {channel_id}: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context_clone() {
        // CommandContext should be Clone for sharing across handlers
        fn assert_clone<T: Clone>() {}
        assert_clone::<CommandContext>();
    }

    #[test]
    fn test_plant_thread_from_lookup() {
        let channel = ChannelId(42);

        assert_eq!(plant_thread_from_lookup(channel, Ok(true)).unwrap(), Some(42));
        assert_eq!(plant_thread_from_lookup(channel, Ok(false)).unwrap(), None);
    }

    #[test]
    fn test_lookup_failure_is_not_reported_as_outside_thread() {
        let err = plant_thread_from_lookup(ChannelId(42), Err(anyhow::anyhow!("502 Bad Gateway")))
            .unwrap_err();

        assert!(matches!(err, CareError::DeliveryFailure(_)));
        let reply = crate::features::care::CommandReply::from_error(&err);
        assert_ne!(reply.content, crate::features::care::commands::NOT_IN_THREAD_MESSAGE);
        assert!(reply.ephemeral);
    }
}
