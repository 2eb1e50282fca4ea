//! Records where a user came from when they first open the bot through a deep link
//! (`t.me/<bot>?start=<source>` arrives as `/start <source>`).

use async_trait::async_trait;
use storage::UserRepository;
use tracing::{info, instrument, warn};

use crate::core::{Handler, Result, UpdateContext};

/// Telegram limits deep-link payloads to 64 characters.
pub const MAX_REFERRAL_LEN: usize = 64;

#[derive(Clone)]
pub struct ReferralHandler {
    users: UserRepository,
}

impl ReferralHandler {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }
}

fn valid_source(source: &str) -> bool {
    !source.is_empty()
        && source.len() <= MAX_REFERRAL_LEN
        && source
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[async_trait]
impl Handler for ReferralHandler {
    #[instrument(skip(self, ctx), fields(update_id = ctx.update.update_id))]
    async fn before(&self, ctx: &mut UpdateContext) -> Result<bool> {
        if !ctx.user_created {
            return Ok(true);
        }
        let Some(("start", Some(source))) = ctx.update.command() else {
            return Ok(true);
        };
        let Some(user_id) = ctx.user.as_ref().map(|u| u.id) else {
            return Ok(true);
        };
        if !valid_source(source) {
            warn!(user_id, source = %source, "Ignoring malformed referral payload");
            return Ok(true);
        }

        if self.users.set_referral_if_absent(user_id, source).await? {
            info!(user_id, source = %source, "step: ReferralHandler recorded acquisition source");
            if let Some(user) = ctx.user.as_mut() {
                user.referral_source = Some(source.to_string());
            }
        }
        Ok(true)
    }
}
