//! Attaches the persistent user record to the context, creating it on first contact.

use async_trait::async_trait;
use storage::UserRepository;
use tracing::{info, instrument};

use crate::core::{Handler, Result, UpdateContext};

#[derive(Clone)]
pub struct AttachUserHandler {
    users: UserRepository,
}

impl AttachUserHandler {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler for AttachUserHandler {
    /// Updates without a sender (channel posts and the like) stop the chain here.
    #[instrument(skip(self, ctx), fields(update_id = ctx.update.update_id))]
    async fn before(&self, ctx: &mut UpdateContext) -> Result<bool> {
        let Some(from) = ctx.update.from.as_ref() else {
            info!("step: AttachUserHandler before, update has no sender, chain stopped");
            return Ok(false);
        };

        let (user, created) = self.users.find_or_create(&from.to_profile()).await?;
        if created {
            info!(user_id = user.id, telegram_id = user.telegram_id, "New user created");
        }
        ctx.user = Some(user);
        ctx.user_created = created;
        Ok(true)
    }
}
