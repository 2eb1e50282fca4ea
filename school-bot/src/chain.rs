//! # Handler chain
//!
//! Runs a sequence of handlers over one [`UpdateContext`]. All `before` run in order (any false
//! stops the chain); then `handle` runs until Stop or Reply; then all `after` run in reverse.
//! [`HandlerChain::dispatch`] is the outermost layer: an error from any phase is reported once
//! against the context's scope and then dropped.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::core::{Handler, HandlerResponse, Result, UpdateContext};
use crate::reporting::ErrorReporter;

#[derive(Clone)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
    reporter: Arc<dyn ErrorReporter>,
}

impl HandlerChain {
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            handlers: Vec::new(),
            reporter,
        }
    }

    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Handler names in execution order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Runs all before → handle until Stop/Reply → all after in reverse. The first error
    /// aborts the remaining phases and is returned unchanged.
    pub async fn handle(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        let update_id = ctx.update.update_id;

        for h in &self.handlers {
            let name = h.name();
            debug!(update_id, handler = name, "step: handler before");
            if !h.before(ctx).await? {
                info!(update_id, handler = name, "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let name = h.name();
            let response = h.handle(ctx).await?;
            let (response_type, reply_len) = match &response {
                HandlerResponse::Continue => ("Continue", None),
                HandlerResponse::Stop => ("Stop", None),
                HandlerResponse::Ignore => ("Ignore", None),
                HandlerResponse::Reply(s) => ("Reply", Some(s.len())),
            };
            debug!(
                update_id,
                handler = name,
                response_type,
                reply_len = ?reply_len,
                "step: handler handle done"
            );
            if matches!(response, HandlerResponse::Stop | HandlerResponse::Reply(_)) {
                final_response = response;
                break;
            }
        }

        for h in self.handlers.iter().rev() {
            debug!(update_id, handler = h.name(), "step: handler after");
            h.after(ctx, &final_response).await?;
        }

        Ok(final_response)
    }

    /// Runs the chain and never fails: an error is reported exactly once with `ctx.scope`
    /// and the update ends with `Stop`.
    #[instrument(skip(self, ctx), fields(update_id = ctx.update.update_id))]
    pub async fn dispatch(&self, ctx: &mut UpdateContext) -> HandlerResponse {
        info!(
            user_id = ?ctx.update.sender_id(),
            chat_id = ?ctx.update.chat_id(),
            "step: handler_chain started"
        );
        match self.handle(ctx).await {
            Ok(response) => {
                info!("step: handler_chain finished");
                response
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "step: handler_chain failed, reporting");
                self.reporter.capture(&e, &ctx.scope).await;
                HandlerResponse::Stop
            }
        }
    }
}
