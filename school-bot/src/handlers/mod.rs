//! Middleware handlers run ahead of scene dispatch: error scope, user attachment, session
//! binding, referral tracking.

mod attach_user;
mod error_scope;
mod referral;
mod session;

pub use attach_user::AttachUserHandler;
pub use error_scope::ErrorScopeHandler;
pub use referral::{ReferralHandler, MAX_REFERRAL_LEN};
pub use session::SessionHandler;
