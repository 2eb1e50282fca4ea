mod service_token;
mod user_record;

pub use service_token::ServiceToken;
pub use user_record::{UserProfile, UserRecord};
