mod integrity_token;
mod subscriber_email;
mod subscription_request;
mod subscription_result;

pub use integrity_token::IntegrityToken;
pub use subscriber_email::SubscriberEmail;
pub use subscription_request::{NewsletterRef, SubscribeOptions, SubscriptionRequest};
pub use subscription_result::SubscriptionResult;
