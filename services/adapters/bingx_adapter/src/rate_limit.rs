//! Request throttling for the BingX REST API

use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Direct (unkeyed) limiter shared by every endpoint of one client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl RateLimiter {
    /// Allow `requests_per_second`; zero disables throttling
    pub fn per_second(requests_per_second: u32) -> Self {
        let limiter = match NonZeroU32::new(requests_per_second) {
            Some(rate) => Some(Arc::new(DefaultDirectRateLimiter::direct(Quota::per_second(
                rate,
            )))),
            None => {
                tracing::warn!("Rate limiting disabled: requests_per_second is 0");
                None
            }
        };
        Self { limiter }
    }

    /// Check if request is allowed (non-blocking)
    pub fn check(&self) -> bool {
        self.limiter
            .as_ref()
            .map(|limiter| limiter.check().is_ok())
            .unwrap_or(true)
    }

    /// Wait until request is allowed
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
