//! Common test utilities for the user directory integration suite.
//!
//! Each integration test file is its own crate, so not every helper is used
//! everywhere.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use user_directory::sampling::{SamplingClient, SamplingError, SamplingRequest, SamplingResponse};

/// Valid `create-user` arguments for user number `n`.
pub fn user_arguments(n: usize) -> Value {
    json!({
        "name": format!("Test User {}", n),
        "email": format!("user{}@example.com", n),
        "address": format!("{} Test Street", n),
        "phone": format!("555-{:04}", n)
    })
}

/// Generated text the way hosts commonly return it: fenced and padded.
pub fn fenced(json: &Value) -> String {
    format!("\n```json\n{}\n```\n", serde_json::to_string_pretty(json).unwrap())
}

/// Sampling client replaying queued texts, in order.
#[derive(Default)]
pub struct CannedSampler {
    replies: Mutex<VecDeque<Result<SamplingResponse, SamplingError>>>,
    seen: Mutex<Vec<SamplingRequest>>,
}

impl CannedSampler {
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sampler = Self::default();
        {
            let mut replies = sampler.replies.lock().unwrap();
            for text in texts {
                replies.push_back(Ok(SamplingResponse::text(text)));
            }
        }
        sampler
    }

    pub fn requests(&self) -> Vec<SamplingRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl SamplingClient for CannedSampler {
    async fn create_message(
        &self,
        request: SamplingRequest,
    ) -> Result<SamplingResponse, SamplingError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SamplingError::Unsupported))
    }
}
