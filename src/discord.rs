use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("failed to post to Discord webhook: {0}")]
    Request(#[from] ureq::Error),
}

/// Discord webhook sink for a rendered countdown board.
#[derive(Debug, Clone)]
pub struct Discord {
    hook_url: String,
}

impl Discord {
    pub fn new(hook_url: String) -> Self {
        Self { hook_url }
    }

    /// Post a text message to the webhook.
    pub fn post(&self, content: &str) -> Result<(), DiscordError> {
        let payload = serde_json::json!({ "content": content });
        match ureq::post(&self.hook_url).send_json(payload) {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), "Posted countdown to Discord webhook");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to post to Discord webhook");
                Err(e.into())
            }
        }
    }
}
