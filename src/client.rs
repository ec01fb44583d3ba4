use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info, warn};

pub const LEAD_SOURCE: &str = "ABA Rate Benchmark Tool";

const PLACEHOLDER_MARKER: &str = "REPLACE_WITH_YOUR";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub email: String,
    pub timestamp: String,
    pub source: String,
    pub state: String,
    pub cpt_code: String,
    pub billing_rate: String,
    pub analysis_count: u32,
}

impl LeadPayload {
    pub fn new(email: &str, state: &str, code: &str, billing_rate: &str, analysis_count: u32) -> Self {
        LeadPayload {
            email: email.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            source: LEAD_SOURCE.to_string(),
            state: state.to_string(),
            cpt_code: code.to_string(),
            billing_rate: billing_rate.to_string(),
            analysis_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Skipped,
    Failed,
}

pub struct LeadClient {
    http_client: Client,
    webhook_url: Option<String>,
}

impl LeadClient {
    pub fn new(webhook_url: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
            .context("failed to build http client")?;

        Ok(LeadClient {
            http_client,
            webhook_url,
        })
    }

    fn endpoint(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && !url.contains(PLACEHOLDER_MARKER))
    }

    pub async fn post(&self, url: &str, lead: &LeadPayload) -> Result<()> {
        self.http_client
            .post(url)
            .json(lead)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Forwards a captured lead. Failures are logged and never propagated.
    pub async fn forward(&self, lead: &LeadPayload) -> Delivery {
        let Some(url) = self.endpoint() else {
            warn!("Lead webhook URL not configured, skipping lead forwarding.");
            return Delivery::Skipped;
        };

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{msg} {spinner:.green}") {
            bar.set_style(style);
        }
        bar.set_message("Saving your email");
        bar.enable_steady_tick(Duration::from_millis(100));

        debug!(state = %lead.state, code = %lead.cpt_code, "Posting lead.");
        let result = self.post(url, lead).await;
        bar.finish_and_clear();

        match result {
            Ok(()) => {
                info!("Lead forwarded successfully.");
                Delivery::Sent
            }
            Err(e) => {
                error!("Error forwarding lead: {:#}", e);
                Delivery::Failed
            }
        }
    }
}
