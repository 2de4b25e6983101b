use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Everything that can go wrong while fetching an answer.
///
/// The conversation treats all variants the same way; the distinction only
/// matters for the log.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// Connection, timeout or other transport failure.
    #[error("answer request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("answer service returned status {status}")]
    Status { status: StatusCode },

    /// The body was not JSON carrying a string `answer`.
    #[error("answer response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct AnswerRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct AnswerResponse {
    answer: String,
}

#[derive(Clone)]
pub struct AnswerClient {
    client: Client,
    base_url: String,
}

impl AnswerClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    pub async fn ask(&self, query: &str) -> Result<String, AnswerError> {
        let url = self.endpoint();
        tracing::debug!(%url, "posting question");

        let response = self
            .client
            .post(&url)
            .json(&AnswerRequest { query })
            .send()
            .await
            .map_err(AnswerError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnswerError::Status { status });
        }

        let body: AnswerResponse = response.json().await.map_err(AnswerError::Decode)?;
        Ok(body.answer)
    }
}
