//! Hand-off of a finished wizard session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::audit::SessionId;
use crate::domain::FormData;
use crate::errors::ApplicationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub request_id: Uuid,
    pub session_id: Option<SessionId>,
    pub submitted_at: DateTime<Utc>,
    pub form: FormData,
}

impl QuoteRequest {
    pub fn new(session_id: Option<SessionId>, form: FormData) -> Self {
        Self { request_id: Uuid::new_v4(), session_id, submitted_at: Utc::now(), form }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub request_id: Uuid,
    pub destination: String,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("failed to write quote request to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode quote request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<SubmissionError> for ApplicationError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value.to_string())
    }
}

pub trait QuoteSubmitter: Send + Sync {
    fn submit(&self, request: &QuoteRequest) -> Result<SubmissionReceipt, SubmissionError>;
}

#[derive(Clone, Default)]
pub struct InMemoryQuoteSubmitter {
    requests: Arc<Mutex<Vec<QuoteRequest>>>,
}

impl InMemoryQuoteSubmitter {
    pub fn requests(&self) -> Vec<QuoteRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl QuoteSubmitter for InMemoryQuoteSubmitter {
    fn submit(&self, request: &QuoteRequest) -> Result<SubmissionReceipt, SubmissionError> {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }
        Ok(SubmissionReceipt { request_id: request.request_id, destination: "memory".to_owned() })
    }
}

/// Writes each request as `<request_id>.json` under `output_dir`.
#[derive(Clone, Debug)]
pub struct JsonFileSubmitter {
    output_dir: PathBuf,
}

impl JsonFileSubmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl QuoteSubmitter for JsonFileSubmitter {
    fn submit(&self, request: &QuoteRequest) -> Result<SubmissionReceipt, SubmissionError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|source| SubmissionError::Io { path: self.output_dir.clone(), source })?;

        let path = self.output_dir.join(format!("{}.json", request.request_id));
        let encoded = serde_json::to_vec_pretty(request)?;
        fs::write(&path, encoded)
            .map_err(|source| SubmissionError::Io { path: path.clone(), source })?;

        tracing::info!(
            event_name = "submission.written",
            request_id = %request.request_id,
            path = %path.display(),
            "quote request written"
        );
        Ok(SubmissionReceipt {
            request_id: request.request_id,
            destination: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::audit::SessionId;
    use crate::domain::FormData;
    use crate::errors::ApplicationError;

    use super::{
        InMemoryQuoteSubmitter, JsonFileSubmitter, QuoteRequest, QuoteSubmitter, SubmissionError,
    };

    fn request() -> QuoteRequest {
        let mut form = FormData::new();
        form.contact.email = "aino@example.com".to_owned();
        QuoteRequest::new(Some(SessionId("session-1".to_owned())), form)
    }

    #[test]
    fn in_memory_submitter_keeps_requests_in_order() {
        let submitter = InMemoryQuoteSubmitter::default();
        let first = request();
        let second = request();

        submitter.submit(&first).expect("first submit");
        let receipt = submitter.submit(&second).expect("second submit");

        assert_eq!(receipt.request_id, second.request_id);
        assert_eq!(submitter.requests(), vec![first, second]);
    }

    #[test]
    fn json_file_submitter_writes_a_decodable_request() {
        let temp = TempDir::new().expect("temp dir");
        let submitter = JsonFileSubmitter::new(temp.path().join("outbox"));
        let request = request();

        let receipt = submitter.submit(&request).expect("submit");

        let written = fs::read_to_string(&receipt.destination).expect("read written request");
        let decoded: QuoteRequest = serde_json::from_str(&written).expect("decode request");
        assert_eq!(decoded, request);
        assert!(receipt.destination.ends_with(&format!("{}.json", request.request_id)));
    }

    #[test]
    fn unwritable_destination_is_reported_as_submission_failure() {
        let temp = TempDir::new().expect("temp dir");
        let blocker = temp.path().join("occupied");
        fs::write(&blocker, "not a directory").expect("write blocker");

        let error = JsonFileSubmitter::new(&blocker).submit(&request()).expect_err("must fail");

        assert!(matches!(error, SubmissionError::Io { .. }));
        assert!(matches!(ApplicationError::from(error), ApplicationError::Submission(_)));
    }
}
