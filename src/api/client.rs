//! HTTP implementation of the quiz API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{QuizAttempt, QuizResult, QuizSummary};
use crate::protocol::{
    AnswerRequest, ErrorBody, ListQuizzesResponse, StartAttemptResponse, SubmitRequest,
    SubmitResponse,
};

use super::QuizApi;

const JSON: &str = "application/json";

/// Talks to the portal's quiz endpoints over HTTP with a bearer token.
///
/// Every request is bounded by the timeout given at construction; a request
/// that exceeds it fails with [`ApiError::Timeout`].
#[derive(Debug, Clone)]
pub struct HttpQuizApi {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl HttpQuizApi {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let base_url = base_url.into();
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Network(format!("invalid api url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Network(format!("api url {base_url} cannot hold a path")));
        }

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api_url, &config.token, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append `segments` to the base URL. Each segment is percent-encoded, so
    /// server-assigned ids containing `/`, `?` or `#` stay a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send an authorized request and return the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn error_from_body(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message);
    tracing::debug!(status = status.as_u16(), ?message, "quiz api returned an error");
    ApiError::from_status(status.as_u16(), message)
}

/// A `success: false` envelope inside a 2xx response.
fn rejected(message: Option<String>) -> ApiError {
    ApiError::Server {
        status: StatusCode::OK.as_u16(),
        message,
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ApiError> {
        tracing::debug!("listing available quizzes");
        let response: ListQuizzesResponse =
            self.send(self.client.get(self.endpoint(&["quizzes", "available"]))).await?;

        if !response.success {
            return Err(rejected(response.message));
        }
        Ok(response.quizzes)
    }

    async fn start_attempt(&self, quiz_id: &str) -> Result<QuizAttempt, ApiError> {
        tracing::debug!(quiz_id, "starting attempt");
        let response: StartAttemptResponse = self
            .send(self.client.post(self.endpoint(&["quizzes", quiz_id, "start"])))
            .await?;

        let payload = match response {
            StartAttemptResponse::Envelope {
                success: true,
                attempt,
            }
            | StartAttemptResponse::Bare(attempt) => attempt,
            StartAttemptResponse::Envelope { success: false, .. } => return Err(rejected(None)),
            StartAttemptResponse::Failure { message, .. } => return Err(rejected(message)),
        };
        Ok(payload.into_attempt(quiz_id, Utc::now()))
    }

    async fn submit_answer(&self, request: AnswerRequest) -> Result<(), ApiError> {
        // The acknowledgement body is not inspected.
        self.execute(
            self.client
                .post(self.endpoint(&["quizzes", "answer"]))
                .json(&request),
        )
        .await?;
        Ok(())
    }

    async fn submit_attempt(&self, request: SubmitRequest) -> Result<QuizResult, ApiError> {
        tracing::debug!(
            attempt_id = %request.attempt_id,
            answers = request.answers.len(),
            "submitting attempt"
        );
        let url = self.endpoint(&["quizzes", request.attempt_id.as_str(), "submit"]);
        let response: SubmitResponse = self.send(self.client.post(url).json(&request)).await?;

        match response {
            SubmitResponse {
                success: true,
                result: Some(result),
                ..
            } => Ok(result),
            SubmitResponse {
                success: true,
                result: None,
                ..
            } => Err(ApiError::Decode("submit response has no result".to_string())),
            SubmitResponse { message, .. } => Err(rejected(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpQuizApi::new("http://localhost:4000/api/", "t", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:4000/api");
        assert_eq!(
            api.endpoint(&["quizzes", "available"]).as_str(),
            "http://localhost:4000/api/quizzes/available"
        );
    }

    #[test]
    fn test_ids_are_encoded_as_one_segment() {
        let api = HttpQuizApi::new("http://localhost:4000/api", "t", Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.endpoint(&["quizzes", "abc/def==", "submit"]).as_str(),
            "http://localhost:4000/api/quizzes/abc%2Fdef==/submit"
        );
        assert_eq!(
            api.endpoint(&["quizzes", "a?b#c", "start"]).as_str(),
            "http://localhost:4000/api/quizzes/a%3Fb%23c/start"
        );

        let bare = HttpQuizApi::new("http://localhost:4000", "t", Duration::from_secs(1)).unwrap();
        assert_eq!(
            bare.endpoint(&["quizzes", "available"]).as_str(),
            "http://localhost:4000/quizzes/available"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(HttpQuizApi::new("not a url", "t", Duration::from_secs(1)).is_err());
        assert!(HttpQuizApi::new("mailto:someone@example.edu", "t", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_error_from_body_uses_server_message() {
        let err = error_from_body(StatusCode::BAD_REQUEST, br#"{"message":"Quiz closed"}"#);
        assert_eq!(err.user_message(), "Quiz closed");

        let err = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert!(matches!(err, ApiError::Server { status: 500, message: None }));

        let err = error_from_body(StatusCode::UNAUTHORIZED, b"");
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
