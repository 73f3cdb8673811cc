use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BotError, BotResult};

/// Anything that can answer "what changed since `from_date`?".
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// One request/response cycle. The payload is returned undecoded into
    /// domain types; validation is the caller's job.
    async fn fetch(&self, from_date: i64) -> BotResult<Value>;
}

/// Client for the Practicum homework_statuses endpoint.
pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> BotResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> BotResult<Value> {
        debug!(
            "Requesting homework statuses from {} (from_date={})",
            self.endpoint, from_date
        );

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BotError::UnexpectedStatusCode(status.as_u16()));
        }

        let body: Value = response.json().await?;

        if body.get("code").and_then(Value::as_str) == Some("not_authenticated") {
            return Err(BotError::Authentication);
        }

        info!("Homework API answered");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PATH: &str = "/api/user_api/homework_statuses/";

    fn client_for(server: &MockServer) -> PracticumClient {
        let endpoint = format!("{}{}", server.uri(), PATH);
        PracticumClient::new(&endpoint, "test-token", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_token_and_cursor() {
        let server = MockServer::start().await;
        let body = json!({
            "homeworks": [{"homework_name": "proj1", "status": "approved"}],
            "current_date": 1000
        });
        Mock::given(method("GET"))
            .and(path(PATH))
            .and(header("Authorization", "OAuth test-token"))
            .and(query_param("from_date", "900"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.fetch(900).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_not_authenticated_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": "not_authenticated"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.fetch(0).await,
            Err(BotError::Authentication)
        ));
    }

    #[tokio::test]
    async fn test_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.fetch(0).await,
            Err(BotError::UnexpectedStatusCode(503))
        ));
    }

    #[tokio::test]
    async fn test_accepted_is_not_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(202)
                    .set_body_json(json!({"homeworks": [], "current_date": 7})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.fetch(0).await,
            Err(BotError::UnexpectedStatusCode(202))
        ));
    }

    #[tokio::test]
    async fn test_no_content_is_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.fetch(0).await,
            Err(BotError::UnexpectedStatusCode(204))
        ));
    }

    #[tokio::test]
    async fn test_body_that_is_not_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(client.fetch(0).await, Err(BotError::Transport(_))));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"homeworks": [], "current_date": 1}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let endpoint = format!("{}{}", server.uri(), PATH);
        let client =
            PracticumClient::new(&endpoint, "test-token", Duration::from_millis(200)).unwrap();
        assert!(matches!(client.fetch(0).await, Err(BotError::Transport(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let endpoint = format!("http://127.0.0.1:1{}", PATH);
        let client = PracticumClient::new(&endpoint, "t", Duration::from_secs(1)).unwrap();
        assert!(matches!(client.fetch(0).await, Err(BotError::Transport(_))));
    }

    #[tokio::test]
    async fn test_other_body_passes_through_unvalidated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.fetch(0).await.unwrap(), json!([1, 2, 3]));
    }
}
