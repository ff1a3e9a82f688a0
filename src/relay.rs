use std::time::Duration;

use futures_util::future::{FutureExt, LocalBoxFuture};
use reqwest::header::ACCEPT;

use crate::contact::{ContactFields, FormRelay, RelayError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "portfolio-site/0.1";

pub struct HttpRelay {
    client: reqwest::Client,
}

impl HttpRelay {
    pub fn new() -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| RelayError::Transport(error.to_string()))?;

        Ok(Self { client })
    }
}

impl FormRelay for HttpRelay {
    fn post<'a>(&'a self, endpoint: &'a str, fields: &'a ContactFields) -> LocalBoxFuture<'a, Result<u16, RelayError>> {
        async move {
            let response = self
                .client
                .post(endpoint)
                .header(ACCEPT, "application/json")
                .json(fields)
                .send()
                .await
                .map_err(|error| RelayError::Transport(error.to_string()))?;

            Ok(response.status().as_u16())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use tokio::sync::mpsc;

    async fn spawn_relay(status: StatusCode) -> (String, mpsc::UnboundedReceiver<serde_json::Value>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/f/test",
            post(move |Json(body): Json<serde_json::Value>| {
                let sender = sender.clone();
                async move {
                    let _ = sender.send(body);
                    status
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        (format!("http://{address}/f/test"), receiver)
    }

    fn fields() -> ContactFields {
        ContactFields {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn relay_reports_server_error_status() {
        let (endpoint, mut received) = spawn_relay(StatusCode::INTERNAL_SERVER_ERROR).await;
        let relay = HttpRelay::new().expect("client builds");

        let status = relay.post(&endpoint, &fields()).await.expect("request reaches the server");

        assert_eq!(status, 500);
        let body = received.recv().await.expect("server saw the payload");
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["subject"], "Hi");
    }

    #[tokio::test]
    async fn relay_reports_success_status() {
        let (endpoint, _received) = spawn_relay(StatusCode::OK).await;
        let relay = HttpRelay::new().expect("client builds");

        let status = relay.post(&endpoint, &fields()).await.expect("request reaches the server");

        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = listener.local_addr().expect("listener address");
        drop(listener);
        let relay = HttpRelay::new().expect("client builds");

        let result = relay.post(&format!("http://{address}/f/test"), &fields()).await;

        assert!(matches!(result, Err(RelayError::Transport(_))));
    }
}
