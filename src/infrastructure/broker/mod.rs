// src/infrastructure/broker/mod.rs
// Kite web API repository implementation

use std::time::Duration;

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Client, Method, Request, Uri};
use hyper_tls::HttpsConnector;

use crate::application::dto::encode_order_form;
use crate::application::dto::parser::{parse_holdings, parse_order_id, parse_orders};
use crate::domain::errors::{BrokerError, BrokerResult};
use crate::domain::model::{AccountIdentity, Holding, OrderId, OrderRequest, OrderSummary, SessionToken};
use crate::domain::repository::BrokerRepository;

pub const DEFAULT_API_ROOT: &str = "https://kite.zerodha.com/oms";
const KITE_VERSION: &str = "3";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Authenticated handle on the Kite web API for one account session.
pub struct KiteClient {
    identity: AccountIdentity,
    token: SessionToken,
    api_root: String,
    timeout: Option<Duration>,
    client: Client<HttpsConnector<HttpConnector>>,
}

impl KiteClient {
    /// The token is not checked here; a bad one surfaces on the first call.
    pub fn new(identity: AccountIdentity, token: SessionToken) -> Self {
        let https = HttpsConnector::new();
        Self {
            identity,
            token,
            api_root: DEFAULT_API_ROOT.to_string(),
            timeout: None,
            client: Client::builder().build::<_, Body>(https),
        }
    }

    pub fn with_api_root(mut self, api_root: &str) -> Self {
        self.api_root = api_root.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn identity(&self) -> &AccountIdentity {
        &self.identity
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn authorization(&self) -> BrokerResult<HeaderValue> {
        HeaderValue::from_str(&format!("enctoken {}", self.token.expose())).map_err(|_| {
            BrokerError::Authentication(
                "session token cannot be sent as an Authorization header".to_string(),
            )
        })
    }

    fn endpoint(&self, path: &str) -> BrokerResult<Uri> {
        let url = format!("{}{}", self.api_root, path);
        url.parse::<Uri>()
            .map_err(|e| BrokerError::Transport(format!("Invalid endpoint {}: {}", url, e)))
    }

    async fn send(&self, method: Method, path: &str, form: Option<String>) -> BrokerResult<(u16, Bytes)> {
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(self.endpoint(path)?)
            .header(AUTHORIZATION, self.authorization()?)
            .header("X-Kite-Version", KITE_VERSION);

        let body = match form {
            Some(form) => {
                builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
                Body::from(form)
            }
            None => Body::empty(),
        };

        let request = builder
            .body(body)
            .map_err(|e| BrokerError::Transport(format!("Failed to build request: {}", e)))?;

        log::debug!("{} {} as {}", method, path, self.identity.user_id);

        let exchange = async {
            let response = self.client.request(request).await?;
            let status = response.status().as_u16();
            let bytes = hyper::body::to_bytes(response.into_body()).await?;
            Ok::<_, BrokerError>((status, bytes))
        };

        let (status, bytes) = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange).await.map_err(|_| {
                BrokerError::Transport(format!("{} {} timed out after {:?}", method, path, limit))
            })??,
            None => exchange.await?,
        };

        log::debug!("{} {} -> HTTP {} ({} bytes)", method, path, status, bytes.len());
        Ok((status, bytes))
    }
}

#[async_trait]
impl BrokerRepository for KiteClient {
    async fn place_order(&self, order: &OrderRequest) -> BrokerResult<OrderId> {
        let path = format!("/orders/{}", order.variety.as_str());
        let (status, body) = self
            .send(Method::POST, &path, Some(encode_order_form(order)))
            .await?;
        parse_order_id(status, &body)
    }

    async fn orders(&self) -> BrokerResult<Vec<OrderSummary>> {
        let (status, body) = self.send(Method::GET, "/orders", None).await?;
        parse_orders(status, &body)
    }

    async fn holdings(&self) -> BrokerResult<Vec<Holding>> {
        let (status, body) = self.send(Method::GET, "/portfolio/holdings", None).await?;
        parse_holdings(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(token: &str) -> KiteClient {
        KiteClient::new(AccountIdentity::new("Naitik", "VTE578"), SessionToken::new(token))
    }

    #[test]
    fn binds_identity_and_token() {
        let client = client("abc123");
        assert_eq!(client.identity().display_name, "Naitik");
        assert_eq!(client.identity().user_id, "VTE578");
        assert_eq!(client.token().expose(), "abc123");
        assert_eq!(client.api_root(), DEFAULT_API_ROOT);
    }

    #[test]
    fn authorization_uses_enctoken_scheme() {
        let header = client("abc123").authorization().unwrap();
        assert_eq!(header.to_str().unwrap(), "enctoken abc123");
    }

    #[test]
    fn token_with_newline_fails_as_authentication() {
        let err = client("abc123\n").authorization().unwrap_err();
        assert!(matches!(err, BrokerError::Authentication(_)));
    }

    #[test]
    fn api_root_trailing_slash_is_dropped() {
        let client = client("t").with_api_root("http://127.0.0.1:9000/oms/");
        assert_eq!(
            client.endpoint("/orders").unwrap().to_string(),
            "http://127.0.0.1:9000/oms/orders"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = client("t").with_api_root(&format!("http://127.0.0.1:{}", port));
        let err = client.holdings().await.unwrap_err();
        assert!(matches!(err, BrokerError::Transport(_)));
    }
}
