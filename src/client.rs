//! Postmark async client implementation.

use crate::template::TemplatedBatch;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};
use crate::{Email, EmailResponse, Error, Result, TemplatedEmail};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

const BASE_URL: &str = "https://api.postmarkapp.com";
const SERVER_TOKEN_HEADER: &str = "x-postmark-server-token";
const ACCOUNT_TOKEN_HEADER: &str = "x-postmark-account-token";
const JSON: &str = "application/json";

/// Which credential authenticates a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenKind {
    /// Server-level token, used by every sending endpoint.
    #[default]
    Server,
    /// Account-level token, for account management endpoints.
    Account,
}

/// Async client for the Postmark email API.
///
/// Use [`Client::new`] for the default `reqwest` transport,
/// [`Client::with_transport`] to inject one, or [`Client::builder`] to also
/// override the base URL.
///
/// The client holds no mutable state. Sharing it between tasks is safe
/// whenever the transport is.
pub struct Client<T = ReqwestTransport> {
    transport: T,
    server_token: String,
    account_token: String,
    base_url: String,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for the production API using a default
    /// [`ReqwestTransport`].
    ///
    /// # Examples
    /// ```no_run
    /// # use postmark_client::Client;
    /// # fn main() -> Result<(), postmark_client::Error> {
    /// let client = Client::new("server-token", "account-token")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(server_token: impl Into<String>, account_token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new()
            .server_token(server_token)
            .account_token(account_token)
            .build()
    }
}

impl<T: Transport> Client<T> {
    /// Create a client for the production API on top of `transport`.
    pub fn with_transport(
        transport: T,
        server_token: impl Into<String>,
        account_token: impl Into<String>,
    ) -> Self {
        ClientBuilder::new()
            .server_token(server_token)
            .account_token(account_token)
            .build_with(transport)
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a single email.
    ///
    /// A nonzero `ErrorCode` in the response is returned as
    /// [`Error::Delivery`], which still carries the decoded response.
    ///
    /// # Examples
    /// ```no_run
    /// # use postmark_client::{Client, Email};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postmark_client::Error> {
    /// let client = Client::new("server-token", "account-token")?;
    /// let email = Email::new("sender@example.com", "receiver@example.com")
    ///     .with_subject("Hello")
    ///     .with_text_body("Hi there");
    /// let response = client.send_email(&email).await?;
    /// println!("{}", response.message_id);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, email))]
    pub async fn send_email(&self, email: &Email) -> Result<EmailResponse> {
        let response = self
            .request(Method::POST, "email", Some(email), TokenKind::Server)
            .await?;
        check_delivery(response)
    }

    /// Send several emails in one request.
    ///
    /// Responses line up with `emails` by position. Each entry may carry its
    /// own nonzero `ErrorCode`; those are not turned into errors here.
    /// Postmark accepts at most 500 messages per batch; neither that limit
    /// nor an empty batch is checked locally.
    #[instrument(skip(self, emails), fields(count = emails.len()))]
    pub async fn send_email_batch(&self, emails: &[Email]) -> Result<Vec<EmailResponse>> {
        self.request(Method::POST, "email/batch", Some(emails), TokenKind::Server)
            .await
    }

    /// Send an email rendered from a template.
    ///
    /// Display names are merged into a copy of `email`; the argument itself is
    /// left untouched.
    #[instrument(skip(self, email))]
    pub async fn send_email_with_template(&self, email: &TemplatedEmail) -> Result<EmailResponse> {
        let prepared = email.prepared();
        let response = self
            .request(
                Method::POST,
                "email/withTemplate",
                Some(&*prepared),
                TokenKind::Server,
            )
            .await?;
        check_delivery(response)
    }

    /// Send several templated emails in one request.
    ///
    /// The messages are wrapped as `{"Messages": [...]}`, in order. An empty
    /// slice is rejected with [`Error::Validation`] before anything is sent.
    #[instrument(skip(self, emails), fields(count = emails.len()))]
    pub async fn send_email_batch_with_template(
        &self,
        emails: &[TemplatedEmail],
    ) -> Result<Vec<EmailResponse>> {
        if emails.is_empty() {
            return Err(Error::Validation("the batch contains no emails".into()));
        }

        let batch = TemplatedBatch::new(emails);
        self.request(
            Method::POST,
            "email/batchWithTemplates",
            Some(&batch),
            TokenKind::Server,
        )
        .await
    }

    /// Perform one request against the API and decode the JSON response.
    ///
    /// `path` is relative to the base URL. The payload, if any, is sent as
    /// JSON. Exactly one token header is attached, chosen by `token`.
    ///
    /// # Examples
    /// ```no_run
    /// # use postmark_client::{Client, Method, TokenKind};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), postmark_client::Error> {
    /// let client = Client::new("server-token", "account-token")?;
    /// let servers: serde_json::Value = client
    ///     .request::<(), _>(Method::GET, "servers?count=10&offset=0", None, TokenKind::Account)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(level = "debug", skip(self, payload))]
    pub async fn request<P, R>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&P>,
        token: TokenKind,
    ) -> Result<R>
    where
        P: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let body = payload
            .map(serde_json::to_vec)
            .transpose()
            .map_err(Error::Serialize)?;

        let request = HttpRequest {
            method,
            url: self.url(path),
            headers: self.headers(token)?,
            body,
        };

        debug!(url = %request.url, "sending Postmark request");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(Error::Transport)?;

        debug!(status = %response.status, "received Postmark response");

        if !response.status.is_success() {
            return Err(api_error(response.status, &response.body));
        }

        serde_json::from_slice(&response.body).map_err(Error::Deserialize)
    }

    /// Join the base URL and a relative path.
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build headers for API requests.
    fn headers(&self, token: TokenKind) -> Result<HeaderMap> {
        let (name, value) = match token {
            TokenKind::Account => (ACCOUNT_TOKEN_HEADER, &self.account_token),
            TokenKind::Server => (SERVER_TOKEN_HEADER, &self.server_token),
        };
        let mut value = HeaderValue::from_str(value).map_err(|e| Error::Transport(e.into()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(HeaderName::from_static(name), value);
        Ok(headers)
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Error body Postmark returns alongside non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ApiErrorBody {
    error_code: i64,
    message: String,
}

fn api_error(status: StatusCode, body: &[u8]) -> Error {
    let (error_code, message) = match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => (parsed.error_code, parsed.message),
        Ok(parsed) => (parsed.error_code, String::from_utf8_lossy(body).into_owned()),
        Err(_) => (0, String::from_utf8_lossy(body).into_owned()),
    };
    warn!(%status, error_code, "Postmark API rejected the request");
    Error::Api {
        status,
        error_code,
        message,
    }
}

/// Turn a nonzero `ErrorCode` into [`Error::Delivery`].
fn check_delivery(response: EmailResponse) -> Result<EmailResponse> {
    if response.is_success() {
        return Ok(response);
    }

    warn!(
        error_code = response.error_code,
        message = %response.message,
        "Postmark reported a delivery error"
    );
    Err(Error::Delivery(Box::new(response)))
}

/// Builder for configuring a Postmark client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Clone)]
pub struct ClientBuilder {
    server_token: String,
    account_token: String,
    base_url: String,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Empty server and account tokens
    /// - Production API at `https://api.postmarkapp.com`
    pub fn new() -> Self {
        Self {
            server_token: String::new(),
            account_token: String::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Set the server-level token.
    pub fn server_token(mut self, token: impl Into<String>) -> Self {
        self.server_token = token.into();
        self
    }

    /// Set the account-level token.
    pub fn account_token(mut self, token: impl Into<String>) -> Self {
        self.account_token = token.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the client with a default [`ReqwestTransport`].
    pub fn build(self) -> Result<Client> {
        let transport = ReqwestTransport::new()?;
        Ok(self.build_with(transport))
    }

    /// Build the client on top of the given transport.
    pub fn build_with<T: Transport>(self, transport: T) -> Client<T> {
        Client {
            transport,
            server_token: self.server_token,
            account_token: self.account_token,
            base_url: self.base_url,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::transport::HttpResponse;
    use serde_json::{Value, json};
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    /// Transport that records requests and replays canned responses.
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<VecDeque<std::result::Result<HttpResponse, String>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        fn respond(status: u16, body: impl Into<Vec<u8>>) -> Arc<Self> {
            let mock = Self::default();
            mock.responses.lock().unwrap().push_back(Ok(HttpResponse::new(
                StatusCode::from_u16(status).unwrap(),
                body,
            )));
            Arc::new(mock)
        }

        fn respond_json(status: u16, body: Value) -> Arc<Self> {
            Self::respond(status, body.to_string())
        }

        fn fail(message: &str) -> Arc<Self> {
            let mock = Self::default();
            mock.responses
                .lock()
                .unwrap()
                .push_back(Err(message.to_string()));
            Arc::new(mock)
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn only_request(&self) -> HttpRequest {
            let requests = self.requests();
            assert_eq!(requests.len(), 1, "expected exactly one request");
            requests.into_iter().next().unwrap()
        }
    }

    impl Transport for MockTransport {
        async fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, BoxError> {
            self.requests.lock().unwrap().push(request);
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(message.into()),
                None => Err("no canned response left".into()),
            }
        }
    }

    fn client(transport: &Arc<MockTransport>) -> Client<Arc<MockTransport>> {
        Client::with_transport(Arc::clone(transport), "server-token", "account-token")
    }

    fn body_json(request: &HttpRequest) -> Value {
        serde_json::from_slice(request.body.as_deref().expect("request has a body")).unwrap()
    }

    fn ok_response(to: &str) -> Value {
        json!({
            "To": to,
            "SubmittedAt": "2014-02-17T07:25:01.4178645-05:00",
            "MessageID": "0a129aee-e1cd-480d-b08d-4f48548ff48d",
            "ErrorCode": 0,
            "Message": "OK"
        })
    }

    #[test]
    fn builder_defaults() {
        let builder = ClientBuilder::new();
        assert_eq!(builder.base_url, "https://api.postmarkapp.com");
        assert!(builder.server_token.is_empty());
        assert!(builder.account_token.is_empty());
    }

    #[test]
    fn debug_hides_tokens() {
        let transport = Arc::new(MockTransport::default());
        let rendered = format!("{:?}", client(&transport));
        assert!(!rendered.contains("server-token"));
        assert!(!rendered.contains("account-token"));
        assert!(rendered.contains("api.postmarkapp.com"));
    }

    #[test]
    fn url_joins_with_single_slash() {
        let transport = Arc::new(MockTransport::default());
        let client = Client::builder()
            .base_url("http://localhost:8080/")
            .build_with(Arc::clone(&transport));
        assert_eq!(client.url("email/batch"), "http://localhost:8080/email/batch");
        assert_eq!(client.url("/email"), "http://localhost:8080/email");
    }

    #[tokio::test]
    async fn send_email_posts_to_email_endpoint() {
        let transport = MockTransport::respond_json(200, ok_response("receiver@example.com"));
        let email = Email::new("sender@example.com", "receiver@example.com")
            .with_subject("Hello")
            .with_text_body("Hi");

        let response = client(&transport).send_email(&email).await.unwrap();

        assert_eq!(response.to, "receiver@example.com");
        assert_eq!(response.message_id, "0a129aee-e1cd-480d-b08d-4f48548ff48d");

        let request = transport.only_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://api.postmarkapp.com/email");
        assert_eq!(request.headers.get("accept").unwrap(), "application/json");
        assert_eq!(request.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(
            body_json(&request),
            json!({
                "From": "sender@example.com",
                "To": "receiver@example.com",
                "Subject": "Hello",
                "TextBody": "Hi"
            })
        );
    }

    #[tokio::test]
    async fn sending_uses_server_token_only() {
        let transport = MockTransport::respond_json(200, ok_response("a@example.com"));
        client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap();

        let request = transport.only_request();
        assert_eq!(
            request.headers.get("x-postmark-server-token").unwrap(),
            "server-token"
        );
        assert!(request.headers.get("x-postmark-account-token").is_none());
    }

    #[tokio::test]
    async fn account_requests_use_account_token_only() {
        let transport = MockTransport::respond_json(200, json!({ "TotalCount": 0, "Servers": [] }));

        let value: Value = client(&transport)
            .request::<(), _>(Method::GET, "servers", None, TokenKind::Account)
            .await
            .unwrap();

        assert_eq!(value["TotalCount"], 0);
        let request = transport.only_request();
        assert_eq!(request.method, Method::GET);
        assert!(request.body.is_none());
        assert_eq!(
            request.headers.get("x-postmark-account-token").unwrap(),
            "account-token"
        );
        assert!(request.headers.get("x-postmark-server-token").is_none());
    }

    #[tokio::test]
    async fn zero_error_code_with_message_is_success() {
        let transport = MockTransport::respond_json(200, ok_response("a@example.com"));
        let result = client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await;

        let response = result.unwrap();
        assert_eq!(response.message, "OK");
    }

    #[tokio::test]
    async fn nonzero_error_code_is_delivery_error_with_response() {
        let transport = MockTransport::respond_json(
            200,
            json!({
                "To": "inactive@example.com",
                "MessageID": "b7bc2f4a-e38e-4336-af7d-e6c392c2f817",
                "ErrorCode": 406,
                "Message": "You tried to send to a recipient that has been marked as inactive."
            }),
        );

        let err = client(&transport)
            .send_email(&Email::new("s@example.com", "inactive@example.com"))
            .await
            .unwrap_err();

        let text = err.to_string();
        assert!(text.contains("406"));
        assert!(text.contains("marked as inactive"));

        let response = err.into_delivery_response().unwrap();
        assert_eq!(response.to, "inactive@example.com");
        assert_eq!(response.message_id, "b7bc2f4a-e38e-4336-af7d-e6c392c2f817");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let transport = MockTransport::respond_json(
            422,
            json!({ "ErrorCode": 300, "Message": "Invalid email request" }),
        );

        let err = client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap_err();

        match err {
            Error::Api {
                status,
                error_code,
                message,
            } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(error_code, 300);
                assert_eq!(message, "Invalid email request");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_as_message() {
        let transport = MockTransport::respond(503, "Service Unavailable");

        let err = client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Api { error_code: 0, ref message, .. } if message == "Service Unavailable"
        ));
    }

    #[tokio::test]
    async fn undecodable_body_is_deserialize_error() {
        let transport = MockTransport::respond(200, "<html>gateway</html>");

        let err = client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_transport_error() {
        let transport = MockTransport::fail("connection refused");

        let err = client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn invalid_token_fails_before_sending() {
        let transport = Arc::new(MockTransport::default());
        let client = Client::with_transport(Arc::clone(&transport), "bad\ntoken", "account-token");

        let err = client
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn unserializable_payload_fails_before_sending() {
        let transport = Arc::new(MockTransport::default());
        let payload: HashMap<(i32, i32), i32> = HashMap::from([((1, 2), 3)]);

        let err = client(&transport)
            .request::<_, Value>(Method::POST, "email", Some(&payload), TokenKind::Server)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Serialize(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn batch_posts_bare_array_and_keeps_per_entry_errors() {
        let transport = MockTransport::respond_json(
            200,
            json!([
                ok_response("one@example.com"),
                { "To": "two@example.com", "ErrorCode": 406, "Message": "Inactive recipient" }
            ]),
        );
        let emails = vec![
            Email::new("s@example.com", "one@example.com").with_text_body("1"),
            Email::new("s@example.com", "two@example.com").with_text_body("2"),
        ];

        let responses = client(&transport).send_email_batch(&emails).await.unwrap();

        assert_eq!(responses.len(), 2);
        assert!(responses[0].is_success());
        assert_eq!(responses[1].error_code, 406);

        let request = transport.only_request();
        assert_eq!(request.url, "https://api.postmarkapp.com/email/batch");
        let body = body_json(&request);
        let entries = body.as_array().unwrap();
        assert_eq!(entries[0]["To"], "one@example.com");
        assert_eq!(entries[1]["To"], "two@example.com");
    }

    #[tokio::test]
    async fn empty_template_batch_fails_validation_without_sending() {
        let transport = Arc::new(MockTransport::default());

        let err = client(&transport)
            .send_email_batch_with_template(&[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn empty_plain_batch_is_sent_as_empty_array() {
        let transport = MockTransport::respond_json(200, json!([]));

        let responses = client(&transport).send_email_batch(&[]).await.unwrap();

        assert!(responses.is_empty());
        assert_eq!(body_json(&transport.only_request()), json!([]));
    }

    #[tokio::test]
    async fn malformed_submitted_at_is_deserialize_error() {
        let transport = MockTransport::respond_json(
            200,
            json!({
                "To": "a@example.com",
                "SubmittedAt": "garbage",
                "MessageID": "0a129aee-e1cd-480d-b08d-4f48548ff48d",
                "ErrorCode": 0,
                "Message": "OK"
            }),
        );

        let err = client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[tokio::test]
    async fn foreign_json_error_body_is_kept_as_message() {
        let transport = MockTransport::respond_json(500, json!({ "error": "upstream exploded" }));

        let err = client(&transport)
            .send_email(&Email::new("s@example.com", "a@example.com"))
            .await
            .unwrap_err();

        match err {
            Error::Api {
                status,
                error_code,
                message,
            } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(error_code, 0);
                assert!(message.contains("upstream exploded"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn template_send_merges_display_names() {
        let transport = MockTransport::respond_json(200, ok_response("ann@example.com"));
        let email = TemplatedEmail::with_template_id(1234, "joe@example.com", "ann@example.com")
            .with_from_name("Joe, jr")
            .with_to_name("Ann")
            .with_model_value("product", "Widget");

        client(&transport)
            .send_email_with_template(&email)
            .await
            .unwrap();

        let request = transport.only_request();
        assert_eq!(request.url, "https://api.postmarkapp.com/email/withTemplate");
        assert_eq!(
            body_json(&request),
            json!({
                "TemplateId": 1234,
                "TemplateModel": { "product": "Widget" },
                "From": "\"Joe, jr\" joe@example.com",
                "To": "\"Ann\" ann@example.com"
            })
        );
        assert_eq!(email.from, "joe@example.com");
    }

    #[tokio::test]
    async fn template_send_reports_delivery_errors() {
        let transport = MockTransport::respond_json(
            200,
            json!({ "To": "a@example.com", "ErrorCode": 1101, "Message": "Template not found" }),
        );
        let email = TemplatedEmail::with_template_alias("missing", "s@example.com", "a@example.com");

        let err = client(&transport)
            .send_email_with_template(&email)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), Some(1101));
        assert!(err.delivery_response().is_some());
    }

    #[tokio::test]
    async fn template_batch_wraps_messages_and_leaves_input_untouched() {
        let transport = MockTransport::respond_json(
            200,
            json!([ok_response("one@example.com"), ok_response("two@example.com")]),
        );
        let emails = vec![
            TemplatedEmail::with_template_id(1, "joe@example.com", "one@example.com")
                .with_from_name("Joe, jr"),
            TemplatedEmail::with_template_alias("welcome", "joe@example.com", "two@example.com"),
        ];
        let before = emails.clone();

        let responses = client(&transport)
            .send_email_batch_with_template(&emails)
            .await
            .unwrap();

        assert_eq!(responses.len(), 2);
        assert_eq!(emails, before);

        let request = transport.only_request();
        assert_eq!(
            request.url,
            "https://api.postmarkapp.com/email/batchWithTemplates"
        );
        let body = body_json(&request);
        assert_eq!(body.as_object().unwrap().len(), 1);
        let messages = body["Messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["From"], "\"Joe, jr\" joe@example.com");
        assert_eq!(messages[0]["To"], "one@example.com");
        assert_eq!(messages[1]["From"], "joe@example.com");
        assert_eq!(messages[1]["TemplateAlias"], "welcome");
    }
}
