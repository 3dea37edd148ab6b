// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the message-board REST API.
//!
//! [`ApiClient`] builds URLs from a configured base, checks message ids before
//! any id-addressed request, and turns every failure into a context-prefixed
//! [`MsgboardError`].

use std::time::Duration;

use async_trait::async_trait;
use msgboard_config::model::{ApiConfig, UserMessagesPath};
use msgboard_core::message_id;
use msgboard_core::{
    Message, MessageApi, MsgboardError, Page, PageRequest, RegisterRequest, Task, TaskId,
    TaskSource, User, UserApi, UserUpdate,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::wire::{
    classify, ApiFailure, LoginReply, LoginRequest, NewMessageRequest, NotFoundPolicy,
    TaskAccepted, UpdateMessageRequest,
};

const CTX_LIST: &str = "Failed to get messages";
const CTX_LIST_BY_USER: &str = "Failed to get messages by user";
const CTX_GET: &str = "Failed to get message";
const CTX_CREATE: &str = "Failed to create message";
const CTX_UPDATE: &str = "Failed to update message";
const CTX_DELETE: &str = "Failed to delete message";
const CTX_TASK: &str = "Failed to get task status";
const CTX_LOGIN: &str = "Failed to log in";
const CTX_REGISTER: &str = "Failed to register user";
const CTX_GET_USER: &str = "Failed to get user";
const CTX_UPDATE_USER: &str = "Failed to update user";

/// HTTP client for the message-board backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    user_messages_path: UserMessagesPath,
}

impl ApiClient {
    /// Creates a client rooted at `base_url` (e.g. `http://localhost:8080/api/v1`).
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, MsgboardError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| MsgboardError::Config(format!("invalid base URL `{base_url}`: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MsgboardError::Config(format!(
                "base URL `{base_url}` cannot have path segments"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| MsgboardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            user_messages_path: UserMessagesPath::default(),
        })
    }

    /// Creates a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, MsgboardError> {
        Ok(Self::new(&config.base_url, config.request_timeout())?
            .with_user_messages_path(config.user_messages_path))
    }

    /// Selects which route shape is used for per-user listings.
    pub fn with_user_messages_path(mut self, path: UserMessagesPath) -> Self {
        self.user_messages_path = path;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn paged(&self, segments: &[&str], page: PageRequest) -> Url {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut()
            .append_pair("page", &page.page.to_string())
            .append_pair("size", &page.size.to_string());
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Sends a request, returning the response only if its status is a success.
    async fn send(
        &self,
        context: &'static str,
        request: RequestBuilder,
        not_found: NotFoundPolicy,
    ) -> Result<Response, MsgboardError> {
        let response = request.send().await.map_err(|e| {
            warn!(context, error = %e, "request failed before a response");
            MsgboardError::network(context, e)
        })?;

        let status = response.status();
        debug!(context, status = %status, url = %response.url(), "response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = classify(context, status, ApiFailure::parse(&body), not_found);
        warn!(context, status = %status, error = %err, "request rejected");
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(
        context: &'static str,
        response: Response,
    ) -> Result<T, MsgboardError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| MsgboardError::network(context, e))?;
        serde_json::from_slice(&body).map_err(|e| MsgboardError::Server {
            context: context.to_string(),
            status: Some(status.as_u16()),
            message: format!("failed to parse response: {e}"),
        })
    }

    /// Rejects a malformed id locally, with the validator's guidance.
    fn check_id(context: &'static str, id: &str) -> Result<(), MsgboardError> {
        message_id::check(id).map_err(|problem| {
            debug!(context, id, "rejected message id before sending");
            MsgboardError::invalid_identifier(context, problem.message())
        })
    }

    async fn accepted_task(
        &self,
        context: &'static str,
        request: RequestBuilder,
    ) -> Result<TaskId, MsgboardError> {
        let response = self.send(context, request, NotFoundPolicy::ClientError).await?;
        let accepted: TaskAccepted = Self::read_json(context, response).await?;
        let task_id = accepted.into_task_id();
        debug!(context, task_id = %task_id, "mutation accepted");
        Ok(task_id)
    }
}

#[async_trait]
impl TaskSource for ApiClient {
    async fn task_status(&self, task_id: &TaskId) -> Result<Task, MsgboardError> {
        let url = self.endpoint(&["tasks", task_id.as_str()]);
        let response = self
            .send(CTX_TASK, self.request(Method::GET, url), NotFoundPolicy::ClientError)
            .await?;
        Self::read_json(CTX_TASK, response).await
    }
}

#[async_trait]
impl MessageApi for ApiClient {
    async fn list_messages(&self, page: PageRequest) -> Result<Page<Message>, MsgboardError> {
        let url = self.paged(&["messages"], page);
        let response = self
            .send(CTX_LIST, self.request(Method::GET, url), NotFoundPolicy::ClientError)
            .await?;
        Self::read_json(CTX_LIST, response).await
    }

    async fn list_user_messages(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Page<Message>, MsgboardError> {
        let segments = match self.user_messages_path {
            UserMessagesPath::MessagesFirst => ["messages", "users", user_id],
            UserMessagesPath::UsersFirst => ["users", user_id, "messages"],
        };
        let url = self.paged(&segments, page);
        let response = self
            .send(
                CTX_LIST_BY_USER,
                self.request(Method::GET, url),
                NotFoundPolicy::ClientError,
            )
            .await?;
        Self::read_json(CTX_LIST_BY_USER, response).await
    }

    async fn get_message(&self, id: &str) -> Result<Message, MsgboardError> {
        Self::check_id(CTX_GET, id)?;
        let url = self.endpoint(&["messages", id]);
        let response = self
            .send(
                CTX_GET,
                self.request(Method::GET, url),
                NotFoundPolicy::Missing("Message"),
            )
            .await?;
        Self::read_json(CTX_GET, response).await
    }

    async fn create_message(&self, user_id: &str, content: &str) -> Result<TaskId, MsgboardError> {
        let url = self.endpoint(&["messages"]);
        let body = NewMessageRequest { user_id, content };
        self.accepted_task(CTX_CREATE, self.request(Method::POST, url).json(&body))
            .await
    }

    async fn update_message(&self, id: &str, content: &str) -> Result<TaskId, MsgboardError> {
        Self::check_id(CTX_UPDATE, id)?;
        let url = self.endpoint(&["messages", id]);
        let body = UpdateMessageRequest { content };
        self.accepted_task(CTX_UPDATE, self.request(Method::PUT, url).json(&body))
            .await
    }

    async fn delete_message(&self, id: &str) -> Result<TaskId, MsgboardError> {
        Self::check_id(CTX_DELETE, id)?;
        let url = self.endpoint(&["messages", id]);
        self.accepted_task(CTX_DELETE, self.request(Method::DELETE, url))
            .await
    }
}

#[async_trait]
impl UserApi for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<User, MsgboardError> {
        let url = self.endpoint(&["users", "login"]);
        let request = self
            .request(Method::POST, url)
            .json(&LoginRequest { username, password });

        let response = match self.send(CTX_LOGIN, request, NotFoundPolicy::ClientError).await {
            Ok(response) => response,
            // Without a server explanation, a rejected login is just "Login failed".
            Err(
                MsgboardError::Validation {
                    status, message, ..
                }
                | MsgboardError::Server {
                    status: Some(status),
                    message,
                    ..
                },
            ) if status < 500 && message.starts_with("response not ok") => {
                return Err(MsgboardError::Validation {
                    context: CTX_LOGIN.to_string(),
                    status,
                    message: "Login failed".to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let reply: LoginReply = Self::read_json(CTX_LOGIN, response).await?;
        Ok(reply.into_user())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User, MsgboardError> {
        let url = self.endpoint(&["users", "register"]);
        let response = self
            .send(
                CTX_REGISTER,
                self.request(Method::POST, url).json(request),
                NotFoundPolicy::ClientError,
            )
            .await?;
        Self::read_json(CTX_REGISTER, response).await
    }

    async fn get_user(&self, user_id: &str) -> Result<User, MsgboardError> {
        let url = self.endpoint(&["users", user_id]);
        let response = self
            .send(
                CTX_GET_USER,
                self.request(Method::GET, url),
                NotFoundPolicy::Missing("User"),
            )
            .await?;
        Self::read_json(CTX_GET_USER, response).await
    }

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<User, MsgboardError> {
        let url = self.endpoint(&["users", user_id]);
        let response = self
            .send(
                CTX_UPDATE_USER,
                self.request(Method::PUT, url).json(update),
                NotFoundPolicy::Missing("User"),
            )
            .await?;
        Self::read_json(CTX_UPDATE_USER, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgboard_core::ErrorKind;
    use serde_json::json;
    use tracing_test::traced_test;
    use wiremock::matchers::{any, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_ID: &str = "ABCD1234-EFGH-5678-IJKL-MNOPQRSTUVWX";

    fn test_client(server: &MockServer) -> ApiClient {
        ApiClient::new(&format!("{}/api/v1", server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn message_json(id: &str, content: &str) -> serde_json::Value {
        json!({
            "id": id,
            "userId": "alice",
            "content": content,
            "createdAt": "2025-03-01T10:15:30",
            "updatedAt": "2025-03-01T10:15:30"
        })
    }

    #[tokio::test]
    async fn list_messages_passes_page_and_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/messages"))
            .and(query_param("page", "2"))
            .and(query_param("size", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [message_json(VALID_ID, "hello")],
                "totalPages": 5,
                "number": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = test_client(&server)
            .list_messages(PageRequest::new(2, 25))
            .await
            .unwrap();
        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.content[0].content, "hello");
    }

    #[tokio::test]
    async fn list_user_messages_route_variants() {
        let server = MockServer::start().await;
        let empty = json!({"content": [], "totalPages": 0, "number": 0});

        Mock::given(method("GET"))
            .and(path("/api/v1/messages/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/alice/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .list_user_messages("alice", PageRequest::default())
            .await
            .unwrap();
        client
            .with_user_messages_path(UserMessagesPath::UsersFirst)
            .list_user_messages("alice", PageRequest::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_message_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/v1/messages/{VALID_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_json(VALID_ID, "hi")))
            .mount(&server)
            .await;

        let msg = test_client(&server).get_message(VALID_ID).await.unwrap();
        assert_eq!(msg.id, VALID_ID);
        assert_eq!(msg.user_id, "alice");
    }

    #[tokio::test]
    #[traced_test]
    async fn get_message_404_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/v1/messages/{VALID_ID}")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = test_client(&server).get_message(VALID_ID).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("not found"), "got: {err}");
        assert!(err.to_string().starts_with("Failed to get message: "));
        assert!(logs_contain("request rejected"));
    }

    #[tokio::test]
    async fn malformed_ids_never_reach_the_network() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        for bad in ["", "123", "not-a-valid-id", "abcd1234-efgh-5678-ijkl-mnopqrstuvwx"] {
            let err = client.get_message(bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "get {bad:?}");

            let err = client.update_message(bad, "x").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "update {bad:?}");

            let err = client.delete_message(bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "delete {bad:?}");
        }

        let err = client.delete_message("123").await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to delete message: legacy numeric"));
    }

    #[tokio::test]
    async fn create_message_returns_task_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/messages"))
            .and(body_json(json!({"userId": "alice", "content": "hello"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"taskId": "t1"})))
            .expect(1)
            .mount(&server)
            .await;

        let task_id = test_client(&server)
            .create_message("alice", "hello")
            .await
            .unwrap();
        assert_eq!(task_id, "t1");
    }

    #[tokio::test]
    async fn update_and_delete_return_task_ids() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(format!("/api/v1/messages/{VALID_ID}")))
            .and(body_json(json!({"content": "edited"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"taskId": "t-upd"})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v1/messages/{VALID_ID}")))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"taskId": "t-del"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert_eq!(client.update_message(VALID_ID, "edited").await.unwrap(), "t-upd");
        assert_eq!(client.delete_message(VALID_ID).await.unwrap(), "t-del");
    }

    #[tokio::test]
    async fn error_body_message_then_error_then_generic() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/messages"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"message": "content is required", "error": "Bad Request"})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/messages"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "Conflict"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/messages"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let err = client.create_message("alice", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Failed to create message: content is required");

        let err = client.create_message("alice", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create message: Conflict");

        let err = client.create_message("alice", "").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create message: response not ok (status 422)"
        );
    }

    #[tokio::test]
    async fn server_invalid_id_code_maps_to_invalid_identifier() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/v1/messages/{VALID_ID}")))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorCode": "INVALID_MESSAGE_ID",
                "message": "Invalid message ID format"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).get_message(VALID_ID).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
        assert_eq!(
            err.to_string(),
            "Failed to get message: Invalid message ID format"
        );
    }

    #[tokio::test]
    async fn unparseable_5xx_is_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/messages"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .list_messages(PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("status 502"));
    }

    #[tokio::test]
    async fn malformed_success_body_is_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/messages"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .create_message("alice", "hello")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert!(err.to_string().contains("failed to parse response"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let client = ApiClient::new("http://127.0.0.1:1/api/v1", Duration::from_secs(2)).unwrap();
        let err = client.list_messages(PageRequest::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.to_string().starts_with("Failed to get messages: "));
    }

    #[tokio::test]
    async fn task_status_is_fetched() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "taskId": "t1",
                "status": "PENDING"
            })))
            .mount(&server)
            .await;

        let task = test_client(&server).task_status(&TaskId::from("t1")).await.unwrap();
        assert_eq!(task.status, msgboard_core::TaskStatus::Pending);
        assert_eq!(task.error, None);
    }

    #[tokio::test]
    async fn login_success_and_failures() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/users/login"))
            .and(body_json(json!({"username": "alice", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Login successful",
                "user": {"id": 1, "username": "alice", "email": "alice@example.com"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/login"))
            .and(body_json(json!({"username": "alice", "password": "wrong"})))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Invalid username or password"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/login"))
            .and(body_json(json!({"username": "mallory", "password": "x"})))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let user = client.login("alice", "pw").await.unwrap();
        assert_eq!(user.id.as_deref(), Some("1"));
        assert_eq!(user.email, "alice@example.com");

        let err = client.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to log in: Invalid username or password");

        let err = client.login("mallory", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to log in: Login failed");
    }

    #[tokio::test]
    async fn user_profile_operations() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/users/register"))
            .and(body_json(json!({"username": "bob", "email": "bob@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2, "username": "bob", "email": "bob@example.com"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/users/2"))
            .and(body_json(json!({"email": "new@example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2, "username": "bob", "email": "new@example.com"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let bob = client
            .register(&RegisterRequest {
                username: "bob".into(),
                email: "bob@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(bob.id.as_deref(), Some("2"));

        let updated = client
            .update_user(
                "2",
                &UserUpdate {
                    email: Some("new@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "new@example.com");

        let err = client.get_user("99").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Failed to get user: User not found");
    }

    #[test]
    fn endpoint_joins_and_encodes_segments() {
        let client = ApiClient::new("http://localhost:8080/api/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(&["messages", "users", "a b/c"]).as_str(),
            "http://localhost:8080/api/v1/messages/users/a%20b%2Fc"
        );

        let client = ApiClient::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.paged(&["messages"], PageRequest::default()).as_str(),
            "http://localhost:8080/messages?page=0&size=10"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1)),
            Err(MsgboardError::Config(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(MsgboardError::Config(_))
        ));
    }
}
