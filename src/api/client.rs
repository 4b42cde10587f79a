//! HTTP client for the procurement backend.
//!
//! The backend is an opaque REST service; every call here is a thin wrapper
//! around one endpoint. Authenticated calls attach the session bearer token.
//! The client is cheap to clone and is handed to spawned fetch tasks, so a
//! clone taken at spawn time carries the token that was current then.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::error::ApiError;
use super::models::{
    LoginTokens, NegotiationMessage, NegotiationThread, NewMessage, NewRequest, NewResponse,
    NewThread, Product, Registration, ResponseStatus, ResponseUpdate, RfxRequest, SupplierResponse,
    SupportTicket, User, WorkflowRule,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Copy of this client carrying the given bearer token.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.token = Some(token.into());
        client
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Status-only variant for endpoints whose body we discard.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.authorize(self.http.get(self.url(path))).send().await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_ok<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .authorize(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(self.http.put(self.url(path)))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn patch_ok<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .authorize(self.http.patch(self.url(path)))
            .json(body)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    // ---- auth ----

    /// Full sign-in flow: exchange credentials for a token, then resolve the
    /// account behind it. Falls back to the first entry of the user listing
    /// when the `me` endpoint is unavailable.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, String), ApiError> {
        let tokens: LoginTokens = self
            .post(
                "/api/v1/auth/login/",
                &json!({ "username": username, "password": password }),
            )
            .await?;

        let authed = self.with_token(tokens.access.clone());
        let user = match authed.me().await {
            Ok(user) => user,
            Err(err) => {
                tracing::debug!("me endpoint unavailable ({err}), falling back to user listing");
                authed
                    .users()
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| ApiError::Unexpected("empty user listing".into()))?
            }
        };
        Ok((user, tokens.access))
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get("/api/v1/auth/me/").await
    }

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/api/v1/auth/users/").await
    }

    pub async fn register(&self, form: &Registration) -> Result<(), ApiError> {
        self.post_ok("/api/v1/auth/register/", form).await
    }

    // ---- catalog ----

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/products/").await
    }

    /// Products limited to one supplying company.
    pub async fn company_products(&self, company_id: i64) -> Result<Vec<Product>, ApiError> {
        self.get(&format!("/products/?supplier={company_id}")).await
    }

    pub async fn suppliers(&self) -> Result<Vec<User>, ApiError> {
        self.get("/api/v1/suppliers/").await
    }

    // ---- requests ----

    pub async fn requests(&self) -> Result<Vec<RfxRequest>, ApiError> {
        self.get("/api/v1/requests/").await
    }

    pub async fn create_request(&self, request: &NewRequest) -> Result<RfxRequest, ApiError> {
        self.post("/api/v1/requests/", request).await
    }

    pub async fn invite_suppliers(
        &self,
        request_id: i64,
        supplier_ids: &[i64],
    ) -> Result<(), ApiError> {
        self.post_ok(
            &format!("/api/v1/requests/{request_id}/invite/"),
            &json!({ "supplier_ids": supplier_ids }),
        )
        .await
    }

    // ---- responses ----

    pub async fn responses(&self) -> Result<Vec<SupplierResponse>, ApiError> {
        self.get("/api/v1/responses/").await
    }

    pub async fn submit_response(
        &self,
        response: &NewResponse,
    ) -> Result<SupplierResponse, ApiError> {
        self.post("/api/v1/responses/", response).await
    }

    pub async fn update_response(
        &self,
        response_id: i64,
        update: &ResponseUpdate,
    ) -> Result<SupplierResponse, ApiError> {
        self.put(&format!("/api/v1/responses/{response_id}/"), update)
            .await
    }

    /// Withdraw a response by flipping its status to rejected.
    pub async fn close_response(&self, response_id: i64) -> Result<(), ApiError> {
        self.patch_ok(
            &format!("/api/v1/responses/{response_id}/"),
            &json!({ "status": ResponseStatus::Rejected }),
        )
        .await
    }

    pub async fn accept_award(&self, response_id: i64) -> Result<(), ApiError> {
        self.post_ok(&format!("/api/v1/responses/{response_id}/accept/"), &json!({}))
            .await
    }

    pub async fn decline_award(&self, response_id: i64) -> Result<(), ApiError> {
        self.post_ok(&format!("/api/v1/responses/{response_id}/decline/"), &json!({}))
            .await
    }

    // ---- negotiation ----

    /// Threads for one request; the backend returns at most one per supplier.
    pub async fn negotiation_threads(
        &self,
        request_id: i64,
    ) -> Result<Vec<NegotiationThread>, ApiError> {
        self.get(&format!("/api/v1/negotiation-threads/?request={request_id}"))
            .await
    }

    pub async fn start_negotiation(
        &self,
        thread: &NewThread,
    ) -> Result<NegotiationThread, ApiError> {
        self.post("/api/v1/negotiation-threads/", thread).await
    }

    pub async fn send_message(
        &self,
        message: &NewMessage,
    ) -> Result<NegotiationMessage, ApiError> {
        self.post("/api/v1/negotiation-messages/", message).await
    }

    // ---- admin / reporting ----

    pub async fn analytics(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/analytics/dashboard/").await
    }

    pub async fn workflow_rules(&self) -> Result<Vec<WorkflowRule>, ApiError> {
        self.get("/api/v1/notifications/workflow-rules/").await
    }

    pub async fn support_tickets(&self) -> Result<Vec<SupportTicket>, ApiError> {
        self.get("/api/v1/notifications/support-tickets/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = client();
        assert_eq!(
            client.url("/api/v1/requests/"),
            "http://localhost:8000/api/v1/requests/"
        );
    }

    #[test]
    fn with_token_does_not_mutate_original() {
        let client = client();
        let authed = client.with_token("abc");
        assert!(client.token.is_none());
        assert_eq!(authed.token.as_deref(), Some("abc"));
    }
}
