// API client module: a small blocking HTTP client for the book catalog
// backend. Each operation builds one request, sends it and hands back the
// raw status and body. Interpreting the response is the caller's job.

use crate::error::{ClientError, Result};
use crate::models::{BookDraft, BookId, ErrorDetail, LoginForm, RegisterRequest};
use reqwest::blocking::{Client, Request};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }

    /// The `detail` message of an error body, when there is a usable one.
    pub fn detail(&self) -> Option<String> {
        self.json::<ErrorDetail>()
            .ok()
            .and_then(|d| d.message().map(str::to_string))
    }
}

/// The six operations the backend exposes. Implemented over HTTP by
/// [`ApiClient`]; tests substitute an in-memory fake.
pub trait BookApi {
    fn register(&self, username: &str, email: &str, password: &str) -> Result<ApiResponse>;
    fn login(&self, email: &str, password: &str) -> Result<ApiResponse>;
    fn list_books(&self, token: &str) -> Result<ApiResponse>;
    fn create_book(&self, book: &BookDraft, token: &str) -> Result<ApiResponse>;
    fn update_book(&self, id: &BookId, book: &BookDraft, token: &str) -> Result<ApiResponse>;
    fn delete_book(&self, id: &BookId, token: &str) -> Result<ApiResponse>;
}

/// Blocking reqwest client bound to one backend base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    books_url: Url,
}

impl ApiClient {
    /// `base_url` must not end in a slash; see `Config`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let books_url = Url::parse(&format!("{}/books/", base_url))
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if books_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let client = Client::builder().build()?;
        Ok(ApiClient {
            client,
            base_url,
            books_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/books/{id}` with the id percent-encoded as a single segment.
    fn book_url(&self, id: &BookId) -> Url {
        let mut url = self.books_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    /// Authorization header carrying the bearer token.
    fn auth_headers(token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    pub fn register_request(&self, username: &str, email: &str, password: &str) -> Result<Request> {
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        Ok(self.client.post(self.url("/user/")).json(&body).build()?)
    }

    pub fn login_request(&self, email: &str, password: &str) -> Result<Request> {
        let form = LoginForm {
            username: email,
            password,
        };
        Ok(self.client.post(self.url("/user/login")).form(&form).build()?)
    }

    pub fn list_request(&self, token: &str) -> Result<Request> {
        Ok(self
            .client
            .get(self.url("/books/"))
            .headers(Self::auth_headers(token)?)
            .build()?)
    }

    pub fn create_request(&self, book: &BookDraft, token: &str) -> Result<Request> {
        Ok(self
            .client
            .post(self.url("/books/"))
            .headers(Self::auth_headers(token)?)
            .json(book)
            .build()?)
    }

    pub fn update_request(&self, id: &BookId, book: &BookDraft, token: &str) -> Result<Request> {
        Ok(self
            .client
            .put(self.book_url(id))
            .headers(Self::auth_headers(token)?)
            .json(book)
            .build()?)
    }

    pub fn delete_request(&self, id: &BookId, token: &str) -> Result<Request> {
        Ok(self
            .client
            .delete(self.book_url(id))
            .headers(Self::auth_headers(token)?)
            .build()?)
    }

    /// Send a built request and collect status and body.
    fn send(&self, request: Request) -> Result<ApiResponse> {
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "sending request");
        let res = self.client.execute(request)?;
        let status = res.status().as_u16();
        let body = res.text()?;
        tracing::debug!(%method, %url, status, "response received");
        Ok(ApiResponse { status, body })
    }
}

impl BookApi for ApiClient {
    fn register(&self, username: &str, email: &str, password: &str) -> Result<ApiResponse> {
        self.send(self.register_request(username, email, password)?)
    }

    fn login(&self, email: &str, password: &str) -> Result<ApiResponse> {
        self.send(self.login_request(email, password)?)
    }

    fn list_books(&self, token: &str) -> Result<ApiResponse> {
        self.send(self.list_request(token)?)
    }

    fn create_book(&self, book: &BookDraft, token: &str) -> Result<ApiResponse> {
        self.send(self.create_request(book, token)?)
    }

    fn update_book(&self, id: &BookId, book: &BookDraft, token: &str) -> Result<ApiResponse> {
        self.send(self.update_request(id, book, token)?)
    }

    fn delete_book(&self, id: &BookId, token: &str) -> Result<ApiResponse> {
        self.send(self.delete_request(id, token)?)
    }
}
