// Orchestration layer: owns the in-memory view state (book list, edit
// target, error message) and sequences calls to the resource client.
//
// Every failure is caught here and collapsed into `error`; nothing below
// this layer escapes to the caller. The list is always replaced wholesale
// from a fresh fetch, never patched locally.

use crate::api::{ApiResponse, BookApi};
use crate::error::ClientError;
use crate::models::{Book, BookForm, BookId, TokenResponse};
use crate::session::{Session, TokenStore};

pub const FETCH_FAILED: &str = "Failed to fetch books";
pub const SAVE_FAILED: &str = "Failed to save book.";
pub const DELETE_FAILED: &str = "Failed to delete book.";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const REGISTRATION_SUCCEEDED: &str = "Registration successful! Please log in.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this book?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    /// A login request is outstanding.
    Authenticating,
    Authenticated,
}

/// Which of the two authentication forms is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Outcome of a mutation, for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
    /// Nothing was sent: declined confirmation or no credential.
    Skipped,
}

pub struct App<A: BookApi, S: TokenStore> {
    api: A,
    session: Session<S>,
    auth_state: AuthState,
    auth_mode: AuthMode,
    books: Vec<Book>,
    edit_target: Option<Book>,
    error: Option<String>,
    notice: Option<String>,
}

impl<A: BookApi, S: TokenStore> App<A, S> {
    pub fn new(api: A, session: Session<S>) -> Self {
        App {
            api,
            session,
            auth_state: AuthState::Anonymous,
            auth_mode: AuthMode::Login,
            books: Vec::new(),
            edit_target: None,
            error: None,
            notice: None,
        }
    }

    /// Restore a persisted session; a restored credential triggers the
    /// initial list fetch.
    pub fn start(&mut self) {
        if self.session.load().is_some() {
            tracing::info!("restored previous session");
            self.auth_state = AuthState::Authenticated;
            self.refresh();
        } else {
            self.enter_anonymous();
        }
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn edit_target(&self) -> Option<&Book> {
        self.edit_target.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Informational message, such as the registration confirmation.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Switch between the login and the registration form.
    pub fn toggle_auth_mode(&mut self) {
        self.auth_mode = match self.auth_mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
        self.notice = None;
    }

    /// Exchange credentials for a bearer token. On success the token is
    /// stored and the list is fetched.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        self.begin();
        self.auth_state = AuthState::Authenticating;
        tracing::info!(email, "logging in");

        match self.api.login(email, password) {
            Ok(res) if res.is_success() => match res.json::<TokenResponse>() {
                Ok(body) if body.access_token.trim().is_empty() => {
                    tracing::warn!("login response carried an empty token");
                    self.fail(LOGIN_FAILED.into());
                }
                Ok(body) => {
                    self.session.set(&body.access_token);
                    self.auth_state = AuthState::Authenticated;
                    tracing::info!("authenticated");
                    self.refresh();
                    return true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "login response carried no token");
                    self.fail(LOGIN_FAILED.into());
                }
            },
            Ok(res) => self.fail_with_detail(&res, LOGIN_FAILED),
            Err(e) => self.fail_transport(e, LOGIN_FAILED),
        }
        self.auth_state = AuthState::Anonymous;
        false
    }

    /// Create an account. Success leaves the user anonymous and switches
    /// to the login form.
    pub fn register(&mut self, username: &str, email: &str, password: &str) -> bool {
        self.begin();
        tracing::info!(username, email, "registering");

        match self.api.register(username, email, password) {
            Ok(res) if res.is_success() => {
                tracing::info!("registration accepted");
                self.auth_mode = AuthMode::Login;
                self.notice = Some(REGISTRATION_SUCCEEDED.into());
                true
            }
            Ok(res) => {
                self.fail_with_detail(&res, REGISTRATION_FAILED);
                false
            }
            Err(e) => {
                self.fail_transport(e, REGISTRATION_FAILED);
                false
            }
        }
    }

    pub fn logout(&mut self) {
        tracing::info!("logging out");
        self.session.clear();
        self.enter_anonymous();
    }

    /// Replace the list with a fresh read. On failure the previous list is
    /// kept and the error message is set.
    pub fn refresh(&mut self) -> bool {
        let Some(token) = self.session.token().map(str::to_string) else {
            return false;
        };
        self.begin();

        match self.api.list_books(&token) {
            Ok(res) if res.is_success() => match res.json::<Vec<Book>>() {
                Ok(books) => {
                    tracing::debug!(count = books.len(), "book list refreshed");
                    self.books = books;
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "book list was not valid JSON");
                    self.fail(FETCH_FAILED.into());
                    false
                }
            },
            Ok(res) => {
                tracing::warn!(status = res.status, "book list request rejected");
                self.fail(FETCH_FAILED.into());
                false
            }
            Err(e) => {
                self.fail_transport(e, FETCH_FAILED);
                false
            }
        }
    }

    /// Load `book` into the form for editing.
    pub fn start_edit(&mut self, book: &Book) {
        self.edit_target = Some(book.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
    }

    /// Current form contents: the edit target's fields, or empty defaults.
    pub fn form(&self) -> BookForm {
        self.edit_target
            .as_ref()
            .map(BookForm::from_book)
            .unwrap_or_default()
    }

    /// Submit the book form: update the edit target if there is one,
    /// otherwise create a new book. Success refetches the list and clears
    /// the edit target.
    pub fn submit_book(&mut self, form: &BookForm) -> Outcome {
        let Some(token) = self.session.token().map(str::to_string) else {
            return Outcome::Skipped;
        };
        self.begin();

        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(missing) => {
                self.fail(missing.to_string());
                return Outcome::Skipped;
            }
        };

        let result = match &self.edit_target {
            Some(book) => {
                tracing::info!(id = %book.id, "updating book");
                self.api.update_book(&book.id, &draft, &token)
            }
            None => {
                tracing::info!(title = %draft.title, "creating book");
                self.api.create_book(&draft, &token)
            }
        };

        if self.mutation_succeeded(result, SAVE_FAILED) {
            self.refresh();
            self.edit_target = None;
            Outcome::Done
        } else {
            Outcome::Failed
        }
    }

    /// Delete a book once `confirm` agrees. A declined confirmation sends
    /// nothing and leaves all state untouched.
    pub fn delete_book<F>(&mut self, id: &BookId, confirm: F) -> Outcome
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(token) = self.session.token().map(str::to_string) else {
            return Outcome::Skipped;
        };
        if !confirm(DELETE_PROMPT) {
            tracing::debug!(%id, "delete declined");
            return Outcome::Skipped;
        }
        self.begin();
        tracing::info!(%id, "deleting book");

        let result = self.api.delete_book(id, &token);
        if self.mutation_succeeded(result, DELETE_FAILED) {
            self.refresh();
            Outcome::Done
        } else {
            Outcome::Failed
        }
    }

    fn mutation_succeeded(
        &mut self,
        result: Result<ApiResponse, ClientError>,
        message: &str,
    ) -> bool {
        match result {
            Ok(res) if res.is_success() => true,
            Ok(res) => {
                tracing::warn!(status = res.status, "mutation rejected");
                self.fail(message.into());
                false
            }
            Err(e) => {
                self.fail_transport(e, message);
                false
            }
        }
    }

    fn enter_anonymous(&mut self) {
        self.auth_state = AuthState::Anonymous;
        self.books.clear();
        self.edit_target = None;
        self.error = None;
        self.notice = None;
    }

    /// Start of every operation attempt.
    fn begin(&mut self) {
        self.error = None;
        self.notice = None;
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    fn fail_with_detail(&mut self, res: &ApiResponse, fallback: &str) {
        tracing::warn!(status = res.status, "request rejected");
        self.fail(res.detail().unwrap_or_else(|| fallback.to_string()));
    }

    fn fail_transport(&mut self, e: ClientError, message: &str) {
        tracing::warn!(error = %e, "request failed");
        self.fail(message.to_string());
    }
}
