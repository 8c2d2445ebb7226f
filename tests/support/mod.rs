//! In-process stand-in for the library REST API.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use libris_app::books::{Book, BookDraft};
use libris_app::AppContext;
use libris_http::ApiClient;
use libris_kernel::settings::{ApiSettings, UxSettings};
use libris_kernel::Session;

pub const TOKEN: &str = "good-token";
pub const EMAIL: &str = "reader@example.com";
pub const PASSWORD: &str = "correct horse!";
/// Creating a book with this title is refused with a message and no field errors.
pub const FROZEN_TITLE: &str = "Frozen";
pub const FROZEN_MESSAGE: &str = "The catalog is closed for changes.";
/// Creating a book with this title fails on `title` and on a non-form key.
pub const MIXED_TITLE: &str = "Mixed";

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct Backend {
    books: Mutex<Vec<Book>>,
    next_id: AtomicU64,
    hits: Mutex<Vec<Hit>>,
    signups: Mutex<Vec<Value>>,
    listing_down: AtomicBool,
}

impl Backend {
    pub fn seed(&self, titles: &[&str]) {
        let mut books = self.books.lock().unwrap();
        for title in titles {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            books.push(Book {
                id,
                title: title.to_string(),
                author: format!("Author of {title}"),
                category: "Fiction".to_string(),
                publisher: "Penguin".to_string(),
            });
        }
    }

    pub fn books(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    /// `"METHOD /path"` for every request so far.
    pub fn calls(&self) -> Vec<String> {
        self.hits()
            .into_iter()
            .map(|hit| format!("{} {}", hit.method, hit.path))
            .collect()
    }

    pub fn clear_hits(&self) {
        self.hits.lock().unwrap().clear();
    }

    pub fn signups(&self) -> Vec<Value> {
        self.signups.lock().unwrap().clone()
    }

    /// Make `GET /api/books` answer 500 while writes keep working.
    pub fn break_listing(&self) {
        self.listing_down.store(true, Ordering::SeqCst);
    }
}

async fn record(State(backend): State<Arc<Backend>>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = request.uri().path().to_string();
    backend.hits.lock().unwrap().push(Hit {
        method: request.method().to_string(),
        path: path.clone(),
        authorization: authorization.clone(),
    });

    let expected = format!("Bearer {TOKEN}");
    let guarded = path.starts_with("/api/books");
    if guarded && authorization.as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthenticated." })),
        )
            .into_response();
    }
    next.run(request).await
}

fn invalid(errors: Value) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "The given data was invalid.", "errors": errors })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        return Json(json!({
            "token": TOKEN,
            "user": { "id": 2, "name": "Test", "email": EMAIL }
        }))
        .into_response();
    }
    invalid(json!({ "email": ["These credentials do not match our records."] }))
}

async fn signup(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL {
        return invalid(json!({ "email": ["The email has already been taken."] }));
    }
    backend.signups.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({ "message": "created" }))).into_response()
}

async fn list_books(State(backend): State<Arc<Backend>>) -> Response {
    if backend.listing_down.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Server Error" })),
        )
            .into_response();
    }
    Json(backend.books()).into_response()
}

async fn create_book(State(backend): State<Arc<Backend>>, Json(draft): Json<Value>) -> Response {
    if draft["title"] == "Duplicate" {
        return invalid(json!({ "title": ["The title has already been taken."] }));
    }
    if draft["title"] == FROZEN_TITLE {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": FROZEN_MESSAGE })),
        )
            .into_response();
    }
    if draft["title"] == MIXED_TITLE {
        return invalid(json!({
            "title": ["The title is reserved."],
            "isbn": ["The isbn field is required."]
        }));
    }
    let draft = to_draft(&draft);
    let id = backend.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let book = Book {
        id,
        title: draft.title,
        author: draft.author,
        category: draft.category,
        publisher: draft.publisher,
    };
    backend.books.lock().unwrap().push(book.clone());
    (StatusCode::CREATED, Json(book)).into_response()
}

async fn update_book(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<u64>,
    Json(draft): Json<Value>,
) -> Response {
    let draft = to_draft(&draft);
    let mut books = backend.books.lock().unwrap();
    let Some(book) = books.iter_mut().find(|book| book.id == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    book.title = draft.title;
    book.author = draft.author;
    book.category = draft.category;
    book.publisher = draft.publisher;
    Json(book.clone()).into_response()
}

async fn delete_book(State(backend): State<Arc<Backend>>, Path(id): Path<u64>) -> StatusCode {
    let mut books = backend.books.lock().unwrap();
    let before = books.len();
    books.retain(|book| book.id != id);
    if books.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

fn to_draft(body: &Value) -> BookDraft {
    let field = |key: &str| body[key].as_str().unwrap_or_default().to_string();
    BookDraft {
        title: field("title"),
        author: field("author"),
        category: field("category"),
        publisher: field("publisher"),
    }
}

/// Start the stub on an ephemeral port and return its base URL.
pub async fn serve(backend: Arc<Backend>) -> String {
    let router = Router::new()
        .route("/api/login", post(login))
        .route("/api/signup", post(signup))
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/{id}", put(update_book).delete(delete_book))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn context(base_url: String) -> AppContext {
    context_with_ux(base_url, UxSettings::default())
}

pub fn context_with_ux(base_url: String, ux: UxSettings) -> AppContext {
    let settings = ApiSettings {
        base_url,
        request_timeout_ms: 5000,
    };
    let client = ApiClient::new(&settings, Arc::new(Session::in_memory())).unwrap();
    AppContext::new(client, ux)
}

/// A running stub plus a signed-out context pointed at it.
pub async fn start() -> (Arc<Backend>, AppContext) {
    let backend = Arc::new(Backend::default());
    let ctx = context(serve(backend.clone()).await);
    (backend, ctx)
}

/// Like [`start`], but already holding a valid token.
pub async fn start_signed_in() -> (Arc<Backend>, AppContext) {
    let (backend, ctx) = start().await;
    ctx.session().set_token(TOKEN).unwrap();
    (backend, ctx)
}

/// A base URL nobody listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
