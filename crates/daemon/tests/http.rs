//! End-to-end tests for the web front end, driving the router directly.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use axum_extra::extract::cookie::Key;
use tempfile::TempDir;
use tower::ServiceExt;

use common::accounts::{sign_up, CredentialStore};
use common::documents::DocumentStore;
use folio_daemon::http_server::{self, session::SESSION_COOKIE};
use folio_daemon::ServiceState;

struct TestApp {
    router: Router,
    documents: DocumentStore,
    credentials: CredentialStore,
    _dir: TempDir,
}

fn setup() -> TestApp {
    let dir = TempDir::new().unwrap();
    let documents = DocumentStore::open(dir.path().join("data")).unwrap();
    let credentials = CredentialStore::new(dir.path().join("users.json"));

    std::fs::write(documents.root().join("about.md"), "# Ruby is...").unwrap();
    std::fs::write(documents.root().join("history.txt"), "1993 - Yukihiro Matsumoto").unwrap();
    std::fs::write(documents.root().join(".hidden"), "secret").unwrap();

    let state = ServiceState::new(documents.clone(), credentials.clone(), Key::generate());
    TestApp {
        router: http_server::router(state),
        documents,
        credentials,
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, cookie: Option<&str>, form: &str) -> Response {
        let mut builder = Request::builder().method(method.clone()).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = if method == Method::POST {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        } else {
            Body::empty()
        };
        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(Method::GET, uri, cookie, "").await
    }

    async fn post(&self, uri: &str, cookie: Option<&str>, form: &str) -> Response {
        self.send(Method::POST, uri, cookie, form).await
    }

    /// Sign `admin` in and return the session cookie.
    async fn signed_in(&self) -> String {
        sign_up(&self.credentials, "admin", "Secret123").unwrap();
        let response = self
            .post("/users/signin", None, "username=admin&password=Secret123")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response).unwrap()
    }
}

/// The `name=value` pair of the session cookie set by `response`.
fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter(|pair| pair.starts_with(SESSION_COOKIE))
        .last()
        .map(str::to_string)
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Follow a redirect to the index with the cookie it set, returning the page.
async fn follow(app: &TestApp, response: Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response).unwrap();
    let page = app.get(location(&response), Some(&cookie)).await;
    body_text(page).await
}

#[tokio::test]
async fn test_index_lists_documents() {
    let app = setup();

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("about.md"));
    assert!(body.contains("history.txt"));
    assert!(!body.contains(".hidden"));
    assert!(body.contains("Sign In"));
}

#[tokio::test]
async fn test_view_documents() {
    let app = setup();

    let response = app.get("/history.txt", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain"
    );
    assert_eq!(body_text(response).await, "1993 - Yukihiro Matsumoto");

    let response = app.get("/about.md", None).await;
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html"
    );
    assert!(body_text(response).await.contains("<h1>Ruby is...</h1>"));
}

#[tokio::test]
async fn test_missing_document_flashes_once() {
    let app = setup();

    let response = app.get("/nope.txt", None).await;
    assert_eq!(location(&response), "/");
    let cookie = session_cookie(&response).unwrap();

    let page = app.get("/", Some(&cookie)).await;
    let cookie = session_cookie(&page).unwrap();
    assert!(body_text(page).await.contains("nope.txt does not exist."));

    let page = app.get("/", Some(&cookie)).await;
    assert!(!body_text(page).await.contains("does not exist"));
}

#[tokio::test]
async fn test_mutations_require_sign_in() {
    let app = setup();

    let response = app.post("/create", None, "filename=new.txt").await;
    assert_eq!(location(&response), "/");
    assert!(follow(&app, response)
        .await
        .contains("You must be signed in to do that."));
    assert!(!app.documents.exists("new.txt"));

    let response = app.post("/about.md/delete", None, "").await;
    assert_eq!(location(&response), "/");
    assert!(app.documents.exists("about.md"));

    let response = app.get("/about.md/edit", None).await;
    assert_eq!(location(&response), "/");

    let response = app.get("/new", None).await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_sign_up_and_sign_in() {
    let app = setup();

    let response = app
        .post("/users/signup", None, "username=ab&password=Secret123")
        .await;
    assert_eq!(location(&response), "/users/signup");
    assert!(follow(&app, response)
        .await
        .contains("Username is too short, must be at least 3 characters long."));

    let response = app
        .post("/users/signup", None, "username=admin&password=Secret123")
        .await;
    assert_eq!(location(&response), "/users/signin");
    assert!(follow(&app, response)
        .await
        .contains("admin successfully signed up! Please sign in below"));
    assert!(app.credentials.exists("admin").unwrap());

    let response = app
        .post("/users/signin", None, "username=admin&password=wrong")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Invalid credentials"));
    assert!(body.contains("value=\"admin\""));

    let response = app
        .post("/users/signin", None, "username=admin&password=Secret123")
        .await;
    assert_eq!(location(&response), "/");
    let body = follow(&app, response).await;
    assert!(body.contains("Welcome!"));
    assert!(body.contains("Signed in as admin."));
}

#[tokio::test]
async fn test_sign_out() {
    let app = setup();
    let cookie = app.signed_in().await;

    let response = app.post("/users/signout", Some(&cookie), "").await;
    let cookie = session_cookie(&response).unwrap();
    let page = app.get("/", Some(&cookie)).await;
    let body = body_text(page).await;
    assert!(body.contains("You have been signed out."));
    assert!(!body.contains("Signed in as"));

    let response = app.post("/create", Some(&cookie), "filename=new.txt").await;
    assert_eq!(location(&response), "/");
    assert!(!app.documents.exists("new.txt"));
}

#[tokio::test]
async fn test_create_document() {
    let app = setup();
    let cookie = app.signed_in().await;

    let response = app.get("/new", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.post("/create", Some(&cookie), "filename=notes.txt").await;
    assert_eq!(location(&response), "/");
    assert!(follow(&app, response)
        .await
        .contains("notes.txt has been created."));
    assert_eq!(app.documents.read("notes.txt").unwrap(), b"");

    let response = app.post("/create", Some(&cookie), "filename=notes").await;
    assert_eq!(location(&response), "/new");
    assert!(follow(&app, response)
        .await
        .contains("A file extension is required."));

    let response = app.post("/create", Some(&cookie), "filename=").await;
    assert!(follow(&app, response).await.contains("A name is required."));
}

#[tokio::test]
async fn test_edit_and_rename_document() {
    let app = setup();
    let cookie = app.signed_in().await;

    let response = app.get("/history.txt/edit", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("1993 - Yukihiro Matsumoto"));

    let response = app
        .post(
            "/history.txt",
            Some(&cookie),
            "filename=history.txt&content=1995+-+released",
        )
        .await;
    assert!(follow(&app, response)
        .await
        .contains("history.txt has been updated."));
    assert_eq!(app.documents.read("history.txt").unwrap(), b"1995 - released");

    let response = app
        .post(
            "/history.txt",
            Some(&cookie),
            "filename=history.doc&content=lost",
        )
        .await;
    assert_eq!(location(&response), "/history.txt/edit");
    assert_eq!(app.documents.read("history.txt").unwrap(), b"1995 - released");

    let response = app
        .post(
            "/history.txt",
            Some(&cookie),
            "filename=timeline.md&content=%23+Timeline",
        )
        .await;
    assert!(follow(&app, response)
        .await
        .contains("timeline.md has been updated."));
    assert!(!app.documents.exists("history.txt"));
    assert_eq!(app.documents.read("timeline.md").unwrap(), b"# Timeline");
}

#[tokio::test]
async fn test_duplicate_and_delete_document() {
    let app = setup();
    let cookie = app.signed_in().await;

    let response = app.post("/about.md/duplicate", Some(&cookie), "").await;
    assert!(follow(&app, response)
        .await
        .contains("about.md has been duplicated as about-copy.md."));
    assert_eq!(app.documents.read("about-copy.md").unwrap(), b"# Ruby is...");

    let response = app.post("/about.md/delete", Some(&cookie), "").await;
    assert!(follow(&app, response)
        .await
        .contains("about.md has been deleted."));
    assert!(!app.documents.exists("about.md"));

    let response = app.post("/about.md/delete", Some(&cookie), "").await;
    assert!(follow(&app, response)
        .await
        .contains("about.md does not exist."));
}

#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let app = setup();
    let cookie = app.signed_in().await;
    let tampered = format!("{}x", cookie);

    let response = app.post("/create", Some(&tampered), "filename=new.txt").await;
    assert_eq!(location(&response), "/");
    assert!(!app.documents.exists("new.txt"));
}

#[tokio::test]
async fn test_status_routes() {
    let app = setup();

    let response = app.get("/_status/livez", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/_status/readyz", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/_status/version", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("version"));
}

#[tokio::test]
async fn test_static_assets() {
    let app = setup();

    let response = app.get("/static/style.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/static/missing.css", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
