use askama::Template;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    path: String,
}

pub async fn not_found_handler(uri: axum::http::Uri, headers: HeaderMap) -> Response {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());

    match accept {
        Some(accept_str) if accept_str.contains("application/json") => {
            let err_msg = serde_json::json!({"msg": "not found"});
            (StatusCode::NOT_FOUND, Json(err_msg)).into_response()
        }
        Some(accept_str) if accept_str.contains("text/html") => {
            let template = NotFoundTemplate {
                path: uri.path().to_string(),
            };
            (StatusCode::NOT_FOUND, template).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "not found",
        )
            .into_response(),
    }
}
