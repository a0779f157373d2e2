use std::convert::Infallible;
use std::net::SocketAddr;

use chrono::Local;
use hyper::header::CONTENT_TYPE;
use hyper::http::response::Builder;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde::Serialize;

use crate::auth::CredentialSource;
use crate::env;
use crate::routines::update_token_on_sheets::{TokenGridLayout, UpdateTokenOnSheetsRoutine};

#[derive(Debug, Serialize)]
struct PublishSummary {
    status: &'static str,
    message: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_preview: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConfigErrorBody {
    error: String,
}

pub async fn serve(port: u16) -> hyper::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let make_svc = make_service_fn(|_conn| async { Ok::<_, Infallible>(service_fn(handle)) });

    log::info!("listening on http://{}", addr);
    Server::bind(&addr).serve(make_svc).await
}

async fn handle(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    if req.method() == Method::OPTIONS {
        return Ok(preflight_response());
    }
    Ok(update_token().await)
}

fn cors(builder: Builder) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn preflight_response() -> Response<Body> {
    cors(Response::builder().status(StatusCode::NO_CONTENT))
        .body(Body::empty())
        .expect("static response must build")
}

/// Runs the whole pipeline for one request. Every outcome, including a missing
/// environment, becomes a structured JSON response; nothing panics past here.
async fn update_token() -> Response<Body> {
    let server_env = match env::load_server_env() {
        Ok(value) => value,
        Err(err) => {
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ConfigErrorBody {
                    error: err.to_string(),
                },
            )
        }
    };

    let routine = UpdateTokenOnSheetsRoutine::new(
        CredentialSource::InlineJson(server_env.service_account_json),
        server_env.spreadsheet_id,
        TokenGridLayout::LabelRow,
    );

    match routine.publish().await {
        Ok(report) => json_response(
            StatusCode::OK,
            &PublishSummary {
                status: "success",
                message: format!("Updated {} cells", report.updated_cells),
                timestamp: Local::now().to_rfc3339(),
                token_preview: Some(report.token_preview),
            },
        ),
        Err(report) => {
            log::error!("publish failed: {:?}", report);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &PublishSummary {
                    status: "error",
                    message: report.to_string(),
                    timestamp: Local::now().to_rfc3339(),
                    token_preview: None,
                },
            )
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    let payload = serde_json::to_string(body)
        .unwrap_or_else(|_| r#"{"error":"response serialization failed"}"#.to_owned());

    cors(Response::builder().status(status))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload))
        .expect("response must build")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORS_HEADERS: [(&str, &str); 3] = [
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET, POST"),
        ("Access-Control-Allow-Headers", "Content-Type"),
    ];

    #[tokio::test]
    async fn preflight_is_empty_204_with_cors_headers() {
        let response = preflight_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        for (name, value) in CORS_HEADERS {
            assert_eq!(
                response.headers().get(name).map(|v| v.to_str().unwrap()),
                Some(value),
                "missing header {name}"
            );
        }

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn json_responses_carry_cors_and_content_type() {
        let response = json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ConfigErrorBody {
                error: "SPREADSHEET_ID not configured".to_owned(),
            },
        );

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).map(|v| v.to_str().unwrap()),
            Some("application/json")
        );
        for (name, _) in CORS_HEADERS {
            assert!(response.headers().contains_key(name), "missing header {name}");
        }

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(
            body.as_ref(),
            br#"{"error":"SPREADSHEET_ID not configured"}"#
        );
    }

    #[tokio::test]
    async fn success_summary_includes_the_token_preview() {
        let response = json_response(
            StatusCode::OK,
            &PublishSummary {
                status: "success",
                message: "Updated 4 cells".to_owned(),
                timestamp: "2025-01-01T12:00:00+00:00".to_owned(),
                token_preview: Some("ya29.a0AfH6SMBxxxxxx...".to_owned()),
            },
        );

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains(r#""status":"success""#));
        assert!(text.contains(r#""token_preview":"ya29.a0AfH6SMBxxxxxx...""#));
    }

    #[tokio::test]
    async fn error_summary_omits_the_token_preview() {
        let response = json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &PublishSummary {
                status: "error",
                message: "routine failed while minting the access token".to_owned(),
                timestamp: "2025-01-01T12:00:00+00:00".to_owned(),
                token_preview: None,
            },
        );

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains(r#""status":"error""#));
        assert!(!text.contains("token_preview"));
    }
}
