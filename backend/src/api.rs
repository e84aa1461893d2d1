use axum::extract::State;
use axum::http::{header, StatusCode};

use crate::worker::WorkerHandle;

/// Largest accepted upload.
pub const MAX_UPLOAD_SIZE: usize = 500 * 1024 * 1024;

type JsonResponse = (StatusCode, [(header::HeaderName, &'static str); 1], String);

fn json(status: StatusCode, body: String) -> JsonResponse {
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

pub fn router(worker: WorkerHandle) -> axum::Router {
    axum::Router::new()
        .route(
            "/parse",
            axum::routing::post(parse).layer(axum::extract::DefaultBodyLimit::max(MAX_UPLOAD_SIZE)),
        )
        .with_state(worker)
}

/// Every answer is a JSON payload, either the parse result or `{"error": ...}`.
#[tracing::instrument(skip(worker, form))]
async fn parse(State(worker): State<WorkerHandle>, form: axum::extract::Multipart) -> JsonResponse {
    let upload = crate::get_demo_from_upload("demo", "options", form).await;

    let data = match upload.demo {
        Some(d) => d,
        None => {
            tracing::error!("Upload is missing the demo");
            return json(
                StatusCode::BAD_REQUEST,
                analysis::error_payload("missing demo"),
            );
        }
    };

    let options: analysis::ParseOptions = match upload.options {
        Some(raw) => match serde_json::from_slice(&raw) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!("Parsing options: {:?}", e);
                return json(
                    StatusCode::BAD_REQUEST,
                    analysis::error_payload(&format!("invalid options: {}", e)),
                );
            }
        },
        None => Default::default(),
    };

    tracing::info!(bytes = data.len(), ?options, "Queueing upload");

    let input = crate::AnalysisInput {
        data: crate::AnalysisData::Preloaded(data),
        options,
    };

    match worker.submit(input).await {
        Ok(payload) => json(StatusCode::OK, payload),
        Err(e) => {
            tracing::error!("Submitting analysis: {}", e);
            json(
                StatusCode::INTERNAL_SERVER_ERROR,
                analysis::error_payload(&e.to_string()),
            )
        }
    }
}
