use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use sac_service::{AcceptRequest, AcceptResponse, CompleteRequest, CompleteResponse, Error};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/autocomplete/complete", post(complete))
		.route("/v1/autocomplete/accept", post(accept))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn complete(
	State(state): State<AppState>,
	payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> Result<Json<CompleteResponse>, ApiError> {
	let Json(payload) = payload?;

	Ok(Json(state.service.complete(payload).await))
}

async fn accept(
	State(state): State<AppState>,
	payload: Result<Json<AcceptRequest>, JsonRejection>,
) -> Result<Json<AcceptResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.record_acceptance(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: &'static str,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code, message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidInput { field, message } => {
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, Some(vec![field]))
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure while serving request.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, None)
			},
			Error::Directory { message } => {
				Self::new(StatusCode::BAD_GATEWAY, "directory_error", message, None)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text(), None)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code.to_string(),
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}
