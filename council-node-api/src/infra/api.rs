// This file is part of chainindex.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod v1;

use crate::{
    domain::{
        Api,
        storage::{BlockViewRepo, CouncilNodeViewRepo, ViewRepoError},
    },
    infra::api::v1::params::{PageSize, ParamError},
};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chainindex_common::domain::NetworkId;
use log::{error, info, warn};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, io, net::IpAddr, num::NonZeroU64};
use thiserror::Error;
use tokio::signal::unix::{SignalKind, signal};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

pub type ApiResult<T> = Result<T, ApiError>;

/// Axum based implementation of [Api], serving the view repository `R`.
pub struct AxumApi<R> {
    config: Config,
    view_repo: R,
}

impl<R> AxumApi<R> {
    pub fn new(config: Config, view_repo: R) -> Self {
        Self { config, view_repo }
    }
}

impl<R> Api for AxumApi<R>
where
    R: CouncilNodeViewRepo + BlockViewRepo,
{
    type Error = AxumApiError;

    async fn serve(self, network_id: NetworkId) -> Result<(), Self::Error> {
        let Config {
            address,
            port,
            request_body_limit,
            default_page_size,
            max_page_size,
        } = self.config;

        let page_size = PageSize::new(default_page_size, max_page_size);
        let request_body_limit = body_limit(request_body_limit)?;
        let app = make_app(network_id, self.view_repo, page_size, request_body_limit);

        let listener = tokio::net::TcpListener::bind((address, port))
            .await
            .map_err(AxumApiError::Bind)?;
        info!(address:?, port; "listening to TCP connections");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(AxumApiError::Serve)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,
    #[serde(with = "byte_unit_serde")]
    pub request_body_limit: u64,
    pub default_page_size: NonZeroU64,
    pub max_page_size: NonZeroU64,
}

#[derive(Debug, Error)]
pub enum AxumApiError {
    #[error("cannot bind tcp listener")]
    Bind(#[source] io::Error),

    #[error("cannot serve API")]
    Serve(#[source] io::Error),

    #[error("request body limit of {0} bytes exceeds the address space")]
    RequestBodyLimit(u64),
}

/// Error of a single request, rendered as `{"error": "<message>"}` with the matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] ParamError),

    #[error("{0} not found")]
    NotFound(String),

    /// The cause is logged, never sent to the client.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Turn a rejected request parameter into a client error.
pub fn bad_request(error: ParamError) -> ApiError {
    let reason = error.to_string();
    warn!(reason; "rejecting request");
    ApiError::BadRequest(error)
}

pub trait ViewRepoResultExt<T> {
    /// Map [ViewRepoError::NotFound] to [ApiError::NotFound] for the given resource and any
    /// other error to [ApiError::Internal], logging its cause.
    fn map_err_into_api_error<F, D>(self, resource: F) -> ApiResult<T>
    where
        F: FnOnce() -> D,
        D: Display;
}

impl<T> ViewRepoResultExt<T> for Result<T, ViewRepoError> {
    fn map_err_into_api_error<F, D>(self, resource: F) -> ApiResult<T>
    where
        F: FnOnce() -> D,
        D: Display,
    {
        self.map_err(|error| match error {
            ViewRepoError::NotFound => ApiError::NotFound(resource().to_string()),

            error => {
                let resource = resource().to_string();
                let error = format!("{:#}", anyhow::Error::from(error));
                error!(resource, error; "cannot load resource");
                ApiError::Internal
            }
        })
    }
}

/// Count a handled request by endpoint and response status.
pub fn record_request<T>(endpoint: &'static str, result: &ApiResult<T>) {
    let status = match result {
        Ok(_) => StatusCode::OK,
        Err(error) => error.status(),
    };

    counter!(
        "council_node_api_requests_total",
        "endpoint" => endpoint,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

fn body_limit(request_body_limit: u64) -> Result<usize, AxumApiError> {
    usize::try_from(request_body_limit)
        .map_err(|_| AxumApiError::RequestBodyLimit(request_body_limit))
}

fn make_app<R>(
    network_id: NetworkId,
    view_repo: R,
    page_size: PageSize,
    request_body_limit: usize,
) -> Router
where
    R: CouncilNodeViewRepo + BlockViewRepo,
{
    Router::new()
        .nest("/api/v1", v1::make_app(network_id, view_repo, page_size))
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(request_body_limit))
                .layer(CorsLayer::permissive()),
        )
}

async fn shutdown_signal() {
    signal(SignalKind::terminate())
        .expect("install SIGTERM handler")
        .recv()
        .await;
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::storage::ViewRepoError,
        infra::api::{
            ApiError, AxumApiError, ViewRepoResultExt, body_limit, v1::params::ParamError,
        },
    };
    use assert_matches::assert_matches;
    use axum::{body, http::StatusCode, response::IntoResponse};
    use log::{
        Level, LevelFilter, Log, Metadata, Record,
        kv::{Key, Source},
    };
    use std::sync::{Mutex, Once};

    #[derive(Debug, Clone)]
    struct CapturedRecord {
        level: Level,
        message: String,
        resource: Option<String>,
        error: Option<String>,
    }

    static RECORDS: Mutex<Vec<CapturedRecord>> = Mutex::new(Vec::new());
    static INIT_LOGGER: Once = Once::new();

    struct CapturingLogger;

    impl Log for CapturingLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            let key_values = record.key_values();
            let record = CapturedRecord {
                level: record.level(),
                message: record.args().to_string(),
                resource: key_values.get(Key::from_str("resource")).map(|v| v.to_string()),
                error: key_values.get(Key::from_str("error")).map(|v| v.to_string()),
            };
            RECORDS.lock().unwrap().push(record);
        }

        fn flush(&self) {}
    }

    fn captured_records() -> Vec<CapturedRecord> {
        INIT_LOGGER.call_once(|| {
            log::set_boxed_logger(Box::new(CapturingLogger)).expect("no logger installed yet");
            log::set_max_level(LevelFilter::Trace);
        });
        RECORDS.lock().unwrap().clone()
    }

    #[test]
    fn test_internal_error_logs_cause() {
        captured_records();

        let result = Err::<(), _>(ViewRepoError::Storage(sqlx::Error::PoolTimedOut))
            .map_err_into_api_error(|| "council node 4242");
        assert_matches!(result, Err(ApiError::Internal));

        let records = captured_records();
        let record = records
            .iter()
            .find(|record| record.resource.as_deref() == Some("council node 4242"))
            .expect("internal error is logged");
        assert_eq!(record.level, Level::Error);
        assert_eq!(record.message, "cannot load resource");

        let error = record.error.as_deref().expect("cause is logged");
        assert!(error.contains("cannot query view repository"), "{error}");
        assert!(
            error.contains(&sqlx::Error::PoolTimedOut.to_string()),
            "{error}"
        );
    }

    #[test]
    fn test_body_limit() {
        assert_matches!(body_limit(1024 * 1024), Ok(1_048_576));

        let result = body_limit(u64::MAX);
        if usize::BITS < u64::BITS {
            assert_matches!(result, Err(AxumApiError::RequestBodyLimit(u64::MAX)));
        } else {
            assert_matches!(result, Ok(usize::MAX));
        }
    }

    #[test]
    fn test_map_err_into_api_error() {
        let result = Ok::<_, ViewRepoError>(42).map_err_into_api_error(|| "answer");
        assert_matches!(result, Ok(42));

        let result = Err::<(), _>(ViewRepoError::NotFound).map_err_into_api_error(|| "block 7");
        assert_matches!(result, Err(ApiError::NotFound(resource)) if resource == "block 7");

        let result = Err::<(), _>(ViewRepoError::Storage(sqlx::Error::PoolTimedOut))
            .map_err_into_api_error(|| "block 7");
        assert_matches!(result, Err(ApiError::Internal));
    }

    #[tokio::test]
    async fn test_error_response() {
        let response = ApiError::BadRequest(ParamError::Missing("id")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::NotFound("council node 10".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"council node 10 not found"}"#);

        let response = ApiError::Internal.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"internal server error"}"#);
    }
}
