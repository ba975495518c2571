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

pub mod blocks;
pub mod council_nodes;
pub mod params;
pub mod route_path;

use crate::{
    domain::{
        self,
        storage::{BlockViewRepo, CouncilNodeViewRepo},
    },
    infra::api::v1::{
        blocks::BlocksHandler, council_nodes::CouncilNodesHandler, params::PageSize,
    },
};
use axum::{Json, Router, extract::State, routing::get};
use chainindex_common::domain::NetworkId;
use serde::Serialize;
use std::sync::Arc;

pub fn make_app<R>(network_id: NetworkId, view_repo: R, page_size: PageSize) -> Router
where
    R: CouncilNodeViewRepo + BlockViewRepo,
{
    let council_nodes: Router = Router::new()
        .route(
            "/council_nodes",
            get(council_nodes::list_active_council_nodes::<R>),
        )
        .route(
            "/council_nodes/{id}",
            get(council_nodes::find_council_node_by_id::<R>),
        )
        .route(
            "/council_nodes/{id}/activities",
            get(council_nodes::list_council_node_activities_by_id::<R>),
        )
        .with_state(Arc::new(CouncilNodesHandler::new(
            view_repo.clone(),
            page_size,
        )));

    let blocks: Router = Router::new()
        .route(
            "/blocks/{height}/committed_council_nodes",
            get(blocks::list_block_committed_council_nodes::<R>),
        )
        .with_state(Arc::new(BlocksHandler::new(view_repo)));

    Router::new()
        .route("/service_info", get(service_info))
        .with_state(network_id)
        .merge(council_nodes)
        .merge(blocks)
}

/// Success body for a single result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultResponse<T> {
    pub result: T,
}

impl<T> ResultResponse<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// Success body for one page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResponse<T> {
    pub result: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new<D>(result: Vec<D>, pagination: domain::PaginationResult) -> Self
    where
        D: Into<T>,
    {
        Self {
            result: result.into_iter().map(Into::into).collect(),
            pagination: pagination.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_record: u64,
    pub total_page: u64,
    pub current_page: u64,
    pub limit: u64,
}

impl From<domain::PaginationResult> for Pagination {
    fn from(pagination: domain::PaginationResult) -> Self {
        Self {
            total_record: pagination.total_record,
            total_page: pagination.total_page,
            current_page: pagination.current_page,
            limit: pagination.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub network: String,
}

async fn service_info(State(network_id): State<NetworkId>) -> Json<ResultResponse<ServiceInfo>> {
    Json(ResultResponse::new(ServiceInfo {
        name: env!("CARGO_PKG_NAME").to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        network: network_id.to_string(),
    }))
}
