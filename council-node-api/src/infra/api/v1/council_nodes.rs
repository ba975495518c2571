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

use crate::{
    domain::{self, storage::CouncilNodeViewRepo},
    infra::api::{
        ApiResult, ViewRepoResultExt, bad_request, record_request,
        v1::{
            PaginatedResponse, ResultResponse,
            params::{ID, PageSize, parse_pagination, parse_positive},
            route_path::RoutePath,
        },
    },
};
use axum::{Json, extract::State};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

/// Handles the council node endpoints: validate the raw parameters, make at most one repository
/// call and render the result. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct CouncilNodesHandler<R> {
    view_repo: R,
    page_size: PageSize,
}

impl<R> CouncilNodesHandler<R>
where
    R: CouncilNodeViewRepo,
{
    pub fn new(view_repo: R, page_size: PageSize) -> Self {
        Self {
            view_repo,
            page_size,
        }
    }

    pub async fn list_active_council_nodes(
        &self,
        route_path: &RoutePath,
    ) -> ApiResult<PaginatedResponse<CouncilNode>> {
        let pagination = parse_pagination(route_path, self.page_size).map_err(bad_request)?;
        debug!(page = pagination.page.get(), limit = pagination.limit.get(); "listing active council nodes");

        let (council_nodes, pagination) = self
            .view_repo
            .list_active_council_nodes(pagination)
            .await
            .map_err_into_api_error(|| "active council nodes")?;

        Ok(PaginatedResponse::new(council_nodes, pagination))
    }

    pub async fn find_council_node_by_id(
        &self,
        route_path: &RoutePath,
    ) -> ApiResult<ResultResponse<CouncilNode>> {
        let id = parse_positive(ID, route_path.var(ID))
            .map_err(bad_request)?
            .get();
        debug!(id; "finding council node");

        let council_node = self
            .view_repo
            .find_by_id(id)
            .await
            .map_err_into_api_error(|| format!("council node {id}"))?;

        Ok(ResultResponse::new(council_node.into()))
    }

    pub async fn list_council_node_activities_by_id(
        &self,
        route_path: &RoutePath,
    ) -> ApiResult<PaginatedResponse<StakingAccountActivity>> {
        let id = parse_positive(ID, route_path.var(ID))
            .map_err(bad_request)?
            .get();
        let pagination = parse_pagination(route_path, self.page_size).map_err(bad_request)?;
        debug!(
            id,
            page = pagination.page.get(),
            limit = pagination.limit.get();
            "listing council node activities"
        );

        let (activities, pagination) = self
            .view_repo
            .list_activities_by_id(id, pagination)
            .await
            .map_err_into_api_error(|| format!("council node {id}"))?;

        Ok(PaginatedResponse::new(activities, pagination))
    }
}

pub async fn list_active_council_nodes<R>(
    State(handler): State<Arc<CouncilNodesHandler<R>>>,
    route_path: RoutePath,
) -> ApiResult<Json<PaginatedResponse<CouncilNode>>>
where
    R: CouncilNodeViewRepo,
{
    let result = handler.list_active_council_nodes(&route_path).await;
    record_request("list_active_council_nodes", &result);
    result.map(Json)
}

pub async fn find_council_node_by_id<R>(
    State(handler): State<Arc<CouncilNodesHandler<R>>>,
    route_path: RoutePath,
) -> ApiResult<Json<ResultResponse<CouncilNode>>>
where
    R: CouncilNodeViewRepo,
{
    let result = handler.find_council_node_by_id(&route_path).await;
    record_request("find_council_node_by_id", &result);
    result.map(Json)
}

pub async fn list_council_node_activities_by_id<R>(
    State(handler): State<Arc<CouncilNodesHandler<R>>>,
    route_path: RoutePath,
) -> ApiResult<Json<PaginatedResponse<StakingAccountActivity>>>
where
    R: CouncilNodeViewRepo,
{
    let result = handler.list_council_node_activities_by_id(&route_path).await;
    record_request("list_council_node_activities_by_id", &result);
    result.map(Json)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouncilNode {
    pub id: u64,
    pub name: String,
    pub security_contact: Option<String>,
    pub pubkey_type: String,
    pub pubkey: String,
    pub address: String,
    pub created_at_block_height: u64,
    pub last_left_at_block_height: Option<u64>,
    pub status: CouncilNodeStatus,
}

impl From<domain::CouncilNode> for CouncilNode {
    fn from(council_node: domain::CouncilNode) -> Self {
        let status = council_node.status().into();

        Self {
            id: council_node.id,
            name: council_node.name,
            security_contact: council_node.security_contact,
            pubkey_type: council_node.pubkey_type,
            pubkey: council_node.pubkey,
            address: council_node.address,
            created_at_block_height: council_node.created_at_block_height,
            last_left_at_block_height: council_node.last_left_at_block_height,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CouncilNodeStatus {
    Active,
    Inactive,
}

impl From<domain::CouncilNodeStatus> for CouncilNodeStatus {
    fn from(status: domain::CouncilNodeStatus) -> Self {
        match status {
            domain::CouncilNodeStatus::Active => Self::Active,
            domain::CouncilNodeStatus::Inactive => Self::Inactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakingAccountActivity {
    pub id: u64,
    pub council_node_id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub block_height: u64,
    pub timestamp: u64,
    pub payload: serde_json::Value,
}

impl From<domain::StakingAccountActivity> for StakingAccountActivity {
    fn from(activity: domain::StakingAccountActivity) -> Self {
        Self {
            id: activity.id,
            council_node_id: activity.council_node_id,
            kind: activity.kind,
            block_height: activity.block_height,
            timestamp: activity.timestamp,
            payload: activity.payload,
        }
    }
}
