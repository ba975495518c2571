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
    domain::{self, storage::BlockViewRepo},
    infra::api::{
        ApiResult, ViewRepoResultExt, bad_request, record_request,
        v1::{
            ResultResponse,
            params::{HEIGHT, parse_non_negative},
            route_path::RoutePath,
        },
    },
};
use axum::{Json, extract::State};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct BlocksHandler<R> {
    view_repo: R,
}

impl<R> BlocksHandler<R>
where
    R: BlockViewRepo,
{
    pub fn new(view_repo: R) -> Self {
        Self { view_repo }
    }

    pub async fn list_block_committed_council_nodes(
        &self,
        route_path: &RoutePath,
    ) -> ApiResult<ResultResponse<Vec<BlockCommittedCouncilNode>>> {
        let height = parse_non_negative(HEIGHT, route_path.var(HEIGHT)).map_err(bad_request)?;
        debug!(height; "listing block committed council nodes");

        let rows = self
            .view_repo
            .list_committed_council_nodes(height)
            .await
            .map_err_into_api_error(|| format!("block {height}"))?;

        Ok(ResultResponse::new(rows.into_iter().map(Into::into).collect()))
    }
}

pub async fn list_block_committed_council_nodes<R>(
    State(handler): State<Arc<BlocksHandler<R>>>,
    route_path: RoutePath,
) -> ApiResult<Json<ResultResponse<Vec<BlockCommittedCouncilNode>>>>
where
    R: BlockViewRepo,
{
    let result = handler.list_block_committed_council_nodes(&route_path).await;
    record_request("list_block_committed_council_nodes", &result);
    result.map(Json)
}

/// A council node's signature on a block; the height is implied by the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockCommittedCouncilNode {
    #[serde(skip)]
    pub block_height: u64,
    pub id: u64,
    pub name: String,
    pub address: String,
    pub signature: String,
    pub is_proposer: bool,
    #[serde(rename = "timestamp")]
    pub commit_time: u64,
}

impl From<domain::BlockCommittedCouncilNodeRow> for BlockCommittedCouncilNode {
    fn from(row: domain::BlockCommittedCouncilNodeRow) -> Self {
        Self {
            block_height: row.block_height,
            id: row.id,
            name: row.name,
            address: row.address,
            signature: row.signature,
            is_proposer: row.is_proposer,
            commit_time: row.commit_time,
        }
    }
}
