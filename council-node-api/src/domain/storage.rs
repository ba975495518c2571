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

use crate::domain::{
    BlockCommittedCouncilNodeRow, CouncilNode, Pagination, PaginationResult,
    StakingAccountActivity,
};
use thiserror::Error;

/// Error possibly returned by the view repositories. Callers only distinguish a missing
/// resource from any other failure.
#[derive(Debug, Error)]
pub enum ViewRepoError {
    #[error("not found")]
    NotFound,

    #[error("cannot query view repository")]
    Storage(#[from] sqlx::Error),
}

/// Read-only access to the council node projections.
#[trait_variant::make(Send)]
pub trait CouncilNodeViewRepo
where
    Self: Clone + Send + Sync + 'static,
{
    /// Get the council node with the given ID or [ViewRepoError::NotFound].
    async fn find_by_id(&self, id: u64) -> Result<CouncilNode, ViewRepoError>;

    /// Get a page of the active council nodes ordered by ID ascending.
    async fn list_active_council_nodes(
        &self,
        pagination: Pagination,
    ) -> Result<(Vec<CouncilNode>, PaginationResult), ViewRepoError>;

    /// Get a page of the staking account activities of the council node with the given ID,
    /// latest first. Fails with [ViewRepoError::NotFound] if there is no such council node.
    async fn list_activities_by_id(
        &self,
        id: u64,
        pagination: Pagination,
    ) -> Result<(Vec<StakingAccountActivity>, PaginationResult), ViewRepoError>;
}

/// Read-only access to the block projections.
#[trait_variant::make(Send)]
pub trait BlockViewRepo
where
    Self: Clone + Send + Sync + 'static,
{
    /// Get the council nodes which committed the block at the given height ordered by council
    /// node ID. Fails with [ViewRepoError::NotFound] if there is no such block.
    async fn list_committed_council_nodes(
        &self,
        height: u64,
    ) -> Result<Vec<BlockCommittedCouncilNodeRow>, ViewRepoError>;
}

#[cfg(test)]
pub mod tests {
    use crate::domain::{
        BlockCommittedCouncilNodeRow, CouncilNode, CouncilNodeStatus, Pagination,
        PaginationResult, StakingAccountActivity,
        storage::{BlockViewRepo, CouncilNodeViewRepo, ViewRepoError},
    };
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    /// In-memory view repository counting its calls.
    #[derive(Debug, Clone, Default)]
    pub struct MockViewRepo {
        pub council_nodes: Vec<CouncilNode>,
        pub activities: Vec<StakingAccountActivity>,
        pub block_heights: Vec<u64>,
        pub committed_council_nodes: Vec<BlockCommittedCouncilNodeRow>,
        pub failing: bool,
        pub calls: Arc<AtomicUsize>,
    }

    impl MockViewRepo {
        /// A repository failing every call with a storage error.
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn call(&self) -> Result<(), ViewRepoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.failing {
                Err(ViewRepoError::Storage(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        }
    }

    impl CouncilNodeViewRepo for MockViewRepo {
        async fn find_by_id(&self, id: u64) -> Result<CouncilNode, ViewRepoError> {
            self.call()?;

            self.council_nodes
                .iter()
                .find(|council_node| council_node.id == id)
                .cloned()
                .ok_or(ViewRepoError::NotFound)
        }

        async fn list_active_council_nodes(
            &self,
            pagination: Pagination,
        ) -> Result<(Vec<CouncilNode>, PaginationResult), ViewRepoError> {
            self.call()?;

            let mut council_nodes = self
                .council_nodes
                .iter()
                .filter(|council_node| council_node.status() == CouncilNodeStatus::Active)
                .cloned()
                .collect::<Vec<_>>();
            council_nodes.sort_by_key(|council_node| council_node.id);

            Ok(paginate(council_nodes, pagination))
        }

        async fn list_activities_by_id(
            &self,
            id: u64,
            pagination: Pagination,
        ) -> Result<(Vec<StakingAccountActivity>, PaginationResult), ViewRepoError> {
            self.call()?;

            if !self.council_nodes.iter().any(|council_node| council_node.id == id) {
                return Err(ViewRepoError::NotFound);
            }

            let mut activities = self
                .activities
                .iter()
                .filter(|activity| activity.council_node_id == id)
                .cloned()
                .collect::<Vec<_>>();
            activities.sort_by_key(|activity| (activity.block_height, activity.id));
            activities.reverse();

            Ok(paginate(activities, pagination))
        }
    }

    impl BlockViewRepo for MockViewRepo {
        async fn list_committed_council_nodes(
            &self,
            height: u64,
        ) -> Result<Vec<BlockCommittedCouncilNodeRow>, ViewRepoError> {
            self.call()?;

            if !self.block_heights.contains(&height) {
                return Err(ViewRepoError::NotFound);
            }

            let mut rows = self
                .committed_council_nodes
                .iter()
                .filter(|row| row.block_height == height)
                .cloned()
                .collect::<Vec<_>>();
            rows.sort_by_key(|row| row.id);

            Ok(rows)
        }
    }

    fn paginate<T>(items: Vec<T>, pagination: Pagination) -> (Vec<T>, PaginationResult) {
        let result = PaginationResult::new(items.len() as u64, pagination);
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit.get()).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(offset).take(limit).collect();

        (items, result)
    }
}
