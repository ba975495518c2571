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
    storage::{BlockViewRepo, CouncilNodeViewRepo, ViewRepoError},
};
use chainindex_common::infra::pool::postgres::PostgresPool;
use indoc::indoc;
use sqlx::{Postgres, Transaction, migrate::MigrateError, types::Json};
use thiserror::Error;

type CouncilNodeRow = (
    i64,
    String,
    Option<String>,
    String,
    String,
    String,
    i64,
    Option<i64>,
);

type ActivityRow = (i64, i64, String, i64, i64, Json<serde_json::Value>);

type CommittedCouncilNodeRow = (i64, i64, String, String, String, bool, i64);

/// Postgres based implementation of the view repositories.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: PostgresPool,
}

impl Storage {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// Begin a read-only transaction, so that a page and its totals are read from the same
    /// snapshot.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

impl CouncilNodeViewRepo for Storage {
    async fn find_by_id(&self, id: u64) -> Result<CouncilNode, ViewRepoError> {
        let Ok(id) = i64::try_from(id) else {
            return Err(ViewRepoError::NotFound);
        };

        let query = indoc! {"
            SELECT
                id,
                name,
                security_contact,
                pubkey_type,
                pubkey,
                address,
                created_at_block_height,
                last_left_at_block_height
            FROM council_nodes
            WHERE id = $1
        "};

        sqlx::query_as::<_, CouncilNodeRow>(query)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?
            .map(council_node_from_row)
            .ok_or(ViewRepoError::NotFound)
    }

    async fn list_active_council_nodes(
        &self,
        pagination: Pagination,
    ) -> Result<(Vec<CouncilNode>, PaginationResult), ViewRepoError> {
        let mut tx = self.begin_snapshot().await?;

        let query = indoc! {"
            SELECT COUNT(*)
            FROM council_nodes
            WHERE last_left_at_block_height IS NULL
        "};

        let (total_record,) = sqlx::query_as::<_, (i64,)>(query)
            .fetch_one(&mut *tx)
            .await?;

        let query = indoc! {"
            SELECT
                id,
                name,
                security_contact,
                pubkey_type,
                pubkey,
                address,
                created_at_block_height,
                last_left_at_block_height
            FROM council_nodes
            WHERE last_left_at_block_height IS NULL
            ORDER BY id ASC
            LIMIT $1
            OFFSET $2
        "};

        let (limit, offset) = limit_offset(pagination);
        let council_nodes = sqlx::query_as::<_, CouncilNodeRow>(query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(council_node_from_row)
            .collect();

        tx.commit().await?;

        Ok((
            council_nodes,
            PaginationResult::new(total_record as u64, pagination),
        ))
    }

    async fn list_activities_by_id(
        &self,
        id: u64,
        pagination: Pagination,
    ) -> Result<(Vec<StakingAccountActivity>, PaginationResult), ViewRepoError> {
        let Ok(id) = i64::try_from(id) else {
            return Err(ViewRepoError::NotFound);
        };

        let mut tx = self.begin_snapshot().await?;

        let query = indoc! {"
            SELECT EXISTS (
                SELECT 1
                FROM council_nodes
                WHERE id = $1
            )
        "};

        let (exists,) = sqlx::query_as::<_, (bool,)>(query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(ViewRepoError::NotFound);
        }

        let query = indoc! {"
            SELECT COUNT(*)
            FROM council_node_activities
            WHERE council_node_id = $1
        "};

        let (total_record,) = sqlx::query_as::<_, (i64,)>(query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let query = indoc! {"
            SELECT
                id,
                council_node_id,
                type,
                block_height,
                timestamp,
                payload
            FROM council_node_activities
            WHERE council_node_id = $1
            ORDER BY block_height DESC, id DESC
            LIMIT $2
            OFFSET $3
        "};

        let (limit, offset) = limit_offset(pagination);
        let activities = sqlx::query_as::<_, ActivityRow>(query)
            .bind(id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(
                |(id, council_node_id, kind, block_height, timestamp, Json(payload))| {
                    StakingAccountActivity {
                        id: id as u64,
                        council_node_id: council_node_id as u64,
                        kind,
                        block_height: block_height as u64,
                        timestamp: timestamp as u64,
                        payload,
                    }
                },
            )
            .collect();

        tx.commit().await?;

        Ok((
            activities,
            PaginationResult::new(total_record as u64, pagination),
        ))
    }
}

impl BlockViewRepo for Storage {
    async fn list_committed_council_nodes(
        &self,
        height: u64,
    ) -> Result<Vec<BlockCommittedCouncilNodeRow>, ViewRepoError> {
        let Ok(height) = i64::try_from(height) else {
            return Err(ViewRepoError::NotFound);
        };

        let mut tx = self.begin_snapshot().await?;

        let query = indoc! {"
            SELECT EXISTS (
                SELECT 1
                FROM blocks
                WHERE height = $1
            )
        "};

        let (exists,) = sqlx::query_as::<_, (bool,)>(query)
            .bind(height)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(ViewRepoError::NotFound);
        }

        let query = indoc! {"
            SELECT
                block_signatures.block_height,
                council_nodes.id,
                council_nodes.name,
                council_nodes.address,
                block_signatures.signature,
                block_signatures.is_proposer,
                blocks.time
            FROM block_signatures
            INNER JOIN council_nodes ON council_nodes.id = block_signatures.council_node_id
            INNER JOIN blocks ON blocks.height = block_signatures.block_height
            WHERE block_signatures.block_height = $1
            ORDER BY council_nodes.id ASC
        "};

        let rows = sqlx::query_as::<_, CommittedCouncilNodeRow>(query)
            .bind(height)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(
                |(block_height, id, name, address, signature, is_proposer, commit_time)| {
                    BlockCommittedCouncilNodeRow {
                        block_height: block_height as u64,
                        id: id as u64,
                        name,
                        address,
                        signature,
                        is_proposer,
                        commit_time: commit_time as u64,
                    }
                },
            )
            .collect();

        tx.commit().await?;

        Ok(rows)
    }
}

/// Run the database migrations for Postgres.
pub async fn run_migrations(pool: &PostgresPool) -> Result<(), MigrationsError> {
    sqlx::migrate!("migrations/postgres").run(&**pool).await?;
    Ok(())
}

/// Error possibly returned by [run_migrations].
#[derive(Debug, Error)]
#[error("cannot run migrations for postgres")]
pub struct MigrationsError(#[from] MigrateError);

fn council_node_from_row(row: CouncilNodeRow) -> CouncilNode {
    let (
        id,
        name,
        security_contact,
        pubkey_type,
        pubkey,
        address,
        created_at_block_height,
        last_left_at_block_height,
    ) = row;

    CouncilNode {
        id: id as u64,
        name,
        security_contact,
        pubkey_type,
        pubkey,
        address,
        created_at_block_height: created_at_block_height as u64,
        last_left_at_block_height: last_left_at_block_height.map(|height| height as u64),
    }
}

/// Postgres `LIMIT` and `OFFSET` for the given pagination; both are `BIGINT`.
fn limit_offset(pagination: Pagination) -> (i64, i64) {
    let limit = i64::try_from(pagination.limit.get()).unwrap_or(i64::MAX);
    let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use crate::{domain::Pagination, infra::storage::limit_offset};
    use std::num::NonZeroU64;

    #[test]
    fn test_limit_offset() {
        let pagination = Pagination::new(
            NonZeroU64::new(3).expect("3 is positive"),
            NonZeroU64::new(20).expect("20 is positive"),
        );
        assert_eq!(limit_offset(pagination), (20, 40));

        let pagination = Pagination::new(NonZeroU64::MAX, NonZeroU64::MAX);
        assert_eq!(limit_offset(pagination), (i64::MAX, i64::MAX));
    }
}
