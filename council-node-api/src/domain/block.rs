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

/// One council node's signature on one committed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCommittedCouncilNodeRow {
    pub block_height: u64,
    pub id: u64,
    pub name: String,
    pub address: String,
    pub signature: String,
    pub is_proposer: bool,
    /// Commit time in milliseconds since the Unix epoch.
    pub commit_time: u64,
}
