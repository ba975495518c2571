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

use derive_more::Display;

/// A council node, i.e. an identity participating in block commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouncilNode {
    pub id: u64,
    pub name: String,
    pub security_contact: Option<String>,
    pub pubkey_type: String,
    pub pubkey: String,
    pub address: String,
    pub created_at_block_height: u64,
    pub last_left_at_block_height: Option<u64>,
}

impl CouncilNode {
    /// A council node is active until it leaves the council.
    pub fn status(&self) -> CouncilNodeStatus {
        match self.last_left_at_block_height {
            Some(_) => CouncilNodeStatus::Inactive,
            None => CouncilNodeStatus::Active,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum CouncilNodeStatus {
    #[display("active")]
    Active,

    #[display("inactive")]
    Inactive,
}

/// An event on the staking account of a council node, e.g. a deposit, a reward or a slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingAccountActivity {
    pub id: u64,
    pub council_node_id: u64,
    /// Activity type as recorded by the ingestion pipeline.
    pub kind: String,
    pub block_height: u64,
    /// Block time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use crate::domain::{CouncilNode, CouncilNodeStatus};

    #[test]
    fn test_status() {
        let mut council_node = CouncilNode {
            id: 1,
            name: "Crypto.com Node 1".to_owned(),
            security_contact: None,
            pubkey_type: "tendermint/PubKeyEd25519".to_owned(),
            pubkey: "WLbHvdlAwEbVMRDvq9gjU0QKZ7SzsKSLDtpwPQs9fUQ=".to_owned(),
            address: "0x4fd8162521f2e628adced7c1baa39384a08b4a3d".to_owned(),
            created_at_block_height: 1,
            last_left_at_block_height: None,
        };
        assert_eq!(council_node.status(), CouncilNodeStatus::Active);
        assert_eq!(council_node.status().to_string(), "active");

        council_node.last_left_at_block_height = Some(42);
        assert_eq!(council_node.status(), CouncilNodeStatus::Inactive);
        assert_eq!(council_node.status().to_string(), "inactive");
    }
}
