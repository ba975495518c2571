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

use derive_more::{Deref, Display, Into};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of the indexed chain, e.g. "mainnet" or "testnet-croeseid".
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Deref, Into)]
#[deref(forward)]
pub struct NetworkId(String);

impl FromStr for NetworkId {
    type Err = InvalidNetworkIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            Err(InvalidNetworkIdError::Empty)
        } else if s.chars().any(char::is_whitespace) {
            Err(InvalidNetworkIdError::Whitespace(s.to_owned()))
        } else {
            Ok(Self(s.to_owned()))
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidNetworkIdError {
    #[error("network ID must not be empty")]
    Empty,

    #[error("network ID {0:?} must not contain whitespace")]
    Whitespace(String),
}
