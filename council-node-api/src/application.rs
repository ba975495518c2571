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

use crate::domain::Api;
use anyhow::Context as AnyhowContext;
use chainindex_common::domain::NetworkId;
use log::warn;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use tokio::{select, signal::unix::Signal, task};

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde_as(as = "DisplayFromStr")]
    pub network_id: NetworkId,
}

/// Serve the given [Api] until it fails or SIGTERM is received.
pub async fn run(config: Config, api: impl Api, mut sigterm: Signal) -> anyhow::Result<()> {
    let Config { network_id } = config;

    let serve_api_task = task::spawn(async move {
        api.serve(network_id)
            .await
            .context("serving council node API")
    });

    select! {
        result = serve_api_task => result
            .context("serve_api_task panicked")
            .and_then(|result| result.context("serve_api_task failed")),

        _ = sigterm.recv() => {
            warn!("SIGTERM received");
            Ok(())
        }
    }
}
