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

use crate::{application, infra};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub run_migrations: bool,

    #[serde(rename = "application")]
    pub application_config: application::Config,

    #[serde(rename = "infra")]
    pub infra_config: infra::Config,

    #[serde(rename = "telemetry")]
    pub telemetry_config: chainindex_common::telemetry::Config,
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use chainindex_common::config::ConfigExt;
    use figment::Jail;
    use std::time::Duration;

    #[test]
    fn test_load_from() {
        Jail::expect_with(|jail| {
            jail.set_env("APP__INFRA__STORAGE__PASSWORD", "postgres");
            jail.set_env("APP__APPLICATION__NETWORK_ID", "testnet");
            jail.set_env("APP__INFRA__API__MAX_PAGE_SIZE", "50");

            let config = Config::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config.yaml"))
                .map_err(|error| *error)?;

            assert!(!config.run_migrations);
            assert_eq!(config.application_config.network_id.to_string(), "testnet");
            assert_eq!(config.infra_config.api_config.port, 8088);
            assert_eq!(config.infra_config.api_config.request_body_limit, 1024 * 1024);
            assert_eq!(config.infra_config.api_config.default_page_size.get(), 20);
            assert_eq!(config.infra_config.api_config.max_page_size.get(), 50);
            assert_eq!(
                config.infra_config.storage_config.idle_timeout,
                Duration::from_secs(60)
            );
            assert!(!config.telemetry_config.metrics_config.enabled);

            Ok(())
        });
    }
}
