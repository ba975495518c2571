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

use anyhow::Context;
use chainindex_common::{
    config::{CONFIG_FILE, ConfigExt},
    infra::pool::postgres::PostgresPool,
    telemetry,
};
use clap::Parser;
use council_node_api::{
    application,
    config::Config,
    infra::{
        self,
        api::AxumApi,
        storage::{self, Storage},
    },
};
use log::{error, info};
use std::{panic, path::PathBuf, process};
use tokio::signal::unix::{SignalKind, signal};

/// Read-only HTTP API over the council node projections.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file, overridden by `APP__` prefixed environment variables.
    #[arg(long, env = CONFIG_FILE, default_value = "config.yaml")]
    config_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    telemetry::init_logging();
    panic::set_hook(Box::new(|panic| error!(panic:%; "process panicked")));

    if let Err(error) = run(cli).await {
        let backtrace = error.backtrace();
        let error = format!("{error:#}");
        error!(error, backtrace:%; "process exited with ERROR");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let sigterm = signal(SignalKind::terminate()).context("register SIGTERM handler")?;

    let config = Config::load_from(&cli.config_file).context("load configuration")?;
    info!(config:?; "starting");
    let Config {
        run_migrations,
        application_config,
        infra_config,
        telemetry_config: telemetry::Config { metrics_config },
    } = config;

    telemetry::init_metrics(metrics_config).context("initialize metrics")?;

    let infra::Config {
        api_config,
        storage_config,
    } = infra_config;

    let pool = PostgresPool::new(storage_config)
        .await
        .context("create DB pool for Postgres")?;
    if run_migrations {
        storage::run_migrations(&pool)
            .await
            .context("run Postgres migrations")?;
    }

    let api = AxumApi::new(api_config, Storage::new(pool));

    application::run(application_config, api, sigterm)
        .await
        .context("run council node API application")
}
