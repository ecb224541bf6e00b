// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod object_store;
mod runtime;

use std::{env, sync::Arc};

use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use s3_log_agent::config::Config;
use s3_log_agent::processor::S3EventProcessor;
use s3_log_agent::transport::GelfTransportFactory;

use crate::object_store::HttpObjectStore;
use crate::runtime::RuntimeClient;

const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";

#[tokio::main]
pub async fn main() {
    let log_level = env::var("LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("hyper=off,reqwest=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Error loading configuration on forwarder startup: {e}");
            return;
        }
    };
    debug!("{config:?}");
    debug!(
        "Graylog host: {}:{}",
        config.graylog_host, config.graylog_port
    );

    let runtime_api = match env::var(RUNTIME_API_VAR) {
        Ok(value) => value,
        Err(_) => {
            error!("{RUNTIME_API_VAR} is not set. Shutting down forwarder.");
            return;
        }
    };

    let object_store = Arc::new(HttpObjectStore::new(&config));
    let transport_factory = Arc::new(GelfTransportFactory::new(Arc::clone(&config)));
    let processor = S3EventProcessor::new(config, object_store, transport_factory);

    let runtime = RuntimeClient::new(&runtime_api);
    runtime.run(&processor).await;
}
