//! Integration tests for the resource constructs, built into one test binary.
//!
//! - lambda: functions and their execution roles
//! - lambda_api: REST APIs backed by a single function
//! - rest_api: routes, methods, deployments and stages
//! - document: template parameters and outputs

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tessera=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod document;
mod helpers;
mod lambda;
mod lambda_api;
mod rest_api;
