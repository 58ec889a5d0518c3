//! Test support: one-time tracing setup and sample trees.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::TreeNode;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Five-level system hierarchy used across tests and demos.
///
/// `root -> [A, B]`; A and B each carry two services with tasks below.
pub fn sample_tree() -> TreeNode {
    let n = TreeNode::leaf;
    n("root", "Root System", "Core Entry Point").with_children(vec![
        n("A", "Module A", "User Authentication").with_children(vec![
            n("A1", "Service A1", "Login Handler").with_children(vec![
                n("A1-1", "Task A1.1", "DB Query")
                    .with_children(vec![n("A1-1-1", "Log A1.1.1", "Success Audit")]),
                n("A1-2", "Task A1.2", "JWT Sign"),
            ]),
            n("A2", "Service A2", "Register Handler")
                .with_children(vec![n("A2-1", "Task A2.1", "Email Verification")]),
        ]),
        n("B", "Module B", "Data Processing").with_children(vec![
            n("B1", "Service B1", "Parser")
                .with_children(vec![n("B1-1", "Task B1.1", "CSV Reader")]),
            n("B2", "Service B2", "Exporter").with_children(vec![
                n("B2-1", "Task B2.1", "PDF Generator"),
                n("B2-2", "Task B2.2", "Excel Generator"),
            ]),
        ]),
    ])
}
