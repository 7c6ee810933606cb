/*! Integration tests for the sherry client core.
 *
 * This test suite is organized as a single integration test binary.
 * The module structure mirrors the main library structure:
 * - accounts: credential store lifecycle through load/commit cycles
 * - registry: the transactional commit protocol against real files
 * - watchers: the overlap invariant driven through the registry store
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sherry=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod accounts;
mod helpers;
mod registry;
mod watchers;
