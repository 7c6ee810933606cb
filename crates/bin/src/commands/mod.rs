//! Command handlers. Every mutating handler runs inside
//! [`RegistryStore::run_command`](sherry::RegistryStore::run_command), so the
//! persisted state is only rewritten when the whole command succeeds.

pub mod auth;
pub mod folder;
pub mod service;
