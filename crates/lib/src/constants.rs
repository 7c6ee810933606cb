//! Shared constants: file locations and folder setting limits.

/// Directory under the user's home holding the persisted client state.
pub const CONFIG_DIR_NAME: &str = ".sherry";
/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "SHERRY_CONFIG_DIR";

pub const CONFIG_FILE: &str = "config.json";
pub const AUTH_FILE: &str = "auth.json";
pub const PID_FILE: &str = "pid";

/// Hard ceiling for a single file in a shared folder, in bytes.
pub const MAX_FILE_SIZE: u64 = 1_000_000_000;
/// Hard ceiling for a whole shared folder, in bytes.
pub const MAX_DIR_SIZE: u64 = 2_000_000_000;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;
pub const DEFAULT_MAX_DIR_SIZE: u64 = 5_000_000;
pub const DEFAULT_ALLOW_DIR: bool = true;
