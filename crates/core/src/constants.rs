//! Constants used throughout the vgm codebase

// Declaration syntax
pub const INLINE_TAG: &str = "vgm";
pub const FILE_TAG: &str = "vgm_file";
pub const DECLARATION_DELIMITER: char = ':';

// Prefix for file-backed secret temp files
pub const TEMP_FILE_PREFIX: &str = "vgm";

// Environment variable names
pub const VGM_ENV_ENABLED_VAR: &str = "VGM_ENV_ENABLED";
pub const VGM_LOG_VAR: &str = "VGM_LOG";
pub const VAULT_ADDR_VAR: &str = "VAULT_ADDR";
pub const VAULT_TOKEN_VAR: &str = "VAULT_TOKEN";
pub const GATEKEEPER_ADDR_VAR: &str = "GATEKEEPER_ADDR";
pub const MESOS_TASK_ID_VAR: &str = "MESOS_TASK_ID";
pub const PATH_VAR: &str = "PATH";

// Vault protocol
pub const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";
pub const VAULT_API_PREFIX: &str = "/v1/";
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";
pub const CUBBYHOLE_RESPONSE_PATH: &str = "/v1/cubbyhole/response";

// Gatekeeper protocol
pub const GATEKEEPER_TOKEN_PATH: &str = "/token";
