//! Tiered configuration.
//!
//! Tiers, lowest priority first:
//! 1. **Defaults** - built in
//! 2. **Project** - `./tasklift/config.yaml`
//! 3. **User** - `~/.tasklift/config.yaml`
//! 4. **Environment** - see below
//!
//! YAML tiers merge field by field.
//!
//! ## Environment Variables
//! - `TASKLIFT_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `TASKLIFT_DB_PATH` - Database path
//! - `TASKLIFT_HOST` - Bind address
//! - `PORT` - Listen port
//! - `TASKLIFT_SECURE_COOKIES` - Mark session cookies `Secure`

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{merge_into, merge_tiers};
pub use types::*;
