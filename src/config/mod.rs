//! Configuration model for confsync.
//!
//! This module defines the Config struct that represents `confsync.yaml` at the
//! project root. It supports forward-compatible YAML parsing (unknown fields are
//! ignored), defaults for every field, and validation of config values.

mod model;
mod operations;


pub use model::{
    CONFIG_FILE_NAME, Config, DEFAULT_DIRECTIVE_PREFIX, DEFAULT_FILE_EXTENSION,
    DEFAULT_SCRATCH_SUBDIR,
};
