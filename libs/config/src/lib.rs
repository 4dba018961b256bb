//! # Scanner Configuration
//!
//! Centralised configuration loading and defaults for the scanner services.
//!
//! ## Features
//!
//! - **Layered Loading**: TOML base file, optional per-environment overlay, `OBSCAN_*` variables
//! - **Secret Expansion**: `${VAR}` references in string values via [`expand_env`]
//! - **Keyed Defaults**: per-key lookup tables with an explicit fallback ([`KeyedDefault`])
//! - **Service Defaults**: shared constants in [`service`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use config::{load_config, resolve_config_path};
//! # #[derive(serde::Deserialize)] struct MyConfig { log_level: String }
//!
//! let path = resolve_config_path("OBSCAN_CONFIG_PATH", "configs/scanner.toml");
//! let cfg: MyConfig = load_config(&path, None).unwrap();
//! ```

pub mod keyed;
pub mod service;
pub mod service_config;

pub use keyed::KeyedDefault;
pub use service_config::{expand_env, load_config, load_layered, resolve_config_path, ENV_PREFIX};
