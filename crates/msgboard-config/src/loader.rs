// SPDX-FileCopyrightText: 2026 Msgboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered loading of `msgboard.toml` files and `MSGBOARD_*` variables.
//!
//! Lookup order: `./msgboard.toml` > `~/.config/msgboard/msgboard.toml` >
//! `/etc/msgboard/msgboard.toml`, with `MSGBOARD_` environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::MsgboardConfig;

const SYSTEM_CONFIG: &str = "/etc/msgboard/msgboard.toml";
const LOCAL_CONFIG: &str = "msgboard.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("msgboard/msgboard.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/msgboard/msgboard.toml`
/// 3. `~/.config/msgboard/msgboard.toml`
/// 4. `./msgboard.toml`
/// 5. `MSGBOARD_*` environment variables
pub fn load_config() -> Result<MsgboardConfig, figment::Error> {
    debug!("loading config from standard locations");
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MsgboardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MsgboardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load one explicit file (the `--config` flag) plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<MsgboardConfig, figment::Error> {
    debug!(path = %path.display(), "loading config from explicit path");
    Figment::new()
        .merge(Serialized::defaults(MsgboardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MsgboardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MSGBOARD_POLL_INTERVAL_MS` must become `poll.interval_ms`.
fn env_provider() -> Env {
    Env::prefixed("MSGBOARD_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env var name (any case) to a dotted config path.
///
/// Figment passes the name as written (`POLL_INTERVAL_MS`), so it is
/// lowercased before matching.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 6] = ["api", "poll", "pagination", "display", "log", "session"];

    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

/// Paths of config files that exist, with their contents, for diagnostics.
pub(crate) fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(LOCAL_CONFIG) {
        let path = std::env::current_dir()
            .map(|d| d.join(LOCAL_CONFIG).display().to_string())
            .unwrap_or_else(|_| LOCAL_CONFIG.to_string());
        sources.push((path, content));
    }

    if let Some(path) = user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push((path.display().to_string(), content));
    }

    if let Ok(content) = std::fs::read_to_string(SYSTEM_CONFIG) {
        sources.push((SYSTEM_CONFIG.to_string(), content));
    }

    sources
}
