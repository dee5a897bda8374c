// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Node configuration loaded from TOML.
//!
//! ```text
//! [node]
//! name = "amun-token-1"
//! data_dir = "./data"
//!
//! [http]
//! listen_addr = "127.0.0.1:9090"
//!
//! [token]
//! name = "TestToken"
//! symbol = "TST"
//! decimals = 18
//! initial_supply = "10"
//! owner = "0x00000000000000000000000000000000000000aa"
//! ```
//!
//! The `[token]` table is only read when the data directory holds no ledger yet.

use crate::core::ledger::TokenMetadata;
use crate::core::types::{serde_amount, Address, Amount};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("read config {path}: {source}")]
    Read {
        /// Config path.
        path: String,
        /// I/O failure.
        source: std::io::Error,
    },
    /// Not valid TOML for [`NodeConfig`].
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Parsed but unusable for genesis.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Where a [`NodeConfig`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from a TOML file.
    File,
    /// No file; built-in defaults.
    Defaults,
}

/// Node configuration root.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node settings.
    #[serde(default)]
    pub node: NodeSettings,
    /// HTTP endpoints.
    #[serde(default)]
    pub http: HttpConfig,
    /// Genesis parameters for a fresh ledger.
    pub token: TokenConfig,
}

/// Node settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Human-readable name.
    pub name: String,
    /// Data directory (sled db).
    pub data_dir: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            name: "amun-token".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

/// HTTP config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address, e.g. 0.0.0.0:9090.
    pub listen_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Token genesis parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Display decimals (informational).
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Supply credited to `owner` at genesis, in smallest units.
    #[serde(with = "serde_amount")]
    pub initial_supply: Amount,
    /// Owner identity; the only address allowed to mint.
    pub owner: Address,
}

fn default_decimals() -> u8 {
    18
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Amun Token".to_string(),
            symbol: "AMUN".to_string(),
            decimals: default_decimals(),
            initial_supply: 0,
            owner: Address::ZERO,
        }
    }
}

impl NodeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: NodeConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if path.exists() {
            Ok((Self::load(path)?, ConfigSource::File))
        } else {
            Ok((Self::default(), ConfigSource::Defaults))
        }
    }

    /// True when an operator-supplied `[token]` table disagrees with the stored
    /// ledger's metadata. Defaults never count as a disagreement.
    pub fn token_mismatch(&self, source: ConfigSource, stored: &TokenMetadata) -> bool {
        if source == ConfigSource::Defaults {
            return false;
        }
        let t = &self.token;
        t.name != stored.name
            || t.symbol != stored.symbol
            || t.decimals != stored.decimals
            || t.owner != stored.owner
    }

    /// Reject configs that cannot produce a valid genesis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.owner.is_zero() {
            return Err(ConfigError::Invalid("token.owner must not be the zero address"));
        }
        if self.token.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("token.symbol must not be empty"));
        }
        if self.node.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("node.data_dir must not be empty"));
        }
        Ok(())
    }
}
