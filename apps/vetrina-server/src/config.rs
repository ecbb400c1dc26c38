//! Configuration management for Vetrina

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::document::{parse_file_list, DEFAULT_BASE_PATH};
use crate::engine::DEFAULT_WORKER_SRC;
use crate::raster::{FIRST_PASS_SCALE, UPGRADE_PASS_SCALE};
use crate::resolver::ResolverConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub documents: DocumentsConfig,
    pub render: RenderConfig,
    pub engine: EngineConfig,
    pub titles: TitlesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    /// Directory holding the documents
    pub dir: PathBuf,
    /// URL prefix documents are served under
    pub base_path: String,
    /// File names to preview, in display order
    pub files: Vec<String>,
    /// Whether the host page mounts the viewer modal
    pub modal_viewer: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub first_pass_scale: f32,
    pub upgrade_scale: f32,
    pub device_pixel_ratio: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Source names, tried in order
    pub sources: Vec<String>,
    pub worker_src: String,
    /// Acquire the engine before the first pass
    pub preload: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlesConfig {
    /// Extra manual titles, merged over the built-in table
    pub overrides: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            documents: DocumentsConfig {
                dir: PathBuf::from("./documents"),
                base_path: DEFAULT_BASE_PATH.to_string(),
                files: Vec::new(),
                modal_viewer: true,
            },
            render: RenderConfig {
                first_pass_scale: FIRST_PASS_SCALE,
                upgrade_scale: UPGRADE_PASS_SCALE,
                device_pixel_ratio: None,
            },
            engine: EngineConfig {
                sources: vec!["mupdf".to_string()],
                worker_src: DEFAULT_WORKER_SRC.to_string(),
                preload: true,
            },
            titles: TitlesConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source. Unset variables
    /// take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", var("SERVER_PORT"), defaults.server.port)?,
            },
            documents: DocumentsConfig {
                dir: var("DOCUMENTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.documents.dir),
                base_path: var("DOCUMENTS_BASE_PATH")
                    .map(|p| p.trim_matches('/').to_string())
                    .filter(|p| !p.is_empty())
                    .unwrap_or(defaults.documents.base_path),
                files: var("DOCUMENT_FILES")
                    .map(|raw| parse_file_list(&raw))
                    .unwrap_or(defaults.documents.files),
                modal_viewer: parse_flag(
                    "MODAL_VIEWER",
                    var("MODAL_VIEWER"),
                    defaults.documents.modal_viewer,
                )?,
            },
            render: RenderConfig {
                first_pass_scale: parse_var(
                    "FIRST_PASS_SCALE",
                    var("FIRST_PASS_SCALE"),
                    defaults.render.first_pass_scale,
                )?,
                upgrade_scale: parse_var(
                    "UPGRADE_SCALE",
                    var("UPGRADE_SCALE"),
                    defaults.render.upgrade_scale,
                )?,
                device_pixel_ratio: var("DEVICE_PIXEL_RATIO")
                    .map(|v| parse_value("DEVICE_PIXEL_RATIO", &v))
                    .transpose()?,
            },
            engine: EngineConfig {
                sources: var("ENGINE_SOURCES")
                    .map(|v| {
                        v.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or(defaults.engine.sources),
                worker_src: var("ENGINE_WORKER_SRC").unwrap_or(defaults.engine.worker_src),
                preload: parse_flag("ENGINE_PRELOAD", var("ENGINE_PRELOAD"), defaults.engine.preload)?,
            },
            titles: TitlesConfig {
                overrides: var("MANUAL_TITLES")
                    .map(|raw| {
                        serde_json::from_str::<HashMap<String, String>>(&raw).map_err(|e| {
                            ConfigError::InvalidValue {
                                name: "MANUAL_TITLES",
                                value: raw.clone(),
                                reason: e.to_string(),
                            }
                        })
                    })
                    .transpose()?
                    .unwrap_or_default(),
            },
        })
    }
}

impl RenderConfig {
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            first_pass_scale: self.first_pass_scale,
            upgrade_scale: self.upgrade_scale,
            device_pixel_ratio: self.device_pixel_ratio,
        }
    }
}

fn parse_value<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_var<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| parse_value(name, &v))
}

fn parse_flag(name: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}
