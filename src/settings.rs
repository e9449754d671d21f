//! JSON 设置文件：保存目标日期，便于迁移与长期保存

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SettingsError;
use crate::widget::{DATE_FORMAT, parse_target_date};

/// 设置文件名（放在应用数据目录下）
pub const SETTINGS_FILENAME: &str = "widget_settings.json";

/// 覆盖设置文件路径的环境变量
pub const SETTINGS_PATH_ENV: &str = "PROGRESS_SENTINEL_SETTINGS";

/// 文件缺失或无法解析时的默认目标日期
pub const DEFAULT_TARGET_DATE: (i32, u32, u32) = (2026, 12, 31);

/// 应用数据目录（可迁移：复制此目录即可）
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("progress-sentinel")
}

/// 设置文件路径：环境变量优先，否则在数据目录下
pub fn settings_path() -> PathBuf {
    resolve_settings_path(std::env::var_os(SETTINGS_PATH_ENV))
}

fn resolve_settings_path(overridden: Option<OsString>) -> PathBuf {
    match overridden {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => data_dir().join(SETTINGS_FILENAME),
    }
}

pub fn default_target_date() -> NaiveDate {
    let (y, m, d) = DEFAULT_TARGET_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MAX)
}

/// 文件中的原始结构；未知字段原样保留，保存时写回
#[derive(Serialize, Deserialize, Default, Debug)]
struct RawSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_date: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub target_date: NaiveDate,
    extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_date: default_target_date(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    pub fn from_json(contents: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_json::from_str(contents)?;
        let target_date = raw
            .target_date
            .as_deref()
            .ok_or(SettingsError::MissingTargetDate)
            .and_then(|s| parse_target_date(s).map_err(SettingsError::from))?;
        Ok(Self {
            target_date,
            extra: raw.extra,
        })
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        let raw = RawSettings {
            target_date: Some(self.target_date.format(DATE_FORMAT).to_string()),
            extra: self.extra.clone(),
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    /// 读取设置；任何失败都返回错误，由调用方决定是否回退
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SettingsError::NotFound(path.to_path_buf())
            } else {
                SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&contents)
    }

    /// 读取设置，失败时回退到默认目标日期（不提示用户，只记日志）
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                info!("no settings at {}, using default target date", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = self.to_json()?;
        fs::write(path, contents).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
