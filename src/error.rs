//! 错误类型：目标日期解析与设置文件读写

use std::path::PathBuf;
use thiserror::Error;

/// 用户输入的目标日期无法解析（期望 `YYYY-MM-DD`）
#[derive(Debug, Error)]
pub enum TargetDateError {
    #[error("invalid target date `{input}`, expected YYYY-MM-DD")]
    Malformed {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// chrono 的 `%Y` 接受 `+`/`-` 前缀，这里只收四位年份
    #[error("invalid target date `{input}`, expected YYYY-MM-DD without a sign")]
    Signed { input: String },
}

impl TargetDateError {
    /// 用户原始输入
    pub fn input(&self) -> &str {
        match self {
            TargetDateError::Malformed { input, .. } | TargetDateError::Signed { input } => input,
        }
    }
}

/// 设置文件读写错误
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings have no `target_date` field")]
    MissingTargetDate,

    #[error(transparent)]
    InvalidTargetDate(#[from] TargetDateError),
}

impl SettingsError {
    /// 文件不存在属于正常首次启动，其余都值得警告
    pub fn is_not_found(&self) -> bool {
        matches!(self, SettingsError::NotFound(_))
    }
}
