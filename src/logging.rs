//! 日志：滚动文件写入数据目录，警告同时输出到 stderr

use std::path::{Path, PathBuf};

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};

const LOG_FILE_BASENAME: &str = "progress-sentinel";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
/// 未设置 RUST_LOG 时的级别
const DEFAULT_LOG_SPEC: &str = "info";

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// 初始化日志；返回的 handle 需在 main 中保持存活
pub fn init_logging(data_dir: &Path) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(DEFAULT_LOG_SPEC)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir(data_dir))
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::Direct)
        .start()
}
