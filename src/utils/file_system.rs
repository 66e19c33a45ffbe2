//! 文件系统操作工具
//!
//! 提供跨平台的数据目录、日志目录定位以及打开文件夹

use std::path::{Path, PathBuf};
use tracing::info;

pub const APP_DIR_NAME: &str = "safety-portal";

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

/// 在系统文件管理器中打开文件夹
///
/// - Windows: explorer
/// - macOS: open
/// - Linux: xdg-open
pub fn open_folder_in_explorer(path: &Path) -> Result<(), String> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| format!("创建目录失败: {}", e))?;
    }

    let program = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    std::process::Command::new(program)
        .arg(path)
        .spawn()
        .map_err(|e| format!("无法打开文件夹: {}", e))?;

    Ok(())
}

/// 数据目录（存储文件、配置、导出文件）
///
/// - macOS: ~/Library/Application Support/safety-portal
/// - Windows: %APPDATA%/safety-portal
/// - Linux: ~/.local/share/safety-portal
pub fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir().join("Library/Application Support").join(APP_DIR_NAME)
    } else if cfg!(target_os = "windows") {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join(APP_DIR_NAME)
    } else {
        home_dir().join(".local/share").join(APP_DIR_NAME)
    }
}

/// 日志目录
///
/// - macOS: ~/Library/Logs/safety-portal
/// - 其他平台: 数据目录下的 logs
pub fn get_log_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir().join("Library/Logs").join(APP_DIR_NAME)
    } else {
        get_data_dir().join("logs")
    }
}

/// 打开日志文件夹
pub fn open_log_folder(log_dir: &Path) -> Result<(), String> {
    info!("打开日志文件夹: {:?}", log_dir);
    open_folder_in_explorer(log_dir)
}
