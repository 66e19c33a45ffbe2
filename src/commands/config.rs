//! 配置管理命令

use tracing::info;

use super::auth::{require_module, require_user};
use crate::event_bus::AppEvent;
use crate::models::{ModuleType, PersistedPortalConfig, PortalConfig};
use crate::utils::file_system;
use crate::AppState;

/// 获取当前配置
pub async fn get_config(state: &AppState) -> Result<PersistedPortalConfig, String> {
    require_user(state).await?;
    Ok(state.platform_domain.get_settings().get().await)
}

/// 更新配置，并把可以立即生效的部分应用到运行中的模块
pub async fn update_config(
    state: &AppState,
    config: PortalConfig,
) -> Result<PersistedPortalConfig, String> {
    require_module(state, ModuleType::Settings).await?;

    let updated = state
        .platform_domain
        .get_settings()
        .update(config)
        .await
        .map_err(|e| e.to_string())?;

    state
        .platform_domain
        .get_logger()
        .set_enabled(updated.logger_settings.enable_log_streaming);
    state
        .documents_domain
        .get_attestation()
        .set_warning_days(updated.certification_warning_days);

    state.event_bus.publish(AppEvent::ConfigUpdated {
        config_type: "portal".to_string(),
    });
    info!("配置已更新");
    Ok(updated)
}

/// 在文件管理器中打开日志目录
pub async fn open_log_folder(state: &AppState) -> Result<(), String> {
    let log_dir = state
        .log_dir
        .clone()
        .unwrap_or_else(file_system::get_log_dir);
    file_system::open_log_folder(&log_dir)
}

/// 在文件管理器中打开数据目录
pub async fn open_data_folder(state: &AppState) -> Result<(), String> {
    file_system::open_folder_in_explorer(&state.data_dir)
}
