use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{PersistedPortalConfig, PortalConfig};

pub struct SettingsManager {
    path: PathBuf,
    data: RwLock<PersistedPortalConfig>,
}

impl SettingsManager {
    pub async fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let initial = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                serde_json::from_slice::<PersistedPortalConfig>(&bytes).unwrap_or_else(|e| {
                    warn!("配置文件解析失败，使用默认配置: {}", e);
                    PersistedPortalConfig::default()
                })
            }
            _ => {
                let default = PersistedPortalConfig::default();
                let json = serde_json::to_string_pretty(&default)?;
                tokio::fs::write(&path, json).await?;
                default
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(initial),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> PersistedPortalConfig {
        self.data.read().await.clone()
    }

    pub async fn update(&self, update: PortalConfig) -> Result<PersistedPortalConfig> {
        if let Some(reminders) = &update.reminders {
            if reminders.critical_days < 0 || reminders.critical_days > reminders.warning_days {
                anyhow::bail!(
                    "提醒阈值无效: critical_days={}, warning_days={}",
                    reminders.critical_days,
                    reminders.warning_days
                );
            }
        }
        if update.certification_warning_days.is_some_and(|days| days < 0) {
            anyhow::bail!("证书预警天数不能为负数");
        }

        let mut config = self.data.write().await;

        if let Some(storage) = update.storage {
            info!("存储配置已修改，重启后生效");
            config.storage = storage;
        }
        if let Some(reminders) = update.reminders {
            config.reminders = reminders;
        }
        if let Some(days) = update.certification_warning_days {
            config.certification_warning_days = days;
        }
        if let Some(logger) = update.logger_settings {
            config.logger_settings = logger;
        }
        if let Some(ui) = update.ui_settings {
            config.ui_settings = ui;
        }

        self.save(&config).await?;
        Ok(config.clone())
    }

    async fn save(&self, config: &PersistedPortalConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReminderSettings, UISettings};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let settings = SettingsManager::new(path.clone()).await.unwrap();

        assert!(path.exists());
        assert_eq!(settings.get().await, PersistedPortalConfig::default());
        assert_eq!(settings.get().await.certification_warning_days, 30);
    }

    #[tokio::test]
    async fn test_update_persists_partial_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let settings = SettingsManager::new(path.clone()).await.unwrap();

        let updated = settings
            .update(PortalConfig {
                reminders: Some(ReminderSettings {
                    critical_days: 2,
                    warning_days: 14,
                }),
                ui_settings: Some(UISettings {
                    theme: "dark".to_string(),
                    language: "ru-RU".to_string(),
                }),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.reminders.warning_days, 14);
        assert_eq!(updated.certification_warning_days, 30);

        let reopened = SettingsManager::new(path).await.unwrap();
        assert_eq!(reopened.get().await.ui_settings.theme, "dark");
    }

    #[tokio::test]
    async fn test_rejects_inverted_thresholds() {
        let dir = TempDir::new().unwrap();
        let settings = SettingsManager::new(dir.path().join("config.json"))
            .await
            .unwrap();
        let result = settings
            .update(PortalConfig {
                reminders: Some(ReminderSettings {
                    critical_days: 10,
                    warning_days: 5,
                }),
                ..Default::default()
            })
            .await;
        assert!(result.is_err());
        assert_eq!(settings.get().await.reminders, ReminderSettings::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let settings = SettingsManager::new(path).await.unwrap();
        assert_eq!(settings.get().await, PersistedPortalConfig::default());
    }
}
