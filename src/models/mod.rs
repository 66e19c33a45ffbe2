// 数据模型模块 - 定义所有的数据结构

use serde::{Deserialize, Serialize};

use crate::storage::StorageConfig;

/// 把补丁中的 `Some` 字段合并到记录上
///
/// `set:` 后的字段直接覆盖，`opt:` 后的字段对应记录里的 `Option`。
macro_rules! merge_fields {
    ($target:expr, $patch:expr; set: $($field:ident),* $(; opt: $($opt:ident),*)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )*
        $($(
            if let Some(value) = $patch.$opt {
                $target.$opt = Some(value);
            }
        )*)?
    };
}

pub mod budget;
pub mod certification;
pub mod checklist;
pub mod equipment;
pub mod examination;
pub mod incident;
pub mod knowledge;
pub mod maintenance;
pub mod notification;
pub mod order;
pub mod status;
pub mod task;
pub mod tenant;
pub mod training_request;
pub mod user;

pub use budget::{BudgetCategory, BudgetExpense};
pub use certification::Certification;
pub use checklist::{Audit, Checklist};
pub use equipment::Equipment;
pub use examination::Examination;
pub use incident::Incident;
pub use knowledge::KnowledgeDocument;
pub use maintenance::MaintenanceWork;
pub use notification::{Notification, NotificationHistoryEntry};
pub use order::Order;
pub use status::DocumentStatus;
pub use task::Task;
pub use tenant::Tenant;
pub use training_request::TrainingRequest;
pub use user::{ModuleType, User, UserRole};

/// 门户配置更新（只包含需要修改的字段）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    /// 存储配置（重启后生效）
    pub storage: Option<StorageConfig>,
    /// 提醒阈值
    pub reminders: Option<ReminderSettings>,
    /// 证书到期预警天数
    pub certification_warning_days: Option<i64>,
    /// 日志设置
    pub logger_settings: Option<LoggerSettings>,
    /// UI设置
    pub ui_settings: Option<UISettings>,
}

/// 提醒阈值设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSettings {
    /// 剩余天数不超过该值视为紧急
    pub critical_days: i64,
    /// 剩余天数不超过该值视为预警
    pub warning_days: i64,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            critical_days: 3,
            warning_days: 7,
        }
    }
}

/// 日志设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// 是否向界面推送日志
    pub enable_log_streaming: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enable_log_streaming: true,
        }
    }
}

/// UI设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UISettings {
    /// 主题（light/dark）
    pub theme: String,
    /// 语言
    pub language: String,
}

impl Default for UISettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            language: "ru-RU".to_string(),
        }
    }
}

/// 持久化的门户配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPortalConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reminders: ReminderSettings,
    #[serde(default = "default_certification_warning_days")]
    pub certification_warning_days: i64,
    #[serde(default)]
    pub logger_settings: LoggerSettings,
    #[serde(default)]
    pub ui_settings: UISettings,
}

fn default_certification_warning_days() -> i64 {
    30
}

impl Default for PersistedPortalConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            reminders: ReminderSettings::default(),
            certification_warning_days: default_certification_warning_days(),
            logger_settings: LoggerSettings::default(),
            ui_settings: UISettings::default(),
        }
    }
}
