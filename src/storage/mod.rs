// 存储模块 - 通用记录存储与持久化后端

// 子模块
pub mod config;
pub mod record;
pub mod repository;
pub mod seed;
pub mod store;

// 重新导出主要类型
pub use config::{open_backend, BackendConfig, StorageConfig};
pub use record::{new_record_id, Record};
pub use seed::SeedData;
pub use repository::StoreBackend;
pub use store::RecordStore;

// 重新导出具体实现
pub use repository::json_file::JsonFileBackend;
pub use repository::memory::MemoryBackend;

/// 各存储的持久化键
pub mod keys {
    pub const TENANTS: &str = "tenants-storage";
    pub const ORDERS: &str = "orders-storage";
    pub const TASKS: &str = "tasks-storage";
    pub const MAINTENANCE: &str = "maintenance-storage-v1";
    pub const EXAMINATIONS: &str = "examination-storage";
    pub const INCIDENTS: &str = "incidents-storage";
    pub const ATTESTATIONS: &str = "attestation-storage";
    pub const NOTIFICATIONS: &str = "notifications-storage";
    pub const NOTIFICATION_HISTORY: &str = "notification-history-storage";
    pub const KNOWLEDGE_BASE: &str = "knowledge-base-storage";
    pub const BUDGET_CATEGORIES: &str = "budget-categories-storage";
    pub const BUDGET_EXPENSES: &str = "budget-expenses-storage";
    pub const EQUIPMENT: &str = "equipment-storage";
    pub const CHECKLISTS: &str = "checklists-storage";
    pub const AUDITS: &str = "audits-storage";
    pub const TRAINING_REQUESTS: &str = "training-center-requests-storage";
    pub const AUTH: &str = "auth-storage";
}
