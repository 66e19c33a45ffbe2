//! 业务模块
//!
//! 每个模块包装一个或多个记录存储，提供该模块的增删改查、查询与规则：
//! - 租户与订阅模块
//! - 命令（文档状态流转）
//! - 任务、事故、维护、检验、设备目录
//! - 检查表与审核、培训中心申请
//! - 人员认证、通知、知识库、预算

pub mod attestation;
pub mod budget;
pub mod checklists;
pub mod equipment;
pub mod examinations;
pub mod incidents;
pub mod knowledge_base;
pub mod maintenance;
pub mod notifications;
pub mod orders;
pub mod tasks;
pub mod tenants;
pub mod training_center;

pub use attestation::AttestationManager;
pub use budget::BudgetManager;
pub use checklists::ChecklistsManager;
pub use equipment::EquipmentManager;
pub use examinations::ExaminationsManager;
pub use incidents::{IncidentFilter, IncidentsManager};
pub use knowledge_base::KnowledgeBaseManager;
pub use maintenance::MaintenanceManager;
pub use notifications::{BulkNotification, NotificationsManager};
pub use orders::OrdersManager;
pub use tasks::{TaskFilter, TasksManager};
pub use tenants::TenantsManager;
pub use training_center::{TrainingCenterManager, TrainingReferral};
