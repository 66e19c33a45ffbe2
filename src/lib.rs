// 工业安全合规门户 - 核心库

// 声明模块
pub mod actors;
pub mod analysis;
pub mod app;
pub mod commands;
pub mod domains;
pub mod errors;
pub mod event_bus;
pub mod logger;
pub mod models;
pub mod modules;
pub mod settings;
pub mod storage;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use domains::{DocumentsDomain, OperationsDomain, PlatformDomain};
use event_bus::EventBus;

pub use app::{bootstrap, BootstrapOptions};
pub use errors::{PortalError, PortalResult};

/// 应用状态（按领域分组）
///
/// - 平台领域：租户、通知、会话、配置、日志
/// - 文档领域：命令、知识库、人员认证、培训中心申请
/// - 运营领域：任务、事故、设备、维护、检验、检查表与审核、预算
/// - 事件总线：用于领域间解耦通信
#[derive(Clone)]
pub struct AppState {
    /// 平台领域管理器
    pub platform_domain: Arc<PlatformDomain>,
    /// 文档领域管理器
    pub documents_domain: Arc<DocumentsDomain>,
    /// 运营领域管理器
    pub operations_domain: Arc<OperationsDomain>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
    /// 数据目录
    pub data_dir: PathBuf,
    /// 日志目录（未初始化日志时为 None）
    pub log_dir: Option<PathBuf>,
}
