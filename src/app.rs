//! 应用程序初始化和启动
//!
//! 负责门户核心的完整启动流程，包括：
//! - 配置加载
//! - 日志系统初始化
//! - 持久化后端与各存储打开（首次打开时写入演示数据）
//! - 会话 Actor 启动
//! - 各领域模块初始化

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::actors::{SessionActor, SessionState};
use crate::domains::{DocumentsDomain, OperationsDomain, PlatformDomain};
use crate::event_bus::EventBus;
use crate::logger::{self, LogBroadcaster};
use crate::modules::*;
use crate::settings::SettingsManager;
use crate::storage::{keys, open_backend, RecordStore, SeedData};
use crate::utils::file_system;
use crate::AppState;

/// 事件总线容量
const EVENT_BUS_CAPACITY: usize = 256;

/// 启动参数
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// 数据目录（配置、存储文件、导出文件）
    pub data_dir: PathBuf,
    /// 日志目录；为 None 时不初始化全局日志（测试或宿主自行初始化）
    pub log_dir: Option<PathBuf>,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            data_dir: file_system::get_data_dir(),
            log_dir: Some(file_system::get_log_dir()),
        }
    }
}

/// 初始化门户核心并返回应用状态
///
/// 1. 读取 `<data_dir>/config.json`
/// 2. 初始化日志（可选）
/// 3. 打开持久化后端和全部存储
/// 4. 恢复登录会话并启动会话 Actor
/// 5. 组装各领域
pub async fn bootstrap(options: BootstrapOptions) -> Result<AppState> {
    let settings = Arc::new(
        SettingsManager::new(options.data_dir.join("config.json"))
            .await
            .context("设置管理器初始化失败")?,
    );
    let config = settings.get().await;

    let log_broadcaster = Arc::new(LogBroadcaster::new());
    if let Some(log_dir) = &options.log_dir {
        if let Err(e) = logger::init_with_broadcaster(log_broadcaster.clone(), log_dir) {
            eprintln!("日志系统已初始化，跳过: {}", e);
        }
    }
    log_broadcaster.set_enabled(config.logger_settings.enable_log_streaming);

    info!("初始化工业安全门户...");

    let backend = open_backend(&config.storage, &options.data_dir)
        .await
        .context("持久化后端初始化失败")?;
    info!("持久化后端: {}", backend.backend_type());

    let event_bus = Arc::new(EventBus::new(EVENT_BUS_CAPACITY));

    let seed = if config.storage.seed_demo_data {
        SeedData::demo(Utc::now())
    } else {
        SeedData::default()
    };

    macro_rules! open_store {
        ($key:expr, $seed:expr) => {
            RecordStore::open($key, Some(backend.clone()), Some(event_bus.clone()), $seed)
                .await
                .with_context(|| format!("打开存储 {} 失败", $key))?
        };
    }

    let tenants = TenantsManager::new(open_store!(keys::TENANTS, seed.tenants));
    let notifications = NotificationsManager::new(
        open_store!(keys::NOTIFICATIONS, seed.notifications),
        open_store!(keys::NOTIFICATION_HISTORY, Vec::new()),
        Some(event_bus.clone()),
    );
    let orders = OrdersManager::new(open_store!(keys::ORDERS, seed.orders));
    let knowledge_base = KnowledgeBaseManager::new(open_store!(keys::KNOWLEDGE_BASE, seed.knowledge_base));
    let attestation = AttestationManager::new(
        open_store!(keys::ATTESTATIONS, seed.certifications),
        config.certification_warning_days,
    );
    let training_center =
        TrainingCenterManager::new(open_store!(keys::TRAINING_REQUESTS, seed.training_requests));
    let tasks = TasksManager::new(open_store!(keys::TASKS, seed.tasks));
    let incidents = IncidentsManager::new(open_store!(keys::INCIDENTS, seed.incidents));
    let equipment = EquipmentManager::new(open_store!(keys::EQUIPMENT, seed.equipment));
    let maintenance = MaintenanceManager::new(open_store!(keys::MAINTENANCE, seed.maintenance));
    let examinations = ExaminationsManager::new(open_store!(keys::EXAMINATIONS, seed.examinations));
    let checklists = ChecklistsManager::new(
        open_store!(keys::CHECKLISTS, seed.checklists),
        open_store!(keys::AUDITS, seed.audits),
    );
    let budget = BudgetManager::new(
        open_store!(keys::BUDGET_CATEGORIES, seed.budget_categories),
        open_store!(keys::BUDGET_EXPENSES, seed.budget_expenses),
    );

    // 会话损坏时按未登录处理
    let session_state = SessionState::restore(backend.as_ref())
        .await
        .unwrap_or_else(|e| {
            warn!("恢复登录会话失败: {}", e);
            SessionState::default()
        });
    let (session_actor, session) =
        SessionActor::new(session_state, Some(backend.clone()), Some(event_bus.clone()));
    tokio::spawn(session_actor.run());

    let platform = PlatformDomain::new(
        Arc::new(tenants),
        Arc::new(notifications),
        session,
        settings,
        log_broadcaster,
    );
    let documents = DocumentsDomain::new(
        Arc::new(orders),
        Arc::new(knowledge_base),
        Arc::new(attestation),
        Arc::new(training_center),
    );
    let operations = OperationsDomain::new(
        Arc::new(tasks),
        Arc::new(incidents),
        Arc::new(equipment),
        Arc::new(maintenance),
        Arc::new(examinations),
        Arc::new(checklists),
        Arc::new(budget),
    );

    info!("工业安全门户初始化完成");

    Ok(AppState {
        platform_domain: Arc::new(platform),
        documents_domain: Arc::new(documents),
        operations_domain: Arc::new(operations),
        event_bus,
        data_dir: options.data_dir,
        log_dir: options.log_dir,
    })
}
