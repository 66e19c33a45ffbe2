//! 表格导出命令
//!
//! 导出文件写入 `<data_dir>/exports/`，返回文件路径。

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::auth::{require_module, resolve_tenant};
use crate::models::ModuleType;
use crate::modules::{attestation, equipment, knowledge_base, maintenance, orders};
use crate::utils::{validate_record_id, write_csv};
use crate::AppState;

/// 可导出的台账
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    KnowledgeBase,
    Certifications,
    Maintenance,
    Orders,
    Equipment,
}

impl ExportTarget {
    fn module(self) -> ModuleType {
        match self {
            Self::KnowledgeBase => ModuleType::KnowledgeBase,
            Self::Certifications | Self::Orders => ModuleType::Attestation,
            Self::Maintenance => ModuleType::Maintenance,
            Self::Equipment => ModuleType::FacilityCatalog,
        }
    }

    fn file_stem(self) -> &'static str {
        match self {
            Self::KnowledgeBase => "knowledge-base",
            Self::Certifications => "certifications",
            Self::Maintenance => "maintenance",
            Self::Orders => "orders",
            Self::Equipment => "equipment",
        }
    }
}

/// 导出本租户的台账为 CSV
pub async fn export_records(
    state: &AppState,
    target: ExportTarget,
    tenant_id: Option<String>,
) -> Result<String, String> {
    let user = require_module(state, target.module()).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    validate_record_id(&tenant_id)?;

    let path: PathBuf = state.data_dir.join("exports").join(format!(
        "{}-{}-{}.csv",
        target.file_stem(),
        tenant_id,
        Utc::now().format("%Y%m%d-%H%M%S")
    ));

    let documents = &state.documents_domain;
    let result = match target {
        ExportTarget::KnowledgeBase => {
            let rows = documents.get_knowledge_base().by_tenant(&tenant_id).await;
            write_csv(&path, &rows, &knowledge_base::export_columns())
        }
        ExportTarget::Certifications => {
            let rows = documents.get_attestation().by_tenant(&tenant_id).await;
            write_csv(&path, &rows, &attestation::export_columns())
        }
        ExportTarget::Orders => {
            let rows = documents.get_orders().by_tenant(&tenant_id).await;
            write_csv(&path, &rows, &orders::export_columns())
        }
        ExportTarget::Maintenance => {
            let rows = state
                .operations_domain
                .get_maintenance()
                .by_tenant(&tenant_id)
                .await;
            write_csv(&path, &rows, &maintenance::export_columns())
        }
        ExportTarget::Equipment => {
            let rows = state
                .operations_domain
                .get_equipment()
                .by_tenant(&tenant_id)
                .await;
            write_csv(&path, &rows, &equipment::export_columns())
        }
    };
    result.map_err(|e| format!("导出失败: {:#}", e))?;

    Ok(path.to_string_lossy().to_string())
}
