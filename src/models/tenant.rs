// 租户（客户组织）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::ModuleType;
use crate::storage::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    /// ИНН，10 或 12 位数字
    pub inn: String,
    pub admin_email: String,
    pub admin_name: String,
    pub status: TenantStatus,
    /// 已开通的模块
    pub modules: Vec<ModuleType>,
    /// 订阅到期时间
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn has_module(&self, module: ModuleType) -> bool {
        self.modules.contains(&module)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTenant {
    pub name: String,
    pub inn: String,
    pub admin_email: String,
    pub admin_name: String,
    #[serde(default)]
    pub status: TenantStatus,
    #[serde(default)]
    pub modules: Vec<ModuleType>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantPatch {
    pub name: Option<String>,
    pub inn: Option<String>,
    pub admin_email: Option<String>,
    pub admin_name: Option<String>,
    pub status: Option<TenantStatus>,
    pub modules: Option<Vec<ModuleType>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Record for Tenant {
    type Draft = NewTenant;
    type Patch = TenantPatch;
    const ID_PREFIX: &'static str = "tenant";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewTenant, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            inn: draft.inn,
            admin_email: draft.admin_email,
            admin_name: draft.admin_name,
            status: draft.status,
            modules: draft.modules,
            expires_at: draft.expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: TenantPatch) {
        merge_fields!(self, patch; set: name, inn, admin_email, admin_name, status, modules, expires_at);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
