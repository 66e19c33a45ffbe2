// 用户与模块定义

use serde::{Deserialize, Serialize};

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    SuperAdmin,
    TenantAdmin,
    Auditor,
    Manager,
    Director,
    TrainingCenterManager,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Суперадминистратор",
            Self::TenantAdmin => "Администратор тенанта",
            Self::Auditor => "Аудитор",
            Self::Manager => "Менеджер",
            Self::Director => "Директор",
            Self::TrainingCenterManager => "Менеджер учебного центра",
        }
    }

    /// 平台级角色不属于任何租户
    pub fn is_platform_level(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

/// 功能模块
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleType {
    Tenants,
    Attestation,
    Catalog,
    FacilityCatalog,
    Contractors,
    Incidents,
    Checklists,
    Tasks,
    Examination,
    Maintenance,
    Budget,
    TrainingCenter,
    KnowledgeBase,
    Audit,
    Settings,
}

impl ModuleType {
    pub const ALL: [ModuleType; 15] = [
        ModuleType::Tenants,
        ModuleType::Attestation,
        ModuleType::Catalog,
        ModuleType::FacilityCatalog,
        ModuleType::Contractors,
        ModuleType::Incidents,
        ModuleType::Checklists,
        ModuleType::Tasks,
        ModuleType::Examination,
        ModuleType::Maintenance,
        ModuleType::Budget,
        ModuleType::TrainingCenter,
        ModuleType::KnowledgeBase,
        ModuleType::Audit,
        ModuleType::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tenants => "tenants",
            Self::Attestation => "attestation",
            Self::Catalog => "catalog",
            Self::FacilityCatalog => "facility-catalog",
            Self::Contractors => "contractors",
            Self::Incidents => "incidents",
            Self::Checklists => "checklists",
            Self::Tasks => "tasks",
            Self::Examination => "examination",
            Self::Maintenance => "maintenance",
            Self::Budget => "budget",
            Self::TrainingCenter => "training-center",
            Self::KnowledgeBase => "knowledge-base",
            Self::Audit => "audit",
            Self::Settings => "settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == value)
    }
}

/// 已登录用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// 超级管理员没有租户
    pub tenant_id: Option<String>,
    pub available_modules: Vec<ModuleType>,
}

impl User {
    pub fn can_access(&self, module: ModuleType) -> bool {
        self.available_modules.contains(&module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_type_serde_matches_as_str() {
        for module in ModuleType::ALL {
            let json = serde_json::to_string(&module).unwrap();
            assert_eq!(json, format!("\"{}\"", module.as_str()));
            assert_eq!(ModuleType::parse(module.as_str()), Some(module));
        }
        assert_eq!(ModuleType::parse("video"), None);
    }
}
