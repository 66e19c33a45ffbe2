// 演示账号目录 - 所有账号共用同一个密码

use crate::models::{ModuleType, User, UserRole};

pub const DEMO_PASSWORD: &str = "password123";

fn user(
    id: &str,
    email: &str,
    name: &str,
    role: UserRole,
    tenant_id: Option<&str>,
    modules: &[ModuleType],
) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        tenant_id: tenant_id.map(str::to_string),
        available_modules: modules.to_vec(),
    }
}

/// 内置账号，每个角色一个
pub fn mock_users() -> Vec<User> {
    use ModuleType::*;

    vec![
        user(
            "1",
            "superadmin@system.ru",
            "Суперадминистратор",
            UserRole::SuperAdmin,
            None,
            &[Tenants],
        ),
        user(
            "2",
            "admin@company.ru",
            "Администратор Тенанта",
            UserRole::TenantAdmin,
            Some("tenant-1"),
            &[
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
            ],
        ),
        user(
            "3",
            "auditor@company.ru",
            "Аудитор",
            UserRole::Auditor,
            Some("tenant-1"),
            &[
                Attestation,
                Catalog,
                FacilityCatalog,
                Contractors,
                Incidents,
                Checklists,
                Examination,
                Audit,
                KnowledgeBase,
            ],
        ),
        user(
            "4",
            "manager@company.ru",
            "Менеджер",
            UserRole::Manager,
            Some("tenant-1"),
            &[Attestation, Catalog, FacilityCatalog, Tasks, Maintenance, KnowledgeBase],
        ),
        user(
            "5",
            "director@company.ru",
            "Директор",
            UserRole::Director,
            Some("tenant-1"),
            &[Attestation, Incidents, Budget, KnowledgeBase],
        ),
        user(
            "6",
            "training@company.ru",
            "Менеджер Учебного Центра",
            UserRole::TrainingCenterManager,
            Some("tenant-1"),
            &[TrainingCenter, KnowledgeBase],
        ),
    ]
}

/// 校验账号密码，成功时返回对应用户
pub fn authenticate(email: &str, password: &str) -> Option<User> {
    if password != DEMO_PASSWORD {
        return None;
    }
    mock_users().into_iter().find(|u| u.email == email.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate() {
        let director = authenticate("director@company.ru", DEMO_PASSWORD).unwrap();
        assert_eq!(director.role, UserRole::Director);
        assert!(director.can_access(ModuleType::Budget));
        assert!(!director.can_access(ModuleType::Tasks));

        assert!(authenticate("director@company.ru", "wrong").is_none());
        assert!(authenticate("nobody@company.ru", DEMO_PASSWORD).is_none());
    }

    #[test]
    fn test_roles_are_unique() {
        let users = mock_users();
        for role in [
            UserRole::SuperAdmin,
            UserRole::TenantAdmin,
            UserRole::Auditor,
            UserRole::Manager,
            UserRole::Director,
            UserRole::TrainingCenterManager,
        ] {
            assert_eq!(users.iter().filter(|u| u.role == role).count(), 1);
        }
        let admin = users.iter().find(|u| u.role.is_platform_level()).unwrap();
        assert!(admin.tenant_id.is_none());
    }
}
