// 演示数据 - 首次打开空存储时写入
//
// 日期相对于当前时间生成，保证提醒和逾期统计在任何时候都有内容。

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::record::Record;
use crate::models::budget::{CategoryStatus, ExpenseSource, NewBudgetCategory, NewBudgetExpense};
use crate::models::checklist::{
    AuditFinding, AuditStatus, ChecklistItem, FindingResult, NewAudit, NewChecklist,
};
use crate::models::certification::{
    AttestationResult, AttestationType, CertificationCategory, NewCertification,
};
use crate::models::equipment::{EquipmentStatus, NewEquipment};
use crate::models::examination::{ExaminationStatus, NewExamination};
use crate::models::incident::{IncidentStatus, IncidentType, NewIncident};
use crate::models::knowledge::{DocumentCategory, NewKnowledgeDocument, PublicationStatus};
use crate::models::maintenance::{MaintenanceStatus, MaintenanceType, NewMaintenanceWork};
use crate::models::notification::{NewNotification, NotificationKind, NotificationSource};
use crate::models::order::{NewOrder, OrderCertification, OrderType};
use crate::models::task::{NewTask, Priority, TaskSourceType, TaskStatus, TaskType};
use crate::models::tenant::{NewTenant, TenantStatus};
use crate::models::training_request::{
    NewTrainingRequest, RequestStatus, RequestStudent, RequestType,
};
use crate::models::*;

/// 各存储的初始内容
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub tenants: Vec<Tenant>,
    pub orders: Vec<Order>,
    pub tasks: Vec<Task>,
    pub equipment: Vec<Equipment>,
    pub maintenance: Vec<MaintenanceWork>,
    pub examinations: Vec<Examination>,
    pub incidents: Vec<Incident>,
    pub certifications: Vec<Certification>,
    pub training_requests: Vec<TrainingRequest>,
    pub checklists: Vec<Checklist>,
    pub audits: Vec<Audit>,
    pub notifications: Vec<Notification>,
    pub knowledge_base: Vec<KnowledgeDocument>,
    pub budget_categories: Vec<BudgetCategory>,
    pub budget_expenses: Vec<BudgetExpense>,
}

fn build<T: Record>(id: &str, draft: T::Draft, now: DateTime<Utc>) -> T {
    T::from_draft(id.to_string(), draft, now)
}

fn s(value: &str) -> String {
    value.to_string()
}

impl SeedData {
    pub fn demo(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let day = |offset: i64| today + Duration::days(offset);

        Self {
            tenants: tenants(now),
            orders: orders(now, &day),
            tasks: tasks(now, &day),
            equipment: equipment(now, &day),
            maintenance: maintenance(now, &day),
            examinations: examinations(now, &day),
            incidents: incidents(now, &day),
            certifications: certifications(now, &day),
            training_requests: training_requests(now),
            checklists: checklists(now),
            audits: audits(now, &day),
            notifications: notifications(now),
            knowledge_base: knowledge_base(now),
            budget_categories: budget_categories(now, today),
            budget_expenses: budget_expenses(now, &day),
        }
    }
}

fn tenants(now: DateTime<Utc>) -> Vec<Tenant> {
    use ModuleType::*;

    let tenant = |id: &str,
                  name: &str,
                  inn: &str,
                  admin_email: &str,
                  admin_name: &str,
                  modules: &[ModuleType],
                  age_days: i64,
                  expires_in_days: i64| {
        let mut tenant: Tenant = build(
            id,
            NewTenant {
                name: s(name),
                inn: s(inn),
                admin_email: s(admin_email),
                admin_name: s(admin_name),
                status: TenantStatus::Active,
                modules: modules.to_vec(),
                expires_at: now + Duration::days(expires_in_days),
            },
            now,
        );
        tenant.created_at = now - Duration::days(age_days);
        tenant.updated_at = tenant.created_at;
        tenant
    };

    vec![
        tenant(
            "tenant-1",
            "ООО \"ЭнергоПром\"",
            "7707123456",
            "admin@company.ru",
            "Иванов Иван Иванович",
            &[
                Attestation,
                Catalog,
                FacilityCatalog,
                Incidents,
                Checklists,
                Audit,
                Tasks,
                Examination,
                Maintenance,
                Budget,
                KnowledgeBase,
            ],
            90,
            275,
        ),
        tenant(
            "tenant-2",
            "ПАО \"Энергосеть\"",
            "7707654321",
            "director@energoset.ru",
            "Петров Петр Петрович",
            &[Attestation, Catalog, Examination, Maintenance, KnowledgeBase],
            180,
            185,
        ),
        tenant(
            "tenant-3",
            "УЦ Профессионал",
            "7707555444",
            "director@ucprofessional.ru",
            "Соколов Андрей Владимирович",
            &[TrainingCenter, Catalog, KnowledgeBase],
            365,
            365,
        ),
        tenant(
            "tenant-4",
            "УЦ Эксперт",
            "7707666777",
            "admin@ucexpert.ru",
            "Кузнецова Ольга Петровна",
            &[TrainingCenter, Catalog],
            200,
            565,
        ),
    ]
}

fn orders(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<Order> {
    let order = |id: &str, number: &str, date: i64, order_type, title: &str, status, employees: &[&str]| {
        build::<Order>(
            id,
            NewOrder {
                tenant_id: s("tenant-1"),
                number: s(number),
                date: day(date),
                order_type,
                title: s(title),
                employee_ids: employees.iter().map(|e| s(e)).collect(),
                certifications: Vec::new(),
                status,
                created_by: s("Иванов И.И."),
                description: None,
                document_url: None,
            },
            now,
        )
    };

    let mut attestation = order(
        "order-1",
        "П-015",
        -10,
        OrderType::Attestation,
        "О направлении на аттестацию по промышленной безопасности",
        DocumentStatus::Approved,
        &["personnel-1", "personnel-2"],
    );
    attestation.certifications = vec![OrderCertification {
        personnel_id: s("personnel-1"),
        certification_id: s("att-2"),
        category: s("industrial_safety"),
        area: s("Б.7.1"),
    }];

    vec![
        attestation,
        order(
            "order-2",
            "П-016",
            -3,
            OrderType::Training,
            "О проведении обучения по охране труда",
            DocumentStatus::Draft,
            &["personnel-3"],
        ),
        order(
            "order-3",
            "П-009",
            -40,
            OrderType::Internal,
            "О назначении ответственных за производственный контроль",
            DocumentStatus::Completed,
            &[],
        ),
    ]
}

fn tasks(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<Task> {
    let task = |id: &str,
                title: &str,
                description: &str,
                task_type,
                priority,
                status,
                assigned_to: &str,
                created_by: &str,
                due: i64,
                source: Option<(TaskSourceType, &str)>| {
        build::<Task>(
            id,
            NewTask {
                tenant_id: s("tenant-1"),
                title: s(title),
                description: Some(s(description)),
                task_type,
                priority,
                status,
                assigned_to: s(assigned_to),
                created_by: s(created_by),
                due_date: day(due),
                source_type: source.map(|(t, _)| t),
                source_id: source.map(|(_, id)| s(id)),
            },
            now,
        )
    };

    let mut done = task(
        "task-5",
        "Обновить инструкции по охране труда",
        "Изменились нормативные требования",
        TaskType::Other,
        Priority::Low,
        TaskStatus::Completed,
        "Иванов И.И.",
        "Администратор",
        -16,
        None,
    );
    done.completed_at = Some(now - Duration::days(18));

    vec![
        task(
            "task-1",
            "Устранить замечания по пожарной безопасности",
            "Обнаружены нарушения хранения огнетушителей в цехе №3",
            TaskType::CorrectiveAction,
            Priority::Critical,
            TaskStatus::Open,
            "Иванов И.И.",
            "Петров П.П.",
            2,
            Some((TaskSourceType::Audit, "audit-1")),
        ),
        task(
            "task-2",
            "Провести внеплановую проверку оборудования",
            "После инцидента требуется диагностика компрессора К-301",
            TaskType::Audit,
            Priority::High,
            TaskStatus::InProgress,
            "Сидоров С.С.",
            "Администратор",
            -1,
            Some((TaskSourceType::Incident, "incident-1")),
        ),
        task(
            "task-3",
            "Заменить масло в насосе Н-12",
            "Плановое техническое обслуживание согласно графику",
            TaskType::Maintenance,
            Priority::Medium,
            TaskStatus::Open,
            "Козлов А.В.",
            "Система",
            6,
            None,
        ),
        task(
            "task-4",
            "Провести аттестацию Смирновой А.П.",
            "Истекает срок действия сертификата по ПБ",
            TaskType::Other,
            Priority::High,
            TaskStatus::Open,
            "Кадровая служба",
            "Система",
            14,
            None,
        ),
        done,
    ]
}

fn equipment(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<Equipment> {
    let item = |id: &str,
                name: &str,
                kind: &str,
                manufacturer: &str,
                serial: &str,
                commissioned: i64,
                status,
                next_maintenance: Option<i64>,
                next_examination: Option<i64>| {
        build::<Equipment>(
            id,
            NewEquipment {
                tenant_id: s("tenant-1"),
                organization_id: s("org-1"),
                name: s(name),
                equipment_type: s(kind),
                manufacturer: Some(s(manufacturer)),
                serial_number: Some(s(serial)),
                commission_date: Some(day(commissioned)),
                status,
                next_maintenance_date: next_maintenance.map(day),
                next_examination_date: next_examination.map(day),
            },
            now,
        )
    };

    vec![
        item(
            "eq-1",
            "Компрессор К-301",
            "Компрессорное оборудование",
            "Atlas Copco",
            "AC-301-2018",
            -2400,
            EquipmentStatus::Repair,
            Some(-2),
            Some(4),
        ),
        item(
            "eq-2",
            "Насос центробежный Н-12",
            "Насосное оборудование",
            "Grundfos",
            "GF-12-5567",
            -1800,
            EquipmentStatus::Operational,
            Some(5),
            Some(-5),
        ),
        item(
            "eq-3",
            "Линия розлива",
            "Технологическая линия",
            "Krones",
            "KR-LN-0042",
            -1500,
            EquipmentStatus::Maintenance,
            Some(1),
            None,
        ),
        item(
            "eq-4",
            "Котел паровой КП-2",
            "Котельное оборудование",
            "Бийский котельный завод",
            "БКЗ-2-1123",
            -3600,
            EquipmentStatus::Operational,
            Some(345),
            Some(120),
        ),
        item(
            "eq-5",
            "Сосуд под давлением СД-7",
            "Сосуды под давлением",
            "Уралхиммаш",
            "УХМ-7-0891",
            -4000,
            EquipmentStatus::Operational,
            None,
            Some(25),
        ),
    ]
}

fn maintenance(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<MaintenanceWork> {
    let work = |id: &str, object_id: &str, object_name: &str, work_type, title: &str, scheduled: i64, status| {
        build::<MaintenanceWork>(
            id,
            NewMaintenanceWork {
                tenant_id: s("tenant-1"),
                object_id: s(object_id),
                object_name: s(object_name),
                work_type,
                title: s(title),
                description: None,
                scheduled_date: day(scheduled),
                status,
                executor: s("Служба главного механика"),
                executor_contact: None,
                notes: None,
                created_by: s("2"),
            },
            now,
        )
    };

    let mut done = work(
        "work-4",
        "eq-4",
        "Котел паровой КП-2",
        MaintenanceType::Inspection,
        "Годовое техническое обслуживание",
        -20,
        MaintenanceStatus::Completed,
    );
    done.completed_date = Some(day(-19));

    vec![
        work(
            "work-1",
            "eq-2",
            "Насос центробежный Н-12",
            MaintenanceType::Inspection,
            "Техническое обслуживание насоса",
            5,
            MaintenanceStatus::Planned,
        ),
        work(
            "work-2",
            "eq-1",
            "Компрессор К-301",
            MaintenanceType::Replacement,
            "Замена воздушных фильтров",
            -2,
            MaintenanceStatus::Planned,
        ),
        work(
            "work-3",
            "eq-3",
            "Линия розлива",
            MaintenanceType::Repair,
            "Ремонт системы автоматики",
            1,
            MaintenanceStatus::InProgress,
        ),
        done,
    ]
}

fn examinations(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<Examination> {
    let exam = |id: &str, object_id: &str, object_name: &str, kind: &str, scheduled: i64, status| {
        build::<Examination>(
            id,
            NewExamination {
                tenant_id: s("tenant-1"),
                object_id: s(object_id),
                object_name: s(object_name),
                examination_type: s(kind),
                scheduled_date: day(scheduled),
                status,
                executor: s("ООО \"Экспертиза Промбезопасность\""),
                executor_contact: Some(s("+7 (495) 123-45-67")),
                notes: None,
                created_by: s("2"),
            },
            now,
        )
    };

    vec![
        exam(
            "exam-1",
            "eq-1",
            "Компрессор К-301",
            "Техническая диагностика",
            4,
            ExaminationStatus::Scheduled,
        ),
        exam(
            "exam-2",
            "eq-5",
            "Сосуд под давлением СД-7",
            "Экспертиза промышленной безопасности",
            25,
            ExaminationStatus::Scheduled,
        ),
        exam(
            "exam-3",
            "eq-2",
            "Насос центробежный Н-12",
            "Неразрушающий контроль",
            -5,
            ExaminationStatus::Overdue,
        ),
    ]
}

fn incidents(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<Incident> {
    let incident = |id: &str,
                    title: &str,
                    description: &str,
                    incident_type,
                    severity,
                    status,
                    reported_by: &str,
                    assigned_to: Option<&str>,
                    days_ago: i64,
                    planned: Option<i64>| {
        let occurred_at = now - Duration::days(days_ago);
        let mut incident: Incident = build(
            id,
            NewIncident {
                tenant_id: s("tenant-1"),
                organization_id: s("org-1"),
                title: s(title),
                description: s(description),
                incident_type,
                severity,
                status,
                reported_by: s(reported_by),
                assigned_to: assigned_to.map(s),
                occurred_at,
                planned_date: planned.map(day),
            },
            now,
        );
        incident.reported_at = occurred_at + Duration::minutes(15);
        incident.created_at = incident.reported_at;
        incident.updated_at = incident.reported_at;
        incident
    };

    let mut resolved = incident(
        "incident-2",
        "Работник без средств индивидуальной защиты",
        "Работник Петров обнаружен в цехе без защитных очков",
        IncidentType::Violation,
        Priority::Medium,
        IncidentStatus::Resolved,
        "Козлов А.В.",
        Some("Кадровая служба"),
        5,
        None,
    );
    resolved.resolved_at = Some(now - Duration::days(4));
    resolved.root_cause =
        Some(s("Работник не был проинформирован об обязательности использования СИЗ в данной зоне"));
    resolved.corrective_actions =
        Some(s("Проведен внеплановый инструктаж. Обновлены информационные таблички."));

    vec![
        incident(
            "incident-1",
            "Утечка масла из компрессора К-301",
            "Обнаружена утечка гидравлического масла в количестве около 2 литров",
            IncidentType::EquipmentFailure,
            Priority::High,
            IncidentStatus::Investigating,
            "Сидоров С.С.",
            Some("Иванов И.И."),
            3,
            Some(3),
        ),
        resolved,
        incident(
            "incident-3",
            "Чуть не произошло падение груза",
            "При погрузке ослабло крепление стропов, груз качнулся",
            IncidentType::NearMiss,
            Priority::Critical,
            IncidentStatus::Reported,
            "Смирнова А.П.",
            None,
            2,
            None,
        ),
        incident(
            "incident-4",
            "Травма руки при обслуживании станка",
            "Работник получил порез правой руки при замене режущего инструмента",
            IncidentType::Injury,
            Priority::Critical,
            IncidentStatus::Investigating,
            "Медпункт",
            Some("Комиссия по расследованию"),
            7,
            Some(-1),
        ),
    ]
}

fn certifications(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<Certification> {
    let cert = |id: &str, personnel_id: &str, person_name: &str, category, area: &str, number: &str, issued: i64, expires: i64| {
        build::<Certification>(
            id,
            NewCertification {
                tenant_id: s("tenant-1"),
                personnel_id: s(personnel_id),
                person_name: s(person_name),
                category,
                area: s(area),
                protocol_number: s(number),
                protocol_date: day(issued),
                expiry_date: day(expires),
                attestation_type: AttestationType::Rostechnadzor,
                result: AttestationResult::Passed,
                notes: None,
            },
            now,
        )
    };

    vec![
        cert(
            "att-1",
            "personnel-1",
            "Иванов Иван Иванович",
            CertificationCategory::IndustrialSafety,
            "А.1",
            "ПБ-2023-114",
            -400,
            695,
        ),
        cert(
            "att-2",
            "personnel-1",
            "Иванов Иван Иванович",
            CertificationCategory::IndustrialSafety,
            "Б.7.1",
            "ПБ-2021-087",
            -1080,
            15,
        ),
        cert(
            "att-3",
            "personnel-2",
            "Смирнова Анна Петровна",
            CertificationCategory::LaborSafety,
            "Охрана труда",
            "ОТ-2022-031",
            -1100,
            -5,
        ),
        cert(
            "att-4",
            "personnel-3",
            "Козлов Алексей Викторович",
            CertificationCategory::EnergySafety,
            "IV группа до 1000 В",
            "ЭБ-2025-009",
            -30,
            335,
        ),
    ]
}

fn training_requests(now: DateTime<Utc>) -> Vec<TrainingRequest> {
    let mut request: TrainingRequest = build(
        "request-1",
        NewTrainingRequest {
            tenant_id: s("tenant-3"),
            from_tenant_id: s("tenant-1"),
            from_tenant_name: s("ООО \"ЭнергоПром\""),
            program_name: s("О проведении обучения по охране труда"),
            request_type: RequestType::SdoAccessOnly,
            students: vec![RequestStudent {
                personnel_id: s("personnel-3"),
                full_name: s("Козлов Алексей Викторович"),
                position: Some(s("Мастер участка")),
            }],
            contact_person: s("Иванов Иван Иванович"),
            contact_email: Some(s("admin@company.ru")),
            notes: None,
            order_id: None,
        },
        now,
    );
    request.status = RequestStatus::InReview;
    request.created_at = now - Duration::days(2);
    vec![request]
}

fn checklists(now: DateTime<Utc>) -> Vec<Checklist> {
    let item = |id: &str, question: &str, requires_comment: bool, critical_item: bool| ChecklistItem {
        id: s(id),
        question: s(question),
        requires_comment,
        critical_item,
    };
    let checklist = |id: &str, name: &str, category: &str, items: Vec<ChecklistItem>| {
        let mut record: Checklist = build(
            id,
            NewChecklist {
                tenant_id: s("tenant-1"),
                name: s(name),
                category: s(category),
                items: Vec::new(),
            },
            now,
        );
        // 演示数据使用固定的检查项标识，审核结果引用它们
        record.items = items;
        record
    };

    vec![
        checklist(
            "checklist-1",
            "Проверка пожарной безопасности",
            "fire_safety",
            vec![
                item("item-1", "Все ли огнетушители на месте и исправны?", false, true),
                item("item-2", "Свободны ли эвакуационные пути?", false, true),
                item("item-3", "Работает ли пожарная сигнализация?", true, true),
                item("item-4", "Есть ли актуальные планы эвакуации?", false, false),
            ],
        ),
        checklist(
            "checklist-2",
            "Проверка состояния оборудования",
            "equipment",
            vec![
                item("item-5", "Оборудование имеет актуальную маркировку?", false, false),
                item("item-6", "Защитные ограждения установлены?", false, true),
                item("item-7", "Журнал технического обслуживания ведется?", true, false),
            ],
        ),
        checklist(
            "checklist-3",
            "Использование средств индивидуальной защиты",
            "ppe",
            vec![
                item("item-8", "Работники используют каски?", false, true),
                item("item-9", "Работники используют защитные очки?", false, true),
                item("item-10", "СИЗ находятся в исправном состоянии?", true, false),
            ],
        ),
    ]
}

fn audits(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<Audit> {
    let audit = |id: &str, checklist_id: &str, scheduled: i64| {
        build::<Audit>(
            id,
            NewAudit {
                tenant_id: s("tenant-1"),
                checklist_id: s(checklist_id),
                organization_id: s("org-1"),
                auditor_id: s("3"),
                scheduled_date: day(scheduled),
            },
            now,
        )
    };
    let finding = |id: &str, item_id: &str, result, comment: Option<&str>| AuditFinding {
        id: s(id),
        item_id: s(item_id),
        result,
        comment: comment.map(s),
        photo: None,
    };

    let mut completed = audit("audit-1", "checklist-1", -7);
    completed.status = AuditStatus::Completed;
    completed.completed_date = Some(day(-7));
    completed.findings = vec![
        finding(
            "finding-1",
            "item-1",
            FindingResult::Fail,
            Some("В цехе №3 не хватает 2 огнетушителей"),
        ),
        finding("finding-2", "item-2", FindingResult::Pass, None),
        finding("finding-3", "item-3", FindingResult::Pass, Some("Датчики исправны")),
        finding("finding-4", "item-4", FindingResult::Pass, None),
    ];
    completed.auditor_signature = Some(s("Сидоров С.С."));

    let mut in_progress = audit("audit-2", "checklist-2", 0);
    in_progress.status = AuditStatus::InProgress;

    vec![completed, in_progress, audit("audit-3", "checklist-3", 10)]
}

fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![build(
        "notif-1",
        NewNotification {
            tenant_id: s(crate::models::notification::GLOBAL_TENANT),
            user_id: None,
            kind: NotificationKind::Info,
            source: NotificationSource::PlatformNews,
            source_id: None,
            title: s("Добро пожаловать на портал"),
            message: s("Портал промышленной безопасности готов к работе"),
            link: None,
        },
        now,
    )]
}

fn knowledge_base(now: DateTime<Utc>) -> Vec<KnowledgeDocument> {
    let doc = |id: &str, category, title: &str, description: &str, tags: &[&str], status| {
        build::<KnowledgeDocument>(
            id,
            NewKnowledgeDocument {
                tenant_id: s("tenant-1"),
                category,
                title: s(title),
                description: Some(s(description)),
                content: None,
                file_url: None,
                file_name: None,
                file_size: None,
                tags: tags.iter().map(|t| s(t)).collect(),
                version: Some(s("1.0")),
                author: s("Администратор"),
                status,
            },
            now,
        )
    };

    vec![
        doc(
            "doc-1",
            DocumentCategory::UserGuide,
            "Руководство пользователя портала",
            "Описание основных модулей и ролей",
            &["портал", "инструкция"],
            PublicationStatus::Published,
        ),
        doc(
            "doc-2",
            DocumentCategory::Regulatory,
            "ФНП «Правила безопасности опасных производственных объектов»",
            "Федеральные нормы и правила в области промышленной безопасности",
            &["ФНП", "ОПО"],
            PublicationStatus::Published,
        ),
        doc(
            "doc-3",
            DocumentCategory::Organization,
            "Положение о производственном контроле",
            "Внутренний документ организации",
            &["производственный контроль"],
            PublicationStatus::Draft,
        ),
    ]
}

fn budget_categories(now: DateTime<Utc>, today: NaiveDate) -> Vec<BudgetCategory> {
    use chrono::Datelike;

    let category = |id: &str, name: &str, planned: i64, color: &str| {
        build::<BudgetCategory>(
            id,
            NewBudgetCategory {
                tenant_id: s("tenant-1"),
                name: s(name),
                description: None,
                planned_amount: Decimal::from(planned),
                year: today.year(),
                color: Some(s(color)),
                status: CategoryStatus::Active,
            },
            now,
        )
    };

    vec![
        category("cat-1", "Средства индивидуальной защиты", 500_000, "#3b82f6"),
        category("cat-2", "Обучение и аттестация", 300_000, "#10b981"),
        category("cat-3", "Экспертиза промышленной безопасности", 750_000, "#f59e0b"),
    ]
}

fn budget_expenses(now: DateTime<Utc>, day: &dyn Fn(i64) -> NaiveDate) -> Vec<BudgetExpense> {
    let expense = |id: &str, category_id: &str, amount: i64, description: &str, number: &str, source, source_id: Option<&str>| {
        build::<BudgetExpense>(
            id,
            NewBudgetExpense {
                tenant_id: s("tenant-1"),
                category_id: s(category_id),
                amount: Decimal::from(amount),
                description: s(description),
                expense_date: day(-12),
                document_number: Some(s(number)),
                source_type: source,
                source_id: source_id.map(s),
                created_by: s("2"),
            },
            now,
        )
    };

    vec![
        expense(
            "exp-1",
            "cat-1",
            125_000,
            "Закупка защитных очков и касок",
            "СЧ-2041",
            ExpenseSource::Manual,
            None,
        ),
        expense(
            "exp-2",
            "cat-2",
            48_000,
            "Аттестация по промышленной безопасности (2 чел.)",
            "Д-117",
            ExpenseSource::Manual,
            None,
        ),
        expense(
            "exp-3",
            "cat-3",
            36_500,
            "Ремонт после утечки масла на компрессоре К-301",
            "А-55",
            ExpenseSource::Incident,
            Some("incident-1"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_ids_unique_and_linked() {
        let seed = SeedData::demo(Utc::now());
        assert_eq!(seed.tenants.len(), 4);

        let ids: HashSet<&str> = seed.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), seed.tasks.len());

        let categories: HashSet<&str> =
            seed.budget_categories.iter().map(|c| c.id.as_str()).collect();
        assert!(seed
            .budget_expenses
            .iter()
            .all(|e| categories.contains(e.category_id.as_str())));

        let tenants: HashSet<&str> = seed.tenants.iter().map(|t| t.id.as_str()).collect();
        assert!(seed.incidents.iter().all(|i| tenants.contains(i.tenant_id.as_str())));
        assert!(seed
            .training_requests
            .iter()
            .all(|r| tenants.contains(r.tenant_id.as_str())));
    }

    #[test]
    fn test_demo_objects_reference_equipment() {
        let seed = SeedData::demo(Utc::now());
        let equipment: HashSet<&str> = seed.equipment.iter().map(|e| e.id.as_str()).collect();
        assert!(seed
            .maintenance
            .iter()
            .all(|w| equipment.contains(w.object_id.as_str())));
        assert!(seed
            .examinations
            .iter()
            .all(|e| equipment.contains(e.object_id.as_str())));

        // 审核结果引用所属检查表中的检查项
        for audit in &seed.audits {
            let checklist = seed
                .checklists
                .iter()
                .find(|c| c.id == audit.checklist_id)
                .unwrap();
            assert!(audit.findings.iter().all(|f| checklist.item(&f.item_id).is_some()));
        }
    }
}
