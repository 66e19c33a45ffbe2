//! 运营命令：任务、事故、维护工作、技术检验

use chrono::{NaiveDate, Utc};

use super::auth::{ensure_tenant, require_module, resolve_tenant};
use super::equipment::resolve_equipment;
use super::{check_record, visible_records};
use crate::analysis::{ExaminationStats, IncidentStats, MaintenanceStats, TaskStats};
use crate::models::examination::{ExaminationPatch, NewExamination};
use crate::models::incident::{IncidentPatch, NewIncident};
use crate::models::maintenance::{MaintenanceWorkPatch, NewMaintenanceWork};
use crate::models::task::{NewTask, TaskPatch, TaskSourceType};
use crate::models::{Examination, Incident, MaintenanceWork, ModuleType, Task};
use crate::modules::{IncidentFilter, TaskFilter};
use crate::AppState;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ==================== 任务 ====================

/// 按条件查询任务；租户用户的查询固定在本租户
pub async fn list_tasks(state: &AppState, mut filter: TaskFilter) -> Result<Vec<Task>, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    filter.tenant_id = Some(resolve_tenant(&user, filter.tenant_id)?);
    Ok(state.operations_domain.get_tasks().filter(&filter).await)
}

pub async fn get_task(state: &AppState, id: String) -> Result<Option<Task>, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    let tasks = state.operations_domain.get_tasks();
    if !check_record(tasks.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(tasks.get(&id).await)
}

pub async fn create_task(state: &AppState, task: NewTask) -> Result<Task, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    ensure_tenant(&user, &task.tenant_id)?;
    Ok(state.operations_domain.get_tasks().add(task).await)
}

pub async fn update_task(
    state: &AppState,
    id: String,
    patch: TaskPatch,
) -> Result<Option<Task>, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    let tasks = state.operations_domain.get_tasks();
    if !check_record(tasks.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(tasks.update(&id, patch).await)
}

pub async fn delete_task(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    let tasks = state.operations_domain.get_tasks();
    if !check_record(tasks.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(tasks.delete(&id).await)
}

pub async fn complete_task(state: &AppState, id: String) -> Result<Option<Task>, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    let tasks = state.operations_domain.get_tasks();
    if !check_record(tasks.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(tasks.complete(&id).await)
}

/// 某条来源记录（事故、审核、检查表）产生的任务
pub async fn list_tasks_by_source(
    state: &AppState,
    source_type: TaskSourceType,
    source_id: String,
) -> Result<Vec<Task>, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    let tasks = state
        .operations_domain
        .get_tasks()
        .by_source(source_type, &source_id)
        .await;
    Ok(visible_records(&user, tasks))
}

pub async fn list_overdue_tasks(state: &AppState) -> Result<Vec<Task>, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    let tasks = state.operations_domain.get_tasks().overdue(today()).await;
    Ok(visible_records(&user, tasks))
}

pub async fn get_task_stats(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<TaskStats, String> {
    let user = require_module(state, ModuleType::Tasks).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_tasks()
        .stats(Some(&tenant_id), today())
        .await)
}

// ==================== 事故 ====================

pub async fn list_incidents(
    state: &AppState,
    mut filter: IncidentFilter,
) -> Result<Vec<Incident>, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    filter.tenant_id = Some(resolve_tenant(&user, filter.tenant_id)?);
    Ok(state.operations_domain.get_incidents().filter(&filter).await)
}

pub async fn get_incident(state: &AppState, id: String) -> Result<Option<Incident>, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let incidents = state.operations_domain.get_incidents();
    if !check_record(incidents.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(incidents.get(&id).await)
}

/// 登记事故
pub async fn report_incident(state: &AppState, incident: NewIncident) -> Result<Incident, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    ensure_tenant(&user, &incident.tenant_id)?;
    Ok(state.operations_domain.get_incidents().add(incident).await)
}

pub async fn update_incident(
    state: &AppState,
    id: String,
    patch: IncidentPatch,
) -> Result<Option<Incident>, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let incidents = state.operations_domain.get_incidents();
    if !check_record(incidents.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(incidents.update(&id, patch).await)
}

pub async fn delete_incident(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let incidents = state.operations_domain.get_incidents();
    if !check_record(incidents.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(incidents.delete(&id).await)
}

pub async fn start_incident_investigation(
    state: &AppState,
    id: String,
    assigned_to: String,
) -> Result<Option<Incident>, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let incidents = state.operations_domain.get_incidents();
    if !check_record(incidents.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(incidents.start_investigation(&id, &assigned_to).await)
}

pub async fn resolve_incident(
    state: &AppState,
    id: String,
    root_cause: String,
    corrective_actions: String,
) -> Result<Option<Incident>, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let incidents = state.operations_domain.get_incidents();
    if !check_record(incidents.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(incidents
        .resolve(&id, &root_cause, &corrective_actions)
        .await)
}

pub async fn close_incident(state: &AppState, id: String) -> Result<Option<Incident>, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let incidents = state.operations_domain.get_incidents();
    if !check_record(incidents.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(incidents.close(&id).await)
}

pub async fn list_overdue_incidents(state: &AppState) -> Result<Vec<Incident>, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let incidents = state
        .operations_domain
        .get_incidents()
        .overdue(today())
        .await;
    Ok(visible_records(&user, incidents))
}

pub async fn get_incident_stats(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<IncidentStats, String> {
    let user = require_module(state, ModuleType::Incidents).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_incidents()
        .stats(Some(&tenant_id), Utc::now())
        .await)
}

// ==================== 维护工作 ====================

pub async fn list_maintenance(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<MaintenanceWork>, String> {
    let user = require_module(state, ModuleType::Maintenance).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_maintenance()
        .by_tenant(&tenant_id)
        .await)
}

/// 某设备对象的维护工作
pub async fn list_maintenance_by_object(
    state: &AppState,
    object_id: String,
) -> Result<Vec<MaintenanceWork>, String> {
    let user = require_module(state, ModuleType::Maintenance).await?;
    let works = state
        .operations_domain
        .get_maintenance()
        .by_object(&object_id)
        .await;
    Ok(visible_records(&user, works))
}

/// 新建维护工作；对象必须是本租户设备目录中的设备，对象名称取设备名称
pub async fn create_maintenance(
    state: &AppState,
    mut work: NewMaintenanceWork,
) -> Result<MaintenanceWork, String> {
    let user = require_module(state, ModuleType::Maintenance).await?;
    ensure_tenant(&user, &work.tenant_id)?;
    let equipment = resolve_equipment(state, &work.tenant_id, &work.object_id).await?;
    work.object_name = equipment.name;
    Ok(state.operations_domain.get_maintenance().add(work).await)
}

pub async fn update_maintenance(
    state: &AppState,
    id: String,
    patch: MaintenanceWorkPatch,
) -> Result<Option<MaintenanceWork>, String> {
    let user = require_module(state, ModuleType::Maintenance).await?;
    let maintenance = state.operations_domain.get_maintenance();
    if !check_record(maintenance.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(maintenance.update(&id, patch).await)
}

pub async fn delete_maintenance(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Maintenance).await?;
    let maintenance = state.operations_domain.get_maintenance();
    if !check_record(maintenance.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(maintenance.delete(&id).await)
}

/// 完成维护工作，未指定日期时取今天；给出下次维护日期时同步到设备目录
pub async fn complete_maintenance(
    state: &AppState,
    id: String,
    completed_date: Option<NaiveDate>,
    next_maintenance_date: Option<NaiveDate>,
) -> Result<Option<MaintenanceWork>, String> {
    let user = require_module(state, ModuleType::Maintenance).await?;
    let maintenance = state.operations_domain.get_maintenance();
    if !check_record(maintenance.store(), &user, &id).await? {
        return Ok(None);
    }
    let completed = maintenance
        .complete(&id, completed_date.unwrap_or_else(today))
        .await;
    if let (Some(work), Some(next)) = (&completed, next_maintenance_date) {
        state
            .operations_domain
            .get_equipment()
            .schedule_maintenance(&work.object_id, next)
            .await;
    }
    Ok(completed)
}

pub async fn get_maintenance_stats(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<MaintenanceStats, String> {
    let user = require_module(state, ModuleType::Maintenance).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_maintenance()
        .statistics(Some(&tenant_id), today())
        .await)
}

// ==================== 技术检验 ====================

pub async fn list_examinations(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<Examination>, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_examinations()
        .by_tenant(&tenant_id)
        .await)
}

pub async fn list_examinations_by_object(
    state: &AppState,
    object_id: String,
) -> Result<Vec<Examination>, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    let examinations = state
        .operations_domain
        .get_examinations()
        .by_object(&object_id)
        .await;
    Ok(visible_records(&user, examinations))
}

/// 今后 `days` 天内计划进行的检验
pub async fn list_upcoming_examinations(
    state: &AppState,
    days: i64,
) -> Result<Vec<Examination>, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    let examinations = state
        .operations_domain
        .get_examinations()
        .upcoming(today(), days)
        .await;
    Ok(visible_records(&user, examinations))
}

/// 安排检验；对象必须是本租户设备目录中的设备
pub async fn create_examination(
    state: &AppState,
    mut examination: NewExamination,
) -> Result<Examination, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    ensure_tenant(&user, &examination.tenant_id)?;
    let equipment =
        resolve_equipment(state, &examination.tenant_id, &examination.object_id).await?;
    examination.object_name = equipment.name;
    Ok(state
        .operations_domain
        .get_examinations()
        .add(examination)
        .await)
}

pub async fn update_examination(
    state: &AppState,
    id: String,
    patch: ExaminationPatch,
) -> Result<Option<Examination>, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    let examinations = state.operations_domain.get_examinations();
    if !check_record(examinations.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(examinations.update(&id, patch).await)
}

pub async fn delete_examination(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    let examinations = state.operations_domain.get_examinations();
    if !check_record(examinations.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(examinations.delete(&id).await)
}

pub async fn complete_examination(
    state: &AppState,
    id: String,
    completed_date: Option<NaiveDate>,
    conclusion_file_url: Option<String>,
    next_examination_date: Option<NaiveDate>,
) -> Result<Option<Examination>, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    let examinations = state.operations_domain.get_examinations();
    if !check_record(examinations.store(), &user, &id).await? {
        return Ok(None);
    }
    let completed = examinations
        .complete(
            &id,
            completed_date.unwrap_or_else(today),
            conclusion_file_url,
        )
        .await;
    if let (Some(exam), Some(next)) = (&completed, next_examination_date) {
        state
            .operations_domain
            .get_equipment()
            .schedule_examination(&exam.object_id, next)
            .await;
    }
    Ok(completed)
}

pub async fn get_examination_stats(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<ExaminationStats, String> {
    let user = require_module(state, ModuleType::Examination).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_examinations()
        .statistics(Some(&tenant_id), today())
        .await)
}
