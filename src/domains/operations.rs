// 运营领域管理器
//
// 负责任务、事故、设备目录、维护、技术检验、检查表审核和预算

use std::sync::Arc;

use crate::modules::{
    BudgetManager, ChecklistsManager, EquipmentManager, ExaminationsManager, IncidentsManager,
    MaintenanceManager, TasksManager,
};

/// 运营领域管理器
#[derive(Clone)]
pub struct OperationsDomain {
    tasks: Arc<TasksManager>,
    incidents: Arc<IncidentsManager>,
    equipment: Arc<EquipmentManager>,
    maintenance: Arc<MaintenanceManager>,
    examinations: Arc<ExaminationsManager>,
    checklists: Arc<ChecklistsManager>,
    budget: Arc<BudgetManager>,
}

impl OperationsDomain {
    pub fn new(
        tasks: Arc<TasksManager>,
        incidents: Arc<IncidentsManager>,
        equipment: Arc<EquipmentManager>,
        maintenance: Arc<MaintenanceManager>,
        examinations: Arc<ExaminationsManager>,
        checklists: Arc<ChecklistsManager>,
        budget: Arc<BudgetManager>,
    ) -> Self {
        Self {
            tasks,
            incidents,
            equipment,
            maintenance,
            examinations,
            checklists,
            budget,
        }
    }

    pub fn get_tasks(&self) -> &Arc<TasksManager> {
        &self.tasks
    }

    pub fn get_incidents(&self) -> &Arc<IncidentsManager> {
        &self.incidents
    }

    pub fn get_equipment(&self) -> &Arc<EquipmentManager> {
        &self.equipment
    }

    pub fn get_maintenance(&self) -> &Arc<MaintenanceManager> {
        &self.maintenance
    }

    pub fn get_examinations(&self) -> &Arc<ExaminationsManager> {
        &self.examinations
    }

    pub fn get_checklists(&self) -> &Arc<ChecklistsManager> {
        &self.checklists
    }

    pub fn get_budget(&self) -> &Arc<BudgetManager> {
        &self.budget
    }
}
