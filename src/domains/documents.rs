// 文档领域管理器
//
// 负责命令、知识库、人员认证和培训中心申请

use std::sync::Arc;

use crate::modules::{
    AttestationManager, KnowledgeBaseManager, OrdersManager, TrainingCenterManager,
};

/// 文档领域管理器
#[derive(Clone)]
pub struct DocumentsDomain {
    orders: Arc<OrdersManager>,
    knowledge_base: Arc<KnowledgeBaseManager>,
    attestation: Arc<AttestationManager>,
    training_center: Arc<TrainingCenterManager>,
}

impl DocumentsDomain {
    pub fn new(
        orders: Arc<OrdersManager>,
        knowledge_base: Arc<KnowledgeBaseManager>,
        attestation: Arc<AttestationManager>,
        training_center: Arc<TrainingCenterManager>,
    ) -> Self {
        Self {
            orders,
            knowledge_base,
            attestation,
            training_center,
        }
    }

    pub fn get_orders(&self) -> &Arc<OrdersManager> {
        &self.orders
    }

    pub fn get_knowledge_base(&self) -> &Arc<KnowledgeBaseManager> {
        &self.knowledge_base
    }

    pub fn get_attestation(&self) -> &Arc<AttestationManager> {
        &self.attestation
    }

    pub fn get_training_center(&self) -> &Arc<TrainingCenterManager> {
        &self.training_center
    }
}
