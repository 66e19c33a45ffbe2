// 领域错误 - 业务规则被违反时返回的类型化错误

use thiserror::Error;

use crate::models::DocumentStatus;

#[derive(Debug, Error, PartialEq)]
pub enum PortalError {
    #[error("不允许的状态转换: {from} → {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    #[error("记录不存在: {store}/{id}")]
    NotFound { store: String, id: String },

    #[error("数据校验失败: {0}")]
    Validation(String),

    #[error("导入失败: {0}")]
    Import(String),
}

pub type PortalResult<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PortalError::InvalidTransition {
            from: DocumentStatus::Completed,
            to: DocumentStatus::Draft,
        };
        assert_eq!(
            err.to_string(),
            "不允许的状态转换: completed → draft"
        );
        assert!(PortalError::Import("строка 2".to_string())
            .to_string()
            .contains("строка 2"));
    }
}
