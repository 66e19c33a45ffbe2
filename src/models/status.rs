// 文档状态 - 文档生命周期状态及固定的状态转换表

use serde::{Deserialize, Serialize};

/// 文档生命周期状态
///
/// 反序列化时统一经过 [`map_legacy_status`]，因此旧版本持久化的
/// 状态字符串（`in_progress`、`planned` 等）也能正确加载。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Prepared,
    Approved,
    Active,
    Completed,
    Cancelled,
}

impl DocumentStatus {
    /// 全部状态（按生命周期顺序）
    pub const ALL: [DocumentStatus; 6] = [
        DocumentStatus::Draft,
        DocumentStatus::Prepared,
        DocumentStatus::Approved,
        DocumentStatus::Active,
        DocumentStatus::Completed,
        DocumentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Prepared => "prepared",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// 显示名称
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Черновик",
            Self::Prepared => "Подготовлен",
            Self::Approved => "Согласован",
            Self::Active => "Активен",
            Self::Completed => "Выполнен",
            Self::Cancelled => "Отменён",
        }
    }

    pub fn is_terminal(&self) -> bool {
        next_statuses(*self).is_empty()
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for DocumentStatus {
    fn from(value: String) -> Self {
        map_legacy_status(&value)
    }
}

impl From<&str> for DocumentStatus {
    fn from(value: &str) -> Self {
        map_legacy_status(value)
    }
}

/// 某个状态可以转换到的后继状态集合
///
/// 终态（`completed`）返回空切片
pub fn next_statuses(current: DocumentStatus) -> &'static [DocumentStatus] {
    use DocumentStatus::*;
    match current {
        Draft => &[Prepared, Cancelled],
        Prepared => &[Approved, Draft, Cancelled],
        Approved => &[Active, Prepared, Cancelled],
        Active => &[Completed, Cancelled],
        Completed => &[],
        Cancelled => &[Draft],
    }
}

/// `to` 是否在 `from` 的后继集合中
pub fn can_transition_to(from: DocumentStatus, to: DocumentStatus) -> bool {
    next_statuses(from).contains(&to)
}

/// 返回后继状态列表（终态返回空列表，不报错）
pub fn get_next_statuses(current: DocumentStatus) -> Vec<DocumentStatus> {
    next_statuses(current).to_vec()
}

/// 将任意旧版状态字符串映射为最接近的文档状态，无法识别时返回 `draft`
pub fn map_legacy_status(legacy_status: &str) -> DocumentStatus {
    match legacy_status {
        "draft" => DocumentStatus::Draft,
        "prepared" => DocumentStatus::Prepared,
        "approved" => DocumentStatus::Approved,
        "active" => DocumentStatus::Active,
        "completed" => DocumentStatus::Completed,
        "cancelled" => DocumentStatus::Cancelled,
        "planned" => DocumentStatus::Approved,
        "ongoing" => DocumentStatus::Active,
        "in_progress" => DocumentStatus::Active,
        "pending" => DocumentStatus::Prepared,
        _ => DocumentStatus::Draft,
    }
}
