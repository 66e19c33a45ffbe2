// 知识库文档及版本历史

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// 文档没有显式版本号时使用的版本
pub const DEFAULT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    UserGuide,
    Regulatory,
    Organization,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserGuide => "user_guide",
            Self::Regulatory => "regulatory",
            Self::Organization => "organization",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "user_guide" => Some(Self::UserGuide),
            "regulatory" => Some(Self::Regulatory),
            "organization" => Some(Self::Organization),
            _ => None,
        }
    }
}

/// 知识库文档的发布状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// 版本快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub version_number: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub change_description: Option<String>,
    pub content: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub tenant_id: String,
    pub category: DocumentCategory,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub version: Option<String>,
    pub author: String,
    pub status: PublicationStatus,
    pub views_count: u64,
    pub downloads_count: u64,
    /// 历史版本，最新的在前
    #[serde(default)]
    pub versions: Vec<DocumentVersion>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeDocument {
    pub fn current_version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// 当前内容的快照
    pub fn snapshot(&self, change_description: &str) -> DocumentVersion {
        DocumentVersion {
            version_number: self.current_version().to_string(),
            created_at: self.updated_at,
            created_by: self.author.clone(),
            change_description: Some(change_description.to_string()),
            content: self.content.clone(),
            file_name: self.file_name.clone(),
            file_size: self.file_size,
            file_url: self.file_url.clone(),
        }
    }

    /// 标题、描述、正文或标签中包含关键字（不区分大小写）
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&query);
        contains(&self.title)
            || self.description.as_deref().is_some_and(contains)
            || self.content.as_deref().is_some_and(contains)
            || self.tags.iter().any(|tag| contains(tag))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewKnowledgeDocument {
    pub tenant_id: String,
    pub category: DocumentCategory,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub version: Option<String>,
    pub author: String,
    #[serde(default)]
    pub status: PublicationStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeDocumentPatch {
    pub category: Option<DocumentCategory>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub tags: Option<Vec<String>>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub status: Option<PublicationStatus>,
}

impl KnowledgeDocumentPatch {
    /// 正文、文件或版本号变化时需要保存旧版本
    pub fn changes_content(&self) -> bool {
        self.content.is_some() || self.file_name.is_some() || self.version.is_some()
    }
}

impl Record for KnowledgeDocument {
    type Draft = NewKnowledgeDocument;
    type Patch = KnowledgeDocumentPatch;
    const ID_PREFIX: &'static str = "doc";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewKnowledgeDocument, now: DateTime<Utc>) -> Self {
        let published_at = (draft.status == PublicationStatus::Published).then_some(now);
        Self {
            id,
            tenant_id: draft.tenant_id,
            category: draft.category,
            title: draft.title,
            description: draft.description,
            content: draft.content,
            file_url: draft.file_url,
            file_name: draft.file_name,
            file_size: draft.file_size,
            tags: draft.tags,
            version: draft.version,
            author: draft.author,
            status: draft.status,
            views_count: 0,
            downloads_count: 0,
            versions: Vec::new(),
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: KnowledgeDocumentPatch) {
        merge_fields!(self, patch;
            set: category, title, tags, author, status;
            opt: description, content, file_url, file_name, file_size, version);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
