// 知识库管理 - 文档的发布、检索、版本历史与表格导入

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::{PortalError, PortalResult};
use crate::models::knowledge::{
    DocumentCategory, DocumentVersion, KnowledgeDocumentPatch, NewKnowledgeDocument, PublicationStatus,
};
use crate::models::KnowledgeDocument;
use crate::storage::{Record, RecordStore};
use crate::utils::export::{CsvRow, ExportColumn};

/// 导入导出共用的表头
pub mod columns {
    pub const TITLE: &str = "Название";
    pub const CATEGORY: &str = "Категория";
    pub const DESCRIPTION: &str = "Описание";
    pub const CONTENT: &str = "Содержание";
    pub const TAGS: &str = "Теги";
    pub const VERSION: &str = "Версия";
    pub const STATUS: &str = "Статус";
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// 知识库导出列
pub fn export_columns() -> Vec<ExportColumn<KnowledgeDocument>> {
    vec![
        ExportColumn::new(columns::TITLE, |d| d.title.clone()),
        ExportColumn::new(columns::CATEGORY, |d| d.category.as_str().to_string()),
        ExportColumn::new(columns::DESCRIPTION, |d| optional(&d.description)),
        ExportColumn::new(columns::CONTENT, |d| optional(&d.content)),
        ExportColumn::new(columns::TAGS, |d| d.tags.join("; ")),
        ExportColumn::new(columns::VERSION, |d| d.current_version().to_string()),
        ExportColumn::new(columns::STATUS, |d| d.status.as_str().to_string()),
    ]
}

pub struct KnowledgeBaseManager {
    store: RecordStore<KnowledgeDocument>,
}

impl KnowledgeBaseManager {
    pub fn new(store: RecordStore<KnowledgeDocument>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<KnowledgeDocument> {
        &self.store
    }

    pub async fn add(&self, draft: NewKnowledgeDocument) -> KnowledgeDocument {
        self.store.add(draft).await
    }

    /// 普通更新，不保存版本
    pub async fn update(
        &self,
        id: &str,
        patch: KnowledgeDocumentPatch,
    ) -> Option<KnowledgeDocument> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<KnowledgeDocument> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<KnowledgeDocument> {
        self.store.all().await
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<KnowledgeDocument> {
        self.store.by_tenant(tenant_id).await
    }

    /// 某类别下已发布的文档
    pub async fn by_category(&self, category: DocumentCategory) -> Vec<KnowledgeDocument> {
        self.store
            .filter(|d| d.category == category && d.status == PublicationStatus::Published)
            .await
    }

    pub async fn search(&self, query: &str) -> Vec<KnowledgeDocument> {
        let query = query.trim();
        if query.is_empty() {
            return self.store.all().await;
        }
        self.store.filter(|d| d.matches(query)).await
    }

    // 计数器不改变更新时间
    pub async fn increment_views(&self, id: &str) -> Option<KnowledgeDocument> {
        self.store.modify(id, |d| d.views_count += 1).await
    }

    pub async fn increment_downloads(&self, id: &str) -> Option<KnowledgeDocument> {
        self.store.modify(id, |d| d.downloads_count += 1).await
    }

    /// 更新文档；正文、文件或版本号变化时先把旧内容存为历史版本
    pub async fn update_document(
        &self,
        id: &str,
        patch: KnowledgeDocumentPatch,
        change_description: &str,
    ) -> Option<KnowledgeDocument> {
        self.store
            .update_with(id, |doc| {
                let was_published = doc.status == PublicationStatus::Published;
                if patch.changes_content() {
                    let snapshot = doc.snapshot(change_description);
                    doc.versions.insert(0, snapshot);
                }
                doc.apply_patch(patch);
                if !was_published && doc.status == PublicationStatus::Published {
                    doc.published_at = Some(Utc::now());
                }
            })
            .await
    }

    pub async fn versions(&self, id: &str) -> Vec<DocumentVersion> {
        self.store
            .get(id)
            .await
            .map(|d| d.versions)
            .unwrap_or_default()
    }

    /// 恢复到某个历史版本，恢复前保存当前内容
    pub async fn restore_version(
        &self,
        id: &str,
        version_number: &str,
    ) -> PortalResult<Option<KnowledgeDocument>> {
        let restored = self
            .store
            .try_update_with(id, |doc| {
                let version = doc
                    .versions
                    .iter()
                    .find(|v| v.version_number == version_number)
                    .cloned()
                    .ok_or_else(|| PortalError::NotFound {
                        store: format!("{}/versions", id),
                        id: version_number.to_string(),
                    })?;

                let note = format!("Перед восстановлением версии {}", version_number);
                let snapshot = doc.snapshot(&note);
                doc.versions.insert(0, snapshot);
                doc.content = version.content;
                doc.file_name = version.file_name;
                doc.file_size = version.file_size;
                doc.file_url = version.file_url;
                doc.version = Some(version.version_number);
                Ok::<(), PortalError>(())
            })
            .await?;

        if restored.is_some() {
            info!("文档 {} 已恢复到版本 {}", id, version_number);
        }
        Ok(restored)
    }

    /// 从表格行导入文档；任何一行无效则整体不导入
    pub async fn import(
        &self,
        rows: &[CsvRow],
        tenant_id: &str,
        author: &str,
    ) -> PortalResult<Vec<KnowledgeDocument>> {
        let drafts = rows
            .iter()
            .map(|row| {
                draft_from_row(row, tenant_id, author).map_err(|reason| {
                    warn!("知识库导入第 {} 行无效: {}", row.line, reason);
                    PortalError::Import(format!("строка {}: {}", row.line, reason))
                })
            })
            .collect::<PortalResult<Vec<_>>>()?;

        let imported = self.store.add_many(drafts).await;
        info!("知识库导入 {} 篇文档", imported.len());
        Ok(imported)
    }
}

fn draft_from_row(
    row: &CsvRow,
    tenant_id: &str,
    author: &str,
) -> Result<NewKnowledgeDocument, String> {
    let field = |label: &str| {
        row.get(label)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let title = field(columns::TITLE).ok_or_else(|| format!("пустое поле «{}»", columns::TITLE))?;
    let category = field(columns::CATEGORY)
        .ok_or_else(|| format!("пустое поле «{}»", columns::CATEGORY))
        .and_then(|c| {
            DocumentCategory::parse(&c).ok_or_else(|| format!("неизвестная категория «{}»", c))
        })?;
    let status = match field(columns::STATUS) {
        Some(s) => PublicationStatus::parse(&s).ok_or_else(|| format!("неизвестный статус «{}»", s))?,
        None => PublicationStatus::Draft,
    };
    let tags = field(columns::TAGS)
        .map(|t| {
            t.split([';', ','])
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(NewKnowledgeDocument {
        tenant_id: tenant_id.to_string(),
        category,
        title,
        description: field(columns::DESCRIPTION),
        content: field(columns::CONTENT),
        file_url: None,
        file_name: None,
        file_size: None,
        tags,
        version: field(columns::VERSION),
        author: author.to_string(),
        status,
    })
}
