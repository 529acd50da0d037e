//! Export pipeline and service
//!
//! [`ExportPipeline`] is the synchronous transform from a project record to
//! an artifact: titles from the outline, normalized chapters, the estimated
//! TOC, then one encoder. [`ExportService`] fetches the project and the
//! owner's entitlement and runs the pipeline on tokio's blocking pool.

use crate::encoder::{encoder_for_format, PageConfig};
use crate::error::{ExportError, RenderError};
use crate::layout::LayoutPolicy;
use crate::normalize::Normalizer;
use crate::outline::extract_titles;
use crate::pagination::{estimate_toc, start_page_for};
use crate::source::{EntitlementSource, ProjectStore};
use crate::types::{
    sanitize_filename, BookDocument, BookProject, ChapterDocument, ExportArtifact, ExportFormat,
    NormalizedChapter,
};
use crate::watermark::WATERMARK_NOTICE;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Export configuration, defaults match the product's output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportOptions {
    /// Layout rules shared by the paginated backends
    pub layout: LayoutPolicy,
    /// PDF page geometry
    pub page: PageConfig,
    /// Watermark text
    pub notice: String,
    /// Date on the title page; today when unset
    pub date: Option<NaiveDate>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layout: LayoutPolicy::default(),
            page: PageConfig::default(),
            notice: WATERMARK_NOTICE.to_string(),
            date: None,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout policy
    pub fn with_layout(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }

    /// Set the PDF page configuration
    pub fn with_page_config(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    /// Replace the watermark notice
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self
    }

    /// Pin the title-page date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Synchronous project-to-artifact transform
#[derive(Debug, Clone, Default)]
pub struct ExportPipeline {
    options: ExportOptions,
    normalizer: Normalizer,
}

impl ExportPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        Self {
            normalizer: Normalizer::with_policy(options.layout.clone()),
            options,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Build the document the encoders render.
    ///
    /// Chapters `1..=project.chapters` are always present; missing content
    /// stays `None` and renders as a placeholder.
    pub fn assemble(&self, project: &BookProject, entitled: bool, format: ExportFormat) -> BookDocument {
        let titles = extract_titles(&project.outline);

        let chapters: Vec<ChapterDocument> = (1..=project.chapters)
            .map(|number| {
                let title = titles.title_for(number);
                let content = project
                    .chapter_content(number)
                    .map(|raw| self.normalizer.normalize(raw, number, &title));
                ChapterDocument::new(number, title, content)
            })
            .collect();

        let word_counts: Vec<Option<usize>> = chapters
            .iter()
            .map(|c| c.content.as_ref().map(NormalizedChapter::word_count))
            .collect();
        let toc = estimate_toc(
            project.pages,
            project.chapters,
            &word_counts,
            &titles,
            start_page_for(format),
        );
        debug!(chapters = chapters.len(), titles = titles.len(), "Assembled document");

        let date = self.options.date.unwrap_or_else(|| Utc::now().date_naive());
        let mut doc = BookDocument::new(project.title.clone(), date);
        doc.author = project.writing_style.clone();
        doc.language = project.language.clone();
        doc.toc = toc;
        doc.chapters = chapters;
        doc.watermark = !entitled && format.is_paginated();
        doc
    }

    /// Render one export
    #[instrument(skip(self, project), fields(project = %project.id))]
    pub fn render(
        &self,
        project: &BookProject,
        entitled: bool,
        format: ExportFormat,
    ) -> Result<ExportArtifact, RenderError> {
        let doc = self.assemble(project, entitled, format);
        let encoder = encoder_for_format(format, &self.options);

        let mut bytes = Vec::new();
        encoder.encode(&doc, &mut bytes)?;

        let filename = format!(
            "{}.{}",
            sanitize_filename(&project.title, &project.id),
            encoder.file_extension()
        );
        info!(%filename, bytes = bytes.len(), "Export complete");
        Ok(ExportArtifact::new(format, bytes, filename))
    }
}

/// Async front of the pipeline, wired to the project store and the
/// purchase ledger
#[derive(Clone)]
pub struct ExportService {
    projects: Arc<dyn ProjectStore>,
    entitlements: Arc<dyn EntitlementSource>,
    pipeline: Arc<ExportPipeline>,
}

impl ExportService {
    pub fn new(projects: Arc<dyn ProjectStore>, entitlements: Arc<dyn EntitlementSource>) -> Self {
        Self {
            projects,
            entitlements,
            pipeline: Arc::new(ExportPipeline::new()),
        }
    }

    /// Use custom export options
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.pipeline = Arc::new(ExportPipeline::with_options(options));
        self
    }

    /// Export a project the owner has access to
    #[instrument(skip(self))]
    pub async fn export(
        &self,
        id: Uuid,
        owner: &str,
        format: ExportFormat,
    ) -> Result<ExportArtifact, ExportError> {
        let project = self.projects.get_project(id, owner).await?;
        let entitled = self.entitlements.has_ever_purchased(owner).await?;
        debug!(entitled, "Entitlement resolved");

        let pipeline = Arc::clone(&self.pipeline);
        let artifact = tokio::task::spawn_blocking(move || pipeline.render(&project, entitled, format))
            .await
            .map_err(|e| RenderError::EncodingFailed(format!("export task failed: {}", e)))??;
        Ok(artifact)
    }

    pub async fn export_html(&self, id: Uuid, owner: &str) -> Result<ExportArtifact, ExportError> {
        self.export(id, owner, ExportFormat::Html).await
    }

    pub async fn export_pdf(&self, id: Uuid, owner: &str) -> Result<ExportArtifact, ExportError> {
        self.export(id, owner, ExportFormat::Pdf).await
    }

    pub async fn export_docx(&self, id: Uuid, owner: &str) -> Result<ExportArtifact, ExportError> {
        self.export(id, owner, ExportFormat::Docx).await
    }
}
