use crate::application::documents::DocumentUseCase;
use crate::application::widgets::WidgetUseCase;
use crate::domain::error::DomainError;
use serde::Serialize;
use std::sync::Arc;

const SAMPLE_WIDGETS: &[(&str, &str)] = &[
    ("Sample Widget 1", "This is a sample widget to demonstrate functionality"),
    ("Sample Widget 2", "Another widget example for testing"),
];

const SAMPLE_DOCUMENTS: &[(&str, &str)] = &[
    (
        "Quarterly Budget Report",
        "Operating expenses for the third quarter came in four percent under budget, driven by lower cloud spend.",
    ),
    (
        "Onboarding Guide",
        "New engineers should request repository access, set up the local toolchain and pair with a buddy in week one.",
    ),
    (
        "Incident Postmortem: Search Latency",
        "Search latency spiked after the vector index ran out of memory; the fix added a bounded request timeout.",
    ),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub documents: usize,
    pub widgets: usize,
}

/// Populates empty stores with sample records. Each store is seeded only
/// when it has no records, so running it again is a no-op.
pub struct SeedUseCase {
    documents: Arc<DocumentUseCase>,
    widgets: Arc<WidgetUseCase>,
}

impl SeedUseCase {
    pub fn new(documents: Arc<DocumentUseCase>, widgets: Arc<WidgetUseCase>) -> Self {
        Self { documents, widgets }
    }

    pub async fn execute(&self) -> Result<SeedReport, DomainError> {
        let mut report = SeedReport::default();

        if self.widgets.list()?.is_empty() {
            for (name, value) in SAMPLE_WIDGETS {
                let widget = self.widgets.create(None, (*name).into(), (*value).into())?;
                tracing::info!(id = %widget.id, name = %widget.name, "Seeded widget");
                report.widgets += 1;
            }
        } else {
            tracing::info!("Store already has widgets, skipping seed");
        }

        if self.documents.list()?.is_empty() {
            for (name, value) in SAMPLE_DOCUMENTS {
                let doc = self.documents.create(None, (*name).into(), (*value).into()).await?;
                tracing::info!(id = %doc.id, name = %doc.name, "Seeded document");
                report.documents += 1;
            }
        } else {
            tracing::info!("Store already has documents, skipping seed");
        }

        Ok(report)
    }
}
