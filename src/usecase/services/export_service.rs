use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::info;

use crate::domain::entities::analysis::ChartKind;
use crate::infra::export::images::fetch_report_images;
use crate::infra::export::pdf::{render_pdf, ReportDocument, ReportPalette, ReportSection};
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::services::analysis_service::ReportData;

pub const REPORT_TITLE: &str = "Relatório de Análise de Evasão";
pub const REPORT_SUBTITLE: &str = "Sistema de Análise Preditiva de Evasão Acadêmica";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub missing_images: usize,
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("analise-evasao-{}.pdf", date.format("%Y-%m-%d"))
}

pub fn default_report_file_name() -> String {
    report_file_name(Utc::now().date_naive())
}

pub fn build_report(
    data: &ReportData,
    images: Vec<Option<Vec<u8>>>,
    generated_at: DateTime<Local>,
) -> ReportDocument {
    let sections = ChartKind::ALL
        .iter()
        .zip(images.into_iter().chain(std::iter::repeat(None)))
        .map(|(kind, image)| ReportSection {
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            image,
        })
        .collect();

    ReportDocument {
        title: REPORT_TITLE.to_string(),
        generated_at: generated_at.format("%d/%m/%Y %H:%M:%S").to_string(),
        subtitle: REPORT_SUBTITLE.to_string(),
        message: data.message.clone(),
        sections,
    }
}

/// Downloads the charts, then renders and writes the PDF on the blocking
/// pool. Charts that fail to download are drawn as placeholders.
pub async fn export_report(
    client: &reqwest::Client,
    data: &ReportData,
    destination: PathBuf,
) -> Result<ExportSummary> {
    let urls = ChartKind::ALL
        .iter()
        .map(|kind| data.image_urls.get(*kind).to_string())
        .collect::<Vec<_>>();
    let images = fetch_report_images(client, &urls).await;
    let missing_images = images.iter().filter(|image| image.is_none()).count();
    let report = build_report(data, images, Local::now());

    let path = destination.clone();
    run_blocking(move || {
        let bytes = render_pdf(&report, &ReportPalette::default())?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to write report: {}", path.display()))
    })
    .await?;

    info!(path = %destination.display(), missing_images, "report exported");
    Ok(ExportSummary {
        path: destination,
        missing_images,
    })
}
