use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::*;
use tracing::{debug, warn};

use crate::domain::entities::analysis::AnalysisRequest;
use crate::infra::config::AppConfig;
use crate::infra::http::analysis_client::AnalysisClient;
use crate::infra::sqlite::repo::SqliteHandoffStore;
use crate::platform::desktop::blocking::run_blocking;
use crate::platform::desktop::dialogs::show_error;
use crate::usecase::services::analysis_service::{demo_request, AnalysisService, ReportData};
use crate::usecase::services::edit_service::TableEditor;
use crate::usecase::services::import_service::{read_table_file, LoadedTable};
use crate::usecase::services::sequencer::RequestSequencer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Report,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportView {
    Loading,
    Ready(ReportData),
    Empty,
    Failed(String),
}

impl ReportView {
    fn from_data(data: ReportData) -> Self {
        if data.image_urls.is_empty() {
            ReportView::Empty
        } else {
            ReportView::Ready(data)
        }
    }
}

/// Services shared by every component through the Dioxus context.
#[derive(Clone)]
pub struct Services {
    pub analysis: Arc<AnalysisService>,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Self {
        let store = Arc::new(SqliteHandoffStore {
            db_path: config.db_path(),
        });
        let client = AnalysisClient::new(config.api_base_url.clone());
        Self {
            analysis: Arc::new(AnalysisService::new(client, store)),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct AppState {
    pub page: Signal<Page>,
    pub selected_file: Signal<Option<PathBuf>>,
    pub show_settings: Signal<bool>,
    pub editor: Signal<TableEditor>,
    pub loading_table: Signal<bool>,
    pub table_warning: Signal<Option<String>>,
    pub submitting: Signal<bool>,
    pub exporting: Signal<bool>,
    pub status: Signal<String>,
    pub report: Signal<ReportView>,
    pub read_sequencer: Signal<RequestSequencer>,
    pub submit_sequencer: Signal<RequestSequencer>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            page: use_signal(|| Page::Home),
            selected_file: use_signal(|| None::<PathBuf>),
            show_settings: use_signal(|| false),
            editor: use_signal(TableEditor::default),
            loading_table: use_signal(|| false),
            table_warning: use_signal(|| None::<String>),
            submitting: use_signal(|| false),
            exporting: use_signal(|| false),
            status: use_signal(|| "Pronto".to_string()),
            report: use_signal(|| ReportView::Loading),
            read_sequencer: use_signal(RequestSequencer::default),
            submit_sequencer: use_signal(RequestSequencer::default),
        }
    }

    /// Opens the settings modal and reads `path` in the background. A read
    /// that completes after a newer one was started is dropped.
    pub fn open_settings_with_file(self, path: PathBuf) {
        let AppState {
            mut show_settings,
            mut loading_table,
            mut table_warning,
            mut editor,
            mut read_sequencer,
            ..
        } = self;

        let ticket = read_sequencer.write().issue();
        table_warning.set(None);
        loading_table.set(true);
        show_settings.set(true);

        spawn(async move {
            let loaded = read_table_file(&path).await;
            if !read_sequencer.peek().is_current(ticket) {
                debug!(ticket = ticket.value(), "stale file read discarded");
                return;
            }
            editor.write().replace_table(loaded.table);
            table_warning.set(loaded.warning);
            loading_table.set(false);
        });
    }

    pub fn open_settings_with_example(self) {
        let AppState {
            mut show_settings,
            mut loading_table,
            mut table_warning,
            mut editor,
            mut read_sequencer,
            ..
        } = self;

        read_sequencer.write().issue();
        let loaded = LoadedTable::example();
        editor.write().replace_table(loaded.table);
        table_warning.set(loaded.warning);
        loading_table.set(false);
        show_settings.set(true);
    }

    pub fn close_settings(self) {
        let AppState {
            mut show_settings,
            mut loading_table,
            mut read_sequencer,
            ..
        } = self;

        read_sequencer.write().issue();
        loading_table.set(false);
        show_settings.set(false);
    }

    /// Sends the confirmed table to the backend. On success the modal closes
    /// and the report page shows the new charts.
    pub fn submit_analysis(self, service: Arc<AnalysisService>, request: AnalysisRequest) {
        let AppState {
            mut page,
            mut submitting,
            mut status,
            mut report,
            mut submit_sequencer,
            ..
        } = self;

        let ticket = submit_sequencer.write().issue();
        submitting.set(true);
        status.set("Enviando dados para análise...".to_string());

        spawn(async move {
            let result = service.submit(&request).await;
            if !submit_sequencer.peek().is_current(ticket) {
                debug!(ticket = ticket.value(), "stale analysis result discarded");
                return;
            }
            submitting.set(false);
            match result {
                Ok(data) => {
                    self.close_settings();
                    report.set(ReportView::from_data(data));
                    page.set(Page::Report);
                    status.set("Análise concluída".to_string());
                }
                Err(err) => {
                    warn!(error = %err, "analysis submission failed");
                    status.set(format!("Erro na análise: {err}"));
                    show_error("Erro na análise", &err.to_string());
                }
            }
        });
    }

    /// Shows the stored hand-off, or runs the built-in demonstration series
    /// when nothing was stored yet.
    pub fn load_report(self, service: Arc<AnalysisService>) {
        let AppState {
            mut report,
            mut submitting,
            mut submit_sequencer,
            ..
        } = self;

        let ticket = submit_sequencer.write().issue();
        submitting.set(false);
        report.set(ReportView::Loading);

        spawn(async move {
            let store_service = service.clone();
            let stored = run_blocking(move || {
                store_service
                    .load_latest()
                    .map_err(|err| anyhow::anyhow!(err.to_string()))
            })
            .await;

            let view = match stored {
                Ok(Some(data)) => ReportView::from_data(data),
                Ok(None) => match service.submit(&demo_request()).await {
                    Ok(data) => ReportView::from_data(data),
                    Err(err) => ReportView::Failed(format!("Erro na análise: {err}")),
                },
                Err(err) => ReportView::Failed(format!("Erro ao carregar resultados: {err}")),
            };

            if !submit_sequencer.peek().is_current(ticket) {
                debug!(ticket = ticket.value(), "stale report load discarded");
                return;
            }
            report.set(view);
        });
    }
}
