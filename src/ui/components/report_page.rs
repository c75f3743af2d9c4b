use chrono::Local;
use dioxus::prelude::*;
use tracing::warn;

use crate::domain::entities::analysis::ChartKind;
use crate::platform::desktop::dialogs::{pick_pdf_destination, show_error};
use crate::ui::state::app_state::{AppState, ReportView, Services};
use crate::usecase::services::analysis_service::ReportData;
use crate::usecase::services::export_service::{
    default_report_file_name, export_report, REPORT_SUBTITLE, REPORT_TITLE,
};

const CENTERED: &str = "display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 60vh; background: #f9fafb;";

#[component]
fn ChartSection(kind: ChartKind, url: String) -> Element {
    let title = kind.title();
    let description = kind.description();

    rsx! {
        section { style: "padding: 24px 32px; margin-bottom: 24px; border-bottom: 1px solid #e5e7eb;",
            h2 { style: "font-size: 22px; font-weight: 700; color: #111827; margin: 0 0 6px;", "{title}" }
            p { style: "font-size: 14px; color: #4b5563; margin: 0 0 16px;", "{description}" }
            img {
                src: "{url}",
                alt: "{title}",
                style: "width: 100%; height: auto; border: 1px solid #e5e7eb; border-radius: 6px;",
            }
        }
    }
}

#[component]
pub fn ReportPage(state: AppState) -> Element {
    let services = use_context::<Services>();
    let report = state.report;
    let mut exporting = state.exporting;
    let mut status = state.status;

    let service_for_mount = services.analysis.clone();
    use_effect(move || state.load_report(service_for_mount.clone()));

    let view = report();
    let body = match view {
        ReportView::Loading => rsx! {
            div { style: CENTERED,
                div { style: "width: 44px; height: 44px; border-radius: 50%; border: 3px solid #e5e7eb; border-bottom-color: #4338ca;" }
                p { style: "font-size: 18px; color: #374151; margin-top: 16px;", "Carregando gráficos de análise..." }
            }
        },
        ReportView::Failed(message) => {
            let service = services.analysis.clone();
            rsx! {
                div { style: CENTERED,
                    p { style: "font-size: 18px; color: #dc2626; margin-bottom: 16px;", "Erro: {message}" }
                    button {
                        style: "padding: 8px 24px; background: #4338ca; color: #fff; border: none; border-radius: 8px; cursor: pointer;",
                        onclick: move |_| state.load_report(service.clone()),
                        "Tentar Novamente"
                    }
                }
            }
        }
        ReportView::Empty => rsx! {
            div { style: CENTERED,
                p { style: "font-size: 18px; color: #dc2626;", "Nenhum URL de gráfico disponível após o carregamento." }
            }
        },
        ReportView::Ready(data) => {
            let generated_at = Local::now().format("%d/%m/%Y %H:%M").to_string();
            let message = data.message.clone();
            let export_data = data.clone();
            let http = services.analysis.http().clone();
            let export_label = if exporting() { "Exportando..." } else { "Exportar como PDF" };

            rsx! {
                section { style: "width: 100%; background: #4338ca; color: #fff; padding: 28px 32px; display: flex; justify-content: space-between; align-items: center; box-sizing: border-box;",
                    h1 { style: "font-size: 32px; font-weight: 700; margin: 0;", "Resultados das análises" }
                    div { style: "display: flex; gap: 12px;",
                        button {
                            style: "background: #fff; color: #111827; font-weight: 600; padding: 8px 16px; border: none; border-radius: 8px; cursor: pointer;",
                            disabled: exporting(),
                            onclick: move |_| {
                                let file_name = default_report_file_name();
                                let Some(destination) = pick_pdf_destination(&file_name) else {
                                    return;
                                };
                                exporting.set(true);
                                let http = http.clone();
                                let data: ReportData = export_data.clone();
                                spawn(async move {
                                    match export_report(&http, &data, destination).await {
                                        Ok(summary) if summary.missing_images > 0 => {
                                            status.set(format!(
                                                "PDF exportado para {} ({} gráfico(s) indisponível(is))",
                                                summary.path.display(),
                                                summary.missing_images
                                            ));
                                        }
                                        Ok(summary) => {
                                            status.set(format!("PDF exportado para {}", summary.path.display()));
                                        }
                                        Err(err) => {
                                            warn!(error = %format!("{err:#}"), "pdf export failed");
                                            status.set(format!("Erro ao exportar PDF: {err}"));
                                            show_error("Exportar como PDF", "Erro ao exportar PDF. Tente novamente.");
                                        }
                                    }
                                    exporting.set(false);
                                });
                            },
                            "{export_label}"
                        }
                        button {
                            style: "background: #fff; color: #111827; font-weight: 600; padding: 8px 16px; border: none; border-radius: 8px; cursor: pointer;",
                            onclick: move |_| state.open_settings_with_example(),
                            "Ajustes"
                        }
                    }
                }
                div { style: "width: 100%; max-width: 1200px; margin: 40px auto 64px; background: #fff; box-sizing: border-box;",
                    div { style: "padding: 32px; margin-bottom: 24px; border-bottom: 2px solid #e5e7eb;",
                        h1 { style: "font-size: 28px; font-weight: 700; color: #111827; margin: 0 0 8px;", "{REPORT_TITLE}" }
                        p { style: "color: #4b5563; margin: 0 0 4px;", "Gerado em: {generated_at}" }
                        p { style: "color: #4b5563; margin: 0 0 12px;", "{REPORT_SUBTITLE}" }
                        p { style: "color: #1f2937; margin: 0;", "{message}" }
                    }
                    {ChartKind::ALL.iter().map(|kind| {
                        let url = data.image_urls.get(*kind).to_string();
                        let key = kind.title();
                        rsx!(ChartSection { key: "{key}", kind: *kind, url })
                    })}
                }
            }
        }
    };

    rsx! {
        main { style: "display: flex; flex-direction: column; align-items: center; background: #f9fafb; min-height: 100vh;",
            {body}
        }
    }
}
