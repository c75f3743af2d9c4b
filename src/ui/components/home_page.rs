use dioxus::prelude::*;

use crate::platform::desktop::dialogs::pick_dataset_file;
use crate::ui::state::app_state::AppState;

const INTRO: &str = "A ferramenta Oráculo analisa o impacto da pandemia na evasão universitária. \
Com isso, compara o comportamento de evasão de alunos em períodos anteriores e durante a pandemia, \
monitorando seus resultados, buscando identificar mudanças significativas, tendências e fornecer \
insights valiosos sobre a dinâmica da evasão.";

const IMPORT_TEXT: &str = "Carregue seu arquivo de dados (CSV ou SQL) para que o Oráculo processe \
as informações, execute as análises comparativas da evasão (contrastando períodos pré e durante a \
pandemia) e revele os principais resultados e tendências.";

const CARDS: [(&str, &str); 3] = [
    ("Séries temporais", "Visualização da série temporal dos dados."),
    ("Tendência e sazonalidade", "Identificação de padrões recorrentes."),
    (
        "Previsão de evasão",
        "Estimar a evasão durante a pandemia com intervalo de confiança robustos.",
    ),
];

const FEATURES: [(&str, &str); 3] = [
    (
        "Comparação pré e durante pandemia",
        "Entender o impacto da pandemia nas taxas de evasão, com comparativos entre períodos.",
    ),
    (
        "Análise por campus",
        "Visualizar métricas segmentadas por campus e identificar características locais.",
    ),
    (
        "Predição dos valores",
        "Estimar dados futuros com base em padrões passados, usando modelos estatísticos ou algoritmos.",
    ),
];

#[component]
fn AnalysisCard(title: &'static str, description: &'static str) -> Element {
    rsx! {
        div {
            style: "background: #fff; border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,0.12); padding: 24px; text-align: center; display: flex; flex-direction: column; align-items: center;",
            div { style: "width: 100%; height: 120px; margin-bottom: 16px; border-radius: 6px; background: linear-gradient(135deg, #e0e7ff, #f5f3ff);" }
            h3 { style: "font-size: 18px; font-weight: 600; color: #1f2937; margin: 0 0 8px;", "{title}" }
            p { style: "font-size: 14px; color: #4b5563; margin: 0;", "{description}" }
        }
    }
}

#[component]
fn FeatureBlock(title: &'static str, description: &'static str, reverse: bool) -> Element {
    let direction = if reverse { "row-reverse" } else { "row" };

    rsx! {
        div { style: "display: flex; flex-direction: {direction}; align-items: center; gap: 32px; margin-bottom: 32px;",
            div { style: "flex: 1; height: 160px; border-radius: 8px; background: linear-gradient(135deg, #eef2ff, #e0f2fe);" }
            div { style: "flex: 1;",
                h3 { style: "font-size: 22px; font-weight: 700; color: #111827; margin: 0 0 8px;", "{title}" }
                p { style: "color: #4b5563; line-height: 1.6; margin: 0;", "{description}" }
            }
        }
    }
}

#[component]
pub fn HomePage(state: AppState) -> Element {
    let mut selected_file = state.selected_file;
    let mut status = state.status;

    let file_label = selected_file()
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().to_string());
    let button_text = if file_label.is_some() { "Começar" } else { "Importar arquivo" };

    rsx! {
        main { style: "display: flex; flex-direction: column; align-items: center; background: #f9fafb; padding: 40px 24px; min-height: 100vh; box-sizing: border-box;",
            section { style: "text-align: center; max-width: 900px; margin-bottom: 48px;",
                h1 { style: "font-size: 44px; font-weight: 700; color: #111827; margin: 0 0 12px;", "Oráculo" }
                h2 { style: "font-size: 22px; font-weight: 600; color: #1f2937; margin: 0 0 20px;", "Análise preditiva da evasão universitária." }
                p { style: "color: #4b5563; line-height: 1.7;", "{INTRO}" }
            }

            section { style: "width: 100%; max-width: 1200px; display: grid; grid-template-columns: repeat(3, 1fr); gap: 24px; margin-bottom: 48px;",
                {CARDS.iter().map(|(title, description)| rsx!(
                    AnalysisCard { key: "{title}", title: *title, description: *description }
                ))}
            }

            section { style: "width: 100%; max-width: 1200px; margin-bottom: 48px;",
                {FEATURES.iter().enumerate().map(|(index, (title, description))| rsx!(
                    FeatureBlock { key: "{title}", title: *title, description: *description, reverse: index % 2 == 1 }
                ))}
            }

            section { style: "width: 100%; max-width: 1200px; background: #fff; padding: 32px; border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,0.12); display: flex; align-items: center; justify-content: space-between; gap: 24px; box-sizing: border-box;",
                div { style: "flex: 3;",
                    h2 { style: "font-size: 28px; font-weight: 700; color: #111827; margin: 0 0 12px; border-bottom: 2px solid #4f46e5; display: inline-block; padding-bottom: 4px;",
                        "Importe seus dataset"
                    }
                    p { style: "color: #4b5563; line-height: 1.6; margin: 0;", "{IMPORT_TEXT}" }
                    if let Some(name) = file_label.clone() {
                        p { style: "margin-top: 12px; font-size: 13px; color: #374151;",
                            "Arquivo selecionado: {name} "
                            button {
                                style: "background: none; border: none; color: #4338ca; cursor: pointer; text-decoration: underline; padding: 0;",
                                onclick: move |_| {
                                    if let Some(path) = pick_dataset_file() {
                                        selected_file.set(Some(path));
                                    }
                                },
                                "Trocar arquivo"
                            }
                        }
                    }
                }
                div { style: "flex: 2; display: flex; justify-content: flex-end;",
                    button {
                        style: "background: #4338ca; color: #fff; font-weight: 600; padding: 16px 32px; border: none; border-radius: 8px; cursor: pointer; font-size: 16px;",
                        onclick: move |_| {
                            match selected_file() {
                                Some(path) => state.open_settings_with_file(path),
                                None => match pick_dataset_file() {
                                    Some(path) => {
                                        status.set(format!("Arquivo selecionado: {}", path.display()));
                                        selected_file.set(Some(path));
                                    }
                                    None => selected_file.set(None),
                                },
                            }
                        },
                        "{button_text}"
                    }
                }
            }
        }
    }
}
