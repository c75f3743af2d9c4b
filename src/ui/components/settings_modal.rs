use dioxus::prelude::*;
use tracing::warn;

use crate::domain::entities::table::RowId;
use crate::domain::rules::campus::SelectionSummary;
use crate::platform::desktop::dialogs::{show_error, RfdPrompt};
use crate::ui::state::app_state::{AppState, Services};
use crate::usecase::services::edit_service::{EditError, TableEditor};

const CELL_STYLE: &str = "padding: 10px 14px; font-size: 13px; color: #111827; white-space: nowrap; border-bottom: 1px solid #e5e7eb;";
const HEADER_CELL_STYLE: &str = "padding: 10px 14px; text-align: left; font-size: 12px; font-weight: 500; color: #6b7280; text-transform: uppercase; background: #f9fafb; border-bottom: 1px solid #e5e7eb;";
const PANEL_STYLE: &str = "margin-bottom: 28px; padding: 16px; border: 1px solid #d1d5db; border-radius: 8px; background: #f9fafb;";

fn action_style(color: &str, enabled: bool) -> String {
    let cursor = if enabled { "pointer" } else { "not-allowed" };
    let opacity = if enabled { "1" } else { "0.4" };
    format!(
        "background: none; border: none; color: {color}; font-weight: 500; margin-right: 12px; cursor: {cursor}; opacity: {opacity};"
    )
}

#[component]
pub fn SettingsModal(state: AppState) -> Element {
    let services = use_context::<Services>();
    let mut editor = state.editor;
    let mut status = state.status;
    let loading_table = state.loading_table;
    let mut table_warning = state.table_warning;
    let submitting = state.submitting;

    if loading_table() {
        return rsx! {
            div {
                style: "position: fixed; inset: 0; background: rgba(75,85,99,0.5); display: flex; align-items: center; justify-content: center; z-index: 1000;",
                div { style: "background: #fff; border-radius: 8px; padding: 32px; text-align: center;",
                    div { style: "width: 40px; height: 40px; margin: 0 auto 16px; border-radius: 50%; border: 3px solid #e5e7eb; border-bottom-color: #4f46e5;" }
                    p { style: "color: #4b5563; margin: 0;", "Carregando dados do arquivo..." }
                }
            }
        };
    }

    let snapshot = editor();
    let headers = snapshot.table().headers().to_vec();
    let rows = snapshot.table().rows().to_vec();
    let editing_row = snapshot.editing_row();
    let scratch = snapshot.scratch().cloned();
    let errors = snapshot.errors();
    let actions_enabled = snapshot.row_actions_enabled();
    let can_add_row = snapshot.can_add_row();
    let campuses = snapshot.available_campuses();
    let selected = snapshot.selected_campuses().clone();
    let summary = SelectionSummary::of(selected.len(), campuses.len()).label();
    let max_semester = snapshot.max_semester().to_string();
    let semester_valid = snapshot.semester_is_valid();
    let can_confirm = snapshot.can_confirm() && !submitting();
    let column_count = headers.len() + 1;

    let mut report_edit_error = move |err: EditError| {
        if !matches!(err, EditError::Invalid(_)) {
            warn!(error = %err, "edit rejected");
        }
        status.set(format!("Edição não aplicada: {err}"));
    };

    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(75,85,99,0.5); display: flex; align-items: center; justify-content: center; padding: 16px; z-index: 1000;",
            div {
                style: "position: relative; background: #fff; border-radius: 8px; box-shadow: 0 20px 40px rgba(0,0,0,0.2); width: 100%; max-width: 960px; max-height: 90vh; overflow-y: auto; padding: 32px; box-sizing: border-box;",
                button {
                    style: "position: absolute; top: 12px; right: 16px; background: none; border: none; font-size: 24px; color: #9ca3af; cursor: pointer;",
                    onclick: move |_| state.close_settings(),
                    "×"
                }
                h3 { style: "font-size: 28px; font-weight: 700; color: #111827; text-align: center; margin: 0 0 24px;", "Ajustes pré análise" }

                if let Some(warning) = table_warning() {
                    div { style: "position: relative; margin-bottom: 16px; padding: 14px; background: #fefce8; border: 1px solid #fef08a; border-radius: 6px;",
                        button {
                            style: "position: absolute; top: 6px; right: 10px; background: none; border: none; color: #a16207; cursor: pointer;",
                            onclick: move |_| table_warning.set(None),
                            "×"
                        }
                        div { style: "font-size: 13px; font-weight: 600; color: #854d0e;", "Aviso" }
                        p { style: "font-size: 13px; color: #a16207; margin: 6px 0 0;", "{warning}" }
                    }
                }

                div { style: "margin-bottom: 28px;",
                    h4 { style: "font-size: 18px; font-weight: 600; color: #1f2937; margin: 0 0 12px;", "Tabela com os dados" }
                    div { style: "border: 1px solid #d1d5db; border-radius: 8px; overflow-x: auto;",
                        table { style: "min-width: 100%; border-collapse: collapse;",
                            thead {
                                tr {
                                    {headers.iter().map(|header| rsx!(
                                        th { key: "{header}", style: HEADER_CELL_STYLE, "{header}" }
                                    ))}
                                    th { style: HEADER_CELL_STYLE, "Ações" }
                                }
                            }
                            tbody {
                                if rows.is_empty() {
                                    tr {
                                        td {
                                            colspan: "{column_count}",
                                            style: "padding: 16px; text-align: center; font-size: 13px; color: #6b7280;",
                                            "Nenhum dado importado ou carregado."
                                        }
                                    }
                                }
                                {rows.iter().map(|row| {
                                    let row_id = row.id;
                                    let is_editing = editing_row == Some(row_id);
                                    let values = if is_editing {
                                        scratch.as_ref().map(|s| s.values.clone()).unwrap_or_else(|| row.values.clone())
                                    } else {
                                        row.values.clone()
                                    };
                                    rsx!(
                                        tr { key: "{row_id.0}",
                                            {headers.iter().enumerate().map(|(col_idx, header)| {
                                                let value = values.get(col_idx).cloned().unwrap_or_default();
                                                let missing = is_editing && errors.contains(header);
                                                let border = if missing { "#fca5a5" } else { "#d1d5db" };
                                                let placeholder = format!("Digite {}", header.to_lowercase());
                                                rsx!(
                                                    td { key: "{row_id.0}-{col_idx}", style: CELL_STYLE,
                                                        if is_editing {
                                                            div {
                                                                input {
                                                                    r#type: "text",
                                                                    value: "{value}",
                                                                    placeholder: "{placeholder}",
                                                                    style: "width: 100%; min-width: 90px; padding: 4px 6px; border: 1px solid {border}; border-radius: 4px; font-size: 13px;",
                                                                    oninput: move |event| {
                                                                        if let Err(err) = editor.write().set_field(col_idx, event.value()) {
                                                                            report_edit_error(err);
                                                                        }
                                                                    }
                                                                }
                                                                if missing {
                                                                    p { style: "margin: 4px 0 0; font-size: 11px; color: #dc2626;", "Campo obrigatório" }
                                                                }
                                                            }
                                                        } else if value.is_empty() {
                                                            "-"
                                                        } else {
                                                            "{value}"
                                                        }
                                                    }
                                                )
                                            })}
                                            td { style: "{CELL_STYLE} text-align: right;",
                                                if is_editing {
                                                    button {
                                                        style: action_style("#4f46e5", true),
                                                        onclick: move |_| {
                                                            if let Err(err) = editor.write().save() {
                                                                report_edit_error(err);
                                                            }
                                                        },
                                                        "Salvar"
                                                    }
                                                    button {
                                                        style: action_style("#dc2626", true),
                                                        onclick: move |_| editor.write().cancel(),
                                                        "Cancelar"
                                                    }
                                                } else {
                                                    button {
                                                        style: action_style("#2563eb", actions_enabled),
                                                        disabled: !actions_enabled,
                                                        onclick: move |_| {
                                                            if let Err(err) = editor.write().begin_edit(row_id) {
                                                                report_edit_error(err);
                                                            }
                                                        },
                                                        "Editar"
                                                    }
                                                    button {
                                                        style: action_style("#dc2626", actions_enabled),
                                                        disabled: !actions_enabled,
                                                        onclick: move |_| remove_row(editor, row_id, report_edit_error),
                                                        "Remover"
                                                    }
                                                }
                                            }
                                        }
                                    )
                                })}
                            }
                        }
                    }
                    div { style: "margin-top: 14px;",
                        button {
                            style: "padding: 8px 16px; border: 1px solid #d1d5db; border-radius: 6px; background: #fff; color: #374151; cursor: pointer;",
                            disabled: !can_add_row,
                            onclick: move |_| {
                                editor.write().add_row();
                            },
                            "Inserir Nova Linha"
                        }
                    }
                }

                div { style: PANEL_STYLE,
                    div { style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 14px;",
                        label { style: "font-weight: 500; color: #374151;", "Selecione os campus/unidades para análise" }
                        div { style: "display: flex; gap: 8px;",
                            button {
                                style: "padding: 4px 12px; font-size: 13px; background: #e0e7ff; color: #4338ca; border: none; border-radius: 6px; cursor: pointer;",
                                disabled: campuses.is_empty(),
                                onclick: move |_| editor.write().select_all_campuses(),
                                "Selecionar Todos"
                            }
                            button {
                                style: "padding: 4px 12px; font-size: 13px; background: #f3f4f6; color: #374151; border: none; border-radius: 6px; cursor: pointer;",
                                disabled: selected.is_empty(),
                                onclick: move |_| editor.write().clear_campus_selection(),
                                "Limpar Seleção"
                            }
                        }
                    }
                    if campuses.is_empty() {
                        div { style: "text-align: center; padding: 24px 0; color: #6b7280;",
                            p { style: "font-size: 13px; margin: 0;", "Nenhum campus encontrado na tabela." }
                            p { style: "font-size: 12px; margin: 4px 0 0;",
                                "Certifique-se de que existe uma coluna com \"Campus\", \"Unidade\" ou \"Local\" na tabela."
                            }
                        }
                    } else {
                        div { style: "display: grid; grid-template-columns: repeat(3, 1fr); gap: 10px; margin-bottom: 14px;",
                            {campuses.iter().map(|campus| {
                                let checked = selected.contains(campus);
                                let campus = campus.clone();
                                let toggled = campus.clone();
                                rsx!(
                                    label {
                                        key: "{campus}",
                                        style: "display: flex; align-items: center; gap: 10px; padding: 10px; border: 1px solid #e5e7eb; border-radius: 8px; background: #fff; cursor: pointer;",
                                        input {
                                            r#type: "checkbox",
                                            checked: checked,
                                            onchange: move |_| editor.write().toggle_campus(&toggled)
                                        }
                                        span { style: "font-size: 13px; font-weight: 500; color: #374151;", "{campus}" }
                                    }
                                )
                            })}
                        }
                        div { style: "font-size: 13px; color: #4b5563; background: #eff6ff; padding: 10px; border-radius: 6px;",
                            p { style: "font-weight: 500; margin: 0;", "{summary}" }
                            if !selected.is_empty() {
                                div { style: "margin-top: 8px; display: flex; flex-wrap: wrap; gap: 4px;",
                                    {selected.iter().map(|campus| rsx!(
                                        span {
                                            key: "{campus}",
                                            style: "padding: 2px 8px; border-radius: 4px; font-size: 12px; background: #e0e7ff; color: #3730a3;",
                                            "{campus}"
                                        }
                                    ))}
                                }
                            }
                        }
                    }
                }

                div { style: PANEL_STYLE,
                    label { style: "display: block; font-weight: 500; color: #374151; margin-bottom: 8px;",
                        "Qual semestre máximo usado para treinar"
                    }
                    input {
                        r#type: "text",
                        value: "{max_semester}",
                        placeholder: "Ex: 2019.1",
                        style: if semester_valid {
                            "width: 100%; padding: 6px 8px; border: 1px solid #d1d5db; border-radius: 6px; box-sizing: border-box;"
                        } else {
                            "width: 100%; padding: 6px 8px; border: 1px solid #fca5a5; border-radius: 6px; box-sizing: border-box;"
                        },
                        oninput: move |event| editor.write().set_max_semester(event.value())
                    }
                    if !semester_valid {
                        p { style: "margin: 6px 0 0; font-size: 13px; color: #dc2626;",
                            "Formato inválido. Use YYYY.1 ou YYYY.2 (ex: 2019.1)"
                        }
                    }
                }

                div { style: "display: flex; justify-content: center; margin-top: 24px;",
                    button {
                        style: if can_confirm {
                            "padding: 12px 48px; font-size: 17px; font-weight: 600; border: none; border-radius: 8px; background: #000; color: #fff; cursor: pointer;"
                        } else {
                            "padding: 12px 48px; font-size: 17px; font-weight: 600; border: none; border-radius: 8px; background: #9ca3af; color: #4b5563; cursor: not-allowed;"
                        },
                        disabled: !can_confirm,
                        onclick: move |_| {
                            match editor.peek().confirm() {
                                Ok(request) => state.submit_analysis(services.analysis.clone(), request),
                                Err(err) => {
                                    status.set(format!("Não foi possível confirmar: {err}"));
                                    show_error("Ajustes pré análise", &err.to_string());
                                }
                            }
                        },
                        if submitting() { "Enviando..." } else { "Confirmar" }
                    }
                }
            }
        }
    }
}

// The prompt blocks the UI thread, so it runs against a copy of the editor
// instead of a held write guard.
fn remove_row(mut editor: Signal<TableEditor>, row_id: RowId, on_error: impl FnOnce(EditError)) {
    let mut next = editor.peek().clone();
    match next.delete_row(row_id, &RfdPrompt) {
        Ok(true) => editor.set(next),
        Ok(false) => {}
        Err(err) => on_error(err),
    }
}
