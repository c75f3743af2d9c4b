use dioxus::prelude::*;

use crate::ui::state::app_state::Page;

#[component]
pub fn Header(mut page: Signal<Page>) -> Element {
    let link_style = |target: Page| {
        if page() == target {
            "background: none; border: none; padding: 0; cursor: pointer; font-size: 14px; color: #111827; font-weight: 600;"
        } else {
            "background: none; border: none; padding: 0; cursor: pointer; font-size: 14px; color: #4b5563;"
        }
    };

    rsx! {
        header {
            style: "width: 100%; background: #fff; padding: 16px 32px; border-bottom: 1px solid #e5e7eb; box-sizing: border-box;",
            nav { style: "display: flex; align-items: center; gap: 24px;",
                button {
                    style: link_style(Page::Home),
                    onclick: move |_| page.set(Page::Home),
                    "Início"
                }
                button {
                    style: link_style(Page::Report),
                    onclick: move |_| page.set(Page::Report),
                    "Análises"
                }
                button {
                    style: "background: none; border: none; padding: 0; cursor: pointer; font-size: 14px; color: #4338ca; font-weight: 600;",
                    onclick: move |_| page.set(Page::Home),
                    "Oráculo"
                }
            }
        }
    }
}
