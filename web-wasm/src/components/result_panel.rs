//! 結果パネルコンポーネント

use docscan_common::{Field, FieldLayout, ResultBlock, SlotView};
use leptos::prelude::*;

fn inline_text(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.label, f.value))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn field_rows(fields: Vec<Field>) -> impl IntoView {
    fields
        .into_iter()
        .map(|f| {
            view! {
                <p class="result-field">
                    <span class="label">{f.label}": "</span>
                    <span class="value">{f.value}</span>
                </p>
            }
        })
        .collect_view()
}

fn block_view(block: ResultBlock) -> impl IntoView {
    let fields = match block.layout {
        FieldLayout::Inline => {
            let text = inline_text(&block.fields);
            view! { <p class="result-field">{text}</p> }.into_any()
        }
        FieldLayout::Stacked => field_rows(block.fields).into_any(),
    };

    let sections = block
        .sections
        .into_iter()
        .map(|section| {
            view! {
                <div class="result-section">
                    <h4>{section.title}</h4>
                    {field_rows(section.fields)}
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="result-block">
            <p class="result-heading">{block.heading}</p>
            {fields}
            {sections}
        </div>
    }
}

#[component]
pub fn ResultPanel(panel: SlotView) -> impl IntoView {
    // 表裏の見出しはアップロード欄の側で出す
    let SlotView {
        file_name, blocks, ..
    } = panel;

    view! {
        <div class="result-panel">
            {file_name.map(|name| view! { <p class="file-name">"File: "{name}</p> })}
            {blocks.into_iter().map(block_view).collect_view()}
        </div>
    }
}
