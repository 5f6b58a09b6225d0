//! レポートセクションコンポーネント
//!
//! 全項目 / 選択項目でのPDF生成、選択モーダル、セッションリセットボタン。

use crate::api;
use docscan_common::{ItemKind, ReportMode, ReportRequest, ReportSection, SessionAggregate};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn uploaded(session: Option<&SessionAggregate>) -> Vec<ItemKind> {
    session.map(SessionAggregate::uploaded_kinds).unwrap_or_default()
}

fn warn_invalid(result: docscan_common::Result<()>) {
    if let Err(e) = result {
        web_sys::console::warn_1(&e.to_string().into());
    }
}

#[component]
pub fn ReportPanel<R>(
    report: RwSignal<ReportSection>,
    session: ReadSignal<Option<SessionAggregate>>,
    resetting: ReadSignal<bool>,
    set_banner: WriteSignal<Option<String>>,
    on_reset: R,
) -> impl IntoView
where
    R: Fn() + 'static + Clone,
{
    let generating = move || report.with(ReportSection::is_generating);
    let generate_enabled = move || {
        let resetting = resetting.get();
        report.with(|r| r.generate_enabled(resetting))
    };
    let reset_enabled = move || {
        let resetting = resetting.get();
        report.with(|r| r.reset_enabled(resetting))
    };
    let modal_open = move || {
        matches!(
            report.with(ReportSection::mode),
            ReportMode::SelectionOpen | ReportMode::Generating { from_selection: true }
        )
    };

    // 生成リクエストの送信と結果の反映
    let run = move |request: ReportRequest| {
        spawn_local(async move {
            match api::generate(request).await {
                Ok(pdf) => {
                    report.update(|r| {
                        r.finish(true);
                    });
                    if let Err(e) = api::open_pdf(&pdf) {
                        web_sys::console::error_1(&e);
                    }
                }
                Err(message) => {
                    web_sys::console::error_1(&format!("Failed to generate PDF: {}", message).into());
                    report.update(|r| {
                        r.finish(false);
                    });
                    set_banner.set(Some(message));
                }
            }
        });
    };

    let on_generate_all = move |_| {
        if !generate_enabled() {
            return;
        }
        match report.try_update(|r| r.begin_generate_all()) {
            Some(Ok(request)) => run(request),
            Some(Err(e)) => warn_invalid(Err(e)),
            None => {}
        }
    };

    let on_generate_selected = move |_| {
        match report.try_update(|r| r.begin_generate_selective()) {
            Some(Ok(request)) => run(request),
            Some(Err(e)) => warn_invalid(Err(e)),
            None => {}
        }
    };

    let on_open = move |_| {
        if generate_enabled() {
            report.update(|r| warn_invalid(r.open_selection()));
        }
    };

    let on_cancel = move |_| report.update(|r| warn_invalid(r.cancel_selection()));

    let on_reset_click = move |_| {
        if reset_enabled() {
            on_reset();
        }
    };

    let uploaded_list = move || {
        let kinds = session.with(|s| uploaded(s.as_ref()));
        if kinds.is_empty() {
            return view! { <li class="text-muted">"No items uploaded yet"</li> }.into_any();
        }
        kinds
            .into_iter()
            .map(|kind| view! { <li class="uploaded-item">{kind.label()}</li> })
            .collect_view()
            .into_any()
    };

    // モーダルには登録済みの項目だけを出す（選択セット自体は5項目すべて保持）
    let checkboxes = move || {
        session
            .with(|s| uploaded(s.as_ref()))
            .into_iter()
            .map(|kind| {
                view! {
                    <label class="checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || report.with(|r| r.selection().get(kind))
                            on:change=move |_| report.update(|r| warn_invalid(r.toggle_selection(kind)))
                        />
                        <span>{kind.label()}</span>
                    </label>
                }
            })
            .collect_view()
    };

    view! {
        <section class="card report-section">
            <h2>"Report"</h2>

            {move || session.with(Option::is_some).then(|| view! {
                <div class="uploaded-items">
                    <h3>"Uploaded Items:"</h3>
                    <ul>{uploaded_list}</ul>
                </div>
            })}

            <div class="report-buttons">
                <button
                    class="btn btn-primary"
                    disabled=move || !generate_enabled()
                    on:click=on_generate_all
                >
                    {move || if generating() { "Generating..." } else { "Generate All PDF" }}
                </button>
                <button
                    class="btn btn-secondary"
                    disabled=move || !generate_enabled()
                    on:click=on_open
                >
                    {move || if generating() { "Generating..." } else { "Select & Generate PDF" }}
                </button>
                <button
                    class="btn btn-muted"
                    disabled=move || !reset_enabled()
                    on:click=on_reset_click
                >
                    {move || if resetting.get() { "Resetting..." } else { "Reset Session" }}
                </button>
            </div>

            <div class=move || if modal_open() { "modal-backdrop" } else { "modal-backdrop hidden" }>
                <div class="modal">
                    <h3>"Select Items for PDF"</h3>
                    <div class="checkbox-list">{checkboxes}</div>
                    <div class="modal-buttons">
                        <button class="btn btn-muted" disabled=generating on:click=on_cancel>
                            "Cancel"
                        </button>
                        <button class="btn btn-primary" disabled=generating on:click=on_generate_selected>
                            {move || if generating() { "Generating..." } else { "Generate PDF" }}
                        </button>
                    </div>
                </div>
            </div>
        </section>
    }
}
