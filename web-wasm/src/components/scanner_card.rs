//! スキャナカードコンポーネント
//!
//! バーコード・PDF417・小切手・カードの4種を `ScannerKind` 1つで切り替える。

use crate::api;
use crate::components::result_panel::ResultPanel;
use docscan_common::{ItemKind, ResetToken, ScannerKind, ScannerState, SlotOutcome};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{File, HtmlInputElement};

#[component]
pub fn ScannerCard<S, E, R>(
    kind: ScannerKind,
    reset_token: ReadSignal<ResetToken>,
    on_success: S,
    on_error: E,
    /// 表示に反映しなかったがバックエンドは受理した場合（セッション再取得のみ）
    on_refresh: R,
) -> impl IntoView
where
    S: Fn() + 'static + Clone,
    E: Fn(String) + 'static + Clone,
    R: Fn() + 'static + Clone,
{
    let state = RwSignal::new(ScannerState::new(kind));
    let is_loading = move || state.with(ScannerState::is_loading);

    // 親のリセットトークンが変わったら表示を消す
    Effect::new(move |_| {
        let token = reset_token.get();
        state.maybe_update(|s| s.observe_reset(token));
    });

    let submit = move |target: ItemKind, file: File| {
        let Some(ticket) = state.try_update(|s| s.begin(target, file.name())).flatten() else {
            return;
        };
        let on_success = on_success.clone();
        let on_error = on_error.clone();
        let on_refresh = on_refresh.clone();

        spawn_local(async move {
            let outcome = api::upload(target, &file).await;
            match state.try_update(|s| s.complete(ticket, outcome)) {
                Some(SlotOutcome::Applied) => on_success(),
                Some(SlotOutcome::Failed(message)) => on_error(message),
                Some(SlotOutcome::Stale { succeeded: true }) => on_refresh(),
                Some(SlotOutcome::Stale { succeeded: false }) | None => {}
            }
        });
    };

    let slots = kind
        .targets()
        .iter()
        .copied()
        .map(|target| {
            let submit = submit.clone();
            let input_id = format!("{}-input", target.key());
            let caption = match target {
                ItemKind::CardFront => Some("Front"),
                ItemKind::CardBack => Some("Back"),
                _ => None,
            };

            let on_change = move |ev: leptos::ev::Event| {
                let input = event_target::<HtmlInputElement>(&ev);
                if let Some(file) = input.files().and_then(|files| files.get(0)) {
                    submit(target, file);
                }
                // 同じファイルを選び直しても change が飛ぶように
                input.set_value("");
            };

            let panel = move || {
                state
                    .with(|s| s.views().into_iter().find(|v| v.target == target))
                    .map(|v| view! { <ResultPanel panel=v /> })
            };

            view! {
                <div class="upload-slot">
                    {caption.map(|c| view! { <p class="slot-caption">{c}</p> })}
                    <label class="upload-area" for=input_id.clone()>
                        <input
                            type="file"
                            accept="image/*"
                            class="hidden"
                            id=input_id.clone()
                            disabled=is_loading
                            on:change=on_change
                        />
                        <p>{move || if is_loading() { "Processing..." } else { kind.prompt(target) }}</p>
                    </label>
                    {panel}
                </div>
            }
        })
        .collect_view();

    view! {
        <section class="card scanner-card">
            <h2>{kind.title()}</h2>
            {slots}
        </section>
    }
}
