//! メインアプリケーションコンポーネント
//!
//! エラーバナー・セッション集約・リセットトークンを持ち、
//! 4つのスキャナカードとレポートセクションをつなぐ。

use crate::api;
use crate::components::{header::Header, report_section::ReportPanel, scanner_card::ScannerCard};
use docscan_common::{ReportSection, ResetToken, ScannerKind, SessionAggregate};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// セッション集約を取り直し、レポートの可否を再計算（失敗はコンソールのみ）
async fn refresh_session(
    set_session: WriteSignal<Option<SessionAggregate>>,
    report: RwSignal<ReportSection>,
) {
    match api::fetch_session().await {
        Ok(aggregate) => {
            report.update(|r| {
                r.compute_availability(Some(&aggregate));
            });
            set_session.set(Some(aggregate));
        }
        Err(e) => web_sys::console::error_1(&format!("Failed to fetch session: {}", e).into()),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let (session, set_session) = signal(None::<SessionAggregate>);
    let (banner, set_banner) = signal(None::<String>);
    let (resetting, set_resetting) = signal(false);
    let (reset_token, set_reset_token) = signal(ResetToken::default());
    let report = RwSignal::new(ReportSection::new());

    // 初回読み込み
    spawn_local(refresh_session(set_session, report));

    let on_upload_success = move || {
        set_banner.set(None);
        spawn_local(refresh_session(set_session, report));
    };

    let on_upload_refresh = move || {
        spawn_local(refresh_session(set_session, report));
    };

    let on_upload_error = move |message: String| {
        set_banner.set(Some(message));
    };

    let on_reset = move || {
        set_resetting.set(true);
        spawn_local(async move {
            match api::reset().await {
                Ok(()) => {
                    set_session.set(None);
                    set_banner.set(None);
                    report.update(|r| {
                        r.compute_availability(None);
                    });
                    set_reset_token.update(|t| *t = t.next());
                    refresh_session(set_session, report).await;
                }
                Err(message) => set_banner.set(Some(message)),
            }
            set_resetting.set(false);
        });
    };

    let scanners = ScannerKind::ALL
        .iter()
        .copied()
        .map(|kind| {
            view! {
                <ScannerCard
                    kind=kind
                    reset_token=reset_token
                    on_success=on_upload_success
                    on_error=on_upload_error
                    on_refresh=on_upload_refresh
                />
            }
        })
        .collect_view();

    view! {
        <div class="container">
            <Header />

            {move || banner.get().map(|message| view! {
                <div class="error-banner">
                    <p>{message}</p>
                </div>
            })}

            <div class="scanner-grid">{scanners}</div>

            <ReportPanel
                report=report
                session=session
                resetting=resetting
                set_banner=set_banner
                on_reset=on_reset
            />
        </div>
    }
}
