//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Document Scanner"</h1>
            <p class="text-muted">"Upload and scan documents to generate reports"</p>
        </header>
    }
}
