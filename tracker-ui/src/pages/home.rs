//! Home Page
//!
//! The single tracker page: entry form, history table and trend chart.

use leptos::*;

use crate::api;
use crate::components::{Chart, EntryForm, HistoryTable};
use crate::state::global::GlobalState;

/// Home page component
#[component]
pub fn Home() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Load the stored entries once on mount
    create_effect(move |_| {
        spawn_local(async move {
            state.loading.set(true);

            match api::fetch_entries().await {
                Ok(entries) => state.entries.set(entries),
                Err(e) => {
                    web_sys::console::error_1(&format!("Error fetching data: {}", e).into());
                    state.entries.set(Vec::new());
                }
            }

            state.loading.set(false);
        });
    });

    view! {
        <main>
            <h1>"Weight Tracker"</h1>
            <StatusLine />

            <section>
                <EntryForm />
            </section>

            <section>
                <h2>"Trend"</h2>
                <Chart />
            </section>

            <section>
                <h2>"History"</h2>
                {move || {
                    if state.loading.get() {
                        view! { <p>"Loading..."</p> }.into_view()
                    } else {
                        view! { <HistoryTable /> }.into_view()
                    }
                }}
            </section>
        </main>
    }
}

/// Outcome of the last save. An error hides any success message.
#[component]
fn StatusLine() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let status = move || status_line(state.error.get(), state.success.get());

    view! {
        <div aria-live="polite">
            {move || status().map(|(class, message)| view! { <p class=class>{message}</p> })}
        </div>
    }
}

/// CSS class and text of the status line, if anything is to be shown
fn status_line(error: Option<String>, success: Option<String>) -> Option<(&'static str, String)> {
    match (error, success) {
        (Some(message), _) => Some(("status status-error", message)),
        (None, Some(message)) => Some(("status status-ok", message)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_prefers_error() {
        let line = status_line(Some("Network error".into()), Some("Entry saved".into()));
        assert_eq!(line, Some(("status status-error", "Network error".to_string())));

        let line = status_line(None, Some("Entry saved".into()));
        assert_eq!(line, Some(("status status-ok", "Entry saved".to_string())));

        assert_eq!(status_line(None, None), None);
    }
}
