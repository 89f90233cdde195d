//! Entry Form Component
//!
//! Form for recording today's metrics.

use leptos::*;

use crate::api;
use crate::state::global::{Entry, GlobalState};

/// Data entry form component
#[component]
pub fn EntryForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        // Optimistic: table and chart update before the save completes
        let next = state.submit_form();

        state.saving.set(true);
        spawn_local(async move {
            match api::save_entries(&next).await {
                Ok(()) => state.show_success("Entry saved"),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to save entries: {}", e).into());
                    state.show_error(&e);
                }
            }
            state.saving.set(false);
        });
    };

    view! {
        <form on:submit=on_submit>
            <div class="form-grid">
                <input
                    type="text"
                    class="col-span-2"
                    disabled=true
                    prop:value=move || state.form.with(|f| f.date.clone())
                />
                <TextField
                    placeholder="Weight (kg)"
                    field=|f| f.weight.clone()
                    assign=|f, v| f.weight = v
                />
                <TextField
                    placeholder="Waist (cm)"
                    field=|f| f.waist.clone()
                    assign=|f, v| f.waist = v
                />
                <TextField
                    placeholder="Fasting (e.g., 16:8)"
                    field=|f| f.fasting.clone()
                    assign=|f, v| f.fasting = v
                />
                <TextField
                    placeholder="Energy (1-5)"
                    field=|f| f.energy.clone()
                    assign=|f, v| f.energy = v
                />
                <textarea
                    class="col-span-2"
                    placeholder="Notes"
                    prop:value=move || state.form.with(|f| f.notes.clone())
                    on:input=move |ev| state.form.update(|f| f.notes = event_target_value(&ev))
                />
            </div>

            <button type="submit" disabled=move || state.saving.get()>
                {move || if state.saving.get() { "Saving..." } else { "Save Entry" }}
            </button>
        </form>
    }
}

/// Single-line input bound to one field of the form
#[component]
fn TextField(
    placeholder: &'static str,
    field: fn(&Entry) -> String,
    assign: fn(&mut Entry, String),
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <input
            type="text"
            placeholder=placeholder
            prop:value=move || state.form.with(field)
            on:input=move |ev| state.form.update(|f| assign(f, event_target_value(&ev)))
        />
    }
}
