//! History Table Component

use leptos::*;

use crate::state::global::{entry_views, GlobalState};

/// Every recorded entry, oldest first
#[component]
pub fn HistoryTable() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <table>
            <thead>
                <tr>
                    <th>"Date"</th>
                    <th>"Weight"</th>
                    <th>"Waist"</th>
                    <th>"Fasting"</th>
                    <th>"Energy"</th>
                    <th>"Notes"</th>
                </tr>
            </thead>
            <tbody>
                {move || {
                    let entries = state.entries.with(|records| entry_views(records));
                    if entries.is_empty() {
                        view! {
                            <tr>
                                <td colspan="6" style="text-align: center">"No entries yet"</td>
                            </tr>
                        }.into_view()
                    } else {
                        entries
                            .into_iter()
                            .map(|entry| view! {
                                <tr>
                                    <td>{entry.date}</td>
                                    <td>{entry.weight}</td>
                                    <td>{entry.waist}</td>
                                    <td>{entry.fasting}</td>
                                    <td>{entry.energy}</td>
                                    <td>{entry.notes}</td>
                                </tr>
                            })
                            .collect_view()
                    }
                }}
            </tbody>
        </table>
    }
}
