//! App Root Component
//!
//! Provides the global state and renders the tracker page.

use leptos::*;

use crate::pages::Home;
use crate::state::global::provide_global_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    view! {
        <Home />
    }
}
