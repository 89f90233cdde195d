//! Global Application State
//!
//! Reactive state management using Leptos signals, plus the pure helpers the
//! components use to build the next entry array and the chart series.

use leptos::*;
use serde_json::{json, Value};

/// Date format of the `date` field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// In-memory mirror of the stored array, elements exactly as loaded
    pub entries: RwSignal<Vec<Value>>,
    /// Form being filled in
    pub form: RwSignal<Entry>,
    /// Initial load in progress
    pub loading: RwSignal<bool>,
    /// A save request is in flight
    pub saving: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message for the status line
    pub success: RwSignal<Option<String>>,
}

/// One day's metrics as text: the form being filled in, or the display
/// view of a stored record
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entry {
    pub date: String,
    pub weight: String,
    pub waist: String,
    pub fasting: String,
    pub energy: String,
    pub notes: String,
}

impl Entry {
    /// Empty form for the given day
    pub fn blank(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    /// Empty form for today (local time)
    pub fn today() -> Self {
        Self::blank(chrono::Local::now().format(DATE_FORMAT).to_string())
    }

    /// Display view of one stored record.
    ///
    /// Numbers are shown as text; anything that is not an object has no view.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str| match object.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Some(Self {
            date: field("date"),
            weight: field("weight"),
            waist: field("waist"),
            fasting: field("fasting"),
            energy: field("energy"),
            notes: field("notes"),
        })
    }

    /// The record appended to the stored array on submit
    pub fn to_json(&self) -> Value {
        json!({
            "date": self.date,
            "weight": self.weight,
            "waist": self.waist,
            "fasting": self.fasting,
            "energy": self.energy,
            "notes": self.notes,
        })
    }
}

/// Records of a `GET /api/data` body, or `None` if it is not an array
pub fn records_from_json(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Display views of the records that are objects, in stored order
pub fn entry_views(records: &[Value]) -> Vec<Entry> {
    records.iter().filter_map(Entry::from_json).collect()
}

/// The array to persist after submitting `form`: the previous records,
/// untouched, plus one
pub fn with_entry(records: &[Value], form: &Entry) -> Vec<Value> {
    let mut next = Vec::with_capacity(records.len() + 1);
    next.extend_from_slice(records);
    next.push(form.to_json());
    next
}

/// One x position of the trend chart
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub weight: Option<f64>,
    pub waist: Option<f64>,
}

/// Chart series in entry order.
///
/// Values that do not parse as numbers are left out; entries with neither
/// weight nor waist are dropped.
pub fn chart_series(entries: &[Entry]) -> Vec<ChartPoint> {
    entries
        .iter()
        .filter_map(|entry| {
            let weight = parse_metric(&entry.weight);
            let waist = parse_metric(&entry.waist);
            if weight.is_none() && waist.is_none() {
                return None;
            }
            Some(ChartPoint {
                label: entry.date.clone(),
                weight,
                waist,
            })
        })
        .collect()
}

/// Parse a free-text metric, accepting a decimal comma
pub fn parse_metric(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        entries: create_rw_signal(Vec::new()),
        form: create_rw_signal(Entry::today()),
        loading: create_rw_signal(false),
        saving: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Append the form to the in-memory entries and reset the form.
    ///
    /// Returns the full array to persist. The date is kept so several
    /// entries can be made for the same day.
    pub fn submit_form(&self) -> Vec<Value> {
        let form = self.form.get_untracked();
        let next = self.entries.with_untracked(|records| with_entry(records, &form));

        self.entries.set(next.clone());
        self.form.set(Entry::blank(form.date));
        next
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, weight: &str) -> Entry {
        Entry {
            weight: weight.to_string(),
            ..Entry::blank(date)
        }
    }

    #[test]
    fn test_entry_views() {
        let records = records_from_json(json!([
            {"date": "2024-01-01", "weight": "70", "fasting": "16:8", "energy": "3", "notes": ""},
            {"date": "2024-01-02", "weight": 69.5},
            "stray"
        ]))
        .unwrap();

        let views = entry_views(&records);
        assert_eq!(records.len(), 3);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].fasting, "16:8");
        assert_eq!(views[0].waist, "");
        assert_eq!(views[1].weight, "69.5");
    }

    #[test]
    fn test_records_from_non_array() {
        assert!(records_from_json(json!({"error": "boom"})).is_none());
        assert!(records_from_json(json!("not an array")).is_none());
    }

    #[test]
    fn test_with_entry_keeps_previous_records() {
        let stored = json!([
            {"date": "2024-01-01", "weight": "70", "fasting": "", "energy": "4", "notes": "", "mood": "ok"},
            {"date": "2024-01-02", "weight": 69.5},
            "stray"
        ]);
        let records = records_from_json(stored.clone()).unwrap();
        let form = entry("2024-01-03", "69.8");

        let next = with_entry(&records, &form);

        assert_eq!(next.len(), 4);
        assert_eq!(Value::Array(next[..3].to_vec()), stored);
        assert_eq!(
            next[3],
            json!({"date": "2024-01-03", "weight": "69.8", "waist": "", "fasting": "", "energy": "", "notes": ""})
        );
    }

    #[test]
    fn test_chart_series_skips_unparsable() {
        let mut with_waist = entry("2024-01-03", "69,4");
        with_waist.waist = "81.5".to_string();
        let entries = vec![
            entry("2024-01-01", "70"),
            entry("2024-01-02", "heavy"),
            with_waist,
        ];

        let series = chart_series(&entries);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].weight, Some(70.0));
        assert_eq!(series[0].waist, None);
        assert_eq!(series[1].weight, Some(69.4));
        assert_eq!(series[1].waist, Some(81.5));
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric(" 71.2 "), Some(71.2));
        assert_eq!(parse_metric(""), None);
        assert_eq!(parse_metric("inf"), None);
    }

    #[test]
    fn test_blank_keeps_date() {
        let form = Entry::blank("2024-05-06");
        assert_eq!(form.date, "2024-05-06");
        assert!(form.weight.is_empty() && form.notes.is_empty());
    }
}
