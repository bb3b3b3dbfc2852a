/// Fetch state and the view state derived from it
use crate::domain::{FetchResult, Quake};

/// Raw request lifecycle state owned by the fetch controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub loading: bool,
    pub data: Option<FetchResult>,
    pub error: Option<String>,
}

impl FetchState {
    pub fn view(&self) -> ViewState<'_> {
        derive_view(self.loading, self.error.as_deref(), self.data.as_ref())
    }

    /// True once a fetch has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        !self.loading && (self.data.is_some() || self.error.is_some())
    }
}

/// The single rendering mode for the results panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Populated(&'a FetchResult),
}

impl ViewState<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Error(_) => "error",
            ViewState::Empty => "empty",
            ViewState::Populated(_) => "populated",
        }
    }
}

/// Computed on demand from the raw `(loading, error, data)` triple, never stored.
///
/// Errors win over everything; before the first fetch completes the panel is `Loading`.
pub fn derive_view<'a>(
    loading: bool,
    error: Option<&'a str>,
    data: Option<&'a FetchResult>,
) -> ViewState<'a> {
    if let Some(message) = error {
        return ViewState::Error(message);
    }
    if loading {
        return ViewState::Loading;
    }
    match data {
        Some(result) if result.items.is_empty() => ViewState::Empty,
        Some(result) => ViewState::Populated(result),
        None => ViewState::Loading,
    }
}

/// The record open in the detail view, if any.
///
/// Lives independently of fetch state: a refetch never clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Option<Quake>,
}

impl Selection {
    pub fn select(&mut self, quake: Quake) {
        self.selected = Some(quake);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Quake> {
        self.selected.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }
}
