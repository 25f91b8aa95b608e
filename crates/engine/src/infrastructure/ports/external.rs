//! External collaborator ports (localization, fragment rendering).

use std::collections::BTreeMap;

use chrono::FixedOffset;

// =============================================================================
// Localization
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait LocalizerPort: Send + Sync {
    /// Localized string for `key`. Implementations fall back to the key
    /// itself when no translation exists.
    fn get(&self, key: &str) -> String;

    /// Zone used to render wall-clock times for this deployment.
    fn time_zone(&self) -> FixedOffset;
}

// =============================================================================
// Fragment Rendering
// =============================================================================

/// The UI fragments the aggregation core may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentTemplate {
    /// Params: `uuid`
    DeviceAssignButton,
    /// Params: `name`
    InstanceEditButton,
    /// Params: `id` (composite assignment key)
    AssignmentDeleteButton,
    /// Params: `id`
    PokemonImage,
    /// Params: `id`, `hide`, `show`
    PokemonVisibilityToggle,
    /// Params: `id`, `small`, `normal`, `large`, `huge`
    PokemonSizeToggle,
}

/// Named string parameters for a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentParams(BTreeMap<&'static str, String>);

impl FragmentParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(key, value.into());
        self
    }

    /// Parameter value, empty when unset.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or_default()
    }
}

/// Turns a template id and parameters into a presentation string.
///
/// Pure: no I/O and no permission checks, visibility has already been
/// decided by the time a fragment is rendered.
pub trait FragmentRenderer: Send + Sync {
    fn render(&self, template: FragmentTemplate, params: &FragmentParams) -> String;
}
