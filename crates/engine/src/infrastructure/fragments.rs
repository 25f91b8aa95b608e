//! Dashboard HTML fragments.
//!
//! Markup matches what the dashboard tables and the map filter dialog
//! expect. Identifiers that land in a URL path are percent-encoded here.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::infrastructure::ports::{FragmentParams, FragmentRenderer, FragmentTemplate};

/// Everything except RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn link_button(href: String, class: &str, label: &str) -> String {
    format!(r#"<a href="{href}" role="button" class="btn {class}">{label}</a>"#)
}

fn toggle_option(id: &str, class: &str, info: &str, input_id: &str, label: &str) -> String {
    format!(
        r#"
        <label class="btn btn-sm {class} select-button-new" data-id="{id}" data-type="pokemon" data-info="{info}">
            <input type="radio" name="options" id="{input_id}" autocomplete="off">{label}
        </label>"#
    )
}

fn toggle_group(options: impl IntoIterator<Item = String>) -> String {
    let body: String = options.into_iter().collect();
    format!(
        r#"
    <div class="btn-group btn-group-toggle" data-toggle="buttons">{body}
    </div>
"#
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFragmentRenderer;

impl HtmlFragmentRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl FragmentRenderer for HtmlFragmentRenderer {
    fn render(&self, template: FragmentTemplate, params: &FragmentParams) -> String {
        match template {
            FragmentTemplate::DeviceAssignButton => link_button(
                format!("/dashboard/device/assign/{}", encode_segment(params.get("uuid"))),
                "btn-primary",
                "Assign Instance",
            ),
            FragmentTemplate::InstanceEditButton => link_button(
                format!("/dashboard/instance/edit/{}", encode_segment(params.get("name"))),
                "btn-primary",
                "Edit Instance",
            ),
            FragmentTemplate::AssignmentDeleteButton => link_button(
                format!("/dashboard/assignment/delete/{}", encode_segment(params.get("id"))),
                "btn-danger",
                "Delete",
            ),
            FragmentTemplate::PokemonImage => format!(
                r#"<img class="lazy_load" data-src="/static/img/pokemon/{}.png" style="height:50px; width:50px;">"#,
                params.get("id")
            ),
            FragmentTemplate::PokemonVisibilityToggle => {
                let id = params.get("id");
                toggle_group([
                    toggle_option(id, "btn-off", "hide", "hide", params.get("hide")),
                    toggle_option(id, "btn-on", "show", "show", params.get("show")),
                ])
            }
            FragmentTemplate::PokemonSizeToggle => {
                let id = params.get("id");
                toggle_group([
                    toggle_option(id, "btn-size", "small", "hide", params.get("small")),
                    toggle_option(id, "btn-size", "normal", "show", params.get("normal")),
                    toggle_option(id, "btn-size", "large", "show", params.get("large")),
                    toggle_option(id, "btn-size", "huge", "show", params.get("huge")),
                ])
            }
        }
    }
}
