//! Admin row and filter-row building.
//!
//! Visibility is decided before anything here runs. These functions only
//! shape records into rows and ask the renderer for fragments.

use chrono::{DateTime, FixedOffset};

use rdm_domain::{AssignmentRecord, DeviceRecord, InstanceRecord};
use rdm_shared::{AssignmentRow, DeviceRow, InstanceRow, PokemonFilterRow, TimeField};

use crate::infrastructure::ports::{
    FragmentParams, FragmentRenderer, FragmentTemplate, LocalizerPort,
};

/// Label for an assignment that fires when the current job completes.
pub const ON_COMPLETE: &str = "On Complete";

/// `HH:MM:SS`, zero padded. Hours are not wrapped.
pub fn format_hms(seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Scheduled time of day for an assignment.
pub fn format_assignment_time(seconds: u32) -> String {
    if seconds == 0 {
        ON_COMPLETE.to_string()
    } else {
        format_hms(seconds)
    }
}

/// `HH:MM:SS dd.MM.yyyy` in `tz`; empty for a device never seen.
pub fn format_last_seen(epoch_seconds: u32, tz: FixedOffset) -> String {
    if epoch_seconds == 0 {
        return String::new();
    }
    DateTime::from_timestamp(i64::from(epoch_seconds), 0)
        .map(|t| t.with_timezone(&tz).format("%H:%M:%S %d.%m.%Y").to_string())
        .unwrap_or_default()
}

fn escape_key_part(value: &str) -> String {
    value.replace('\\', "\\\\").replace('-', "\\-")
}

/// Key addressing one assignment in a follow-up action.
///
/// Parts are joined with `\-`; a literal `\` or `-` inside a part is
/// backslash-escaped so the key splits back unambiguously.
pub fn assignment_key(assignment: &AssignmentRecord) -> String {
    format!(
        "{}\\-{}\\-{}",
        escape_key_part(&assignment.instance_name),
        escape_key_part(&assignment.device_uuid),
        assignment.time
    )
}

pub struct RowBuilder<'a> {
    pub formatted: bool,
    pub localizer: &'a dyn LocalizerPort,
    pub renderer: &'a dyn FragmentRenderer,
}

impl RowBuilder<'_> {
    pub fn device(&self, device: DeviceRecord) -> DeviceRow {
        let (last_seen, buttons) = if self.formatted {
            let formatted = format_last_seen(device.last_seen, self.localizer.time_zone());
            let buttons = self.renderer.render(
                FragmentTemplate::DeviceAssignButton,
                &FragmentParams::new().with("uuid", device.uuid.as_str()),
            );
            (
                TimeField::Formatted {
                    timestamp: device.last_seen,
                    formatted,
                },
                Some(buttons),
            )
        } else {
            (TimeField::Raw(device.last_seen), None)
        };

        DeviceRow {
            uuid: device.uuid,
            host: device.last_host.unwrap_or_default(),
            instance: device.instance_name.unwrap_or_default(),
            username: device.account_username.unwrap_or_default(),
            last_seen,
            buttons,
        }
    }

    pub fn instance(&self, instance: InstanceRecord) -> InstanceRow {
        let buttons = self.formatted.then(|| {
            self.renderer.render(
                FragmentTemplate::InstanceEditButton,
                &FragmentParams::new().with("name", instance.name.as_str()),
            )
        });

        InstanceRow {
            kind: instance.instance_type.display_name().to_string(),
            name: instance.name,
            status: instance.status,
            buttons,
        }
    }

    pub fn assignment(&self, assignment: AssignmentRecord) -> AssignmentRow {
        let (time, buttons) = if self.formatted {
            let buttons = self.renderer.render(
                FragmentTemplate::AssignmentDeleteButton,
                &FragmentParams::new().with("id", assignment_key(&assignment)),
            );
            (
                TimeField::Formatted {
                    timestamp: assignment.time,
                    formatted: format_assignment_time(assignment.time),
                },
                Some(buttons),
            )
        } else {
            (TimeField::Raw(assignment.time), None)
        };

        AssignmentRow {
            instance_name: assignment.instance_name,
            device_uuid: assignment.device_uuid,
            time,
            buttons,
        }
    }

    /// One row per species id in `1..=max_id`.
    pub fn pokemon_filters(&self, max_id: u16) -> Vec<PokemonFilterRow> {
        let label = |key: &str| self.localizer.get(key);
        let (hide, show) = (label("filter_hide"), label("filter_show"));
        let (small, normal, large, huge) = (
            label("filter_small"),
            label("filter_normal"),
            label("filter_large"),
            label("filter_huge"),
        );

        (1..=max_id)
            .map(|id| {
                let id_str = id.to_string();
                let filter = self.renderer.render(
                    FragmentTemplate::PokemonVisibilityToggle,
                    &FragmentParams::new()
                        .with("id", id_str.as_str())
                        .with("hide", hide.as_str())
                        .with("show", show.as_str()),
                );
                let size = self.renderer.render(
                    FragmentTemplate::PokemonSizeToggle,
                    &FragmentParams::new()
                        .with("id", id_str.as_str())
                        .with("small", small.as_str())
                        .with("normal", normal.as_str())
                        .with("large", large.as_str())
                        .with("huge", huge.as_str()),
                );
                let image = self.renderer.render(
                    FragmentTemplate::PokemonImage,
                    &FragmentParams::new().with("id", id_str.as_str()),
                );

                PokemonFilterRow {
                    pokemon_id: format!("{id:03}"),
                    pokemon_name: label(&format!("poke_{id}")),
                    image,
                    filter,
                    size,
                }
            })
            .collect()
    }
}
