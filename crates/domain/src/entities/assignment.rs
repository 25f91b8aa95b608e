use serde::{Deserialize, Serialize};

/// A scheduled switch of a device to an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub instance_name: String,
    pub device_uuid: String,
    /// Seconds after midnight; 0 means "when the current job completes".
    pub time: u32,
}

impl AssignmentRecord {
    pub fn runs_on_complete(&self) -> bool {
        self.time == 0
    }
}
