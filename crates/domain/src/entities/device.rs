use serde::{Deserialize, Serialize};

/// A scanning device in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub uuid: String,
    /// Job (instance) the device is currently assigned to.
    pub instance_name: Option<String>,
    pub last_host: Option<String>,
    /// Epoch seconds; 0 when the device has never checked in.
    pub last_seen: u32,
    pub account_username: Option<String>,
}
