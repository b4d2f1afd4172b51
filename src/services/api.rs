//! Wire types for the HTTP telemetry API.

use serde::{Deserialize, Serialize};

use crate::gearbox::GearboxState;

/// Telemetry returned by `/step` and `/reset`.
///
/// The wire body is always `{"speed":<%.4f>,"gear":<1..5>}`; speed carries
/// exactly four decimal places, so serialization goes through
/// [`to_wire_json`](TelemetryResponse::to_wire_json) rather than
/// `serde_json::to_string` (which would collapse `0.0000` to `0.0`). The
/// serde derives are kept for typed consumption on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryResponse {
    /// Current speed in km/h
    pub speed: f64,
    /// Current gear (1 to 5)
    pub gear: u8,
}

impl TelemetryResponse {
    /// Render the fixed wire shape with four-decimal speed.
    pub fn to_wire_json(&self) -> String {
        format!("{{\"speed\":{:.4},\"gear\":{}}}", self.speed, self.gear)
    }
}

impl From<GearboxState> for TelemetryResponse {
    fn from(state: GearboxState) -> Self {
        Self {
            speed: state.speed,
            gear: state.gear,
        }
    }
}
