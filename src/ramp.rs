//! Ramp time estimation for the MCB-1.2 chamber.
//!
//! The chamber temperature follows an exponential curve while heating or cooling. Both curves were
//! fitted to measurements with an empty chamber, time in minutes:
//!
//! * cooling: `t(T) = -10.0 * ln((T + 33.1) / 196.8)`
//! * heating: `t(T) = -40.6 * ln((T - 292.3) / -321.4)`
//!
//! The estimate is the time between the start and target temperatures on the matching curve, with
//! a 20% margin and half a minute for settling on top.

use fugit::MillisDurationU32;

const COOLING_TAU_MIN: f32 = 10.0;
/// Temperature the cooling curve approaches but never reaches.
const COOLING_FLOOR_C: f32 = -33.1;
const COOLING_SCALE_C: f32 = 196.8;

const HEATING_TAU_MIN: f32 = 40.6;
/// Temperature the heating curve approaches but never reaches.
const HEATING_CEILING_C: f32 = 292.3;
const HEATING_SCALE_C: f32 = -321.4;

const MARGIN: f32 = 1.2;
const SETTLING_MIN: f32 = 0.5;

/// Which fitted curve an estimate was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampDirection {
    Heating,
    Cooling,
}

impl RampDirection {
    /// Cooling if the target is below the start, heating otherwise.
    pub fn between(start_c: f32, target_c: f32) -> Self {
        if start_c > target_c {
            RampDirection::Cooling
        } else {
            RampDirection::Heating
        }
    }

    /// Minutes into the fitted curve at which `temperature_c` is reached.
    fn curve_minutes(&self, temperature_c: f32) -> f32 {
        match self {
            RampDirection::Cooling => {
                -COOLING_TAU_MIN * ((temperature_c - COOLING_FLOOR_C) / COOLING_SCALE_C).ln()
            }
            RampDirection::Heating => {
                -HEATING_TAU_MIN * ((temperature_c - HEATING_CEILING_C) / HEATING_SCALE_C).ln()
            }
        }
    }
}

/// Expected time for the chamber to get from one temperature to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampEstimate {
    direction: RampDirection,
    seconds: f32,
}

impl RampEstimate {
    pub fn direction(&self) -> RampDirection {
        self.direction
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    /// The estimate rounded up to whole milliseconds.
    pub fn duration(&self) -> MillisDurationU32 {
        MillisDurationU32::millis((self.seconds * 1000.0).ceil() as u32)
    }
}

/// Estimate how long the chamber needs to ramp from `start_c` to `target_c` (°C).
///
/// Returns `None` if a temperature lies outside the fitted curve, i.e. at or below -33.1 °C when
/// cooling or at or above 292.3 °C when heating.
pub fn estimate_ramp_time(start_c: f32, target_c: f32) -> Option<RampEstimate> {
    let direction = RampDirection::between(start_c, target_c);
    let base_minutes = direction.curve_minutes(target_c) - direction.curve_minutes(start_c);
    // Both curves are monotonic, so the base is never negative inside their domain.
    let seconds = (base_minutes * MARGIN + SETTLING_MIN) * 60.0;
    if !seconds.is_finite() {
        return None;
    }
    Some(RampEstimate { direction, seconds })
}
