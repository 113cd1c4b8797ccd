//! Register value formats.
//!
//! The controller stores every quantity in a single 16 bit holding register. Process values and
//! setpoints carry one implied decimal place and are two's complement signed, everything else is
//! a plain unsigned integer.

/// How the raw register value maps onto a real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFormat {
    /// Number of implied decimal places, e.g. `1` means raw `253` => `25.3`.
    pub decimals: u8,
    /// Whether the raw value is a two's complement `i16`.
    pub signed: bool,
}

impl RegisterFormat {
    /// Plain unsigned integer register.
    pub const RAW: Self = Self::new(0, false);
    /// Signed register with one decimal place. Used for temperatures and humidities.
    pub const TENTHS_SIGNED: Self = Self::new(1, true);

    pub const fn new(decimals: u8, signed: bool) -> Self {
        Self { decimals, signed }
    }

    #[inline]
    fn divisor(&self) -> f32 {
        10f32.powi(self.decimals as i32)
    }

    /// Convert a raw register value to its real value.
    pub fn decode(&self, raw: u16) -> f32 {
        let integer = if self.signed {
            raw as i16 as f32
        } else {
            raw as f32
        };
        integer / self.divisor()
    }

    /// Convert a real value to the raw register value, rounding to the nearest step.
    ///
    /// Returns `None` if the value can't be represented in this format.
    pub fn encode(&self, value: f32) -> Option<u16> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * self.divisor()).round();
        if self.signed {
            if scaled < i16::MIN as f32 || scaled > i16::MAX as f32 {
                return None;
            }
            Some(scaled as i16 as u16)
        } else {
            if scaled < 0.0 || scaled > u16::MAX as f32 {
                return None;
            }
            Some(scaled as u16)
        }
    }
}
