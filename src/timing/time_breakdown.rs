use serde::{Deserialize, Serialize};

const MS_PER_SECOND_TENTH: u64 = 100;
const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_DAY: u64 = 86_400_000;

/// The elapsed time of a timer, decomposed into tenths of a second, seconds,
/// minutes, hours and days.
///
/// The fields are stored least significant first. Each one is the remainder
/// left in its unit once the more significant units have been divided out,
/// not an independently incrementing counter, so [`total_ms`] reconstructs
/// the elapsed duration truncated to whole tenths. Days are the top unit and
/// unbounded.
///
/// [`total_ms`]: TimeBreakdown::total_ms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeBreakdown {
    fields: [u64; 5],
}

impl TimeBreakdown {
    /// A breakdown with every field at zero.
    pub const ZERO: Self = Self { fields: [0; 5] };

    /// Builds a breakdown directly from its five fields, least significant
    /// unit first.
    pub const fn new(second_tenths: u64, seconds: u64, minutes: u64, hours: u64, days: u64) -> Self {
        Self {
            fields: [second_tenths, seconds, minutes, hours, days],
        }
    }

    /// Decomposes an elapsed duration in milliseconds. The most significant
    /// unit is divided out of the full value first, every later field out of
    /// the remainder of the previous division.
    pub fn from_elapsed_ms(elapsed_ms: u64) -> Self {
        Self {
            fields: [
                elapsed_ms % MS_PER_SECOND / MS_PER_SECOND_TENTH,
                elapsed_ms % MS_PER_MINUTE / MS_PER_SECOND,
                elapsed_ms % MS_PER_HOUR / MS_PER_MINUTE,
                elapsed_ms % MS_PER_DAY / MS_PER_HOUR,
                elapsed_ms / MS_PER_DAY,
            ],
        }
    }

    /// The total amount of milliseconds the breakdown represents.
    pub const fn total_ms(&self) -> u64 {
        self.fields[0] * MS_PER_SECOND_TENTH
            + self.fields[1] * MS_PER_SECOND
            + self.fields[2] * MS_PER_MINUTE
            + self.fields[3] * MS_PER_HOUR
            + self.fields[4] * MS_PER_DAY
    }

    /// The tenths of a second left over below a full second.
    pub const fn second_tenths(&self) -> u64 {
        self.fields[0]
    }

    /// The seconds left over below a full minute.
    pub const fn seconds(&self) -> u64 {
        self.fields[1]
    }

    /// The minutes left over below a full hour.
    pub const fn minutes(&self) -> u64 {
        self.fields[2]
    }

    /// The hours left over below a full day.
    pub const fn hours(&self) -> u64 {
        self.fields[3]
    }

    /// The full days.
    pub const fn days(&self) -> u64 {
        self.fields[4]
    }

    /// The five fields in storage order, least significant unit first.
    pub const fn as_fields(&self) -> &[u64; 5] {
        &self.fields
    }

    /// The five fields joined with `separator`, most significant unit first.
    pub fn to_joined(&self, separator: char) -> String {
        let mut text = String::new();
        for (i, field) in self.fields.iter().rev().enumerate() {
            if i != 0 {
                text.push(separator);
            }
            text.push_str(&field.to_string());
        }
        text
    }

    /// A unit-named listing of the seconds, minutes, hours and days fields,
    /// least significant unit first. Tenths are left out.
    pub fn to_pretty(&self) -> String {
        format!(
            "{} seconds, {} minutes, {} hours, {} days",
            self.fields[1], self.fields[2], self.fields[3], self.fields[4],
        )
    }
}
