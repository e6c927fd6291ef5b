use std::fmt;

use jiff::civil::{Date, DateTime, Time};

use crate::err::DeserializationResult;
use crate::utils::ByteCursor;

/// A BCD encoded date as written by firmware (`0x2024`, `0x03`, `0x15` is 2024-03-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RtasDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A BCD encoded wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RtasTime {
    pub hour: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub hundredths: u8,
}

fn bcd_u8(v: u8) -> Option<u8> {
    let (hi, lo) = (v >> 4, v & 0x0f);
    if hi > 9 || lo > 9 {
        return None;
    }
    Some(hi * 10 + lo)
}

fn bcd_u16(v: u16) -> Option<u16> {
    let hi = u16::from(bcd_u8((v >> 8) as u8)?);
    let lo = u16::from(bcd_u8(v as u8)?);
    Some(hi * 100 + lo)
}

impl RtasDate {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        Ok(RtasDate {
            year: cursor.u16_named("date.year")?,
            month: cursor.u8_named("date.month")?,
            day: cursor.u8_named("date.day")?,
        })
    }

    /// Decodes the BCD digits, `None` if any digit is not a valid decimal digit or the
    /// result is not a real calendar date.
    pub fn to_civil(&self) -> Option<Date> {
        let year = i16::try_from(bcd_u16(self.year)?).ok()?;
        let month = i8::try_from(bcd_u8(self.month)?).ok()?;
        let day = i8::try_from(bcd_u8(self.day)?).ok()?;
        Date::new(year, month, day).ok()
    }
}

impl RtasTime {
    pub(crate) fn from_cursor(cursor: &mut ByteCursor<'_>) -> DeserializationResult<Self> {
        Ok(RtasTime {
            hour: cursor.u8_named("time.hour")?,
            minutes: cursor.u8_named("time.minutes")?,
            seconds: cursor.u8_named("time.seconds")?,
            hundredths: cursor.u8_named("time.hundredths")?,
        })
    }

    pub fn to_civil(&self) -> Option<Time> {
        let hour = i8::try_from(bcd_u8(self.hour)?).ok()?;
        let minute = i8::try_from(bcd_u8(self.minutes)?).ok()?;
        let second = i8::try_from(bcd_u8(self.seconds)?).ok()?;
        let nanos = i32::from(bcd_u8(self.hundredths)?) * 10_000_000;
        Time::new(hour, minute, second, nanos).ok()
    }
}

/// Combine a BCD date and time into a civil (zone-less) timestamp.
pub fn to_civil_datetime(date: &RtasDate, time: &RtasTime) -> Option<DateTime> {
    Some(DateTime::from_parts(date.to_civil()?, time.to_civil()?))
}

// BCD digits read naturally when printed as hex.
impl fmt::Display for RtasDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}{:02x}{:02x}", self.year, self.month, self.day)
    }
}

impl fmt::Display for RtasTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}",
            self.hour, self.minutes, self.seconds, self.hundredths
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_bcd_timestamp() {
        let date = RtasDate {
            year: 0x2024,
            month: 0x03,
            day: 0x15,
        };
        let time = RtasTime {
            hour: 0x13,
            minutes: 0x45,
            seconds: 0x09,
            hundredths: 0x50,
        };
        let dt = to_civil_datetime(&date, &time).unwrap();
        assert_eq!(dt.to_string(), "2024-03-15T13:45:09.5");
        assert_eq!(date.to_string(), "20240315");
        assert_eq!(time.to_string(), "13450950");
    }

    #[test]
    fn rejects_non_bcd_digits() {
        let date = RtasDate {
            year: 0x20a4,
            month: 0x01,
            day: 0x01,
        };
        assert_eq!(date.to_civil(), None);

        let not_a_day = RtasDate {
            year: 0x2023,
            month: 0x02,
            day: 0x30,
        };
        assert_eq!(not_a_day.to_civil(), None);
    }
}
