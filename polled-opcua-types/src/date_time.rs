// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Contains the implementation of `DateTime`.

use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

use chrono::{Duration, SecondsFormat, TimeZone, Timelike, Utc};

use crate::encoding::{
    read_i64, write_i64, BinaryDecodable, BinaryEncodable, DecodingOptions, EncodingResult,
};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_TICK: i64 = 100;
const TICKS_PER_SECOND: i64 = NANOS_PER_SECOND / NANOS_PER_TICK;

const MIN_YEAR: i32 = 1601;
const MAX_YEAR: i32 = 9999;

/// To avoid naming conflict hell, the OPC UA DateTime is typed `DateTime`. The underlying
/// representation is a `chrono::DateTime<Utc>`, but on the wire it is the number of 100 nanosecond
/// intervals since January 1, 1601 (the Windows FILETIME epoch).
#[derive(PartialEq, PartialOrd, Debug, Clone, Copy)]
pub struct DateTime {
    date_time: chrono::DateTime<Utc>,
}

impl DateTime {
    /// Constructs from the current time, truncated to tick precision so values
    /// survive an encoding round trip unchanged.
    pub fn now() -> DateTime {
        DateTime::from(Utc::now())
    }

    /// Constructs from the current time with an offset applied, used to compensate for clock
    /// skew between the client and the server.
    pub fn now_with_offset(offset: Duration) -> DateTime {
        DateTime::from(Utc::now() + offset)
    }

    /// Constructs a null date time, i.e. the epoch.
    pub fn null() -> DateTime {
        DateTime::epoch()
    }

    /// Constructs the epoch, i.e. January 1, 1601.
    pub fn epoch() -> DateTime {
        DateTime {
            date_time: Utc.with_ymd_and_hms(MIN_YEAR, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    /// The maximum representable date time, the end of year 9999.
    pub fn endtimes() -> DateTime {
        DateTime {
            date_time: Utc.with_ymd_and_hms(MAX_YEAR, 12, 31, 23, 59, 59).unwrap(),
        }
    }

    /// Returns `true` if this is the null / epoch date time.
    pub fn is_null(&self) -> bool {
        self.ticks() == 0
    }

    /// Constructs from the number of 100 nanosecond intervals since the epoch. Values outside of
    /// the representable range are clamped.
    pub fn from_ticks(ticks: i64) -> DateTime {
        if ticks <= 0 {
            DateTime::epoch()
        } else if ticks >= DateTime::endtimes().ticks() {
            DateTime::endtimes()
        } else {
            let secs = ticks / TICKS_PER_SECOND;
            let nanos = (ticks % TICKS_PER_SECOND) * NANOS_PER_TICK;
            DateTime {
                date_time: DateTime::epoch().date_time
                    + Duration::seconds(secs)
                    + Duration::nanoseconds(nanos),
            }
        }
    }

    /// The number of 100 nanosecond intervals since the epoch.
    pub fn ticks(&self) -> i64 {
        let delta = self.date_time.signed_duration_since(DateTime::epoch().date_time);
        delta.num_seconds() * TICKS_PER_SECOND
            + i64::from(self.date_time.nanosecond()) / NANOS_PER_TICK
    }

    /// The inner chrono value.
    pub fn as_chrono(&self) -> chrono::DateTime<Utc> {
        self.date_time
    }
}

impl Default for DateTime {
    fn default() -> Self {
        DateTime::null()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date_time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(date_time: chrono::DateTime<Utc>) -> Self {
        // Clamp to the representable range and truncate to tick precision.
        let date_time = DateTime { date_time };
        DateTime::from_ticks(date_time.ticks())
    }
}

impl FromStr for DateTime {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| DateTime::from(dt.with_timezone(&Utc)))
            .map_err(|_| ())
    }
}

impl std::ops::Sub for DateTime {
    type Output = Duration;

    fn sub(self, other: DateTime) -> Duration {
        self.date_time - other.date_time
    }
}

impl BinaryEncodable for DateTime {
    fn byte_len(&self) -> usize {
        8
    }

    fn encode<S: Write + ?Sized>(&self, stream: &mut S) -> EncodingResult<()> {
        write_i64(stream, self.ticks())
    }
}

impl BinaryDecodable for DateTime {
    fn decode<S: Read + ?Sized>(stream: &mut S, _: &DecodingOptions) -> EncodingResult<Self> {
        Ok(DateTime::from_ticks(read_i64(stream)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_epoch() {
        assert!(DateTime::null().is_null());
        assert_eq!(DateTime::null().ticks(), 0);
    }

    #[test]
    fn ticks_round_trip() {
        let now = DateTime::now();
        let again = DateTime::from_ticks(now.ticks());
        assert_eq!(now.ticks(), again.ticks());
    }

    #[test]
    fn clamped() {
        assert_eq!(DateTime::from_ticks(-100).ticks(), 0);
        assert_eq!(DateTime::from_ticks(i64::MAX), DateTime::endtimes());
    }
}
