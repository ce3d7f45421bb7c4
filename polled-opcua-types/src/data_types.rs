// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Certain aliases for OPC-UA data types.

use crate::{date_time::DateTime, string::UAString};

/// This primitive data type is a UInt32 that is used as an identifier, such as a handle.
/// All values, except for 0, are valid.
pub type IntegerId = u32;

/// This Simple DataType is a Double that defines an interval of time in milliseconds (fractions
/// can be used to define sub-millisecond values). Negative values are generally invalid but may
/// have special meanings where the Duration is used.
pub type Duration = f64;

/// A DateTime value in UTC.
pub type UtcTime = DateTime;

/// OPC-UA UriString, represented as just a string.
pub type UriString = UAString;

/// OPC-UA LocaleId.
pub type LocaleId = UAString;

/// OPC-UA Counter, alias for u32.
pub type Counter = u32;
