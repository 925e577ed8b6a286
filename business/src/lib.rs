//! Core engine for reading QR payload parameters.
//!
//! - [`params`]: query-string style parameter extraction
//! - [`create_time`]: interpretation of the `createTime` parameter
//! - [`time_bump`]: hour bump of an embedded `createTime=` field
//! - [`record`]: the result of analyzing one image
//! - [`comparison`]: parameter and time comparison across records
//!
//! Everything here is pure and synchronous; image decoding and encoding live
//! in `qrstamp-input`.

pub mod comparison;
pub mod create_time;
pub mod params;
pub mod record;
pub mod time_bump;

pub use comparison::{
    ComparisonReport, ComparisonRow, DeltaDisplay, ReportStatus, TimeDelta, build_comparison,
    time_deltas,
};
pub use create_time::{
    CREATE_TIME_KEY, ParsedTime, TimeParseError, interpret_params, interpret_params_in,
    interpret_time, interpret_time_in,
};
pub use params::{ParameterMap, extract};
pub use record::Record;
pub use time_bump::{
    BumpOutcome, CreateTimeField, CreateTimeScan, bump_create_time_hour, scan_create_time,
};
