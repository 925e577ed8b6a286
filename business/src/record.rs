//! One analyzed QR image.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::create_time::{ParsedTime, interpret_params_in};
use crate::params::{ParameterMap, extract};

/// The decoded result of a single input image.
///
/// Records are built once and never mutated; a failed decode is still a
/// record, carrying `error` and an empty parameter map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    params: ParameterMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<ParsedTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Record {
    /// Builds a record from decoded text, interpreting `createTime` in the
    /// local time zone.
    pub fn decoded(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::decoded_in(source, text, &Local)
    }

    pub fn decoded_in<Tz>(source: impl Into<String>, text: impl Into<String>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let text = text.into();
        let params = extract(&text);
        let time = interpret_params_in(&params, tz);
        Self {
            source: source.into(),
            text: Some(text),
            params,
            time,
            error: None,
        }
    }

    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: None,
            params: ParameterMap::new(),
            time: None,
            error: Some(error.into()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn params(&self) -> &ParameterMap {
        &self.params
    }

    pub fn time(&self) -> Option<&ParsedTime> {
        self.time.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_decoded(&self) -> bool {
        self.error.is_none()
    }

    /// Epoch milliseconds of a valid `createTime`.
    pub fn instant(&self) -> Option<i64> {
        self.time.as_ref().and_then(ParsedTime::instant)
    }
}
