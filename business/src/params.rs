//! Query-string style parameter extraction for decoded QR payloads.
//!
//! A payload is either a URL (`https://host/path?a=1&b=2`) or a bare
//! `a=1&b=2` list. Anything else yields an empty [`ParameterMap`].
//!
//! Extraction never fails: segments that cannot be decoded are skipped so a
//! partially structured payload still contributes whatever it can.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

/// Parameter name to raw value, ordered by name.
///
/// Later occurrences of the same key overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap(BTreeMap<String, String>);

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a pair, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter(self.0.iter())
    }
}

/// Iterator over `(key, value)` pairs in key order.
pub struct Iter<'a>(btree_map::Iter<'a, String, String>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a ParameterMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Extracts parameters from a decoded payload.
///
/// - Text containing `?`: everything after the first `?` (minus any
///   `#fragment`) is parsed as a query string.
/// - Otherwise text containing `=` is parsed as a bare `key=value&...` list.
/// - Otherwise the map is empty.
pub fn extract(text: &str) -> ParameterMap {
    let query = if let Some((_, rest)) = text.split_once('?') {
        rest.split_once('#').map_or(rest, |(query, _)| query)
    } else if text.contains('=') {
        text
    } else {
        return ParameterMap::new();
    };

    let mut params = ParameterMap::new();
    for segment in query.split('&') {
        match parse_segment(segment) {
            Some((key, value)) => {
                params.insert(key, value);
            }
            None if !segment.is_empty() => {
                log::trace!(
                    target: "qrstamp_business::params",
                    "skipped_segment segment={segment:?}",
                );
            }
            None => {}
        }
    }
    params
}

fn parse_segment(segment: &str) -> Option<(String, String)> {
    let (raw_key, raw_value) = segment.split_once('=')?;
    let key = decode_component(raw_key)?;
    if key.is_empty() {
        return None;
    }
    let value = decode_component(raw_value)?;
    Some((key, value))
}

/// Form-style component decoding: `+` is a space, `%XX` is a byte.
fn decode_component(raw: &str) -> Option<String> {
    if !has_valid_escapes(raw) {
        return None;
    }
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let is_escape = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !is_escape {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
