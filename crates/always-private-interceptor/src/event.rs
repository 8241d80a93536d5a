//! Navigation events
//!
//! Field names follow the browser's request details object so recorded
//! event streams can be replayed as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type TabId = i64;
pub type WindowId = i64;

/// Resource type of an intercepted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    /// Top-level document of a tab
    MainFrame,
    /// Document loaded inside an iframe
    SubFrame,
    /// Any other resource (script, image, xmlhttprequest, ...)
    Other(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            RequestType::MainFrame => "main_frame",
            RequestType::SubFrame => "sub_frame",
            RequestType::Other(kind) => kind,
        }
    }
}

impl From<String> for RequestType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "main_frame" => RequestType::MainFrame,
            "sub_frame" => RequestType::SubFrame,
            _ => RequestType::Other(kind),
        }
    }
}

impl From<RequestType> for String {
    fn from(kind: RequestType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed request, consumed by a single decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    /// Destination URL
    pub url: String,
    /// Owning tab; the browser reports `-1` for requests without one
    #[serde(default)]
    pub tab_id: Option<TabId>,
    /// `0` for the top-level document
    #[serde(default)]
    pub frame_id: i64,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    /// When the browser fired the event, in epoch milliseconds on the wire
    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub time_stamp: DateTime<Utc>,
    /// Set by runtimes that report the private state on the event itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incognito: Option<bool>,
}

impl NavigationEvent {
    /// Top-level navigation of `tab_id` to `url`, stamped now
    pub fn main_frame(url: impl Into<String>, tab_id: Option<TabId>) -> Self {
        Self {
            url: url.into(),
            tab_id,
            frame_id: 0,
            request_type: RequestType::MainFrame,
            time_stamp: Utc::now(),
            incognito: None,
        }
    }

    /// Iframe navigation inside `tab_id`
    pub fn sub_frame(url: impl Into<String>, tab_id: Option<TabId>, frame_id: i64) -> Self {
        Self {
            frame_id,
            request_type: RequestType::SubFrame,
            ..Self::main_frame(url, tab_id)
        }
    }

    pub fn at(mut self, time_stamp: DateTime<Utc>) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    pub fn with_incognito(mut self, incognito: bool) -> Self {
        self.incognito = Some(incognito);
        self
    }

    pub fn is_main_frame(&self) -> bool {
        self.frame_id == 0 && self.request_type == RequestType::MainFrame
    }

    /// Owning tab, if the request belongs to one
    pub fn owning_tab(&self) -> Option<TabId> {
        self.tab_id.filter(|id| *id >= 0)
    }
}
