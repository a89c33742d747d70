//! Client-side row filtering.
//!
//! Filtering never touches row content. It reads the flags cached on each row
//! at render time and flips the row's `display` style.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::fragment::{Document, Element};

pub const SHOWN_STYLE: &str = "display: grid";
pub const HIDDEN_STYLE: &str = "display: none";

/// Attribute carried by the filter buttons.
pub const FILTER_ATTR: &str = "data-filter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortFilter {
    #[default]
    All,
    Active,
    Inactive,
    Connected,
    Errors,
}

impl PortFilter {
    pub const ALL: [PortFilter; 5] = [
        PortFilter::All,
        PortFilter::Active,
        PortFilter::Inactive,
        PortFilter::Connected,
        PortFilter::Errors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PortFilter::All => "all",
            PortFilter::Active => "active",
            PortFilter::Inactive => "inactive",
            PortFilter::Connected => "connected",
            PortFilter::Errors => "errors",
        }
    }

    /// Decides visibility from the row's cached flags.
    pub fn matches(self, row: &Element) -> bool {
        match self {
            PortFilter::All => true,
            PortFilter::Active => row.flag("active"),
            PortFilter::Inactive => !row.flag("active"),
            PortFilter::Connected => row.flag("connected"),
            PortFilter::Errors => row.flag("errors"),
        }
    }
}

impl fmt::Display for PortFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PortFilter::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown filter '{}'", s))
    }
}

/// Shows or hides every row of the document. Returns the visible count.
pub fn apply_filter(doc: &mut Document, filter: PortFilter) -> usize {
    let mut visible = 0;
    doc.for_each_row(|row| {
        let show = filter.matches(row);
        if show {
            visible += 1;
        }
        row.set_attr("style", if show { SHOWN_STYLE } else { HIDDEN_STYLE });
    });
    debug!(filter = %filter, visible, "Filter applied");
    visible
}

/// Moves the `active` class to the button for `filter`.
pub fn mark_active_button(doc: &mut Document, filter: PortFilter) {
    doc.for_each_with_attr(FILTER_ATTR, |button| {
        if button.get(FILTER_ATTR) == Some(filter.as_str()) {
            button.add_class("active");
        } else {
            button.remove_class("active");
        }
    });
}
