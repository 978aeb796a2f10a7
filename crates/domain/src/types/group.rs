//! Community (group) types

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::flag;

/// Community as returned by `getGroupsFull`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Group {
    #[serde(rename = "gid")]
    pub id: u32,
    pub name: String,
    #[serde(rename = "photo")]
    pub picture_url: String,
    #[serde(rename = "is_closed")]
    pub raw_is_closed: u8,
}

impl Group {
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        flag(self.raw_is_closed)
    }

    #[must_use]
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
