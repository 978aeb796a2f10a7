//! Private message types

use std::cmp::Ordering;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::flag;

/// Which side of the conversation the current user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

impl MessageDirection {
    /// Value of the `out` request parameter and response element.
    #[must_use]
    pub const fn as_flag(self) -> u8 {
        match self {
            Self::Incoming => 0,
            Self::Outgoing => 1,
        }
    }
}

/// Private message as returned by `messages.get`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Message {
    #[serde(rename = "mid")]
    pub id: u32,
    #[serde(rename = "uid")]
    pub user_id: u32,
    /// Unix timestamp, seconds.
    #[serde(rename = "date")]
    pub raw_unix_date: u64,
    #[serde(rename = "title")]
    pub subject: String,
    pub body: String,
    #[serde(rename = "read_state")]
    pub raw_read_state: u8,
    #[serde(rename = "out")]
    pub raw_out: u8,
}

impl Message {
    /// Send time in the local timezone.
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Local>> {
        let secs = i64::try_from(self.raw_unix_date).ok()?;
        DateTime::from_timestamp(secs, 0).map(|utc| utc.with_timezone(&Local))
    }

    #[must_use]
    pub const fn is_read(&self) -> bool {
        flag(self.raw_read_state)
    }

    #[must_use]
    pub const fn direction(&self) -> MessageDirection {
        if flag(self.raw_out) {
            MessageDirection::Outgoing
        } else {
            MessageDirection::Incoming
        }
    }

    /// Chronological order by message id.
    #[must_use]
    pub fn cmp_by_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn converts_unix_date() {
        let message = Message { raw_unix_date: 1_300_000_000, ..Message::default() };
        let date = message.date().unwrap().with_timezone(&Utc);
        assert_eq!(date.timestamp(), 1_300_000_000);
    }

    #[test]
    fn direction_and_read_state() {
        let message = Message { raw_out: 1, raw_read_state: 0, ..Message::default() };
        assert_eq!(message.direction(), MessageDirection::Outgoing);
        assert!(!message.is_read());
        assert_eq!(Message::default().direction(), MessageDirection::Incoming);
    }
}
