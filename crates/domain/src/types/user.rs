//! User profile types
//!
//! Profiles as returned by `getProfiles` and `friends.get`.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::flag;

/// Gender as reported by the profile `sex` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    #[default]
    Unknown,
    Female,
    Male,
}

impl From<u8> for Sex {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Female,
            2 => Self::Male,
            _ => Self::Unknown,
        }
    }
}

/// Per-profile content counters (`fields=counters`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Counters {
    pub albums: i32,
    pub videos: i32,
    pub audios: i32,
    pub notes: i32,
    pub friends: i32,
    pub online_friends: i32,
    pub user_videos: i32,
    pub user_photos: i32,
    pub followers: i32,
    pub subscriptions: i32,
}

/// User profile
///
/// Only `uid`, `first_name` and `last_name` are always present; the rest
/// depends on the requested fields. A profile without `uid` does not decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "uid")]
    pub id: u32,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
    /// Short address (`domain` element).
    #[serde(rename = "domain", default)]
    pub short_url: String,
    #[serde(rename = "sex", default)]
    pub raw_sex: u8,
    #[serde(rename = "online", default)]
    pub raw_online: u8,
    /// Birth date as `d.m` or `d.m.yyyy`.
    #[serde(rename = "bdate", default)]
    pub raw_birth_date: String,
    #[serde(rename = "city", default)]
    pub city_id: i32,
    #[serde(rename = "country", default)]
    pub country_id: i32,
    /// UTC offset in hours; may be fractional.
    #[serde(default)]
    pub timezone: String,
    #[serde(rename = "photo", default)]
    pub photo_50_url: String,
    #[serde(rename = "photo_medium", default)]
    pub photo_100_url: String,
    #[serde(rename = "photo_medium_rec", default)]
    pub photo_100x100_url: String,
    #[serde(rename = "photo_big", default)]
    pub photo_200_url: String,
    #[serde(rename = "photo_rec", default)]
    pub photo_50x50_url: String,
    #[serde(default)]
    pub rate: String,
    #[serde(default)]
    pub home_phone: String,
    #[serde(rename = "has_mobile", default)]
    pub raw_has_mobile: u8,
    #[serde(default)]
    pub mobile_phone: String,
    #[serde(rename = "university", default)]
    pub university_id: i32,
    #[serde(default)]
    pub university_name: String,
    #[serde(rename = "faculty", default)]
    pub faculty_id: i32,
    #[serde(default)]
    pub faculty_name: String,
    #[serde(rename = "graduation", default)]
    pub graduation_year: i32,
    #[serde(rename = "can_post", default)]
    pub raw_can_post: u8,
    #[serde(rename = "can_write_private_message", default)]
    pub raw_can_write_messages: u8,
    #[serde(default)]
    pub counters: Option<Counters>,
}

impl User {
    #[must_use]
    pub fn sex(&self) -> Sex {
        Sex::from(self.raw_sex)
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        flag(self.raw_online)
    }

    #[must_use]
    pub const fn has_mobile(&self) -> bool {
        flag(self.raw_has_mobile)
    }

    #[must_use]
    pub const fn can_post(&self) -> bool {
        flag(self.raw_can_post)
    }

    #[must_use]
    pub const fn can_write_messages(&self) -> bool {
        flag(self.raw_can_write_messages)
    }

    /// Parse `bdate`.
    ///
    /// Returns `None` when the date is hidden or malformed. A date without a
    /// year (`d.m`) is placed in 1900.
    #[must_use]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let parts: Vec<&str> = self.raw_birth_date.split('.').collect();
        if parts.len() < 2 {
            return None;
        }

        let day = parts[0].trim().parse().ok()?;
        let month = parts[1].trim().parse().ok()?;
        let year = match parts.get(2) {
            Some(year) => year.trim().parse().ok()?,
            None => 1900,
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Alphabetical order by full name.
    #[must_use]
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.full_name().cmp(&other.full_name())
    }
}
