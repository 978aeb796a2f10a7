//! User, friend and group methods
//!
//! Thin wrappers that format parameters and pick the response shape. Methods
//! taking `uid: Option<u32>` fall back to the session user when `None`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use tracing::debug;
use vknet_domain::{Group, GroupListResponse, ListDocument, User, UserListResponse};
use vknet_infra::{
    ApiClient, ApiError, ApiRequest, IntegerList, ListWrapper, RawDocument, SingleObject,
};

/// Set of optional profile fields to request
///
/// [`UserFields::DEFAULT`] overrides everything else and requests only the
/// names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UserFields(u32);

impl UserFields {
    pub const NONE: Self = Self(0);
    /// `first_name,last_name`
    pub const DEFAULT: Self = Self(1);
    pub const NICKNAME: Self = Self(1 << 1);
    pub const SEX: Self = Self(1 << 2);
    pub const ONLINE_STATUS: Self = Self(1 << 3);
    pub const BIRTH_DATE: Self = Self(1 << 4);
    pub const CITY: Self = Self(1 << 5);
    pub const COUNTRY: Self = Self(1 << 6);
    pub const PHOTO: Self = Self(1 << 7);
    pub const PHOTO_MEDIUM: Self = Self(1 << 8);
    pub const PHOTO_MEDIUM_REC: Self = Self(1 << 9);
    pub const PHOTO_BIG: Self = Self(1 << 10);
    pub const PHOTO_REC: Self = Self(1 << 11);
    pub const LISTS: Self = Self(1 << 12);
    pub const DOMAIN: Self = Self(1 << 13);
    pub const HAS_MOBILE: Self = Self(1 << 14);
    pub const RATE: Self = Self(1 << 15);
    pub const CONTACTS: Self = Self(1 << 16);
    pub const EDUCATION: Self = Self(1 << 17);
    pub const CAN_POST: Self = Self(1 << 18);
    pub const CAN_WRITE_MESSAGES: Self = Self(1 << 19);
    pub const COUNTERS: Self = Self(1 << 20);
    /// Every optional field; excludes [`UserFields::DEFAULT`].
    pub const ALL: Self = Self(((1 << 21) - 1) & !1);

    // Wire order of the `fields` parameter.
    const WIRE_NAMES: [(Self, &'static str); 20] = [
        (Self::BIRTH_DATE, "bdate"),
        (Self::CAN_POST, "can_post"),
        (Self::CAN_WRITE_MESSAGES, "can_write_private_message"),
        (Self::CITY, "city"),
        (Self::CONTACTS, "contacts"),
        (Self::COUNTERS, "counters"),
        (Self::COUNTRY, "country"),
        (Self::DOMAIN, "domain"),
        (Self::EDUCATION, "education"),
        (Self::HAS_MOBILE, "has_mobile"),
        (Self::LISTS, "lists"),
        (Self::NICKNAME, "nickname"),
        (Self::ONLINE_STATUS, "online"),
        (Self::PHOTO, "photo"),
        (Self::PHOTO_BIG, "photo_big"),
        (Self::PHOTO_MEDIUM, "photo_medium"),
        (Self::PHOTO_MEDIUM_REC, "photo_medium_rec"),
        (Self::PHOTO_REC, "photo_rec"),
        (Self::RATE, "rate"),
        (Self::SEX, "sex"),
    ];

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Comma-separated value of the `fields` parameter.
    #[must_use]
    pub fn to_param(self) -> String {
        if self.contains(Self::DEFAULT) {
            return "first_name,last_name".to_string();
        }

        Self::WIRE_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl BitOr for UserFields {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for UserFields {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for UserFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserFields({})", self.to_param())
    }
}

/// User API wrapper
#[derive(Clone)]
pub struct UserCommands {
    client: Arc<ApiClient>,
}

impl UserCommands {
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Profile of the session user.
    ///
    /// # Errors
    /// Any [`ApiError`] from session acquisition or the call.
    pub fn current(&self, fields: UserFields) -> Result<User, ApiError> {
        let uid = self.client.user_id()?;
        self.get(uid, fields)
    }

    /// Profile of `user_id` (`getProfiles`).
    ///
    /// # Errors
    /// Any [`ApiError`] from the call.
    pub fn get(&self, user_id: u32, fields: UserFields) -> Result<User, ApiError> {
        let request = ApiRequest::new("getProfiles")
            .with_param("uids", user_id)
            .with_param("fields", fields.to_param());
        self.client.call::<SingleObject<User>>(&request)
    }

    /// Profiles of several users in one call.
    ///
    /// # Errors
    /// [`ApiError::InvalidArgument`] for an empty id list, otherwise any
    /// [`ApiError`] from the call.
    pub fn get_many(&self, user_ids: &[u32], fields: UserFields) -> Result<Vec<User>, ApiError> {
        if user_ids.is_empty() {
            return Err(ApiError::InvalidArgument("at least one user id is required".to_string()));
        }

        let request = ApiRequest::new("getProfiles")
            .with_param("uids", join_ids(user_ids))
            .with_param("fields", fields.to_param());
        Ok(self.client.call::<ListWrapper<UserListResponse>>(&request)?.into_items())
    }

    /// Whether `user_id` has installed the application (`isAppUser`).
    ///
    /// # Errors
    /// Any [`ApiError`] from the call.
    pub fn is_app_user(&self, user_id: u32) -> Result<bool, ApiError> {
        let request = ApiRequest::new("isAppUser").with_param("uid", user_id);
        let document = self.client.call::<RawDocument>(&request)?;
        Ok(document.root().text().trim() == "1")
    }

    /// Application balance of the session user, in votes.
    ///
    /// The API reports hundredths of a vote.
    ///
    /// # Errors
    /// [`ApiError::Decode`] when `<balance>` is missing or not an integer.
    pub fn balance(&self) -> Result<f64, ApiError> {
        let document = self.client.call::<RawDocument>(&ApiRequest::new("getUserBalance"))?;
        let raw = document
            .root()
            .child("balance")
            .ok_or_else(|| ApiError::Decode("response has no <balance> element".to_string()))?
            .text()
            .trim();

        let hundredths: i32 = raw
            .parse()
            .map_err(|e| ApiError::Decode(format!("invalid balance {raw:?}: {e}")))?;
        Ok(f64::from(hundredths) / 100.0)
    }

    /// Permission bitmask granted to the application, as sent by the API.
    ///
    /// # Errors
    /// [`ApiError::Decode`] when `<settings>` is missing.
    pub fn settings(&self) -> Result<String, ApiError> {
        let document = self.client.call::<RawDocument>(&ApiRequest::new("getUserSettings"))?;
        document
            .root()
            .child("settings")
            .map(|settings| settings.text().trim().to_string())
            .ok_or_else(|| ApiError::Decode("response has no <settings> element".to_string()))
    }

    /// # Errors
    /// Any [`ApiError`] from the call.
    pub fn group_ids(&self) -> Result<Vec<i64>, ApiError> {
        self.client.call::<IntegerList>(&ApiRequest::new("getGroups"))
    }

    /// # Errors
    /// Any [`ApiError`] from the call.
    pub fn groups(&self) -> Result<Vec<Group>, ApiError> {
        let request = ApiRequest::new("getGroupsFull");
        Ok(self.client.call::<ListWrapper<GroupListResponse>>(&request)?.into_items())
    }

    /// # Errors
    /// Any [`ApiError`] from session acquisition or the call.
    pub fn friend_ids(&self, uid: Option<u32>) -> Result<Vec<i64>, ApiError> {
        let request = ApiRequest::new("friends.get").with_param("uid", self.resolve(uid)?);
        self.client.call::<IntegerList>(&request)
    }

    /// # Errors
    /// Any [`ApiError`] from session acquisition or the call.
    pub fn friends(&self, uid: Option<u32>, fields: UserFields) -> Result<Vec<User>, ApiError> {
        let request = ApiRequest::new("friends.get")
            .with_param("uid", self.resolve(uid)?)
            .with_param("fields", fields.to_param());
        Ok(self.client.call::<ListWrapper<UserListResponse>>(&request)?.into_items())
    }

    /// # Errors
    /// Any [`ApiError`] from session acquisition or the call.
    pub fn online_friend_ids(&self, uid: Option<u32>) -> Result<Vec<i64>, ApiError> {
        let request = ApiRequest::new("friends.getOnline").with_param("uid", self.resolve(uid)?);
        self.client.call::<IntegerList>(&request)
    }

    fn resolve(&self, uid: Option<u32>) -> Result<u32, ApiError> {
        match uid {
            Some(uid) => Ok(uid),
            None => {
                let uid = self.client.user_id()?;
                debug!(uid, "Defaulting to session user");
                Ok(uid)
            }
        }
    }
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}
