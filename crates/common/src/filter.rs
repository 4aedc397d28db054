use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Column a listing may be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Name,
    Mime,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Name => "name",
            FilterKey::Mime => "mime",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FilterKey::Name),
            "mime" => Ok(FilterKey::Mime),
            other => Err(FilterError::InvalidKey(other.to_string())),
        }
    }
}

/// Listing request as it arrives from a caller, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub token: String,
    pub login: String,
    pub key: String,
    pub value: String,
    pub limit: i64,
}

/// A validated listing filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFilter {
    pub key: FilterKey,
    pub value: String,
    pub limit: u32,
}

impl TryFrom<&ListRequest> for DocumentFilter {
    type Error = FilterError;

    fn try_from(req: &ListRequest) -> Result<Self, Self::Error> {
        if req.limit < 1 {
            return Err(FilterError::InvalidLimit);
        }
        let key = req.key.parse()?;
        if req.value.is_empty() {
            return Err(FilterError::EmptyValue);
        }

        Ok(Self {
            key,
            value: req.value.clone(),
            limit: u32::try_from(req.limit).unwrap_or(u32::MAX),
        })
    }
}

/// The query handed to the store: documents matching the filter, owned by
/// `user_id`, or granted to `login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub user_id: Uuid,
    pub login: String,
    pub key: FilterKey,
    pub value: String,
    pub limit: u32,
}

impl DocumentQuery {
    pub fn new(user_id: Uuid, login: impl Into<String>, filter: DocumentFilter) -> Self {
        Self {
            user_id,
            login: login.into(),
            key: filter.key,
            value: filter.value,
            limit: filter.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("the limit must be greater than 0")]
    InvalidLimit,
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("empty value")]
    EmptyValue,
}
