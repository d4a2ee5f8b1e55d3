use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ApiError;

/// Commission applied when a creation request does not carry one.
pub const DEFAULT_COMMISSION_RATE: &str = "30.00";

// ============ Database Models ============

/// An affiliate influencer as stored in the `influencers` table.
///
/// Earnings, balances and engagement counters are maintained outside this
/// service; they are only ever read here.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Influencer {
    /// Unique identifier generated by storage.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email, unique across influencers.
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    /// Code that referred signups and purchases are attributed to. Unique.
    pub affiliate_code: String,
    /// Commission percentage.
    #[serde(with = "decimal_number")]
    pub commission_rate: BigDecimal,
    #[serde(with = "decimal_number")]
    pub total_earnings: BigDecimal,
    #[serde(with = "decimal_number")]
    pub remaining_balance: BigDecimal,
    pub total_clicks: i32,
    pub total_signups: i32,
    pub total_purchases: i32,
    /// Precomputed conversion percentage.
    #[serde(with = "decimal_number")]
    pub conversion_rate: BigDecimal,
    /// One of `active`, `inactive`, `suspended`, or unset.
    pub status: Option<String>,
    /// Whether the influencer is based in India.
    pub is_india: bool,
    pub created_at: DateTime<Utc>,
}

/// Known influencer lifecycle states.
///
/// The column itself is free text; rows carrying any other value are still
/// listed and rendered with the neutral badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfluencerStatus {
    Active,
    Inactive,
    Suspended,
}

impl InfluencerStatus {
    pub const ALL: [InfluencerStatus; 3] = [
        InfluencerStatus::Active,
        InfluencerStatus::Inactive,
        InfluencerStatus::Suspended,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Suspended => "Suspended",
        }
    }

    /// CSS class of the status badge for a raw status value.
    pub fn badge_class(status: Option<&str>) -> &'static str {
        match status.and_then(Self::parse) {
            Some(Self::Active) => "badge badge-green",
            Some(Self::Inactive) => "badge badge-yellow",
            Some(Self::Suspended) => "badge badge-red",
            None => "badge badge-gray",
        }
    }
}

/// A validated row ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInfluencer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub affiliate_code: String,
    pub commission_rate: BigDecimal,
    pub is_india: bool,
}

// ============ API Request/Response Models ============

/// Body of `POST /api/influencers`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateInfluencerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub affiliate_code: Option<String>,
    pub commission_rate: Option<f64>,
    pub is_india: Option<bool>,
}

impl CreateInfluencerRequest {
    /// Checks the required fields and fills in defaults.
    ///
    /// `name`, `email` and `affiliate_code` must be present and non-empty.
    pub fn validate(self) -> Result<NewInfluencer, ApiError> {
        let (Some(name), Some(email), Some(affiliate_code)) = (
            non_empty(self.name),
            non_empty(self.email),
            non_empty(self.affiliate_code),
        ) else {
            return Err(ApiError::Validation(
                "Name, email, and affiliate code are required".to_string(),
            ));
        };

        let commission_rate = match self.commission_rate {
            Some(rate) => BigDecimal::from_str(&rate.to_string())
                .map_err(|e| ApiError::Internal(format!("Invalid commission rate: {}", e)))?,
            None => default_commission_rate(),
        };

        Ok(NewInfluencer {
            name,
            email,
            phone: self.phone,
            bio: self.bio,
            affiliate_code,
            commission_rate,
            is_india: self.is_india.unwrap_or(false),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn default_commission_rate() -> BigDecimal {
    BigDecimal::from_str(DEFAULT_COMMISSION_RATE).unwrap_or_else(|_| BigDecimal::from(30))
}

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Uniform `{status, data, count?, message}` wrapper of the collection endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
            count: None,
            message: message.into(),
        }
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Serializes `BigDecimal` as a JSON number, the way the hosted database's
/// REST layer exposes `numeric` columns.
pub mod decimal_number {
    use bigdecimal::{BigDecimal, ToPrimitive};
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number = value
            .to_f64()
            .ok_or_else(|| ser::Error::custom(format!("decimal {} out of range", value)))?;
        serializer.serialize_f64(number)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;
        BigDecimal::from_str(&number.to_string()).map_err(de::Error::custom)
    }
}
