use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ─── Segmentation ───────────────────────────────────────────────────────────

/// Customer attribute a segmentation rule can constrain.
///
/// Declaration order is the evaluation order used when validating a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Spend,
    Visits,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Spend, Dimension::Visits];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Spend => "spend",
            Dimension::Visits => "visits",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Spend => "Spend",
            Dimension::Visits => "Visits",
        }
    }

    /// Sample rules shown to the operator when their input is rejected.
    pub fn example(&self) -> &'static str {
        match self {
            Dimension::Spend => ">1000, <500, =100",
            Dimension::Visits => ">5, <10, =3",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOperator {
    GreaterThan,
    LessThan,
    Equals,
}

impl RuleOperator {
    pub fn symbol(&self) -> char {
        match self {
            RuleOperator::GreaterThan => '>',
            RuleOperator::LessThan => '<',
            RuleOperator::Equals => '=',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '>' => Some(RuleOperator::GreaterThan),
            '<' => Some(RuleOperator::LessThan),
            '=' => Some(RuleOperator::Equals),
            _ => None,
        }
    }
}

/// A single comparison constraint, e.g. `>1000`.
///
/// Serialized in its textual form, which is what the campaign service expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub operator: RuleOperator,
    pub magnitude: f64,
}

impl Rule {
    pub fn new(operator: RuleOperator, magnitude: f64) -> Self {
        Self {
            operator,
            magnitude,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.magnitude)
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Validated rules keyed by dimension. A missing key means "no constraint".
pub type SegmentRuleSet = BTreeMap<Dimension, Rule>;

/// Required text inputs, used to report which one was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Message,
    Username,
    Password,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Campaign title",
            Field::Message => "Campaign message",
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }
}

// ─── Campaign ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CampaignStatus {
    #[default]
    Pending,
    Running,
    Completed,
    /// Any other status string, kept as sent.
    Unknown(String),
}

impl CampaignStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "pending" => CampaignStatus::Pending,
            "running" => CampaignStatus::Running,
            "completed" => CampaignStatus::Completed,
            other => CampaignStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::Running => "running",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Unknown(raw) => raw,
        }
    }

    /// Display form: the wire string with its first letter capitalized.
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Serialize for CampaignStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CampaignStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CampaignStatus::from_wire(&raw))
    }
}

/// A campaign as reported by the campaign service.
///
/// The service is authoritative for every field; counters that are absent or
/// `null` on the wire read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Empty when the service omits it.
    #[serde(
        rename = "_id",
        alias = "id",
        alias = "campaignId",
        default,
        deserialize_with = "null_as_default"
    )]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Message template; may contain a `[name]` placeholder.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_variants: Vec<String>,
    /// Rules as stored by the service. Not interpreted client-side.
    #[serde(default)]
    pub segment_rules: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CampaignStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience_size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sent_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_count: u64,
    /// `None` when absent or not a recognizable timestamp.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /createcampaign`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCreateRequest {
    pub title: String,
    pub message: String,
    pub segment_rules: SegmentRuleSet,
    pub message_variants: Vec<String>,
}

/// Response of `POST /createcampaign`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignReceipt {
    #[serde(default, alias = "_id")]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub audience_size: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response of `GET /campaigns/{id}/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    #[serde(default, alias = "_id")]
    pub campaign_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience_size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sent_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_count: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `PUT /campaigns/delivery`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryUpdate {
    pub campaign_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<u64>,
}

// ─── Auth ───────────────────────────────────────────────────────────────────

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Error body returned by the service on a rejected login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339, a bare date, a date-time without offset (read as UTC)
/// or epoch milliseconds. Anything else reads as `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => parse_timestamp(text.trim()),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|ms| ms as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}
