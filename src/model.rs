//! Wire models for the Oura API.
//!
//! The API returns `null` for many numeric fields (contributors that were not
//! computed, days without a reading); those decode to the type's default
//! value so renderers can treat every record uniformly.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{value::RawValue, Value};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString, VariantNames};

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `{"data": [...], "next_token": ...}` list envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct MultiDocumentResponse<T> {
    #[serde(default, deserialize_with = "nullable")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "nullable")]
    pub next_token: String,
}

impl<T> Default for MultiDocumentResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub biological_sex: String,
    #[serde(default)]
    pub height: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagModel {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnhancedTagModel {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tag_type_code: String,
    #[serde(default, deserialize_with = "nullable")]
    pub start_time: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end_time: String,
    #[serde(default, deserialize_with = "nullable")]
    pub start_day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end_day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: String,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionModel {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub start_datetime: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end_datetime: String,
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub mood: String,
}

// Webhook subscriptions

/// Operation a webhook subscription fires on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, EnumIter, VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Create,
    Update,
    Delete,
}

/// Resource kind a webhook subscription watches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, EnumIter, VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataType {
    Tag,
    EnhancedTag,
    Workout,
    Session,
    Sleep,
    DailySleep,
    DailyReadiness,
    DailyActivity,
    DailySpo2,
    SleepTime,
    RestModePeriod,
    RingConfiguration,
    DailyStress,
    DailyCardiovascularAge,
    DailyResilience,
    #[serde(rename = "vo2_max")]
    #[strum(serialize = "vo2_max")]
    Vo2Max,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookSubscription {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub callback_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub event_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub data_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub expiration_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWebhookSubscriptionRequest {
    pub callback_url: String,
    pub verification_token: String,
    pub event_type: EventType,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateWebhookSubscriptionRequest {
    pub verification_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
}

// Daily metrics

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleepRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bedtime_start: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bedtime_end: String,
    #[serde(default, deserialize_with = "nullable")]
    pub total_sleep_duration: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub time_in_bed: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub efficiency: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub deep_sleep_duration: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub light_sleep_duration: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub rem_sleep_duration: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub awake_time: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub latency: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub lowest_heart_rate: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub average_heart_rate: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub average_hrv: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub average_breath: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub restless_periods: i64,
}

impl SleepRecord {
    pub fn is_main_sleep(&self) -> bool {
        self.kind == "long_sleep"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleepContributors {
    #[serde(default, deserialize_with = "nullable")]
    pub deep_sleep: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub efficiency: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub latency: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub rem_sleep: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub restfulness: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub timing: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub total_sleep: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySleepRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub score: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub contributors: SleepContributors,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadinessContributors {
    #[serde(default, deserialize_with = "nullable")]
    pub activity_balance: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub body_temperature: i64,
    #[serde(default)]
    pub hrv_balance: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub previous_day_activity: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub previous_night: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub recovery_index: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub resting_heart_rate: i64,
    #[serde(default)]
    pub sleep_balance: Option<i64>,
    #[serde(default)]
    pub sleep_regularity: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadinessRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub score: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub temperature_deviation: f64,
    #[serde(default)]
    pub temperature_trend_deviation: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub contributors: ReadinessContributors,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub score: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub steps: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub active_calories: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub total_calories: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub target_calories: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub equivalent_walking_distance: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub high_activity_time: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub medium_activity_time: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub low_activity_time: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub sedentary_time: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub resting_time: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeartRateRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bpm: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StressRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub stress_high: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub recovery_high: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub day_summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpO2Percentage {
    #[serde(default, deserialize_with = "nullable")]
    pub average: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpO2Record {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub spo2_percentage: SpO2Percentage,
    #[serde(default, deserialize_with = "nullable")]
    pub breathing_disturbance_index: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResilienceContributors {
    #[serde(default, deserialize_with = "nullable")]
    pub sleep_recovery: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub daytime_recovery: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResilienceRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub level: String,
    #[serde(default, deserialize_with = "nullable")]
    pub contributors: ResilienceContributors,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vo2MaxRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub vo2_max: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub day: String,
    #[serde(default, deserialize_with = "nullable")]
    pub activity: String,
    #[serde(default, deserialize_with = "nullable")]
    pub calories: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub distance: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub start_datetime: String,
    #[serde(default, deserialize_with = "nullable")]
    pub end_datetime: String,
    #[serde(default, deserialize_with = "nullable")]
    pub intensity: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
}

// JSON-mode report

/// Outcome of one endpoint in a JSON-mode report: the verbatim body, or the error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointResult {
    Data(Box<RawValue>),
    Error(String),
}

/// The single object a date command prints in JSON mode.
#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub command: String,
    pub date: String,
    pub start_date: String,
    pub end_date: String,
    pub endpoints: BTreeMap<String, EndpointResult>,
}
