//! Date commands: one day of metrics, as text or as a JSON report.

use chrono::{Days, Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use std::{collections::BTreeMap, io::Write};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::{
    actions::summary,
    args::ArgsError,
    client::UserCollection,
    error::CliError,
    model::{
        ActivityRecord, DailyReport, DailySleepRecord, EndpointResult, HeartRateRecord,
        MultiDocumentResponse, ReadinessRecord, ResilienceRecord, SleepRecord, SpO2Record,
        StressRecord, Vo2MaxRecord, WorkoutRecord,
    },
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const SLEEP: &str = "/sleep";
const DAILY_SLEEP: &str = "/daily_sleep";
const DAILY_ACTIVITY: &str = "/daily_activity";
const DAILY_READINESS: &str = "/daily_readiness";
const HEARTRATE: &str = "/heartrate";
const DAILY_STRESS: &str = "/daily_stress";
const DAILY_SPO2: &str = "/daily_spo2";
const DAILY_RESILIENCE: &str = "/daily_resilience";
const VO2_MAX: &str = "/vO2_max";
const WORKOUT: &str = "/workout";

/// A command that reports on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DailyCommand {
    #[strum(to_string = "all", serialize = "today")]
    All,
    Sleep,
    Activity,
    Readiness,
    Heartrate,
    Hrv,
    Stress,
    Spo2,
    Resilience,
    Vo2,
    Workout,
}

impl DailyCommand {
    /// Endpoints queried in JSON mode, in request order.
    pub fn endpoints(self) -> &'static [&'static str] {
        match self {
            DailyCommand::All => &[
                SLEEP,
                DAILY_SLEEP,
                DAILY_ACTIVITY,
                DAILY_READINESS,
                HEARTRATE,
                DAILY_STRESS,
                DAILY_SPO2,
                DAILY_RESILIENCE,
                VO2_MAX,
                WORKOUT,
            ],
            DailyCommand::Sleep => &[SLEEP, DAILY_SLEEP],
            DailyCommand::Activity => &[DAILY_ACTIVITY],
            DailyCommand::Readiness => &[DAILY_READINESS],
            DailyCommand::Heartrate => &[HEARTRATE],
            DailyCommand::Hrv => &[SLEEP, DAILY_SLEEP, DAILY_READINESS],
            DailyCommand::Stress => &[DAILY_STRESS],
            DailyCommand::Spo2 => &[DAILY_SPO2],
            DailyCommand::Resilience => &[DAILY_RESILIENCE],
            DailyCommand::Vo2 => &[VO2_MAX],
            DailyCommand::Workout => &[WORKOUT],
        }
    }

    /// Whether the query window extends one day to either side of the date.
    ///
    /// Sleep and daily scores are keyed by the day they end on, so a
    /// one-day window around the date is needed to catch them.
    pub fn padded(self) -> bool {
        matches!(
            self,
            DailyCommand::All
                | DailyCommand::Sleep
                | DailyCommand::Activity
                | DailyCommand::Readiness
                | DailyCommand::Hrv
        )
    }

    /// The inclusive `(start_date, end_date)` window for `date`.
    pub fn date_range(self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        if !self.padded() {
            return (date, date);
        }
        (
            date.checked_sub_days(Days::new(1)).unwrap_or(date),
            date.checked_add_days(Days::new(1)).unwrap_or(date),
        )
    }
}

/// Parses the optional date positional, defaulting to today in local time.
pub fn parse_date(args: &[String]) -> Result<NaiveDate, CliError> {
    match args {
        [] => Ok(Local::now().date_naive()),
        [date] => NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| CliError::InvalidDate(date.clone())),
        [_, rest @ ..] => Err(ArgsError::UnexpectedArgs(rest.join(" ")).into()),
    }
}

fn range_query(command: DailyCommand, date: NaiveDate) -> [(&'static str, String); 2] {
    let (start, end) = command.date_range(date);
    [
        ("start_date", start.format(DATE_FORMAT).to_string()),
        ("end_date", end.format(DATE_FORMAT).to_string()),
    ]
}

/// Queries every endpoint of `command` and collects the verbatim bodies.
///
/// A failed endpoint is recorded as an error entry; it does not abort the report.
pub async fn build_report<A: UserCollection>(
    api: &A,
    command: DailyCommand,
    date: NaiveDate,
) -> DailyReport {
    let query = range_query(command, date);
    let mut endpoints = BTreeMap::new();

    for endpoint in command.endpoints() {
        let name = endpoint.trim_start_matches('/').to_string();
        let result = match api.api_get(endpoint, &query).await {
            Ok(body) => match serde_json::from_slice::<Box<RawValue>>(&body) {
                Ok(raw) => EndpointResult::Data(raw),
                Err(e) => EndpointResult::Error(CliError::ResponseFormat(e).to_string()),
            },
            Err(e) => {
                debug!("{} failed: {}", endpoint, e);
                EndpointResult::Error(e.to_string())
            }
        };
        endpoints.insert(name, result);
    }

    DailyReport {
        command: command.to_string(),
        date: date.format(DATE_FORMAT).to_string(),
        start_date: query[0].1.clone(),
        end_date: query[1].1.clone(),
        endpoints,
    }
}

/// Writes the JSON report for `command` as one pretty-printed object.
pub async fn write_report<A: UserCollection, W: Write>(
    api: &A,
    command: DailyCommand,
    date: NaiveDate,
    out: &mut W,
) -> Result<(), CliError> {
    let report = build_report(api, command, date).await;
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

async fn fetch<T: DeserializeOwned, A: UserCollection>(
    api: &A,
    endpoint: &str,
    query: &[(&str, String)],
) -> Result<Vec<T>, CliError> {
    let body = api.api_get(endpoint, query).await?;
    let response: MultiDocumentResponse<T> =
        serde_json::from_slice(&body).map_err(CliError::ResponseFormat)?;
    Ok(response.data)
}

async fn render_section<A: UserCollection>(
    api: &A,
    command: DailyCommand,
    date: NaiveDate,
) -> Result<String, CliError> {
    let query = range_query(command, date);
    let day = date.format(DATE_FORMAT).to_string();

    let text = match command {
        DailyCommand::All => render_all(api, date).await?,
        DailyCommand::Sleep => {
            // The score is optional; the periods are not.
            let daily = match fetch::<DailySleepRecord, _>(api, DAILY_SLEEP, &query).await {
                Ok(daily) => daily,
                Err(e) => {
                    warn!("Ignoring daily sleep failure: {}", e);
                    Vec::new()
                }
            };
            let periods = fetch::<SleepRecord, _>(api, SLEEP, &query).await?;
            summary::render_sleep(&day, &periods, &daily)
        }
        DailyCommand::Hrv => {
            let periods = fetch::<SleepRecord, _>(api, SLEEP, &query).await?;
            summary::render_hrv(&day, &periods)
        }
        DailyCommand::Readiness => {
            let records = fetch::<ReadinessRecord, _>(api, DAILY_READINESS, &query).await?;
            summary::render_readiness(&day, &records)
        }
        DailyCommand::Activity => {
            let records = fetch::<ActivityRecord, _>(api, DAILY_ACTIVITY, &query).await?;
            summary::render_activity(&day, &records)
        }
        DailyCommand::Heartrate => {
            let readings = fetch::<HeartRateRecord, _>(api, HEARTRATE, &query).await?;
            summary::render_heartrate(&day, &readings)
        }
        DailyCommand::Stress => {
            let records = fetch::<StressRecord, _>(api, DAILY_STRESS, &query).await?;
            summary::render_stress(&day, &records)
        }
        DailyCommand::Spo2 => {
            let records = fetch::<SpO2Record, _>(api, DAILY_SPO2, &query).await?;
            summary::render_spo2(&day, &records)
        }
        DailyCommand::Resilience => {
            let records = fetch::<ResilienceRecord, _>(api, DAILY_RESILIENCE, &query).await?;
            summary::render_resilience(&day, &records)
        }
        DailyCommand::Vo2 => {
            let records = fetch::<Vo2MaxRecord, _>(api, VO2_MAX, &query).await?;
            summary::render_vo2_max(&day, &records)
        }
        DailyCommand::Workout => {
            let workouts = fetch::<WorkoutRecord, _>(api, WORKOUT, &query).await?;
            summary::render_workouts(&day, &workouts)
        }
    };
    Ok(text)
}

async fn render_all<A: UserCollection>(api: &A, date: NaiveDate) -> Result<String, CliError> {
    let mut text = summary::render_banner(&date.format(DATE_FORMAT).to_string());
    let sections = [
        DailyCommand::Readiness,
        DailyCommand::Sleep,
        DailyCommand::Activity,
        DailyCommand::Stress,
        DailyCommand::Heartrate,
    ];
    for (i, section) in sections.into_iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&Box::pin(render_section(api, section, date)).await?);
    }
    Ok(text)
}

/// Runs a date command in either output mode.
pub async fn execute<A: UserCollection, W: Write>(
    api: &A,
    command: DailyCommand,
    date: NaiveDate,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    if json {
        return write_report(api, command, date, out).await;
    }
    let text = render_section(api, command, date).await?;
    write!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::tests::CannedCollection;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn today_is_the_all_report() {
        assert_eq!(DailyCommand::from_str("today").unwrap(), DailyCommand::All);
        assert_eq!(DailyCommand::All.to_string(), "all");
        assert_eq!(DailyCommand::from_str("vo2").unwrap(), DailyCommand::Vo2);
        assert!(DailyCommand::from_str("steps").is_err());
    }

    #[test]
    fn every_date_command_parses() {
        for name in crate::commands::params::DATE_COMMANDS {
            assert!(DailyCommand::from_str(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn padding_brackets_the_date() {
        assert_eq!(
            DailyCommand::Sleep.date_range(day("2024-03-01")),
            (day("2024-02-29"), day("2024-03-02"))
        );
        assert_eq!(
            DailyCommand::Workout.date_range(day("2024-03-01")),
            (day("2024-03-01"), day("2024-03-01"))
        );
        let padded: Vec<DailyCommand> = DailyCommand::iter().filter(|c| c.padded()).collect();
        assert_eq!(
            padded,
            vec![
                DailyCommand::All,
                DailyCommand::Sleep,
                DailyCommand::Activity,
                DailyCommand::Readiness,
                DailyCommand::Hrv
            ]
        );
    }

    #[test]
    fn date_argument_rules() {
        assert_eq!(parse_date(&["2024-05-01".to_string()]).unwrap(), day("2024-05-01"));
        assert_eq!(parse_date(&[]).unwrap(), Local::now().date_naive());

        let err = parse_date(&["05/01/2024".to_string()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid date \"05/01/2024\": expected YYYY-MM-DD"
        );

        let err = parse_date(&["2024-05-01".to_string(), "extra".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "unexpected args: extra");
    }

    #[tokio::test]
    async fn all_report_embeds_bodies_verbatim() {
        let api = CannedCollection::new().fallback(r#"{"ok":1}"#);
        let mut out = Vec::new();
        execute(&api, DailyCommand::All, day("2024-05-01"), true, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n"));
        let report: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(report["command"], "all");
        assert_eq!(report["date"], "2024-05-01");
        assert_eq!(report["start_date"], "2024-04-30");
        assert_eq!(report["end_date"], "2024-05-02");
        assert_eq!(report["endpoints"]["sleep"]["data"], serde_json::json!({"ok": 1}));
        assert!(text.contains("\"data\": {\"ok\":1}"));

        let keys: Vec<&String> = report["endpoints"].as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 10);
        assert!(keys.iter().any(|k| k.as_str() == "vO2_max"));

        let calls = api.calls();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls[0].0, "/sleep");
        assert_eq!(calls[9].0, "/workout");
        assert_eq!(
            calls[0].1,
            vec![
                ("start_date".to_string(), "2024-04-30".to_string()),
                ("end_date".to_string(), "2024-05-02".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn report_key_set_matches_endpoints() {
        for command in DailyCommand::iter() {
            let api = CannedCollection::new().fallback("[]");
            let report = build_report(&api, command, day("2024-05-01")).await;
            let expected: Vec<String> = command
                .endpoints()
                .iter()
                .map(|e| e.trim_start_matches('/').to_string())
                .collect();
            let mut expected_sorted = expected.clone();
            expected_sorted.sort();
            let keys: Vec<String> = report.endpoints.keys().cloned().collect();
            assert_eq!(keys, expected_sorted, "{command}");
        }
    }

    #[tokio::test]
    async fn failed_endpoint_becomes_error_entry() {
        let api = CannedCollection::new()
            .with("/daily_stress", "not json")
            .failing("/heartrate");
        let report = build_report(&api, DailyCommand::All, day("2024-05-01")).await;
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["endpoints"]["heartrate"]["error"], "API error 500: canned failure");
        assert!(json["endpoints"]["daily_stress"]["error"]
            .as_str()
            .unwrap()
            .starts_with("failed to parse response: "));
        assert!(json["endpoints"]["daily_stress"].get("data").is_none());
    }

    #[tokio::test]
    async fn unpadded_commands_query_the_single_day() {
        let api = CannedCollection::new().fallback(r#"{"data":[]}"#);
        let mut out = Vec::new();
        execute(&api, DailyCommand::Stress, day("2024-05-01"), false, &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No stress data for 2024-05-01\n");
        assert_eq!(
            api.calls(),
            vec![(
                "/daily_stress".to_string(),
                vec![
                    ("start_date".to_string(), "2024-05-01".to_string()),
                    ("end_date".to_string(), "2024-05-01".to_string())
                ]
            )]
        );
    }

    #[tokio::test]
    async fn sleep_tolerates_daily_sleep_failure() {
        let api = CannedCollection::new().failing("/daily_sleep").with(
            "/sleep",
            r#"{"data":[{"day":"2024-05-01","type":"long_sleep","total_sleep_duration":3600}]}"#,
        );
        let mut out = Vec::new();
        execute(&api, DailyCommand::Sleep, day("2024-05-01"), false, &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("🌙 Sleep - 2024-05-01\n"));
        assert!(text.contains("Total Sleep:   1h 0m\n"));

        let paths: Vec<String> = api.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/daily_sleep", "/sleep"]);
    }

    #[tokio::test]
    async fn sleep_periods_failure_is_fatal() {
        let api = CannedCollection::new().fallback(r#"{"data":[]}"#).failing("/sleep");
        let mut out = Vec::new();
        let err = execute(&api, DailyCommand::Sleep, day("2024-05-01"), false, &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error 500: canned failure");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn all_prints_banner_then_sections_in_order() {
        let api = CannedCollection::new().fallback(r#"{"data":[]}"#);
        let mut out = Vec::new();
        execute(&api, DailyCommand::All, day("2024-05-01"), false, &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&summary::render_banner("2024-05-01")));
        assert!(text.ends_with(
            "No readiness data for 2024-05-01\n\nNo sleep data for 2024-05-01\n\nNo activity data for 2024-05-01\n\nNo stress data for 2024-05-01\n\nNo heart rate data for 2024-05-01\n"
        ));

        let paths: Vec<String> = api.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec![
                "/daily_readiness",
                "/daily_sleep",
                "/sleep",
                "/daily_activity",
                "/daily_stress",
                "/heartrate"
            ]
        );
    }
}
