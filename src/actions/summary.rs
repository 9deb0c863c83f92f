//! Human-readable daily summaries.
//!
//! Each renderer receives the decoded records of one endpoint and the
//! requested day, picks the matching records and returns the finished text.

use crate::{
    format::{clock_time, format_duration, local_time, rule},
    model::{
        ActivityRecord, DailySleepRecord, HeartRateRecord, ReadinessRecord, ResilienceRecord,
        SleepRecord, SpO2Record, StressRecord, Vo2MaxRecord, WorkoutRecord,
    },
};

const MAIN_SLEEP_LABEL: &str = "🛏️  Main Sleep";
const NAP_LABEL: &str = "😴 Nap";

fn no_data(kind: &str, date: &str) -> String {
    format!("No {} data for {}\n", kind, date)
}

fn heading(title: &str, day: &str) -> String {
    format!("{} - {}\n{}\n", title, day, rule())
}

fn sleep_label(record: &SleepRecord) -> &'static str {
    if record.is_main_sleep() {
        MAIN_SLEEP_LABEL
    } else {
        NAP_LABEL
    }
}

fn periods_of<'a>(records: &'a [SleepRecord], date: &str) -> Vec<&'a SleepRecord> {
    records.iter().filter(|r| r.day == date).collect()
}

/// The boxed banner printed ahead of the combined report.
pub fn render_banner(date: &str) -> String {
    let bar = "═".repeat(38);
    format!(
        "╔{bar}╗\n║      OURA METRICS - {:<10}       ║\n╚{bar}╝\n\n",
        date
    )
}

pub fn render_sleep(date: &str, periods: &[SleepRecord], daily: &[DailySleepRecord]) -> String {
    let daily = daily.iter().find(|d| d.day == date);
    let periods = periods_of(periods, date);

    if periods.is_empty() && daily.is_none() {
        return no_data("sleep", date);
    }

    let mut text = heading("🌙 Sleep", date);

    if let Some(daily) = daily {
        let c = &daily.contributors;
        text.push_str(&format!("Score:         {}\n\nContributors:\n", daily.score));
        text.push_str(&format!("  Total Sleep:   {}\n", c.total_sleep));
        text.push_str(&format!("  Efficiency:    {}\n", c.efficiency));
        text.push_str(&format!("  Restfulness:   {}\n", c.restfulness));
        text.push_str(&format!("  REM Sleep:     {}\n", c.rem_sleep));
        text.push_str(&format!("  Deep Sleep:    {}\n", c.deep_sleep));
        text.push_str(&format!("  Latency:       {}\n", c.latency));
        text.push_str(&format!("  Timing:        {}\n\n", c.timing));
    }

    for (i, s) in periods.iter().enumerate() {
        if i > 0 {
            text.push_str(&format!("\n{}\n", rule()));
        }
        text.push_str(&format!("{}\n", sleep_label(s)));
        text.push_str(&format!(
            "Time:          {} → {}\n",
            clock_time(&s.bedtime_start),
            clock_time(&s.bedtime_end)
        ));
        text.push_str(&format!("Total Sleep:   {}\n", format_duration(s.total_sleep_duration)));
        text.push_str(&format!("Time in Bed:   {}\n", format_duration(s.time_in_bed)));
        text.push_str(&format!("Efficiency:    {}%\n\n", s.efficiency));
        text.push_str(&format!("Deep Sleep:    {}\n", format_duration(s.deep_sleep_duration)));
        text.push_str(&format!("Light Sleep:   {}\n", format_duration(s.light_sleep_duration)));
        text.push_str(&format!("REM Sleep:     {}\n", format_duration(s.rem_sleep_duration)));
        text.push_str(&format!("Awake:         {}\n", format_duration(s.awake_time)));
        text.push_str(&format!("Latency:       {}\n\n", format_duration(s.latency)));
        text.push_str(&format!("Lowest HR:     {} bpm\n", s.lowest_heart_rate));
        text.push_str(&format!("Average HR:    {:.0} bpm\n", s.average_heart_rate));
        text.push_str(&format!("Average HRV:   {} ms\n", s.average_hrv));
        text.push_str(&format!("Breath Rate:   {:.1} /min\n", s.average_breath));
        text.push_str(&format!("Restlessness:  {} periods\n", s.restless_periods));
    }

    text
}

pub fn render_hrv(date: &str, periods: &[SleepRecord]) -> String {
    let periods = periods_of(periods, date);
    if periods.is_empty() {
        return no_data("HRV", date);
    }

    let mut text = heading("💓 HRV", date);
    for (i, s) in periods.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let hrv = if s.average_hrv > 0 {
            format!("{} ms", s.average_hrv)
        } else {
            "n/a".to_string()
        };
        text.push_str(&format!(
            "{} ({} → {})\n",
            sleep_label(s),
            clock_time(&s.bedtime_start),
            clock_time(&s.bedtime_end)
        ));
        text.push_str(&format!("Average HRV:   {}\n", hrv));
        text.push_str(&format!("Average HR:    {:.0} bpm\n", s.average_heart_rate));
        text.push_str(&format!("Lowest HR:     {} bpm\n", s.lowest_heart_rate));
    }
    text
}

pub fn render_readiness(date: &str, records: &[ReadinessRecord]) -> String {
    let Some(r) = records.iter().find(|r| r.day == date) else {
        return no_data("readiness", date);
    };
    let c = &r.contributors;

    let mut text = heading("💪 Readiness", &r.day);
    text.push_str(&format!("Score:              {}\n", r.score));
    text.push_str(&format!("Temp Deviation:     {:+.2}°C\n", r.temperature_deviation));
    text.push_str("\nContributors:\n");
    text.push_str(&format!("  Resting HR:       {}\n", c.resting_heart_rate));
    if let Some(hrv_balance) = c.hrv_balance {
        text.push_str(&format!("  HRV Balance:      {}\n", hrv_balance));
    }
    text.push_str(&format!("  Body Temp:        {}\n", c.body_temperature));
    text.push_str(&format!("  Recovery Index:   {}\n", c.recovery_index));
    text.push_str(&format!("  Previous Night:   {}\n", c.previous_night));
    text.push_str(&format!("  Prev Day Activity:{}\n", c.previous_day_activity));
    text.push_str(&format!("  Activity Balance: {}\n", c.activity_balance));
    if let Some(sleep_balance) = c.sleep_balance {
        text.push_str(&format!("  Sleep Balance:    {}\n", sleep_balance));
    }
    if let Some(sleep_regularity) = c.sleep_regularity {
        text.push_str(&format!("  Sleep Regularity: {}\n", sleep_regularity));
    }
    text
}

pub fn render_activity(date: &str, records: &[ActivityRecord]) -> String {
    let Some(a) = records.iter().find(|a| a.day == date) else {
        return no_data("activity", date);
    };

    let mut text = heading("🏃 Activity", &a.day);
    text.push_str(&format!("Score:         {}\n", a.score));
    text.push_str(&format!("Steps:         {}\n", a.steps));
    text.push_str(&format!(
        "Distance:      {:.1} km\n\n",
        a.equivalent_walking_distance as f64 / 1000.0
    ));
    text.push_str(&format!("Active Cal:    {}\n", a.active_calories));
    text.push_str(&format!("Total Cal:     {}\n", a.total_calories));
    text.push_str(&format!("Target Cal:    {}\n\n", a.target_calories));
    text.push_str(&format!("High Activity: {}\n", format_duration(a.high_activity_time)));
    text.push_str(&format!("Med Activity:  {}\n", format_duration(a.medium_activity_time)));
    text.push_str(&format!("Low Activity:  {}\n", format_duration(a.low_activity_time)));
    text.push_str(&format!("Sedentary:     {}\n", format_duration(a.sedentary_time)));
    text.push_str(&format!("Resting:       {}\n", format_duration(a.resting_time)));
    text
}

pub fn render_heartrate(date: &str, readings: &[HeartRateRecord]) -> String {
    let (Some(min), Some(max)) = (
        readings.iter().map(|r| r.bpm).min(),
        readings.iter().map(|r| r.bpm).max(),
    ) else {
        return no_data("heart rate", date);
    };
    let average = readings.iter().map(|r| r.bpm).sum::<i64>() / readings.len() as i64;

    let mut text = heading("❤️  Heart Rate", date);
    text.push_str(&format!("Readings:  {}\n", readings.len()));
    text.push_str(&format!("Min:       {} bpm\n", min));
    text.push_str(&format!("Max:       {} bpm\n", max));
    text.push_str(&format!("Average:   {} bpm\n", average));
    text
}

pub fn render_stress(date: &str, records: &[StressRecord]) -> String {
    let Some(s) = records.first() else {
        return no_data("stress", date);
    };
    format!(
        "{}Stress High:     {} min\nRecovery High:   {} min\n",
        heading("😤 Stress", &s.day),
        s.stress_high,
        s.recovery_high
    )
}

pub fn render_spo2(date: &str, records: &[SpO2Record]) -> String {
    let Some(s) = records.first() else {
        return no_data("SpO2", date);
    };
    format!(
        "{}Average SpO2:    {:.1}%\nBreathing Index: {:.2}\n",
        heading("🫁 Blood Oxygen", &s.day),
        s.spo2_percentage.average,
        s.breathing_disturbance_index
    )
}

pub fn render_resilience(date: &str, records: &[ResilienceRecord]) -> String {
    let Some(r) = records.first() else {
        return no_data("resilience", date);
    };
    format!(
        "{}Level:            {}\nSleep Recovery:   {:.0}%\nDaytime Recovery: {:.0}%\n",
        heading("🛡️  Resilience", &r.day),
        r.level,
        r.contributors.sleep_recovery * 100.0,
        r.contributors.daytime_recovery * 100.0
    )
}

pub fn render_vo2_max(date: &str, records: &[Vo2MaxRecord]) -> String {
    let Some(v) = records.first() else {
        return no_data("VO2 max", date);
    };
    format!(
        "{}VO2 Max:  {:.1} ml/kg/min\n",
        heading("🏋️  VO2 Max", &v.day),
        v.vo2_max
    )
}

fn workout_seconds(workout: &WorkoutRecord) -> i64 {
    match (
        local_time(&workout.start_datetime),
        local_time(&workout.end_datetime),
    ) {
        (Some(start), Some(end)) => (end - start).num_seconds(),
        _ => 0,
    }
}

pub fn render_workouts(date: &str, workouts: &[WorkoutRecord]) -> String {
    if workouts.is_empty() {
        return no_data("workout", date);
    }

    let mut text = heading("🏋️  Workouts", date);
    for (i, w) in workouts.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let label = match w.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => w.activity.as_str(),
        };
        text.push_str(&format!("Activity:   {}\n", label));
        text.push_str(&format!(
            "Time:       {} ({})\n",
            clock_time(&w.start_datetime),
            format_duration(workout_seconds(w))
        ));
        text.push_str(&format!("Calories:   {:.0}\n", w.calories));
        if w.distance > 0.0 {
            text.push_str(&format!("Distance:   {:.2} km\n", w.distance / 1000.0));
        }
        text.push_str(&format!("Intensity:  {}\n", w.intensity));
        text.push_str(&format!("Source:     {}\n", w.source));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MultiDocumentResponse;
    use serde::de::DeserializeOwned;

    fn records<T: DeserializeOwned>(json: &str) -> Vec<T> {
        serde_json::from_str::<MultiDocumentResponse<T>>(json)
            .unwrap()
            .data
    }

    #[test]
    fn banner_pads_date() {
        let banner = render_banner("2024-05-01");
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], format!("╔{}╗", "═".repeat(38)));
        assert_eq!(lines[1], "║      OURA METRICS - 2024-05-01       ║");
        assert_eq!(lines[1].chars().count(), 40);
        assert!(banner.ends_with("╝\n\n"));
    }

    #[test]
    fn readiness_skips_absent_contributors() {
        let data = records::<ReadinessRecord>(
            r#"{"data":[
                {"day":"2024-04-30","score":60},
                {"day":"2024-05-01","score":82,"temperature_deviation":-0.12,
                 "contributors":{"resting_heart_rate":90,"hrv_balance":null,"body_temperature":100,
                   "recovery_index":75,"previous_night":80,"previous_day_activity":70,
                   "activity_balance":85,"sleep_balance":77,"sleep_regularity":null}}
            ]}"#,
        );
        let text = render_readiness("2024-05-01", &data);
        assert_eq!(
            text,
            format!(
                "💪 Readiness - 2024-05-01\n{}\nScore:              82\nTemp Deviation:     -0.12°C\n\nContributors:\n  Resting HR:       90\n  Body Temp:        100\n  Recovery Index:   75\n  Previous Night:   80\n  Prev Day Activity:70\n  Activity Balance: 85\n  Sleep Balance:    77\n",
                "─".repeat(40)
            )
        );
    }

    #[test]
    fn readiness_for_other_day_is_no_data() {
        let data = records::<ReadinessRecord>(r#"{"data":[{"day":"2024-04-30","score":60}]}"#);
        assert_eq!(
            render_readiness("2024-05-01", &data),
            "No readiness data for 2024-05-01\n"
        );
    }

    #[test]
    fn sleep_with_score_only() {
        let daily = records::<DailySleepRecord>(
            r#"{"data":[{"day":"2024-05-01","score":88,"contributors":{"total_sleep":90,"efficiency":95,
                "restfulness":70,"rem_sleep":85,"deep_sleep":99,"latency":80,"timing":60}}]}"#,
        );
        let text = render_sleep("2024-05-01", &[], &daily);
        assert!(text.contains("Score:         88\n\nContributors:\n  Total Sleep:   90\n"));
        assert!(text.ends_with("  Timing:        60\n\n"));
    }

    #[test]
    fn sleep_periods_are_labelled_and_separated() {
        let periods = records::<SleepRecord>(
            r#"{"data":[
                {"day":"2024-05-01","type":"long_sleep","bedtime_start":"2024-04-30T23:00:00+00:00",
                 "bedtime_end":"2024-05-01T07:00:00+00:00","total_sleep_duration":25200,
                 "time_in_bed":28800,"efficiency":88,"average_heart_rate":54.4,"average_hrv":45,
                 "average_breath":14.31,"lowest_heart_rate":48,"restless_periods":12},
                {"day":"2024-05-01","type":"sleep","average_heart_rate":60.0},
                {"day":"2024-04-30","type":"long_sleep"}
            ]}"#,
        );
        let text = render_sleep("2024-05-01", &periods, &[]);
        assert!(text.starts_with("🌙 Sleep - 2024-05-01\n"));
        assert!(text.contains("🛏️  Main Sleep\nTime:          "));
        assert!(text.contains("Total Sleep:   7h 0m\nTime in Bed:   8h 0m\nEfficiency:    88%\n\n"));
        assert!(text.contains("Average HR:    54 bpm\nAverage HRV:   45 ms\nBreath Rate:   14.3 /min\n"));
        assert!(text.contains(&format!("periods\n\n{}\n😴 Nap\n", "─".repeat(40))));
        assert_eq!(text.matches("Restlessness:").count(), 2);
    }

    #[test]
    fn sleep_without_anything_is_no_data() {
        assert_eq!(render_sleep("2024-05-01", &[], &[]), "No sleep data for 2024-05-01\n");
    }

    #[test]
    fn hrv_reports_missing_average_as_na() {
        let periods = records::<SleepRecord>(
            r#"{"data":[{"day":"2024-05-01","type":"sleep","average_hrv":0,"average_heart_rate":61.6,"lowest_heart_rate":55}]}"#,
        );
        let text = render_hrv("2024-05-01", &periods);
        assert!(text.contains("😴 Nap ("));
        assert!(text.ends_with("Average HRV:   n/a\nAverage HR:    62 bpm\nLowest HR:     55 bpm\n"));
        assert_eq!(render_hrv("2024-05-02", &periods), "No HRV data for 2024-05-02\n");
    }

    #[test]
    fn activity_converts_distance_to_km() {
        let data = records::<ActivityRecord>(
            r#"{"data":[{"day":"2024-05-01","score":77,"steps":10234,"equivalent_walking_distance":8460,
                "high_activity_time":600,"medium_activity_time":3900}]}"#,
        );
        let text = render_activity("2024-05-01", &data);
        assert!(text.contains("Steps:         10234\nDistance:      8.5 km\n\n"));
        assert!(text.contains("High Activity: 10m\nMed Activity:  1h 5m\n"));
    }

    #[test]
    fn heartrate_uses_integer_average() {
        let data = records::<HeartRateRecord>(
            r#"{"data":[{"bpm":60},{"bpm":71},{"bpm":55}]}"#,
        );
        let text = render_heartrate("2024-05-01", &data);
        assert!(text.ends_with("Readings:  3\nMin:       55 bpm\nMax:       71 bpm\nAverage:   62 bpm\n"));
        assert_eq!(
            render_heartrate("2024-05-01", &[]),
            "No heart rate data for 2024-05-01\n"
        );
    }

    #[test]
    fn first_record_metrics() {
        let stress = records::<StressRecord>(
            r#"{"data":[{"day":"2024-05-01","stress_high":45,"recovery_high":null}]}"#,
        );
        assert!(render_stress("2024-05-01", &stress)
            .ends_with("Stress High:     45 min\nRecovery High:   0 min\n"));

        let spo2 = records::<SpO2Record>(
            r#"{"data":[{"day":"2024-05-01","spo2_percentage":{"average":97.26},"breathing_disturbance_index":1.5}]}"#,
        );
        assert!(render_spo2("2024-05-01", &spo2)
            .ends_with("Average SpO2:    97.3%\nBreathing Index: 1.50\n"));

        let resilience = records::<ResilienceRecord>(
            r#"{"data":[{"day":"2024-05-01","level":"solid","contributors":{"sleep_recovery":0.734,"daytime_recovery":0.5}}]}"#,
        );
        assert!(render_resilience("2024-05-01", &resilience)
            .ends_with("Level:            solid\nSleep Recovery:   73%\nDaytime Recovery: 50%\n"));

        let vo2 = records::<Vo2MaxRecord>(r#"{"data":[{"day":"2024-05-01","vo2_max":41.26}]}"#);
        assert!(render_vo2_max("2024-05-01", &vo2).ends_with("VO2 Max:  41.3 ml/kg/min\n"));

        assert_eq!(render_vo2_max("2024-05-01", &[]), "No VO2 max data for 2024-05-01\n");
        assert_eq!(render_spo2("2024-05-01", &[]), "No SpO2 data for 2024-05-01\n");
    }

    #[test]
    fn workouts_prefer_custom_label_and_skip_zero_distance() {
        let data = records::<WorkoutRecord>(
            r#"{"data":[
                {"activity":"walking","label":"Evening walk","calories":120.4,"distance":3210.0,
                 "start_datetime":"2024-05-01T18:00:00+02:00","end_datetime":"2024-05-01T18:45:00+02:00",
                 "intensity":"easy","source":"autodetected"},
                {"activity":"yoga","label":"","calories":80,"distance":0,"intensity":"moderate","source":"manual"}
            ]}"#,
        );
        let text = render_workouts("2024-05-01", &data);
        assert!(text.contains("Activity:   Evening walk\n"));
        assert!(text.contains(" (45m)\nCalories:   120\nDistance:   3.21 km\nIntensity:  easy\n"));
        assert!(text.contains("Source:     autodetected\n\nActivity:   yoga\n"));
        assert!(text.ends_with("Calories:   80\nIntensity:  moderate\nSource:     manual\n"));
    }
}
