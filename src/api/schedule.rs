//! Campaign Schedules
//!
//! Converts schedules between chrono values and the API's string forms:
//! dates as `YYYY-MM-DD`, times of day as `HH:MM`, weekdays as integer
//! string keys counted from Sunday (`"0"`) and timezones as IANA names.

use crate::error::{InstantlyError, Result};
use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// A sending window within a campaign
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSchedule {
    /// Display name, e.g. "Morning"
    pub name: String,

    /// Which weekdays the window applies to
    pub days: HashMap<Weekday, bool>,

    /// Timezone the timing is expressed in
    pub timezone: Tz,

    /// Daily sending window
    pub timing: Timing,
}

impl CampaignSchedule {
    /// A schedule enabled on `days` between `from` and `to`
    pub fn new(
        name: impl Into<String>,
        days: &[Weekday],
        timezone: Tz,
        from: NaiveTime,
        to: NaiveTime,
    ) -> Self {
        Self {
            name: name.into(),
            days: days.iter().map(|day| (*day, true)).collect(),
            timezone,
            timing: Timing { from, to },
        }
    }
}

/// Start and end of the daily sending window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub from: NaiveTime,
    pub to: NaiveTime,
}

/// Wire form of [`CampaignSchedule`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub name: String,
    pub days: BTreeMap<String, bool>,
    pub timezone: String,
    pub timing: TimingEntry,
}

/// Wire form of [`Timing`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingEntry {
    pub from: String,
    pub to: String,
}

/// Body of `campaign/set/schedules`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSchedulesPayload {
    pub campaign_id: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub schedules: Vec<ScheduleEntry>,
}

impl SetSchedulesPayload {
    /// Wire form of a schedule update
    pub fn new(
        campaign_id: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        schedules: &[CampaignSchedule],
    ) -> Self {
        Self {
            campaign_id: campaign_id.to_string(),
            start_date: format_date(start_date),
            end_date: end_date.map(format_date),
            schedules: schedules.iter().map(ScheduleEntry::from).collect(),
        }
    }

    /// Parsed start date
    pub fn start_date(&self) -> Result<NaiveDate> {
        parse_date(&self.start_date)
    }

    /// Parsed end date, if any
    pub fn end_date(&self) -> Result<Option<NaiveDate>> {
        self.end_date.as_deref().map(parse_date).transpose()
    }
}

impl From<&CampaignSchedule> for ScheduleEntry {
    fn from(schedule: &CampaignSchedule) -> Self {
        Self {
            name: schedule.name.clone(),
            days: schedule
                .days
                .iter()
                .map(|(day, enabled)| (weekday_key(*day), *enabled))
                .collect(),
            timezone: schedule.timezone.name().to_string(),
            timing: TimingEntry {
                from: schedule.timing.from.format(TIME_FORMAT).to_string(),
                to: schedule.timing.to.format(TIME_FORMAT).to_string(),
            },
        }
    }
}

impl TryFrom<&ScheduleEntry> for CampaignSchedule {
    type Error = InstantlyError;

    fn try_from(entry: &ScheduleEntry) -> Result<Self> {
        let days = entry
            .days
            .iter()
            .map(|(key, enabled)| Ok((parse_weekday_key(key)?, *enabled)))
            .collect::<Result<HashMap<_, _>>>()?;

        let timezone: Tz = entry.timezone.parse().map_err(|_| {
            InstantlyError::InvalidValue(format!("unknown timezone '{}'", entry.timezone))
        })?;

        Ok(Self {
            name: entry.name.clone(),
            days,
            timezone,
            timing: Timing {
                from: parse_time(&entry.timing.from)?,
                to: parse_time(&entry.timing.to)?,
            },
        })
    }
}

/// `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| InstantlyError::InvalidValue(format!("invalid date '{}': {}", value, e)))
}

/// Parse an `HH:MM` time of day
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| InstantlyError::InvalidValue(format!("invalid time '{}': {}", value, e)))
}

/// Sunday is `"0"`, Saturday is `"6"`
pub fn weekday_key(day: Weekday) -> String {
    day.num_days_from_sunday().to_string()
}

/// Inverse of [`weekday_key`]
pub fn parse_weekday_key(key: &str) -> Result<Weekday> {
    let day = match key.trim() {
        "0" => Weekday::Sun,
        "1" => Weekday::Mon,
        "2" => Weekday::Tue,
        "3" => Weekday::Wed,
        "4" => Weekday::Thu,
        "5" => Weekday::Fri,
        "6" => Weekday::Sat,
        other => {
            return Err(InstantlyError::InvalidValue(format!(
                "invalid weekday key '{}'",
                other
            )))
        }
    };
    Ok(day)
}
