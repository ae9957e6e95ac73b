//! Notification cadences and their date math.

use chrono::DateTime;
use chrono::Datelike;
use chrono::Duration;
use chrono::Utc;

use crate::config::Config;

/// The frequency tier a subscription is evaluated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    /// Value stored in the subscription `frequency` column.
    pub fn frequency(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Subscriptions with no frequency set fall under the default
    /// (daily) cadence.
    pub fn includes_unset_frequency(&self) -> bool {
        matches!(self, Self::Daily)
    }

    /// Digest label carried in weekly/monthly payloads. Daily passes
    /// are results passes, not digests.
    pub fn digest_label(&self) -> Option<&'static str> {
        match self {
            Self::Daily => None,
            Self::Weekly => Some("weekly"),
            Self::Monthly => Some("monthly"),
        }
    }

    /// Staleness horizon for a results pass: yesterday at the
    /// reference hour. Postings at or after this boundary count as new.
    pub fn minimum_posted_date(now: DateTime<Utc>, reference_hour: u32) -> DateTime<Utc> {
        (now - Duration::days(1))
            .date_naive()
            .and_hms_opt(reference_hour, 0, 0)
            .expect("reference hour is validated at config load")
            .and_utc()
    }

    /// Next scheduled occurrence of this cadence strictly after `now`.
    pub fn next_fire(&self, now: DateTime<Utc>, config: &Config) -> DateTime<Utc> {
        let mut date = now.date_naive();
        loop {
            let on_schedule = match self {
                Self::Daily => true,
                Self::Weekly => date.weekday() == config.weekly_weekday,
                Self::Monthly => date.day() == config.monthly_day,
            };
            if on_schedule {
                let at = date
                    .and_hms_opt(config.daily_hour, 0, 0)
                    .expect("reference hour is validated at config load")
                    .and_utc();
                if at > now {
                    return at;
                }
            }
            date = date.succ_opt().expect("date out of range");
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.frequency())
    }
}
