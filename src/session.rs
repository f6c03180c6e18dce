use chrono::prelude::*;
use chrono::Duration;
use lazy_static::lazy_static;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// `Session` is one trading session, with open and close given
/// as UTC times of day. A close earlier than the open means the
/// session runs past midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    pub name: &'static str,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Session {
    pub fn new(name: &'static str, open: NaiveTime, close: NaiveTime) -> Session {
        Session { name, open, close }
    }

    pub fn spans_midnight(&self) -> bool {
        self.close < self.open
    }
}

fn utc_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).expect("session hour out of range")
}

lazy_static! {
    static ref FOREX_SESSIONS: [Session; 4] = [
        Session::new("New York", utc_hour(13), utc_hour(22)),
        Session::new("Tokyo", utc_hour(0), utc_hour(9)),
        Session::new("Sydney", utc_hour(21), utc_hour(6)),
        Session::new("London", utc_hour(7), utc_hour(16)),
    ];
}

/// The four major forex sessions, in display order.
pub fn forex_sessions() -> &'static [Session] {
    &*FOREX_SESSIONS
}

pub fn to_utc<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Utc> {
    instant.with_timezone(&Utc)
}

fn at_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Resolves the `[open, close)` window of `session` that governs `now`.
///
/// Both ends are anchored on the UTC calendar date of `now`. The close
/// of an overnight session moves to the next day, and before that
/// session's close time the window that opened the previous day is
/// still the current one.
pub fn session_window(session: &Session, now: &DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let open = at_utc(date, session.open);
    let close = at_utc(date, session.close);
    if !session.spans_midnight() {
        return (open, close);
    }
    if now.time() < session.close {
        (open - Duration::days(1), close)
    } else {
        (open, close + Duration::days(1))
    }
}

/// Friday from 17:00 UTC and Sunday before 17:00 UTC.
pub fn is_weekend_closure<Tz: TimeZone>(instant: &DateTime<Tz>) -> bool {
    let utc = to_utc(instant);
    let cutoff = utc_hour(17);
    match utc.weekday() {
        Weekday::Fri => utc.time() >= cutoff,
        Weekday::Sun => utc.time() < cutoff,
        _ => false,
    }
}

/// Does not look at the weekend closure, callers check that first.
pub fn is_session_open<Tz: TimeZone>(session: &Session, instant: &DateTime<Tz>) -> bool {
    let now = to_utc(instant);
    let (open, close) = session_window(session, &now);
    open <= now && now < close
}

/// Whole hours and minutes, any leftover seconds dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
}

impl Countdown {
    pub fn from_duration(delta: Duration) -> Countdown {
        let seconds = delta.num_seconds();
        Countdown {
            hours: seconds / 3600,
            minutes: (seconds % 3600) / 60,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Time left until the session's next open or close.
pub fn time_until_boundary<Tz: TimeZone>(session: &Session, instant: &DateTime<Tz>) -> Countdown {
    let now = to_utc(instant);
    let (open, close) = session_window(session, &now);
    let next = if now < open {
        open
    } else if now < close {
        close
    } else {
        open + Duration::days(1)
    };
    Countdown::from_duration(next - now)
}

/// Places a UTC time of day on `reference_date` and renders it as a
/// 12 hour clock in the display timezone.
pub fn convert_to_display_timezone(
    time_of_day: NaiveTime,
    reference_date: NaiveDate,
    display: &FixedOffset,
) -> String {
    at_utc(reference_date, time_of_day)
        .with_timezone(display)
        .format("%I:%M %p")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLine {
    pub name: &'static str,
    pub open_local: String,
    pub close_local: String,
    pub is_open: bool,
    pub countdown: Countdown,
}

impl fmt::Display for SessionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (status, detail) = if self.is_open {
            ("Open", "closes in")
        } else {
            ("Closed", "opens in")
        };
        write!(
            f,
            "{} Session ({} to {}): {}, {} {}",
            self.name, self.open_local, self.close_local, status, detail, self.countdown
        )
    }
}

/// What the session clock shows at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketSnapshot {
    WeekendClosure,
    Trading {
        local_time: String,
        sessions: Vec<SessionLine>,
    },
}

impl MarketSnapshot {
    /// The weekend check runs first; during the closure no session
    /// is evaluated.
    pub fn capture<Tz: TimeZone>(
        sessions: &[Session],
        now: &DateTime<Tz>,
        display: &FixedOffset,
    ) -> MarketSnapshot {
        if is_weekend_closure(now) {
            debug!("weekend closure, skipping sessions");
            return MarketSnapshot::WeekendClosure;
        }

        let date = to_utc(now).date_naive();
        let lines = sessions
            .iter()
            .map(|session| {
                let is_open = is_session_open(session, now);
                debug!(session = session.name, is_open, "session status");
                SessionLine {
                    name: session.name,
                    open_local: convert_to_display_timezone(session.open, date, display),
                    close_local: convert_to_display_timezone(session.close, date, display),
                    is_open,
                    countdown: time_until_boundary(session, now),
                }
            })
            .collect();

        MarketSnapshot::Trading {
            local_time: now.with_timezone(display).format("%I:%M %p").to_string(),
            sessions: lines,
        }
    }

    pub fn open_sessions(&self) -> Vec<&'static str> {
        match self {
            MarketSnapshot::WeekendClosure => vec![],
            MarketSnapshot::Trading { sessions, .. } => sessions
                .iter()
                .filter(|line| line.is_open)
                .map(|line| line.name)
                .collect(),
        }
    }
}

impl fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketSnapshot::WeekendClosure => {
                f.write_str("The Forex market is closed for the weekend.")
            }
            MarketSnapshot::Trading {
                local_time,
                sessions,
            } => {
                write!(f, "Current time: {}", local_time)?;
                for line in sessions {
                    write!(f, "\n{}", line)?;
                }
                Ok(())
            }
        }
    }
}
