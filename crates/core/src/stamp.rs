use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

/// Output layout of a date stamp placed in front of a name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StampStyle {
    /// `YYMMDD`
    Short,
    /// `YYYYMMDD`
    Compact,
    /// `YYYY-MM-DD`
    #[default]
    Standard,
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM-DDThh.mm.ss`
    WithTime,
}

/// Layout recognized at the start of an existing name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StampKind {
    WithTimeSeconds,
    WithTimeNoSeconds,
    Standard,
    Compact,
    Short,
    Month,
}

impl StampKind {
    pub fn style(self) -> StampStyle {
        match self {
            StampKind::WithTimeSeconds | StampKind::WithTimeNoSeconds => StampStyle::WithTime,
            StampKind::Standard => StampStyle::Standard,
            StampKind::Compact => StampStyle::Compact,
            StampKind::Short => StampStyle::Short,
            StampKind::Month => StampStyle::Month,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StampTime {
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
}

/// Date (and optional time) values of a stamp.
///
/// `year` always holds the full year; two-digit stamps are widened when parsed.
/// A `day` of `0` means the day is unknown, as for month-only stamps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StampFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub time: Option<StampTime>,
}

impl StampFields {
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            time: None,
        }
    }

    pub fn without_time(self) -> Self {
        Self { time: None, ..self }
    }

    pub fn from_local(date: &DateTime<Local>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            time: Some(StampTime {
                hour: date.hour(),
                minute: date.minute(),
                second: Some(date.second()),
            }),
        }
    }
}

/// Separator characters found inside a date-time stamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSeparators {
    pub date_time: char,
    pub hour_minute: char,
    pub minute_second: Option<char>,
}

impl TimeSeparators {
    pub fn is_canonical(&self) -> bool {
        self.date_time == 'T'
            && self.hour_minute == '.'
            && self.minute_second.map(|c| c == '.').unwrap_or(true)
    }
}

/// A stamp recognized at the start of a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStamp {
    pub kind: StampKind,
    pub fields: StampFields,
    pub separators: Option<TimeSeparators>,
    /// Character between the stamp and the rest of the name.
    pub delimiter: char,
    /// Bytes at the start of the name taken by the stamp, delimiter included.
    pub consumed_len: usize,
}

impl ParsedStamp {
    pub fn remainder<'a>(&self, name: &'a str) -> &'a str {
        &name[self.consumed_len.min(name.len())..]
    }
}

/// Expands a two-digit year the way `%y` does: 69..=99 in the 1900s, the rest in the 2000s.
pub fn widen_short_year(yy: u32) -> i32 {
    if yy >= 69 {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    }
}
