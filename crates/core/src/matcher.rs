use crate::stamp::{widen_short_year, ParsedStamp, StampFields, StampKind, StampTime, TimeSeparators};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const YEAR: &str = r"(?P<year>[0-9]{4})";
const MONTH: &str = r"(?P<month>0[1-9]|1[0-2])";
// Digits are ASCII only; `\d` would also take other scripts' digits.
// `00` is accepted as the "day unknown" marker written by month conversions.
const DAY: &str = r"(?P<day>[0-2][0-9]|3[01])";
const HOUR: &str = r"(?P<hour>[01][0-9]|2[0-3])";
const MINUTE: &str = r"(?P<minute>[0-5][0-9])";
const SECOND: &str = r"(?P<second>[0-5][0-9])";

/// One entry of the catalog: a start-anchored pattern for a single stamp layout.
pub struct StampMatcher {
    kind: StampKind,
    regex: Regex,
    /// Rejects matches the pattern itself cannot rule out.
    reject: Option<fn(&str, &Captures<'_>) -> bool>,
}

impl StampMatcher {
    fn new(kind: StampKind, pattern: String) -> Self {
        Self {
            kind,
            regex: Regex::new(&pattern).expect("stamp pattern must compile"),
            reject: None,
        }
    }

    pub fn kind(&self) -> StampKind {
        self.kind
    }

    pub fn try_match(&self, name: &str) -> Option<ParsedStamp> {
        let caps = self.regex.captures(name)?;
        if let Some(reject) = self.reject {
            if reject(name, &caps) {
                return None;
            }
        }

        let whole = caps.get(0)?;
        let delimiter = caps.name("delim")?.as_str().chars().next()?;
        let fields = extract_fields(self.kind, &caps)?;
        let separators = match self.kind {
            StampKind::WithTimeSeconds | StampKind::WithTimeNoSeconds => Some(TimeSeparators {
                date_time: single_char(&caps, "dt")?,
                hour_minute: single_char(&caps, "hm")?,
                minute_second: caps
                    .name("ms")
                    .and_then(|m| m.as_str().chars().next()),
            }),
            _ => None,
        };

        Some(ParsedStamp {
            kind: self.kind,
            fields,
            separators,
            delimiter,
            consumed_len: whole.end(),
        })
    }
}

/// Result of classifying a name against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameClass {
    /// The name does not start with a digit.
    NoStamp,
    Stamped(ParsedStamp),
    /// Starts with a digit, but no known layout fits.
    Unrecognized,
}

/// All known layouts, most specific first.
pub static CATALOG: Lazy<Vec<StampMatcher>> = Lazy::new(|| {
    let date = format!("{YEAR}-{MONTH}-{DAY}");
    let mut month = StampMatcher::new(
        StampKind::Month,
        format!("^{YEAR}-{MONTH}(?P<delim>[- _])"),
    );
    month.reject = Some(continues_with_day);

    vec![
        StampMatcher::new(
            StampKind::WithTimeSeconds,
            format!(
                "^{date}(?P<dt>[T :_-]){HOUR}(?P<hm>[:.-]){MINUTE}(?P<ms>[:.-]){SECOND}(?P<delim>[- _.])"
            ),
        ),
        StampMatcher::new(
            StampKind::WithTimeNoSeconds,
            format!("^{date}(?P<dt>[T :_-]){HOUR}(?P<hm>[:.-]){MINUTE}(?P<delim>[- _.])"),
        ),
        StampMatcher::new(StampKind::Standard, format!("^{date}(?P<delim>[- _])")),
        StampMatcher::new(
            StampKind::Compact,
            format!("^{YEAR}{MONTH}{DAY}(?P<delim>[- _])"),
        ),
        StampMatcher::new(
            StampKind::Short,
            format!(r"^(?P<year>[0-9]{{2}}){MONTH}{DAY}(?P<delim>[- _])"),
        ),
        month,
    ]
});

// Any digit counts here, so a malformed day is not mistaken for the rest of the name.
static DAY_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-[0-3]\d").expect("day continuation pattern must compile"));

/// Returns the first catalog entry matching `name`, honoring catalog order.
pub fn match_stamp(name: &str) -> Option<ParsedStamp> {
    CATALOG.iter().find_map(|matcher| matcher.try_match(name))
}

pub fn classify(name: &str) -> NameClass {
    match name.chars().next() {
        Some(first) if first.is_ascii_digit() => match match_stamp(name) {
            Some(stamp) => NameClass::Stamped(stamp),
            None => NameClass::Unrecognized,
        },
        Some(_) => NameClass::NoStamp,
        None => NameClass::Unrecognized,
    }
}

// The regex crate has no lookahead: `YYYY-MM-DD` must never be read as `YYYY-MM` + `-DD`.
fn continues_with_day(name: &str, caps: &Captures<'_>) -> bool {
    let Some(month) = caps.name("month") else {
        return false;
    };
    DAY_CONTINUATION.is_match(&name[month.end()..])
}

fn extract_fields(kind: StampKind, caps: &Captures<'_>) -> Option<StampFields> {
    let year_raw = number(caps, "year")?;
    let year = match kind {
        StampKind::Short => widen_short_year(year_raw),
        _ => i32::try_from(year_raw).ok()?,
    };
    let month = number(caps, "month")?;
    let day = match kind {
        StampKind::Month => 0,
        _ => number(caps, "day")?,
    };
    let time = match kind {
        StampKind::WithTimeSeconds | StampKind::WithTimeNoSeconds => Some(StampTime {
            hour: number(caps, "hour")?,
            minute: number(caps, "minute")?,
            second: caps.name("second").and_then(|m| m.as_str().parse().ok()),
        }),
        _ => None,
    };

    Some(StampFields {
        year,
        month,
        day,
        time,
    })
}

fn number(caps: &Captures<'_>, group: &str) -> Option<u32> {
    caps.name(group)?.as_str().parse().ok()
}

fn single_char(caps: &Captures<'_>, group: &str) -> Option<char> {
    caps.name(group)?.as_str().chars().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(name: &str) -> Option<StampKind> {
        match_stamp(name).map(|stamp| stamp.kind)
    }

    #[test]
    fn recognizes_every_layout() {
        assert_eq!(
            kind_of("2021-09-21T13.59.59_file.txt"),
            Some(StampKind::WithTimeSeconds)
        );
        assert_eq!(
            kind_of("2021-09-21T13.59_file.txt"),
            Some(StampKind::WithTimeNoSeconds)
        );
        assert_eq!(kind_of("2021-09-21_report.txt"), Some(StampKind::Standard));
        assert_eq!(kind_of("20210921_report.txt"), Some(StampKind::Compact));
        assert_eq!(kind_of("210921_report.txt"), Some(StampKind::Short));
        assert_eq!(kind_of("2021-09_report.txt"), Some(StampKind::Month));
    }

    #[test]
    fn seconds_pattern_wins_over_looser_ones() {
        // The no-seconds pattern would also accept `13.59` followed by `.`.
        let stamp = match_stamp("2021-09-21T13.59.59_file.txt").expect("must match");
        assert_eq!(stamp.kind, StampKind::WithTimeSeconds);
        assert_eq!(stamp.consumed_len, "2021-09-21T13.59.59_".len());
        assert_eq!(stamp.remainder("2021-09-21T13.59.59_file.txt"), "file.txt");
    }

    #[test]
    fn standard_stamp_is_never_read_as_month() {
        let month = CATALOG
            .iter()
            .find(|m| m.kind() == StampKind::Month)
            .expect("month matcher");
        assert!(month.try_match("2021-09-21_report.txt").is_none());
        assert!(month.try_match("2021-09-21x").is_none());
        assert!(month.try_match("2021-09-report.txt").is_some());
        assert!(month.try_match("2021-09 report.txt").is_some());
    }

    #[test]
    fn extracts_named_fields_and_separators() {
        let stamp = match_stamp("2021-09-21 13:05-07 notes.md").expect("must match");
        assert_eq!(stamp.kind, StampKind::WithTimeSeconds);
        assert_eq!(stamp.fields.year, 2021);
        assert_eq!(stamp.fields.month, 9);
        assert_eq!(stamp.fields.day, 21);
        let time = stamp.fields.time.expect("time fields");
        assert_eq!((time.hour, time.minute, time.second), (13, 5, Some(7)));
        let seps = stamp.separators.expect("separators");
        assert_eq!(seps.date_time, ' ');
        assert_eq!(seps.hour_minute, ':');
        assert_eq!(seps.minute_second, Some('-'));
        assert_eq!(stamp.delimiter, ' ');
    }

    #[test]
    fn short_stamp_widens_year() {
        let stamp = match_stamp("991231-party").expect("must match");
        assert_eq!(stamp.kind, StampKind::Short);
        assert_eq!(stamp.fields.year, 1999);
        assert_eq!(stamp.delimiter, '-');
    }

    #[test]
    fn month_stamp_has_unknown_day() {
        let stamp = match_stamp("2021-09_file.txt").expect("must match");
        assert_eq!(stamp.fields.day, 0);
        assert_eq!(stamp.consumed_len, 8);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(kind_of("2021-13-01_x"), None);
        assert_eq!(kind_of("2021-12-32_x"), None);
        assert_eq!(kind_of("2021-12-31T24.00.00_x"), None);
        assert_eq!(
            kind_of("2021-12-31T23.60_x"),
            None,
            "minute 60 must not fall back to a date-only match"
        );
    }

    #[test]
    fn only_ascii_digits_form_a_stamp() {
        assert_eq!(kind_of("2021-09-2\u{0663}_x"), None);
        assert_eq!(kind_of("2021092\u{0661}_x"), None);
        assert_eq!(kind_of("2021-09-21T1\u{0663}.59_x"), None);
        assert_eq!(kind_of("\u{0662}\u{0660}2109_x"), None);
        assert_eq!(classify("2021092\u{0661}_x"), NameClass::Unrecognized);
    }

    #[test]
    fn requires_a_delimiter_after_the_stamp() {
        assert_eq!(kind_of("2021-09-21"), None);
        assert_eq!(kind_of("20210921report"), None);
    }

    #[test]
    fn classify_separates_missing_and_unknown_stamps() {
        assert_eq!(classify("report.txt"), NameClass::NoStamp);
        assert_eq!(classify("123 report.txt"), NameClass::Unrecognized);
        assert!(matches!(
            classify("2021-09-21_report.txt"),
            NameClass::Stamped(_)
        ));
    }
}
