use crate::stamp::{StampFields, StampStyle};
use tracing::{info, warn};

/// Renders `fields` in the given output style.
///
/// A month stamp drops the day. A date-time stamp needs time fields; when
/// they are missing the standard date layout is written instead.
pub fn format_stamp(style: StampStyle, fields: &StampFields) -> String {
    match style {
        StampStyle::Short => format!(
            "{:02}{:02}{:02}",
            fields.year.rem_euclid(100),
            fields.month,
            fields.day
        ),
        StampStyle::Compact => format!("{:04}{:02}{:02}", fields.year, fields.month, fields.day),
        StampStyle::Standard => standard_date(fields),
        StampStyle::Month => {
            if fields.day != 0 {
                info!(
                    "day {:02} is dropped for a year-month stamp",
                    fields.day
                );
            }
            format!("{:04}-{:02}", fields.year, fields.month)
        }
        StampStyle::WithTime => match fields.time {
            Some(time) => {
                let mut out = format!(
                    "{}T{:02}.{:02}",
                    standard_date(fields),
                    time.hour,
                    time.minute
                );
                if let Some(second) = time.second {
                    out.push_str(&format!(".{:02}", second));
                }
                out
            }
            None => {
                warn!("conversion to a date-time stamp is not supported; using the standard date layout");
                standard_date(fields)
            }
        },
    }
}

/// Delimiter placed between a new stamp and `rest`. An empty configured
/// delimiter counts as not configured.
pub fn choose_delimiter<'a>(rest: &str, configured: Option<&'a str>) -> &'a str {
    match configured {
        Some(delimiter) if !delimiter.is_empty() => delimiter,
        _ if rest.contains(' ') => " ",
        _ => "_",
    }
}

fn standard_date(fields: &StampFields) -> String {
    format!("{:04}-{:02}-{:02}", fields.year, fields.month, fields.day)
}
