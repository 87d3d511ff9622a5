use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Sentinel returned by `detect_time_format` for RFC 3339 timestamps
/// (e.g. `2021-03-04T10:11:12.345Z`).
pub const RFC3339_FORMAT: &str = "__rfc3339__";

/// Formats tried on the `time` column. On equal scores the earlier one wins.
pub const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%a %b %e %H:%M:%S %Y",
    "%Y%m%d-%H%M%S",
    "%Y-%m-%d",
];

/// First and last measurement time of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

/// Pick the format that parses the largest share of `values`.
pub fn detect_time_format<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'static str> {
    let sample: Vec<&str> = values
        .into_iter()
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();
    if sample.is_empty() {
        return None;
    }

    let score = |fmt: &str| sample.iter().filter(|s| parse_time(s, fmt).is_some()).count();

    let mut best: Option<&'static str> = None;
    let mut best_score = score(RFC3339_FORMAT);
    if best_score > 0 {
        best = Some(RFC3339_FORMAT);
    }
    for &fmt in TIME_FORMATS {
        let s = score(fmt);
        if s > best_score {
            best_score = s;
            best = Some(fmt);
        }
    }
    best
}

pub fn parse_time(value: &str, format: &str) -> Option<NaiveDateTime> {
    if format == RFC3339_FORMAT {
        return DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .ok()?
                .and_hms_opt(0, 0, 0)
        })
}

/// Earliest and latest parseable time among `values`, if any parse.
pub fn time_span<'a>(values: impl IntoIterator<Item = &'a str> + Clone) -> Option<TimeSpan> {
    let format = detect_time_format(values.clone())?;
    let mut parsed = values.into_iter().filter_map(|v| parse_time(v, format));
    let first = parsed.next()?;
    let (first, last) = parsed.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
    Some(TimeSpan { first, last })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_iso_like_format() {
        let values = ["2021-03-04 10:11:12", "2021-03-05 08:00:00"];
        assert_eq!(
            detect_time_format(values.iter().copied()),
            Some("%Y-%m-%d %H:%M:%S")
        );
    }

    #[test]
    fn detects_rfc3339() {
        let values = ["2021-03-04T10:11:12Z", "2021-03-04T10:11:13.5+01:00"];
        assert_eq!(
            detect_time_format(values.iter().copied()),
            Some(RFC3339_FORMAT)
        );
    }

    #[test]
    fn span_covers_unordered_values() {
        let values = [
            "2021-03-05 08:00:00",
            "2021-03-04 10:11:12",
            "garbage",
            "2021-03-04 23:59:59",
        ];
        let span = time_span(values.iter().copied()).unwrap();
        assert_eq!(span.first.to_string(), "2021-03-04 10:11:12");
        assert_eq!(span.last.to_string(), "2021-03-05 08:00:00");
    }

    #[test]
    fn unparseable_column_has_no_span() {
        let values = ["t0", "t1"];
        assert!(time_span(values.iter().copied()).is_none());
    }
}
