//! Translation of moment/fecha style patterns (`YYYY-MM-DD HH:mm:ss.SSS`) into
//! chrono strftime patterns.
//!
//! Configuration files carry the token style used by most JavaScript logging
//! stacks. Patterns are translated once when a logger or file sink is built so
//! that every record only pays for `chrono`'s own formatting.

use chrono::{DateTime, TimeZone};

// Longest tokens first so `YYYY` wins over `YY` and `MMMM` over `MM`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DDDD", "%j"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("d", "%w"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
    ("X", "%s"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat {
    pattern: String,
    strftime: String,
}

impl TimeFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let strftime = translate(&pattern);

        Self { pattern, strftime }
    }

    /// The pattern as it was configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    pub fn format<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        time.format(&self.strftime).to_string()
    }
}

pub fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            // Bracketed text is copied verbatim, an unterminated bracket runs to the end.
            let body = &rest[1..];
            let (literal, next) = match body.find(']') {
                Some(end) => (&body[..end], &body[end + 1..]),
                None => (body, ""),
            };
            push_literal(&mut out, literal);
            rest = next;
            continue;
        }

        if c == 'S' {
            let run = rest.chars().take_while(|&ch| ch == 'S').count();
            out.push_str(match run {
                1..=3 => "%3f",
                4..=6 => "%6f",
                _ => "%9f",
            });
            rest = &rest[run..];
            continue;
        }

        if let Some((token, spec)) = TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            out.push_str(spec);
            rest = &rest[token.len()..];
            continue;
        }

        push_literal(&mut out, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate};

    use super::*;

    fn sample_time() -> DateTime<FixedOffset> {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_milli_opt(14, 5, 9, 42)
            .unwrap();
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .from_local_datetime(&naive)
            .unwrap()
    }

    #[test]
    fn translates_default_time_format() {
        assert_eq!(translate("YYYY-MM-DD HH:mm:ss.SSS"), "%Y-%m-%d %H:%M:%S.%3f");
        assert_eq!(
            TimeFormat::new("YYYY-MM-DD HH:mm:ss.SSS").format(&sample_time()),
            "2024-03-07 14:05:09.042"
        );
    }

    #[test]
    fn translates_date_pattern() {
        assert_eq!(TimeFormat::new("YYYY-MM-DD").format(&sample_time()), "2024-03-07");
        assert_eq!(TimeFormat::new("YYYY-MM-DD-HH").format(&sample_time()), "2024-03-07-14");
    }

    #[test]
    fn short_and_named_tokens() {
        let time = sample_time();
        assert_eq!(TimeFormat::new("D/M/YY").format(&time), "7/3/24");
        assert_eq!(TimeFormat::new("ddd, MMM").format(&time), "Thu, Mar");
        assert_eq!(TimeFormat::new("hh:mm A").format(&time), "02:05 PM");
        assert_eq!(TimeFormat::new("Z").format(&time), "+02:00");
    }

    #[test]
    fn brackets_and_percent_are_literal() {
        assert_eq!(translate("[at] HH[h] 100%"), "at %Hh 100%%");
        assert_eq!(TimeFormat::new("[YYYY] YYYY").format(&sample_time()), "YYYY 2024");
    }

    #[test]
    fn fractional_widths() {
        assert_eq!(translate("S"), "%3f");
        assert_eq!(translate("SSSSSS"), "%6f");
        assert_eq!(translate("SSSSSSSSS"), "%9f");
    }

    #[test]
    fn keeps_configured_pattern() {
        let format = TimeFormat::new("YYYY");
        assert_eq!(format.pattern(), "YYYY");
        assert_eq!(format.strftime(), "%Y");
    }
}
