use chrono::{Local, NaiveDate};

/// Canonical storage format for expense dates.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Header token of the date column. Rows carrying it are treated as blank.
pub const DATE_HEADER_TOKEN: &str = "date";

/// An accepted input layout. `year_last` tells where the four-digit year sits.
struct DatePattern {
    format: &'static str,
    separator: char,
    year_last: bool,
}

/// Accepted input layouts, in priority order. The first one that parses wins.
const INPUT_PATTERNS: [DatePattern; 4] = [
    DatePattern {
        format: "%Y-%m-%d",
        separator: '-',
        year_last: false,
    },
    DatePattern {
        format: "%d-%m-%Y",
        separator: '-',
        year_last: true,
    },
    DatePattern {
        format: "%m/%d/%Y",
        separator: '/',
        year_last: true,
    },
    DatePattern {
        format: "%d/%m/%Y",
        separator: '/',
        year_last: true,
    },
];

impl DatePattern {
    fn parse(&self, input: &str) -> Option<NaiveDate> {
        // chrono accepts any number of year digits; the ledger only ever
        // carries four-digit years.
        let year = if self.year_last {
            input.rsplit(self.separator).next()
        } else {
            input.split(self.separator).next()
        }?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(input, self.format).ok()
    }
}

/// Parse `input` against the accepted layouts without any fallback.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    INPUT_PATTERNS.iter().find_map(|pattern| pattern.parse(input))
}

/// Normalize a date string to `YYYY-MM-DD`.
///
/// Returns `None` for an empty value or the header token `date`. Input that
/// matches none of the accepted layouts is replaced with today's local date.
pub fn normalize_date(input: &str) -> Option<String> {
    normalize_date_on(input, Local::now().date_naive())
}

/// Normalize the date of a new ledger entry.
///
/// Unlike [`normalize_date`] this never yields a blank value: an empty input
/// gets today's date like any other unrecognized input.
pub fn normalize_entry_date(input: &str) -> String {
    let today = Local::now().date_naive();
    normalize_date_on(input, today)
        .unwrap_or_else(|| today.format(CANONICAL_DATE_FORMAT).to_string())
}

/// Same as [`normalize_date`], with an explicit fallback date.
pub fn normalize_date_on(input: &str, today: NaiveDate) -> Option<String> {
    if input.is_empty() || input == DATE_HEADER_TOKEN {
        return None;
    }

    let date = match parse_date(input) {
        Some(date) => date,
        None => {
            log::warn!("unrecognized date {input:?}, substituting {today}");
            today
        }
    };
    Some(date.format(CANONICAL_DATE_FORMAT).to_string())
}
