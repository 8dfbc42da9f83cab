use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Current time truncated to the microsecond precision Postgres stores, so a
/// value echoed back by a client compares equal to the stored one.
pub(crate) fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    let micros = now.microsecond();
    now.replace_microsecond(micros).unwrap_or(now)
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}
