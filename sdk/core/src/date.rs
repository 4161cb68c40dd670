//! Date formatting used by the storage REST protocol.

use crate::error::{ErrorKind, ResultExt};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const RFC1123_FORMAT: &[FormatItem] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Format a date in the RFC 1123 form expected by the `x-ms-date` header.
///
/// The date is converted to UTC first.
pub fn to_rfc1123(date: &OffsetDateTime) -> crate::Result<String> {
    date.to_offset(UtcOffset::UTC)
        .format(RFC1123_FORMAT)
        .with_context(ErrorKind::DataConversion, || {
            format!("failed to format {date} as an RFC 1123 date")
        })
}
