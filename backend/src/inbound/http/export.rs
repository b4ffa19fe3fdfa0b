//! Tabular export of registrations.

use tracing::error;

use crate::domain::{Error, Registration};

/// Header row of the CSV export.
pub const CSV_HEADER: [&str; 5] = ["First Name", "Last Name", "Email", "Phone", "Created At"];

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `records` as CSV with a header row, one line per registration.
///
/// Fields are quoted by the writer whenever they contain separators, quotes,
/// or line breaks. Creation times are rendered in UTC.
///
/// # Examples
/// ```
/// use registration::inbound::http::export::registrations_to_csv;
///
/// let csv = registrations_to_csv(&[]).unwrap();
/// assert_eq!(csv, b"First Name,Last Name,Email,Phone,Created At\n");
/// ```
pub fn registrations_to_csv(records: &[Registration]) -> Result<Vec<u8>, Error> {
    let fail = |err: &dyn std::fmt::Display| {
        error!(error = %err, "csv export failed");
        Error::internal("failed to render csv export")
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(|err| fail(&err))?;
    for record in records {
        let created_at = record.created_at().format(CREATED_AT_FORMAT).to_string();
        writer
            .write_record([
                record.first_name(),
                record.last_name(),
                record.email(),
                record.phone(),
                created_at.as_str(),
            ])
            .map_err(|err| fail(&err))?;
    }
    writer.into_inner().map_err(|err| fail(&err))
}
