//! Helpers shared by the CSV download endpoints.

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::Error;

/// Finish `writer` and return the CSV text it produced.
///
/// # Errors
/// Returns [Error::CsvError] if the buffered rows cannot be flushed.
pub(crate) fn into_csv_text(writer: csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// A response that browsers save as the file `filename`.
pub(crate) fn csv_attachment(filename: &str, csv_text: String) -> Response {
    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv_text,
    )
        .into_response()
}
