use std::io::Write;

use serde::Serialize;

use super::domain::ApplicationRecord;

/// Flat CSV projection of a stored record, columns in storage order.
#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    id: i64,
    loan_id: &'a str,
    gender: &'a str,
    married: &'a str,
    dependents: &'a str,
    education: &'a str,
    self_employed: &'a str,
    applicant_income: f64,
    coapplicant_income: f64,
    loan_amount: f64,
    loan_amount_term: u32,
    credit_history: u8,
    property_area: &'a str,
    predicted_status: &'static str,
    prediction_confidence: f64,
    created_at: String,
}

impl<'a> From<&'a ApplicationRecord> for HistoryRow<'a> {
    fn from(record: &'a ApplicationRecord) -> Self {
        let application = &record.application;
        Self {
            id: record.id.0,
            loan_id: &record.loan_id.0,
            gender: &application.gender,
            married: &application.married,
            dependents: &application.dependents,
            education: &application.education,
            self_employed: &application.self_employed,
            applicant_income: application.applicant_income,
            coapplicant_income: application.coapplicant_income,
            loan_amount: application.loan_amount,
            loan_amount_term: application.loan_amount_term,
            credit_history: application.credit_history,
            property_area: &application.property_area,
            predicted_status: record.prediction.predicted_status.code(),
            prediction_confidence: record.prediction.prediction_confidence,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Writes records as CSV with a header row, in the order given.
pub fn write_history_csv<W: Write>(
    records: &[ApplicationRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(HistoryRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}
