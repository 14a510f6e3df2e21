use crate::domain::model::{Dataset, Record, Transaction};
use crate::utils::error::{EtlError, Result};

/// 將 CSV 位元組解析成 Dataset：標頭列 + 每列原始欄位與型別化交易
pub fn load_dataset(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    // 型別解析時去除欄位前後空白，原始欄位保持不變
    let trimmed_headers = trimmed(&headers);

    let mut records = Vec::new();
    for row in reader.records() {
        let fields = row?;
        let line = fields.position().map(|p| p.line()).unwrap_or(0);

        let transaction: Transaction = trimmed(&fields)
            .deserialize(Some(&trimmed_headers))
            .map_err(|e| EtlError::RecordParseError {
                line,
                message: describe_deserialize_error(&e),
            })?;

        records.push(Record {
            fields,
            transaction,
        });
    }

    tracing::debug!(
        "Parsed {} records with {} columns",
        records.len(),
        headers.len()
    );

    Ok(Dataset { headers, records })
}

fn trimmed(record: &csv::StringRecord) -> csv::StringRecord {
    let mut copy = record.clone();
    copy.trim();
    copy
}

fn describe_deserialize_error(error: &csv::Error) -> String {
    match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(index) => format!("field {}: {}", index + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => error.to_string(),
    }
}
