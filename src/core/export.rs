use crate::domain::model::{Dataset, Record, Summary};
use crate::utils::error::{EtlError, Result};

pub const SUMMARY_TITLE: &str = "Analysis Summary";

/// 依條件輸出篩選後的 CSV：標頭列加上符合條件的原始列，欄位順序不變
pub fn save_filtered_data<F>(data: &Dataset, predicate: F) -> Result<(Vec<u8>, usize)>
where
    F: Fn(&Record) -> bool,
{
    if data.is_empty() {
        return Err(EtlError::empty_dataset("save_filtered_data"));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&data.headers)?;

    let mut written = 0;
    for record in data.records.iter().filter(|r| predicate(r)) {
        writer.write_record(&record.fields)?;
        written += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;

    tracing::debug!("Filtered {} of {} records", written, data.len());
    Ok((bytes, written))
}

/// 純文字摘要：標題、分隔線，接著每個項目一行 `label: value`
pub fn write_summary(summary: &Summary) -> String {
    let mut lines = vec![
        SUMMARY_TITLE.to_string(),
        "=".repeat(SUMMARY_TITLE.len()),
    ];
    for (label, value) in summary.entries() {
        lines.push(format!("{}: {}", label, value));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn summary_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::load_dataset;
    use crate::domain::model::Breakdown;

    const CSV: &str = "\
Branch,City,Customer type,Gender,Product line,Unit price,Quantity,Tax 5%,Total sale,Time,Payment,gross margin percentage,Rating
A,Yangon,Member,Female,Health and beauty,74.69,7,26.1415,548.9715,13:08,Ewallet,4.761904762,9.1
C,Naypyitaw,Normal,Female,Electronic accessories,15.28,5,3.82,80.22,10:29,Cash,4.761904762,9.6
A,Yangon,Normal,Male,\"Home and lifestyle\",46.33,7,16.2155,340.5255,13:23,Credit card,4.761904762,7.4
";

    #[test]
    fn test_save_filtered_data_keeps_header_and_matching_rows() {
        let dataset = load_dataset(CSV.as_bytes()).unwrap();

        let (bytes, written) =
            save_filtered_data(&dataset, |r| r.transaction.total_sale > 100.0).unwrap();

        assert_eq!(written, 2);
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Branch,City,Customer type"));
        assert!(lines[1].starts_with("A,Yangon,Member"));
        assert!(lines[2].contains("Home and lifestyle"));
    }

    #[test]
    fn test_save_filtered_data_with_no_matches_writes_header_only() {
        let dataset = load_dataset(CSV.as_bytes()).unwrap();

        let (bytes, written) = save_filtered_data(&dataset, |_| false).unwrap();

        assert_eq!(written, 0);
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_save_filtered_data_rejects_empty_dataset() {
        let dataset = load_dataset(CSV.lines().next().unwrap().as_bytes()).unwrap();
        assert!(matches!(
            save_filtered_data(&dataset, |_| true),
            Err(EtlError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn test_write_summary_format() {
        let mut breakdown = Breakdown::new();
        breakdown.push("Male", 10.0);
        breakdown.push("Female", 2.5);

        let mut summary = Summary::new();
        summary.insert("Total Sales", 12.5);
        summary.insert("Highest Sales Branch", "A".to_string());
        summary.insert("Peak Transaction Hour", 9u32);
        summary.insert("Revenue by Gender", breakdown);

        assert_eq!(
            write_summary(&summary),
            "Analysis Summary\n\
             ================\n\
             Total Sales: 12.5\n\
             Highest Sales Branch: A\n\
             Peak Transaction Hour: 9\n\
             Revenue by Gender: {Male: 10, Female: 2.5}\n"
        );
    }

    #[test]
    fn test_summary_json_preserves_order() {
        let mut summary = Summary::new();
        summary.insert("Total Sales", 1.5);
        summary.insert("Average Sales", 0.75);

        let json = summary_json(&summary).unwrap();
        let total = json.find("Total Sales").unwrap();
        let average = json.find("Average Sales").unwrap();
        assert!(total < average);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Average Sales"], serde_json::json!(0.75));
    }
}
