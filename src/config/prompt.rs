use crate::domain::model::SaleFilter;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_threshold;
use std::io::{BufRead, Write};

/// 互動式選擇匯出篩選條件。
///
/// 無效的選單選項會回傳 [`SaleFilter::Skip`]；門檻值無法解析則回傳錯誤。
pub fn prompt_filter<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<SaleFilter> {
    writeln!(output, "Select a filter for saving data:")?;
    writeln!(output, "1. Total Sale above a threshold")?;
    writeln!(output, "2. Sales Rating above a threshold")?;

    let choice = ask(input, output, "Enter your choice (1 or 2): ")?;
    let filter = match choice.as_deref() {
        Some("1") => {
            SaleFilter::TotalSaleAbove(ask_threshold(input, output, "Enter the Total Sale threshold: ")?)
        }
        Some("2") => {
            SaleFilter::RatingAbove(ask_threshold(input, output, "Enter the Sales Rating threshold: ")?)
        }
        other => {
            tracing::warn!("Invalid filter choice {:?}", other.unwrap_or(""));
            writeln!(output, "Invalid choice. No data saved.")?;
            SaleFilter::Skip
        }
    };

    Ok(filter)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask_threshold<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<f64> {
    let answer = ask(input, output, question)?.unwrap_or_default();
    let threshold: f64 = answer.parse().map_err(|_| EtlError::ValidationError {
        message: format!("'{}' is not a valid threshold", answer),
    })?;
    validate_threshold("threshold", threshold)?;
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(answers: &str) -> (Result<SaleFilter>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = prompt_filter(&mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_total_sale_choice() {
        let (result, output) = run("1\n250.5\n");
        assert_eq!(result.unwrap(), SaleFilter::TotalSaleAbove(250.5));
        assert!(output.contains("1. Total Sale above a threshold"));
        assert!(output.contains("Enter the Total Sale threshold: "));
    }

    #[test]
    fn test_rating_choice() {
        let (result, _) = run(" 2 \n9\n");
        assert_eq!(result.unwrap(), SaleFilter::RatingAbove(9.0));
    }

    #[test]
    fn test_invalid_choice_skips_export() {
        let (result, output) = run("3\n");
        assert_eq!(result.unwrap(), SaleFilter::Skip);
        assert!(output.contains("Invalid choice. No data saved."));
    }

    #[test]
    fn test_closed_input_skips_export() {
        let (result, _) = run("");
        assert_eq!(result.unwrap(), SaleFilter::Skip);
    }

    #[test]
    fn test_unparseable_threshold_is_an_error() {
        let (result, _) = run("1\nlots\n");
        assert!(matches!(result, Err(EtlError::ValidationError { .. })));
    }
}
