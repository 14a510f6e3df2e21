use sales_etl::core::aggregations::*;
use sales_etl::core::source::load_dataset;
use sales_etl::domain::model::Transaction;
use sales_etl::EtlError;

const SAMPLE: &str = include_str!("fixtures/sales_sample.csv");

const HEADER: &str = "Branch,City,Customer type,Gender,Product line,Unit price,Quantity,Tax 5%,Total sale,Time,Payment,gross margin percentage,Rating";

fn sample() -> Vec<Transaction> {
    load_dataset(SAMPLE.as_bytes()).unwrap().transactions()
}

/// 以 (branch, customer type, gender, unit price, total sale, time, rating) 組出資料
fn rows(rows: &[(&str, &str, &str, f64, f64, &str, f64)]) -> Vec<Transaction> {
    let mut csv = String::from(HEADER);
    for (branch, customer, gender, unit_price, total, time, rating) in rows {
        csv.push_str(&format!(
            "\n{},Yangon,{},{},Health and beauty,{},1,{},{},{},Cash,4.761904762,{}",
            branch,
            customer,
            gender,
            unit_price,
            total / 21.0,
            total,
            time,
            rating
        ));
    }
    load_dataset(csv.as_bytes()).unwrap().transactions()
}

#[test]
fn test_total_sales_is_order_independent() {
    let data = sample();
    let mut reversed = data.clone();
    reversed.reverse();

    let expected: f64 = data.iter().map(|t| t.total_sale).sum();
    assert!((total_sales(&data) - expected).abs() < 1e-9);
    assert!((total_sales(&reversed) - total_sales(&data)).abs() < 1e-9);
}

#[test]
fn test_average_sales_is_total_over_count() {
    let data = sample();
    let average = average_sales(&data).unwrap();
    assert!((average - total_sales(&data) / data.len() as f64).abs() < 1e-9);

    assert!(matches!(
        average_sales(&[]),
        Err(EtlError::EmptyDataset { .. })
    ));
}

#[test]
fn test_dominant_branch_wins_in_any_order() {
    let data = rows(&[
        ("A", "Member", "Male", 10.0, 100.0, "10:00", 7.0),
        ("B", "Member", "Male", 10.0, 90.0, "10:00", 7.0),
        ("B", "Member", "Male", 10.0, 30.0, "10:00", 7.0),
        ("C", "Member", "Male", 10.0, 50.0, "10:00", 7.0),
    ]);

    assert_eq!(highest_sales_branch(&data).unwrap(), "B");
    let mut reversed = data.clone();
    reversed.reverse();
    assert_eq!(highest_sales_branch(&reversed).unwrap(), "B");
    let mut rotated = data.clone();
    rotated.rotate_left(2);
    assert_eq!(highest_sales_branch(&rotated).unwrap(), "B");
}

#[test]
fn test_customer_type_proportion_three_to_one() {
    let data = rows(&[
        ("A", "Member", "Male", 10.0, 10.0, "10:00", 7.0),
        ("A", "Member", "Female", 10.0, 10.0, "10:00", 7.0),
        ("A", "Member", "Male", 10.0, 10.0, "10:00", 7.0),
        ("A", "Normal", "Female", 10.0, 10.0, "10:00", 7.0),
    ]);

    let proportion = customer_type_proportion(&data).unwrap();
    assert_eq!(proportion.get("Member"), Some(75.0));
    assert_eq!(proportion.get("Normal"), Some(25.0));
}

#[test]
fn test_high_rating_average_without_qualifying_rows_is_zero() {
    let data = rows(&[
        ("A", "Member", "Male", 10.0, 10.0, "10:00", 7.0),
        ("A", "Member", "Male", 10.0, 20.0, "10:00", 8.0),
    ]);

    assert_eq!(avg_high_rating_sales(&data, DEFAULT_RATING_THRESHOLD), 0.0);
}

#[test]
fn test_revenue_above_threshold_never_increases_with_threshold() {
    let data = sample();
    let mut previous = f64::INFINITY;
    for threshold in [0.0, 15.0, 36.26, 50.0, 58.22, 74.69, 86.0, 100.0] {
        let revenue = revenue_above_threshold(&data, threshold);
        assert!(revenue <= previous, "revenue rose at threshold {}", threshold);
        previous = revenue;
    }
    assert_eq!(revenue_above_threshold(&data, 100.0), 0.0);
}

#[test]
fn test_peak_hour_counts_leading_hour() {
    let data = rows(&[
        ("A", "Member", "Male", 10.0, 10.0, "09:15:00", 7.0),
        ("A", "Member", "Male", 10.0, 10.0, "09:40:00", 7.0),
        ("A", "Member", "Male", 10.0, 10.0, "14:00:00", 7.0),
    ]);

    assert_eq!(peak_transaction_hours(&data).unwrap(), 9);
}

#[test]
fn test_unrecognized_gender_is_a_data_error() {
    let csv = format!(
        "{}\nA,Yangon,Member,Other,Health and beauty,10.0,1,0.5,10.5,10:00,Cash,4.76,7.0",
        HEADER
    );

    let err = load_dataset(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, EtlError::RecordParseError { .. }));
    assert_eq!(
        err.category(),
        sales_etl::utils::error::ErrorCategory::Data
    );
}

#[test]
fn test_sample_breakdowns() {
    let data = sample();

    let by_branch = sales_by_branch(&data);
    assert_eq!(by_branch.labels(), vec!["A", "C", "B"]);
    assert!((by_branch.get("A").unwrap() - 2522.7615).abs() < 1e-6);

    let quantities = avg_quantity_by_product_line(&data);
    assert_eq!(quantities.get("Sports and travel"), Some(7.0));
    assert_eq!(quantities.get("Health and beauty"), Some(17.0 / 3.0));

    let gender = revenue_by_gender(&data);
    let total = gender.get("Male").unwrap() + gender.get("Female").unwrap();
    assert!((total - total_sales(&data)).abs() < 1e-9);

    assert_eq!(payment_method_counts(&data).get("Cash"), Some(1.0));
    assert!((average_gross_margin(&data).unwrap() - 4.761904762).abs() < 1e-9);
}
