use crate::domain::model::{Breakdown, Chart, ChartKind};

fn chart(name: &str, kind: ChartKind, title: &str, x: &str, y: &str, data: Breakdown) -> Chart {
    Chart {
        name: name.to_string(),
        kind,
        title: title.to_string(),
        x_label: x.to_string(),
        y_label: y.to_string(),
        points: data.into_points(),
    }
}

pub fn branch_sales_chart(branch_sales: Breakdown) -> Chart {
    chart(
        "branch_sales",
        ChartKind::Line,
        "Total Sales by Branch",
        "Branch",
        "Total Sales",
        branch_sales,
    )
}

pub fn gender_revenue_chart(gender_revenue: Breakdown) -> Chart {
    chart(
        "gender_revenue",
        ChartKind::Line,
        "Revenue by Gender",
        "Gender",
        "Revenue",
        gender_revenue,
    )
}

pub fn product_line_quantities_chart(quantities: Breakdown) -> Chart {
    chart(
        "product_line_quantities",
        ChartKind::Bar,
        "Average Quantity Sold by Product Line",
        "Product Line",
        "Average Quantity",
        quantities,
    )
}

pub fn payment_methods_chart(payment_counts: Breakdown) -> Chart {
    chart(
        "payment_methods",
        ChartKind::Bar,
        "Payment Method Frequency",
        "Payment Method",
        "Frequency",
        payment_counts,
    )
}
