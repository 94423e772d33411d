//! Order report rendering.
//!
//! Each submitted order produces a tabular CSV report: one row per line
//! item plus a trailing total row. The report is attached to the operator
//! notification email.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use feather_core::{AccountId, OrderId};

/// One rendered line of an order report.
#[derive(Debug, Clone)]
pub struct ReportLine {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A rendered order report, ready to be serialized and dispatched.
#[derive(Debug, Clone)]
pub struct OrderReport {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub account_id: AccountId,
    pub account_name: String,
    pub account_email: Option<String>,
    pub lines: Vec<ReportLine>,
    pub total: Decimal,
}

const CSV_HEADER: &str =
    "order_date,customer_id,customer_name,customer_email,sku,product_name,quantity,unit_price,line_total";

impl OrderReport {
    /// Attachment filename for this report.
    #[must_use]
    pub fn filename(&self) -> String {
        format!("order-{}.csv", self.order_id)
    }

    /// Render the report as CSV: a header, one row per line item, and a
    /// trailing total row.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let date = self.order_date.format("%Y-%m-%d").to_string();
        let email = self.account_email.as_deref().unwrap_or_default();

        let mut out = String::from(CSV_HEADER);
        out.push('\n');

        for line in &self.lines {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                csv_field(&date),
                self.account_id,
                csv_field(&self.account_name),
                csv_field(email),
                csv_field(&line.sku),
                csv_field(&line.name),
                line.quantity,
                line.unit_price,
                line.line_total,
            ));
        }

        out.push_str(&format!(
            "{},{},{},{},,TOTAL,,,{}\n",
            csv_field(&date),
            self.account_id,
            csv_field(&self.account_name),
            csv_field(email),
            self.total,
        ));

        out
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
