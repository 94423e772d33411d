//! Order report delivery.
//!
//! The SMTP notifier mirrors the storefront's transactional mail setup:
//! lettre over STARTTLS with a bounded timeout, an askama-rendered
//! text/HTML body, and the CSV report attached. When SMTP is not
//! configured, [`LogNotifier`] writes the report to the log instead so
//! order submission still completes in development.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

use super::report::OrderReport;

/// HTML template for the order report email body.
#[derive(Template)]
#[template(path = "email/order_report.html")]
struct OrderReportEmailHtml<'a> {
    report: &'a OrderReport,
}

/// Plain text template for the order report email body.
#[derive(Template)]
#[template(path = "email/order_report.txt")]
struct OrderReportEmailText<'a> {
    report: &'a OrderReport,
}

/// Errors that can occur when dispatching an order report.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid attachment content type.
    #[error("Invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Dispatches an order report to the operator.
///
/// Order submission depends on this seam rather than a concrete transport
/// so the workflow can be exercised without a mail relay.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Deliver the report. Failure after the order has committed surfaces
    /// to the caller as a notification error, never as an order rollback.
    async fn deliver(&self, report: &OrderReport) -> Result<(), NotifyError>;
}

/// SMTP-backed order notifier.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notify_address: String,
}

impl SmtpNotifier {
    /// Create a new SMTP notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay address cannot be resolved.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notify_address: config.notify_address.clone(),
        })
    }
}

#[async_trait]
impl OrderNotifier for SmtpNotifier {
    async fn deliver(&self, report: &OrderReport) -> Result<(), NotifyError> {
        let html = OrderReportEmailHtml { report }.render()?;
        let text = OrderReportEmailText { report }.render()?;

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .notify_address
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(self.notify_address.clone()))?)
            .subject(format!(
                "Order #{} - {}",
                report.order_id, report.account_name
            ))
            .multipart(
                MultiPart::mixed()
                    .multipart(
                        MultiPart::alternative()
                            .singlepart(
                                SinglePart::builder()
                                    .header(ContentType::TEXT_PLAIN)
                                    .body(text),
                            )
                            .singlepart(
                                SinglePart::builder()
                                    .header(ContentType::TEXT_HTML)
                                    .body(html),
                            ),
                    )
                    .singlepart(
                        Attachment::new(report.filename())
                            .body(report.to_csv(), ContentType::parse("text/csv")?),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(
            order_id = %report.order_id,
            to = %self.notify_address,
            "Order report dispatched"
        );
        Ok(())
    }
}

/// Fallback notifier that writes the report to the log.
pub struct LogNotifier;

#[async_trait]
impl OrderNotifier for LogNotifier {
    async fn deliver(&self, report: &OrderReport) -> Result<(), NotifyError> {
        tracing::info!(
            order_id = %report.order_id,
            account = %report.account_name,
            total = %report.total,
            "SMTP not configured; order report logged only"
        );
        tracing::debug!(report = %report.to_csv(), "Order report body");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use feather_core::{AccountId, OrderId};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::services::report::ReportLine;

    fn sample_report() -> OrderReport {
        OrderReport {
            order_id: OrderId::new(12),
            order_date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            account_id: AccountId::new(101),
            account_name: "Fresh Farm Market".to_string(),
            account_email: Some("buyer@freshfarm.example".to_string()),
            lines: vec![ReportLine {
                sku: "ALM002".to_string(),
                name: "Almond Milk".to_string(),
                quantity: 3,
                unit_price: Decimal::from_str("3.49").unwrap(),
                line_total: Decimal::from_str("10.47").unwrap(),
            }],
            total: Decimal::from_str("10.47").unwrap(),
        }
    }

    #[test]
    fn test_text_template_renders() {
        let report = sample_report();
        let text = OrderReportEmailText { report: &report }.render().unwrap();
        assert!(text.contains("Order #12"));
        assert!(text.contains("Fresh Farm Market"));
        assert!(text.contains("10.47"));
        assert!(text.contains("order-12.csv"));
    }

    #[test]
    fn test_html_template_renders() {
        let report = sample_report();
        let html = OrderReportEmailHtml { report: &report }.render().unwrap();
        assert!(html.contains("Almond Milk"));
        assert!(html.contains("3.49"));
        assert!(html.contains("order-12.csv"));
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let report = sample_report();
        assert!(LogNotifier.deliver(&report).await.is_ok());
    }
}
