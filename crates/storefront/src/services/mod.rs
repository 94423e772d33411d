//! Business services layered over the repositories.

pub mod accounts;
pub mod auth;
pub mod email;
pub mod orders;
pub mod report;

pub use accounts::{ConnectError, ConnectedUser, connect_account};
pub use auth::{AuthError, AuthService};
pub use email::{LogNotifier, NotifyError, OrderNotifier, SmtpNotifier};
pub use orders::{OrderError, OrderReceipt, OrderService};
pub use report::{OrderReport, ReportLine};
