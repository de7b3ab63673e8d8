//! Invoice handlers - e-invoice issuance for completed orders.

mod issue_invoice;

pub use issue_invoice::IssueInvoiceHandler;
