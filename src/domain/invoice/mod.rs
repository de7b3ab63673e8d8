//! Invoice module - e-invoice content and the signing session.

mod amounts;
mod draft;
mod session;

pub use amounts::{InvoiceAmounts, ROUNDING, TAX_PERCENTAGE};
pub use draft::{Buyer, InvoiceDraft, NOT_AVAILABLE};
pub use session::{
    AccessToken, HashString, InvoiceSigningSession, SignedInvoice, MAX_LOGINS_PER_INVOICE,
};
