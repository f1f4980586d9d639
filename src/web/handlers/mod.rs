//! HTML rendering and form action handlers for the web dashboard.

mod dashboard;
mod invoices;
mod login;

pub use dashboard::dashboard_handler;
pub use invoices::{
    create_invoice_handler, create_invoice_page_handler, delete_invoice_form_handler,
    delete_invoice_handler, edit_invoice_page_handler, invoices_handler, update_invoice_handler,
};
pub use login::{login_handler, login_page_handler, logout_handler};
