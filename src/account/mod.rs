mod crud;
mod listing;
mod types;

pub use crud::{add_account, delete_account, list_accounts, reset_password, AccountError};
pub use listing::parse_account_listing;
pub use types::AccountRecord;
