mod crud;
pub mod name;
mod types;

pub use crud::{add_share, delete_share, edit_share, get_share, list_shares, ShareError};
pub use name::RESERVED_SECTIONS;
pub use types::{ShareRecord, UpdateShareFields};
