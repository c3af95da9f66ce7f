pub mod account;
pub mod conf;
pub mod identity;
pub mod server;
pub mod settings;
pub mod share;
pub mod system;

// Re-export commonly used types
pub use account::{
    add_account, delete_account, list_accounts, parse_account_listing, reset_password,
    AccountError, AccountRecord,
};
pub use conf::{ConfDocument, ConfError, ConfSection};
pub use identity::{Identity, IdentityProvider, StaticIdentityProvider};
pub use server::SmbAdminService;
pub use settings::{read_settings, write_settings, DaemonSettings, SettingsError};
pub use share::{
    add_share, delete_share, edit_share, get_share, list_shares, ShareError, ShareRecord,
    UpdateShareFields, RESERVED_SECTIONS,
};
pub use system::{
    restart_services, CommandOutput, CommandRunner, MockRunner, SystemError, SystemRunner,
};
