//! Parser for the account tool's verbose listing output.
//!
//! The format is an external contract we do not control: line-oriented
//! text where a `Unix username:` line opens a new record and the
//! `Account Flags:` / `User SID:` lines that follow populate it. Keeping
//! the parser a pure function over captured stdout keeps that fragility
//! behind one seam.

use super::types::AccountRecord;

const USERNAME_PREFIX: &str = "Unix username:";
const FLAGS_PREFIX: &str = "Account Flags:";
const SID_PREFIX: &str = "User SID:";

/// Parse verbose listing output into account records. Unrecognized lines
/// are ignored; a recurring username line starts the next record.
pub fn parse_account_listing(output: &str) -> Vec<AccountRecord> {
    let mut accounts = Vec::new();
    let mut current: Option<AccountRecord> = None;

    for raw in output.lines() {
        let line = raw.trim();

        if let Some(rest) = line.strip_prefix(USERNAME_PREFIX) {
            if let Some(done) = current.take() {
                accounts.push(done);
            }
            current = Some(AccountRecord {
                username: rest.trim().to_string(),
                ..Default::default()
            });
        } else if let Some(rest) = line.strip_prefix(FLAGS_PREFIX) {
            if let Some(account) = current.as_mut() {
                account.flags = rest.trim().to_string();
            }
        } else if let Some(rest) = line.strip_prefix(SID_PREFIX) {
            if let Some(account) = current.as_mut() {
                account.sid = rest.trim().to_string();
            }
        }
    }

    if let Some(done) = current {
        accounts.push(done);
    }

    accounts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_account() {
        let output = "\
Unix username:        alice
NT username:
Account Flags:        [U          ]
User SID:             S-1-5-21-111-222-333-1001
Primary Group SID:    S-1-5-21-111-222-333-513
";
        let accounts = parse_account_listing(output);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "alice");
        assert_eq!(accounts[0].flags, "[U          ]");
        assert_eq!(accounts[0].sid, "S-1-5-21-111-222-333-1001");
    }

    #[test]
    fn test_parse_two_accounts_scopes_fields() {
        let output = "\
Unix username:        alice
Account Flags:        [U          ]
User SID:             S-1-5-21-111-222-333-1001
Unix username:        bob
Account Flags:        [DU         ]
User SID:             S-1-5-21-111-222-333-1002
";
        let accounts = parse_account_listing(output);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].username, "alice");
        assert_eq!(accounts[0].sid, "S-1-5-21-111-222-333-1001");
        assert_eq!(accounts[1].username, "bob");
        assert_eq!(accounts[1].flags, "[DU         ]");
        assert_eq!(accounts[1].sid, "S-1-5-21-111-222-333-1002");
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_account_listing("").is_empty());
    }

    #[test]
    fn test_parse_ignores_fields_before_first_username() {
        let output = "Account Flags: [U ]\nUser SID: S-1-5-21-0\nUnix username: carol\n";
        let accounts = parse_account_listing(output);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "carol");
        assert_eq!(accounts[0].flags, "");
        assert_eq!(accounts[0].sid, "");
    }

    #[test]
    fn test_parse_missing_trailing_fields() {
        let output = "Unix username: dave\n";
        let accounts = parse_account_listing(output);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "dave");
        assert_eq!(accounts[0].flags, "");
    }
}
