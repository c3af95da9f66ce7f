use super::listing::parse_account_listing;
use super::types::AccountRecord;
use crate::settings::DaemonSettings;
use crate::system::CommandRunner;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Account tool exited with status {code:?}: {detail}")]
    ToolFailed { code: Option<i32>, detail: String },
}

/// List Samba accounts via the verbose listing command.
///
/// Callers that want the fail-soft behavior (empty list plus reported
/// error) map the `Err` arm themselves; the adapter reports what happened.
pub async fn list_accounts(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
) -> Result<Vec<AccountRecord>, AccountError> {
    let output = runner
        .run(&settings.pdbedit_bin, &["-L", "-v"])
        .await
        .map_err(|source| AccountError::Spawn {
            program: settings.pdbedit_bin.clone(),
            source,
        })?;

    if !output.success() {
        return Err(AccountError::ToolFailed {
            code: output.status_code,
            detail: output.stderr,
        });
    }

    Ok(parse_account_listing(&output.stdout))
}

/// Create a Samba account. The tool prompts for the password twice, so
/// both lines go down stdin before the exit status is read.
pub async fn add_account(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
    username: &str,
    password: &str,
) -> Result<(), AccountError> {
    let output = runner
        .run_with_input(
            &settings.smbpasswd_bin,
            &["-a", username],
            &confirmed_password(password),
        )
        .await
        .map_err(|source| AccountError::Spawn {
            program: settings.smbpasswd_bin.clone(),
            source,
        })?;

    if !output.success() {
        return Err(AccountError::ToolFailed {
            code: output.status_code,
            detail: output.stderr,
        });
    }

    info!("added account {username}");
    Ok(())
}

/// Delete a Samba account.
pub async fn delete_account(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
    username: &str,
) -> Result<(), AccountError> {
    let output = runner
        .run(&settings.smbpasswd_bin, &["-x", username])
        .await
        .map_err(|source| AccountError::Spawn {
            program: settings.smbpasswd_bin.clone(),
            source,
        })?;

    if !output.success() {
        return Err(AccountError::ToolFailed {
            code: output.status_code,
            detail: output.stderr,
        });
    }

    info!("deleted account {username}");
    Ok(())
}

/// Reset an account's password. Same confirmation protocol as
/// [`add_account`], against the bare password-change invocation.
pub async fn reset_password(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
    username: &str,
    password: &str,
) -> Result<(), AccountError> {
    let output = runner
        .run_with_input(
            &settings.smbpasswd_bin,
            &[username],
            &confirmed_password(password),
        )
        .await
        .map_err(|source| AccountError::Spawn {
            program: settings.smbpasswd_bin.clone(),
            source,
        })?;

    if !output.success() {
        return Err(AccountError::ToolFailed {
            code: output.status_code,
            detail: output.stderr,
        });
    }

    info!("reset password for {username}");
    Ok(())
}

fn confirmed_password(password: &str) -> String {
    format!("{password}\n{password}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_password_two_lines() {
        assert_eq!(confirmed_password("s3cret"), "s3cret\ns3cret\n");
    }
}
