mod common;

use common::create_test_dir;
use smbadmin_daemon::account::{
    add_account, delete_account, list_accounts, reset_password, AccountError,
};
use smbadmin_daemon::settings::DaemonSettings;
use smbadmin_daemon::system::MockRunner;

const PDBEDIT_TWO_USERS: &str = "\
Unix username:        alice
NT username:
Account Flags:        [U          ]
User SID:             S-1-5-21-111-222-333-1001
Primary Group SID:    S-1-5-21-111-222-333-513
Unix username:        bob
NT username:
Account Flags:        [DU         ]
User SID:             S-1-5-21-111-222-333-1002
";

fn test_settings() -> DaemonSettings {
    // The conf path is irrelevant for account operations; point it at
    // nothing to prove they never touch the file.
    let dir = create_test_dir();
    DaemonSettings {
        conf_path: dir.path().join("unused-smb.conf"),
        ..DaemonSettings::default()
    }
}

#[tokio::test]
async fn test_list_accounts_two_blocks() {
    let settings = test_settings();
    let runner = MockRunner::new();
    runner.script_stdout("pdbedit", PDBEDIT_TWO_USERS);

    let accounts = list_accounts(&settings, &runner)
        .await
        .expect("Should list accounts");

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].username, "alice");
    assert_eq!(accounts[0].flags, "[U          ]");
    assert_eq!(accounts[0].sid, "S-1-5-21-111-222-333-1001");
    assert_eq!(accounts[1].username, "bob");
    assert_eq!(accounts[1].flags, "[DU         ]");
    assert_eq!(accounts[1].sid, "S-1-5-21-111-222-333-1002");

    let calls = runner.invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "pdbedit");
    assert_eq!(calls[0].args, vec!["-L", "-v"]);
    assert!(calls[0].input.is_none());
}

#[tokio::test]
async fn test_list_accounts_empty_output() {
    let settings = test_settings();
    let runner = MockRunner::new();

    let accounts = list_accounts(&settings, &runner)
        .await
        .expect("Should list accounts");
    assert!(accounts.is_empty());
}

#[tokio::test]
async fn test_list_accounts_tool_failure() {
    let settings = test_settings();
    let runner = MockRunner::new();
    runner.script_failure("pdbedit", 1, "Can't load /etc/samba/smb.conf");

    let result = list_accounts(&settings, &runner).await;
    match result {
        Err(AccountError::ToolFailed { code, detail }) => {
            assert_eq!(code, Some(1));
            assert!(detail.contains("Can't load"));
        }
        other => panic!("expected ToolFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_accounts_missing_binary() {
    let settings = test_settings();
    let runner = MockRunner::new();
    runner.mark_unavailable("pdbedit");

    let result = list_accounts(&settings, &runner).await;
    assert!(matches!(result, Err(AccountError::Spawn { .. })));
}

#[tokio::test]
async fn test_add_account_sends_password_twice() {
    let settings = test_settings();
    let runner = MockRunner::new();

    add_account(&settings, &runner, "alice", "s3cret")
        .await
        .expect("Should add account");

    let calls = runner.invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "smbpasswd");
    assert_eq!(calls[0].args, vec!["-a", "alice"]);
    assert_eq!(calls[0].input.as_deref(), Some("s3cret\ns3cret\n"));
}

#[tokio::test]
async fn test_add_account_nonzero_exit_carries_code() {
    let settings = test_settings();
    let runner = MockRunner::new();
    runner.script_failure("smbpasswd", 1, "Failed to add entry for user alice.");

    let result = add_account(&settings, &runner, "alice", "s3cret").await;
    match result {
        Err(AccountError::ToolFailed { code, .. }) => assert_eq!(code, Some(1)),
        other => panic!("expected ToolFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_account() {
    let settings = test_settings();
    let runner = MockRunner::new();

    delete_account(&settings, &runner, "bob")
        .await
        .expect("Should delete account");

    let calls = runner.invocations();
    assert_eq!(calls[0].args, vec!["-x", "bob"]);
    assert!(calls[0].input.is_none());
}

#[tokio::test]
async fn test_delete_account_captures_stderr() {
    let settings = test_settings();
    let runner = MockRunner::new();
    runner.script_failure("smbpasswd", 1, "Failed to find entry for user bob.");

    let result = delete_account(&settings, &runner, "bob").await;
    match result {
        Err(AccountError::ToolFailed { detail, .. }) => {
            assert!(detail.contains("Failed to find entry"));
        }
        other => panic!("expected ToolFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reset_password_invocation_shape() {
    let settings = test_settings();
    let runner = MockRunner::new();

    reset_password(&settings, &runner, "alice", "n3wpass")
        .await
        .expect("Should reset password");

    let calls = runner.invocations();
    assert_eq!(calls.len(), 1);
    // Bare username argument, unlike the -a/-x forms
    assert_eq!(calls[0].args, vec!["alice"]);
    assert_eq!(calls[0].input.as_deref(), Some("n3wpass\nn3wpass\n"));
}

#[tokio::test]
async fn test_account_ops_never_touch_conf_file() {
    let settings = test_settings();
    let runner = MockRunner::new();
    runner.script_stdout("pdbedit", PDBEDIT_TWO_USERS);

    list_accounts(&settings, &runner).await.unwrap();
    add_account(&settings, &runner, "carol", "pw").await.unwrap();

    assert!(!settings.conf_path.exists());
}
