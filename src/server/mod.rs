use crate::account::{
    add_account, delete_account, list_accounts, reset_password, AccountRecord,
};
use crate::identity::IdentityProvider;
use crate::settings::DaemonSettings;
use crate::share::{
    add_share, delete_share, edit_share, get_share, list_shares, ShareError, ShareRecord,
    UpdateShareFields,
};
use crate::system::CommandRunner;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::warn;

// Import generated protobuf types
pub mod proto {
    tonic::include_proto!("smbadmin");
}

use proto::smb_admin_server::SmbAdmin;
use proto::*;

/// Metadata key the fronting layer uses to identify the acting user.
pub const ACTOR_METADATA_KEY: &str = "x-actor-id";

pub struct SmbAdminService {
    settings: Arc<DaemonSettings>,
    runner: Arc<dyn CommandRunner>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl SmbAdminService {
    pub fn new(settings: Arc<DaemonSettings>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            settings,
            runner,
            identity: None,
        }
    }

    /// Gate mutation RPCs behind an identity provider. Without one the
    /// daemon trusts its caller entirely (the fronting layer owns auth).
    pub fn with_identity(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(provider);
        self
    }

    fn require_admin<T>(&self, request: &Request<T>) -> Result<(), Status> {
        let Some(provider) = &self.identity else {
            return Ok(());
        };

        let actor = request
            .metadata()
            .get(ACTOR_METADATA_KEY)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Status::unauthenticated("missing x-actor-id metadata"))?;

        match provider.lookup(actor) {
            Some(identity) if identity.is_admin => Ok(()),
            Some(_) => Err(Status::permission_denied("admin privileges required")),
            None => Err(Status::unauthenticated("unknown actor")),
        }
    }
}

#[tonic::async_trait]
impl SmbAdmin for SmbAdminService {
    async fn list_shares(
        &self,
        _request: Request<ListSharesRequest>,
    ) -> Result<Response<ListSharesResponse>, Status> {
        match list_shares(&self.settings).await {
            Ok(shares) => {
                let total_count = shares.len() as i32;
                Ok(Response::new(ListSharesResponse {
                    shares: shares.iter().map(share_to_proto).collect(),
                    total_count,
                }))
            }
            Err(e) => Err(Status::internal(e.to_string())),
        }
    }

    async fn get_share(
        &self,
        request: Request<GetShareRequest>,
    ) -> Result<Response<Share>, Status> {
        let req = request.into_inner();

        match get_share(&self.settings, &req.name).await {
            Ok(share) => Ok(Response::new(share_to_proto(&share))),
            Err(ShareError::ShareNotFound(name)) => {
                Err(Status::not_found(format!("Share {name} not found")))
            }
            Err(e) => Err(Status::internal(e.to_string())),
        }
    }

    async fn add_share(
        &self,
        request: Request<AddShareRequest>,
    ) -> Result<Response<MutateShareResponse>, Status> {
        self.require_admin(&request)?;
        let req = request.into_inner();

        let share = req
            .share
            .ok_or_else(|| Status::invalid_argument("share is required"))?;

        match add_share(&self.settings, self.runner.as_ref(), share_from_proto(&share)).await {
            Ok(record) => Ok(Response::new(MutateShareResponse {
                success: true,
                error: String::new(),
                share: Some(share_to_proto(&record)),
            })),
            Err(e) => Ok(Response::new(MutateShareResponse {
                success: false,
                error: e.to_string(),
                share: None,
            })),
        }
    }

    async fn edit_share(
        &self,
        request: Request<EditShareRequest>,
    ) -> Result<Response<MutateShareResponse>, Status> {
        self.require_admin(&request)?;
        let req = request.into_inner();

        let fields = UpdateShareFields {
            path: req.path,
            comment: req.comment,
            browseable: req.browseable,
            read_only: req.read_only,
            guest_ok: req.guest_ok,
        };

        match edit_share(&self.settings, self.runner.as_ref(), &req.name, fields).await {
            Ok(record) => Ok(Response::new(MutateShareResponse {
                success: true,
                error: String::new(),
                share: Some(share_to_proto(&record)),
            })),
            Err(e) => Ok(Response::new(MutateShareResponse {
                success: false,
                error: e.to_string(),
                share: None,
            })),
        }
    }

    async fn delete_share(
        &self,
        request: Request<DeleteShareRequest>,
    ) -> Result<Response<MutateShareResponse>, Status> {
        self.require_admin(&request)?;
        let req = request.into_inner();

        match delete_share(&self.settings, self.runner.as_ref(), &req.name).await {
            Ok(()) => Ok(Response::new(MutateShareResponse {
                success: true,
                error: String::new(),
                share: None,
            })),
            Err(e) => Ok(Response::new(MutateShareResponse {
                success: false,
                error: e.to_string(),
                share: None,
            })),
        }
    }

    async fn list_accounts(
        &self,
        _request: Request<ListAccountsRequest>,
    ) -> Result<Response<ListAccountsResponse>, Status> {
        // Listing fails soft: a broken account tool yields an empty list
        // plus the reason, never an RPC error.
        match list_accounts(&self.settings, self.runner.as_ref()).await {
            Ok(accounts) => {
                let total_count = accounts.len() as i32;
                Ok(Response::new(ListAccountsResponse {
                    accounts: accounts.iter().map(account_to_proto).collect(),
                    total_count,
                    error: String::new(),
                }))
            }
            Err(e) => {
                warn!("account listing failed: {e}");
                Ok(Response::new(ListAccountsResponse {
                    accounts: vec![],
                    total_count: 0,
                    error: e.to_string(),
                }))
            }
        }
    }

    async fn add_account(
        &self,
        request: Request<AddAccountRequest>,
    ) -> Result<Response<MutateAccountResponse>, Status> {
        self.require_admin(&request)?;
        let req = request.into_inner();

        match add_account(&self.settings, self.runner.as_ref(), &req.username, &req.password).await
        {
            Ok(()) => Ok(Response::new(MutateAccountResponse {
                success: true,
                error: String::new(),
            })),
            Err(e) => Ok(Response::new(MutateAccountResponse {
                success: false,
                error: e.to_string(),
            })),
        }
    }

    async fn delete_account(
        &self,
        request: Request<DeleteAccountRequest>,
    ) -> Result<Response<MutateAccountResponse>, Status> {
        self.require_admin(&request)?;
        let req = request.into_inner();

        match delete_account(&self.settings, self.runner.as_ref(), &req.username).await {
            Ok(()) => Ok(Response::new(MutateAccountResponse {
                success: true,
                error: String::new(),
            })),
            Err(e) => Ok(Response::new(MutateAccountResponse {
                success: false,
                error: e.to_string(),
            })),
        }
    }

    async fn reset_password(
        &self,
        request: Request<ResetPasswordRequest>,
    ) -> Result<Response<MutateAccountResponse>, Status> {
        self.require_admin(&request)?;
        let req = request.into_inner();

        match reset_password(&self.settings, self.runner.as_ref(), &req.username, &req.password)
            .await
        {
            Ok(()) => Ok(Response::new(MutateAccountResponse {
                success: true,
                error: String::new(),
            })),
            Err(e) => Ok(Response::new(MutateAccountResponse {
                success: false,
                error: e.to_string(),
            })),
        }
    }
}

// Helper functions for converting internal types to proto types

fn share_to_proto(share: &ShareRecord) -> Share {
    Share {
        name: share.name.clone(),
        path: share.path.clone(),
        comment: share.comment.clone(),
        browseable: share.browseable,
        read_only: share.read_only,
        guest_ok: share.guest_ok,
    }
}

fn share_from_proto(share: &Share) -> ShareRecord {
    ShareRecord {
        name: share.name.clone(),
        path: share.path.clone(),
        comment: share.comment.clone(),
        browseable: share.browseable,
        read_only: share.read_only,
        guest_ok: share.guest_ok,
    }
}

fn account_to_proto(account: &AccountRecord) -> Account {
    Account {
        username: account.username.clone(),
        flags: account.flags.clone(),
        sid: account.sid.clone(),
    }
}
