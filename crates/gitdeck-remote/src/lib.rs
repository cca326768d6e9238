//! # gitdeck-remote
//!
//! Transport boundary between gitdeck and the workspace Git service.
//!
//! Every Git action the editor can trigger is one request through the
//! [`GitGateway`] trait. Responses are returned as the backend shaped them:
//! status tags stay raw strings here and are classified by `gitdeck-core`.
//!
//! # Security
//!
//! Backend tokens are held in a `SecretString` which zeroizes memory when
//! dropped.

mod auth;
mod client;
mod error;
mod traits;
mod types;

pub use auth::Auth;
pub use client::HttpGateway;
pub use error::{Error, Result};
pub use traits::GitGateway;
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use types::{
    AddTagRequest, ApplyStashRequest, BranchList, CheckoutResponse, CheckoutStashRequest,
    CommitDiffEntry, CommitInfo, CommitRequest, CommitResponse, ConflictContent,
    CurrentBranch, FileContent, FileDiff, FileEntry, MergeResponse, Person, PushResponse,
    RebaseOperateRequest, RebaseOperation, RebaseRequest, RebaseResponse, RebaseTodoLine, RefUpdate,
    ResetMode, ResetRequest, ResolveConflictRequest, StashEntry, StashList, StatusResponse,
};
