//! # gitdeck-core
//!
//! Git workflow orchestration for the gitdeck panel.
//!
//! - [`status`]: the working tree snapshot and its refresh sequencing
//! - [`outcome`]: classification of backend responses into closed outcomes
//! - [`surface`]: the modal and notification contract
//! - [`workflow`]: the orchestrator that drives each operation to a
//!   [`Settlement`]
//!
//! The orchestrator owns a single [`PanelState`]; readers subscribe through
//! [`Workflow::subscribe`].

pub mod config;
pub mod error;
pub mod outcome;
pub mod panel;
pub mod status;
pub mod surface;
pub mod workflow;

#[cfg(test)]
mod test_mocks;

pub use config::Config;
pub use error::{Error, Result};
pub use panel::{BranchInfo, ChangedFile, CommitDiffView, OpenModal, PanelState};
pub use status::{FileState, FileStatus, StatusModel, WorkingTreeStatus};
pub use surface::{InteractionSurface, Level, Modal, ModalPatch, Notification};
pub use workflow::{LiveEvent, OperationKind, Settlement, Workflow, WorkflowSettings};
