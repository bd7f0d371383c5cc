//! Services module - the reconciliation engine and its external collaborators.
//!
//! Everything here is framework-agnostic business logic with explicit
//! parameters; no service reads ambient process state, which is what makes
//! the parallel category workers safe.
//!
//! # Components
//!
//! - [`alias`]: Path alias resolution between the two known audio schemas
//! - [`ignore`]: Ignore rules applied before any hashing
//! - [`classify`]: The change classifier (forward/backward tree scans,
//!   single-pair comparison for package-version markers)
//! - [`manifest`]: Deterministic manifest writers (`deletefiles.txt`,
//!   `hdifffiles.txt`)
//! - [`detection`]: Install-root and audio-schema detection
//! - [`hashing`]: Streamed SHA-256 file digests
//! - [`PatchService`] / [`ArchiveService`]: Subprocess wrappers for the
//!   external binary-patch generator and archiver
//!
//! # Design Philosophy
//!
//! - **Pure**: No side effects beyond file I/O and subprocess execution
//! - **Explicit**: Roots and versions are parameters, never captured state
//! - **Fail-fast**: Hash and enumeration errors abort the run; collaborator
//!   failures are recovered per candidate by the pipeline

pub mod alias;
pub mod archive;
pub mod classify;
pub mod detection;
pub mod hashing;
pub mod ignore;
pub mod manifest;
pub mod patch;

pub use archive::{ArchiveError, ArchiveService};
pub use classify::{
    Classification, ClassificationResult, ScanDirection, TreeScan, classify_pair, classify_tree,
};
pub use detection::{AudioDir, detect_install_root, expected_roots, find_audio_dir};
pub use manifest::{
    CANDIDATE_LIST_NAME, DELETED_LIST_NAME, PatchCandidate, write_candidate_list,
    write_deleted_list,
};
pub use patch::{PatchError, PatchService};
