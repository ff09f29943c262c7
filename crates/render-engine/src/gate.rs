//! Single-flight guard shared by every export action.
//!
//! At most one export runs at a time. A second request while one is active
//! is rejected with [`CarelabError::Busy`]; nothing is queued.

use std::sync::{Arc, Mutex, MutexGuard};

use carelab_common::error::{CarelabError, CarelabResult};

use crate::kind::ExportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Exporting(ExportKind),
}

/// Cloneable handle to the shared export state.
#[derive(Debug, Clone, Default)]
pub struct ExportGate {
    state: Arc<Mutex<ExportState>>,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ExportState> {
        // A panic inside a pipeline must not wedge the gate forever.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> ExportState {
        *self.lock()
    }

    /// True while an export guard is alive.
    pub fn is_busy(&self) -> bool {
        matches!(self.state(), ExportState::Exporting(_))
    }

    /// Claim the gate for `kind`. The returned guard releases it on drop.
    pub fn try_begin(&self, kind: ExportKind) -> CarelabResult<ExportGuard> {
        let mut state = self.lock();
        if let ExportState::Exporting(active) = *state {
            tracing::warn!(
                requested = kind.as_str(),
                active = active.as_str(),
                "Export rejected, another export is running"
            );
            return Err(CarelabError::Busy {
                active: active.as_str().to_string(),
            });
        }
        *state = ExportState::Exporting(kind);
        tracing::debug!(kind = kind.as_str(), "Export gate acquired");
        Ok(ExportGuard {
            gate: self.clone(),
            kind,
        })
    }
}

/// Proof that the holder owns the export gate.
#[derive(Debug)]
pub struct ExportGuard {
    gate: ExportGate,
    kind: ExportKind,
}

impl ExportGuard {
    pub fn kind(&self) -> ExportKind {
        self.kind
    }
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        *self.gate.lock() = ExportState::Idle;
        tracing::debug!(kind = self.kind.as_str(), "Export gate released");
    }
}
