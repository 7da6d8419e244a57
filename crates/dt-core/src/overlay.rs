//! # Modal/form overlay
//!
//! `Closed -> Open -> Submitting -> Closed` on success, back to `Open` with the
//! draft kept on failure. Cancel goes straight from `Open` to `Closed`.

use crate::drafts::Draft;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct OpenOverlay<D> {
    /// Record being edited/suspended; `None` when creating
    pub target: Option<i64>,
    pub draft: D,
    /// Last validation or submission problem, shown inline
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayState<D> {
    Closed,
    Open(OpenOverlay<D>),
    Submitting(OpenOverlay<D>),
}

impl<D> Default for OverlayState<D> {
    fn default() -> Self {
        OverlayState::Closed
    }
}

/// Handed out by [`Overlay::begin_submit`] while the request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    pub target: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay<D> {
    state: OverlayState<D>,
}

impl<D> Default for Overlay<D> {
    fn default() -> Self {
        Self { state: OverlayState::Closed }
    }
}

impl<D: Draft> Overlay<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState<D> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, OverlayState::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, OverlayState::Submitting(_))
    }

    /// Opens with a fresh or pre-filled draft, replacing whatever was open.
    pub fn open(&mut self, target: Option<i64>, draft: D) {
        self.state = OverlayState::Open(OpenOverlay { target, draft, notice: None });
    }

    pub fn target(&self) -> Option<i64> {
        self.current().and_then(|o| o.target)
    }

    pub fn draft(&self) -> Option<&D> {
        self.current().map(|o| &o.draft)
    }

    /// Mutable access is only granted while the overlay is editable.
    pub fn draft_mut(&mut self) -> Result<&mut D> {
        match &mut self.state {
            OverlayState::Open(open) => Ok(&mut open.draft),
            OverlayState::Submitting(_) => Err(AppError::Conflict("submission in progress".into())),
            OverlayState::Closed => Err(AppError::Conflict("form is not open".into())),
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.current().and_then(|o| o.notice.as_deref())
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        if let OverlayState::Open(open) = &mut self.state {
            open.notice = Some(notice.into());
        }
    }

    pub fn clear_notice(&mut self) {
        if let OverlayState::Open(open) = &mut self.state {
            open.notice = None;
        }
    }

    /// Discards the draft.
    pub fn cancel(&mut self) -> Option<D> {
        match std::mem::take(&mut self.state) {
            OverlayState::Open(open) => Some(open.draft),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Validates the draft and enters `Submitting`. On a validation error the
    /// overlay stays open and carries the message as its notice.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket> {
        let open = match std::mem::take(&mut self.state) {
            OverlayState::Open(open) => open,
            other => {
                let busy = matches!(other, OverlayState::Submitting(_));
                self.state = other;
                return Err(AppError::Conflict(
                    if busy { "submission in progress" } else { "form is not open" }.into(),
                ));
            }
        };
        if let Err(e) = open.draft.validate() {
            self.state = OverlayState::Open(OpenOverlay { notice: Some(e.to_string()), ..open });
            return Err(e.into());
        }
        let ticket = SubmitTicket { target: open.target };
        self.state = OverlayState::Submitting(OpenOverlay { notice: None, ..open });
        Ok(ticket)
    }

    /// Ends a submission: success closes (and drops the draft), failure
    /// reopens with the draft intact and the error as notice.
    pub fn finish(&mut self, outcome: &Result<()>) {
        let open = match std::mem::take(&mut self.state) {
            OverlayState::Submitting(open) => open,
            other => {
                self.state = other;
                return;
            }
        };
        match outcome {
            Ok(()) => {}
            Err(e) => {
                log::warn!("submission failed: {e}");
                self.state = OverlayState::Open(OpenOverlay { notice: Some(e.to_string()), ..open });
            }
        }
    }

    fn current(&self) -> Option<&OpenOverlay<D>> {
        match &self.state {
            OverlayState::Open(open) | OverlayState::Submitting(open) => Some(open),
            OverlayState::Closed => None,
        }
    }
}
