//! Visibility state machine of the viewer popover.
//!
//! Each popover instance exclusively owns its [`ViewState`]; there is no
//! shared or static state across instances. Activation runs one resolve
//! per trigger; overlapping activations are independent and the last
//! response wins.

use chrono::prelude::{DateTime, Utc};

use crate::did_resolve::{DIDResolver, ResolutionResult};
use crate::error::{RenderError, ResolutionError};
use crate::view::{DocumentView, ViewOptions};

/// Visibility phase of the popover.
///
/// `Closed` is the initial state and always revisitable; there is no
/// terminal state during the component's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Loading,
    Open,
}

/// Transient per-instance state: the triggering anchor, the last
/// successfully resolved data, and when it was validated.
///
/// `data` and `validated_at` are set and cleared together; `data` survives
/// dismissal so a rapid re-open can show stale content until a fresh
/// resolve replaces it.
#[derive(Debug)]
struct ViewState<A> {
    anchor: Option<A>,
    data: Option<ResolutionResult>,
    validated_at: Option<DateTime<Utc>>,
    phase: Phase,
}

impl<A> Default for ViewState<A> {
    fn default() -> Self {
        Self {
            anchor: None,
            data: None,
            validated_at: None,
            phase: Phase::Closed,
        }
    }
}

/// Hook through which resolution failures are surfaced to the embedding
/// application.
pub type ErrorHook = Box<dyn Fn(&ResolutionError) + Send + Sync>;

/// Popover over one DID: owns the view state and drives the
/// `Closed -> Loading -> Open` transitions around a [resolver][DIDResolver].
///
/// Generic over the embedding application's anchor type `A` (the UI element
/// reference recorded while the popover is visible).
pub struct Popover<A, R> {
    did: String,
    resolver: R,
    error_hook: Option<ErrorHook>,
    state: ViewState<A>,
}

impl<A, R: DIDResolver> Popover<A, R> {
    pub fn new(did: &str, resolver: R) -> Self {
        Self {
            did: did.to_string(),
            resolver,
            error_hook: None,
            state: ViewState::default(),
        }
    }

    /// Replace the default `log::error!` reporting with an
    /// application-supplied hook.
    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.error_hook = Some(hook);
        self
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn anchor(&self) -> Option<&A> {
        self.state.anchor.as_ref()
    }

    /// The last successfully resolved data, if any. Retained across
    /// dismissal and across failed re-activations.
    pub fn data(&self) -> Option<&ResolutionResult> {
        self.state.data.as_ref()
    }

    pub fn validated_at(&self) -> Option<DateTime<Utc>> {
        self.state.validated_at
    }

    /// User activated the trigger control: record the anchor, enter
    /// `Loading`, and run one resolve.
    ///
    /// On success the popover is `Open` with fresh data and `validated_at`.
    /// On failure it returns to `Closed` with the anchor cleared,
    /// previously held data untouched, and the error surfaced through the
    /// hook; the trigger stays interactable so the next activation retries.
    pub async fn activate(&mut self, anchor: A) -> Phase {
        self.state.anchor = Some(anchor);
        self.state.phase = Phase::Loading;
        match self.resolver.resolve(&self.did).await {
            Ok(result) => {
                self.state.data = Some(result);
                self.state.validated_at = Some(Utc::now());
                self.state.phase = Phase::Open;
            }
            Err(err) => {
                self.state.anchor = None;
                self.state.phase = Phase::Closed;
                self.report(&err);
            }
        }
        self.state.phase
    }

    /// User dismissed the popover: clear the anchor, keep the data.
    pub fn dismiss(&mut self) {
        self.state.anchor = None;
        self.state.phase = Phase::Closed;
    }

    /// Project the currently held data into the display model, if a fetch
    /// has succeeded before.
    pub fn view(&self, options: &ViewOptions) -> Result<Option<DocumentView>, RenderError> {
        match &self.state.data {
            Some(data) => {
                DocumentView::project(data, self.state.validated_at, options).map(Some)
            }
            None => Ok(None),
        }
    }

    fn report(&self, err: &ResolutionError) {
        match &self.error_hook {
            Some(hook) => hook(err),
            None => log::error!("error resolving {}: {}", self.did, err),
        }
    }
}
