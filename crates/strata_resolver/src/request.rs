//! Pollable asynchronous resolution.
//!
//! An [`AsyncRequest`] wraps a backend [`PendingLoad`] and exposes the same
//! states whichever backend serves it. The host loop calls
//! [`AsyncRequest::poll`] until the request leaves [`RequestState::Pending`].

use std::sync::Arc;
use std::task::Poll;

use tracing::warn;

use crate::asset::{Asset, AssetKind};
use crate::backend::{BackendKind, PendingLoad};
use crate::decode::{materialize, DecodeContext, SpriteAtlas};
use crate::error::{Error, Result, Stage};
use crate::registry::ArchiveHandle;
use crate::resolver::report_missing;

pub enum RequestState {
    Pending,
    Ready(Result<Asset>),
    /// Completed, and the result was moved out with [`AsyncRequest::take_result`].
    Taken,
    Cancelled,
}

struct InFlight {
    load: Box<dyn PendingLoad>,
    backend: BackendKind,
    /// Stage reported when the backend comes back empty.
    miss_stage: Stage,
    /// Archive handle and the generation the load was issued under.
    archive: Option<(Arc<ArchiveHandle>, u64)>,
    template: Option<SpriteAtlas>,
}

impl InFlight {
    fn is_stale(&self) -> bool {
        self.archive
            .as_ref()
            .is_some_and(|(handle, generation)| handle.generation() != *generation)
    }
}

pub struct AsyncRequest {
    name: String,
    kind: AssetKind,
    in_flight: Option<InFlight>,
    state: RequestState,
}

impl AsyncRequest {
    pub(crate) fn from_table(
        name: &str,
        kind: AssetKind,
        load: Box<dyn PendingLoad>,
        backend: BackendKind,
        miss_stage: Stage,
    ) -> Self {
        Self::pending(
            name,
            kind,
            InFlight {
                load,
                backend,
                miss_stage,
                archive: None,
                template: None,
            },
        )
    }

    pub(crate) fn from_archive(
        name: &str,
        kind: AssetKind,
        load: Box<dyn PendingLoad>,
        handle: Arc<ArchiveHandle>,
        generation: u64,
        template: Option<SpriteAtlas>,
    ) -> Self {
        Self::pending(
            name,
            kind,
            InFlight {
                load,
                backend: BackendKind::Archive,
                miss_stage: Stage::Archive,
                archive: Some((handle, generation)),
                template,
            },
        )
    }

    /// A request that no backend accepted. Already complete.
    pub(crate) fn missing(name: &str, kind: AssetKind, stage: Stage) -> Self {
        report_missing(name, stage);
        Self {
            name: name.to_string(),
            kind,
            in_flight: None,
            state: RequestState::Ready(Err(Error::not_found(name, stage))),
        }
    }

    fn pending(name: &str, kind: AssetKind, in_flight: InFlight) -> Self {
        Self {
            name: name.to_string(),
            kind,
            in_flight: Some(in_flight),
            state: RequestState::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Advance the request and return its state.
    pub fn poll(&mut self) -> &RequestState {
        if let RequestState::Pending = self.state {
            if let Some(outcome) = self.advance() {
                self.in_flight = None;
                if let Err(Error::NotFound { stage, .. }) = &outcome {
                    if *stage != Stage::Decode {
                        report_missing(&self.name, *stage);
                    }
                }
                self.state = RequestState::Ready(outcome);
            }
        }
        &self.state
    }

    fn advance(&mut self) -> Option<Result<Asset>> {
        let in_flight = self.in_flight.as_mut()?;
        if in_flight.is_stale() {
            return Some(Err(Error::not_found(&self.name, Stage::Unloaded)));
        }

        let payload = match in_flight.load.poll() {
            Poll::Pending => return None,
            Poll::Ready(payload) => payload,
        };
        if in_flight.is_stale() {
            return Some(Err(Error::not_found(&self.name, Stage::Unloaded)));
        }

        let Some(payload) = payload else {
            return Some(Err(Error::not_found(&self.name, in_flight.miss_stage)));
        };

        let ctx = DecodeContext::new(&self.name, in_flight.backend).with_template(in_flight.template.take());
        Some(materialize(payload, self.kind, ctx).map_err(|e| {
            warn!("Failed to decode {} as {}: {}", self.name, self.kind, e);
            Error::not_found(&self.name, Stage::Decode)
        }))
    }

    pub fn is_done(&self) -> bool {
        !matches!(self.state, RequestState::Pending)
    }

    pub fn progress(&self) -> f32 {
        match (&self.state, &self.in_flight) {
            (RequestState::Pending, Some(in_flight)) => in_flight.load.progress(),
            (RequestState::Pending, None) | (RequestState::Cancelled, _) => 0.0,
            (RequestState::Ready(_), _) | (RequestState::Taken, _) => 1.0,
        }
    }

    /// Stop observing the request. The backend load is dropped, but work it
    /// already started may still run to completion.
    pub fn cancel(&mut self) {
        if !self.is_done() {
            self.in_flight = None;
            self.state = RequestState::Cancelled;
        }
    }

    /// Take the result out of a completed request. The request stays done.
    pub fn take_result(&mut self) -> Option<Result<Asset>> {
        match std::mem::replace(&mut self.state, RequestState::Taken) {
            RequestState::Ready(result) => Some(result),
            state => {
                self.state = state;
                None
            }
        }
    }

    /// Poll until the request completes.
    pub fn wait(mut self) -> Result<Asset> {
        while !self.poll_done() {
            std::thread::yield_now();
        }
        match std::mem::replace(&mut self.state, RequestState::Taken) {
            RequestState::Ready(result) => result,
            RequestState::Taken => Err(Error::ResultTaken { name: self.name }),
            RequestState::Pending | RequestState::Cancelled => {
                Err(Error::not_found(&self.name, Stage::Cancelled))
            }
        }
    }

    fn poll_done(&mut self) -> bool {
        !matches!(self.poll(), RequestState::Pending)
    }
}
