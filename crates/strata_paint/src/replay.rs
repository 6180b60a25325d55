//! Replay coordinator
//!
//! Owns the native session and rebuilds it when the host invalidates it.
//!
//! ```text
//!            invalidate (adapter needs full context)
//!   ┌──────┐ ─────────────────────────────────────▶ ┌───────────┐
//!   │ Live │                                        │ Replaying │
//!   └──────┘ ◀───────────────────────────────────── └───────────┘
//!              rewind → reacquire → replay frames
//! ```
//!
//! Replay goes through the same [`Backend`] calls as live drawing, so a
//! replayed session ends up with exactly the native pushes (and pop counts)
//! it would have had if every operation had been issued against it directly.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use strata_core::Rect;

use crate::backend::{Backend, BackendAdapter};
use crate::config::SurfaceConfig;
use crate::coords::CoordinateSystem;
use crate::transform::TransformStack;

/// Host toolkit side of a drawing surface
pub trait SurfaceProvider {
    type Session;

    /// Hand out a live native session for the surface
    fn acquire(&mut self) -> Self::Session;

    /// Take back a session that is no longer used
    fn release(&mut self, _session: Self::Session) {}

    /// Logical bounds of the surface, read again on every acquisition
    fn bounds(&self) -> Rect;
}

/// Flag the host raises from its "frame changed" callback
///
/// Checked before every drawing operation, so the invalidation is fully
/// handled before the next call touches the native session.
#[derive(Clone, Debug, Default)]
pub struct InvalidationFlag(Arc<AtomicBool>);

impl InvalidationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag, returning whether it was raised
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Coordinator state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Operations forward straight to the adapter
    Live,
    /// A rebuild is in progress; nothing else may touch the session
    Replaying,
}

/// Owner of the native session and driver of full-state replays
pub struct ReplayCoordinator<A, P>
where
    A: BackendAdapter,
    P: SurfaceProvider<Session = A::Session>,
{
    adapter: A,
    provider: P,
    session: A::Session,
    config: SurfaceConfig,
    /// Derived from the bounds the current session was acquired with
    coords: CoordinateSystem,
    phase: Phase,
    flag: InvalidationFlag,
    replays: u64,
}

impl<A, P> ReplayCoordinator<A, P>
where
    A: BackendAdapter,
    P: SurfaceProvider<Session = A::Session>,
{
    /// Acquire the first session and prepare it for `config`
    pub fn new(mut adapter: A, mut provider: P, config: SurfaceConfig) -> Self {
        let mut session = provider.acquire();
        let coords = CoordinateSystem::new(&config, provider.bounds());
        adapter.begin(&mut session, &coords.initial_transform());
        Self {
            adapter,
            provider,
            session,
            config,
            coords,
            phase: Phase::Live,
            flag: InvalidationFlag::new(),
            replays: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed rebuilds since construction
    pub fn replay_count(&self) -> u64 {
        self.replays
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Coordinate mapping of the current session
    pub fn coords(&self) -> &CoordinateSystem {
        &self.coords
    }

    pub fn invalidation_flag(&self) -> InvalidationFlag {
        self.flag.clone()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current session, read-only
    pub fn session(&self) -> &A::Session {
        &self.session
    }

    /// Bind the adapter to the current session for one operation
    pub fn backend(&mut self) -> Backend<'_, A> {
        if self.phase != Phase::Live {
            tracing::error!("drawing call issued during replay");
            panic!("drawing call issued while the native session is being replayed");
        }
        Backend::new(&mut self.adapter, &mut self.session)
    }

    /// Handle a pending invalidation raised through the flag
    pub fn sync(&mut self, stack: &mut TransformStack) {
        if self.flag.take() {
            self.invalidate(stack);
        }
    }

    /// React to the host reporting the surface stale
    ///
    /// Adapters whose session cannot go stale keep drawing into it.
    pub fn invalidate(&mut self, stack: &mut TransformStack) {
        if !self.adapter.requires_full_context_on_invalidate() {
            tracing::debug!("invalidation ignored: session does not go stale");
            return;
        }
        self.rebuild(stack);
    }

    /// Rewind, reacquire the session and replay every live operation onto it
    pub fn rebuild(&mut self, stack: &mut TransformStack) {
        if self.phase == Phase::Replaying {
            tracing::error!("re-entrant invalidation");
            panic!("invalidation received while a replay is already in progress");
        }
        self.phase = Phase::Replaying;

        let outstanding = stack.native_depth();
        Backend::new(&mut self.adapter, &mut self.session).pop_native(outstanding);
        self.adapter.end(&mut self.session);

        let fresh = self.provider.acquire();
        let stale = mem::replace(&mut self.session, fresh);
        self.provider.release(stale);

        // The host may have resized the surface; the flip axis follows it
        let bounds = self.provider.bounds();
        self.coords = CoordinateSystem::new(&self.config, bounds);
        self.adapter
            .begin(&mut self.session, &self.coords.initial_transform());

        stack.replay(&mut Backend::new(&mut self.adapter, &mut self.session));

        self.replays += 1;
        self.phase = Phase::Live;
        tracing::info!(
            height = bounds.height(),
            frames = stack.depth(),
            pushes = stack.native_depth(),
            replays = self.replays,
            "native session replayed"
        );
    }

    /// Unwind every native push and hand the session back
    pub fn finish(mut self, stack: &TransformStack) -> A::Session {
        Backend::new(&mut self.adapter, &mut self.session).pop_native(stack.native_depth());
        self.adapter.end(&mut self.session);
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balanced::BalancedStackAdapter;
    use crate::surface::{SoftwareContext, SoftwareProvider};

    fn coordinator() -> ReplayCoordinator<BalancedStackAdapter<SoftwareContext>, SoftwareProvider> {
        ReplayCoordinator::new(
            BalancedStackAdapter::new(),
            SoftwareProvider::new(Rect::new(0.0, 0.0, 50.0, 50.0)),
            SurfaceConfig::default(),
        )
    }

    #[test]
    fn test_rebuild_returns_to_live_and_releases_stale_session() {
        let mut replay = coordinator();
        let mut stack = TransformStack::new();
        stack.translate(&mut replay.backend(), 2.0, 3.0);
        assert_eq!(replay.phase(), Phase::Live);

        replay.rebuild(&mut stack);
        assert_eq!(replay.phase(), Phase::Live);
        assert_eq!(replay.replay_count(), 1);
        assert_eq!(replay.provider().released(), &[1]);
        assert_eq!(replay.session().id(), 2);
        assert_eq!(replay.adapter().depth(), 1);
    }

    #[test]
    #[should_panic(expected = "while the native session is being replayed")]
    fn test_backend_refused_while_replaying() {
        let mut replay = coordinator();
        replay.phase = Phase::Replaying;
        let _ = replay.backend();
    }

    #[test]
    #[should_panic(expected = "replay is already in progress")]
    fn test_reentrant_rebuild_is_fatal() {
        let mut replay = coordinator();
        let mut stack = TransformStack::new();
        replay.phase = Phase::Replaying;
        replay.rebuild(&mut stack);
    }
}
