//! Two-way synchronization between the filter store and the address bar.
//!
//! Two triggers drive the controller, never both in the same task:
//!
//! - **Navigation** ([`SyncController::on_navigation`]): the address bar changed
//!   (deep link, back/forward). The query is decoded, merged onto the default
//!   state and swapped into the store in one replacement.
//! - **Store change**: the controller's subscription marks it pending. At the
//!   end of the task [`SyncController::flush`] derives the URL once and asks for
//!   a history-neutral replace only if it differs from the current one.
//!
//! Any number of mutations within one task therefore produce at most one
//! address-bar write, and a navigation never writes back to the address bar.

use super::actions::Action;
use super::store::{FilterStore, Subscription};
use crate::codec::{decode_href, share_url};
use crate::domain::FilterState;
use std::cell::Cell;
use std::rc::Rc;
use url::Url;

/// Arbiter between store → URL and URL → store synchronization.
#[derive(Debug)]
pub struct SyncController {
    base: Url,
    pending: Rc<Cell<bool>>,
    subscription: Option<Subscription>,
}

impl SyncController {
    /// Subscribes a new controller to `store`.
    ///
    /// Relative hrefs are resolved against `base`; hrefs that cannot be
    /// resolved at all are replaced by it.
    #[must_use]
    pub fn attach(store: &FilterStore, base: Url) -> Self {
        let pending = Rc::new(Cell::new(false));
        let flag = Rc::clone(&pending);
        let subscription = store.subscribe(move |_| flag.set(true));
        tracing::debug!(base = %base, "sync controller attached");

        Self {
            base,
            pending,
            subscription: Some(subscription),
        }
    }

    /// Returns `true` if the store changed since the last flush.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Forces the next [`flush`](Self::flush) to reconcile the address bar.
    pub fn mark_pending(&self) {
        self.pending.set(true);
    }

    /// Resolves `href` against the configured base URL.
    ///
    /// Absolute hrefs resolve to themselves. Falls back to the base itself
    /// when `href` cannot be resolved.
    #[must_use]
    pub fn resolve(&self, href: &str) -> Url {
        self.base.join(href).unwrap_or_else(|e| {
            tracing::debug!(error = %e, href = %href, "unresolvable href, using base URL");
            self.base.clone()
        })
    }

    /// Handles an observed navigation to `href`.
    ///
    /// The new state is the default state overlaid with whatever the URL
    /// says; residual in-memory state never leaks in, including the page size.
    /// Returns `true` if the store state changed.
    pub fn on_navigation(&mut self, store: &mut FilterStore, href: &str) -> bool {
        let _span = tracing::debug_span!("sync_navigation", href = %href).entered();

        let next = FilterState::from_patch(&decode_href(href));

        let changed = *store.state() != next;
        if changed {
            store.replace_state(next);
        } else {
            tracing::debug!("navigation matches current state");
        }

        // The URL is the source of truth right now; nothing to write back.
        self.pending.set(false);
        changed
    }

    /// Ends the current task, returning the address-bar write it needs, if any.
    pub fn flush(&mut self, store: &FilterStore, current_href: &str) -> Option<Action> {
        if !self.pending.replace(false) {
            return None;
        }
        let _span = tracing::debug_span!("sync_flush").entered();

        let current = self.resolve(current_href);
        let target = share_url(&current, store.state());

        if target == current {
            tracing::debug!("address bar already up to date");
            return None;
        }

        tracing::debug!(href = %target, "replacing address bar");
        Some(Action::ReplaceUrl {
            href: target.to_string(),
        })
    }

    /// Unsubscribes from the store. Later store changes are not synchronized.
    pub fn dispose(&mut self) {
        if self.subscription.take().is_some() {
            self.pending.set(false);
            tracing::debug!("sync controller disposed");
        }
    }
}
