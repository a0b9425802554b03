//! Host immutability enforcement.
//!
//! Hosts may freeze elements as they are created so that later writes fail. Wrapping
//! has to write to elements (defaulting styles, hooking row renderers), and trees
//! built for wrapping must stay editable afterwards, so enforcement can be suspended
//! with a [`FreezeSuspension`] guard.
//!
//! State is per thread. Suspensions nest: enforcement resumes only when the last
//! guard is dropped, on every exit path including unwinding.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static ENFORCED: Cell<bool> = const { Cell::new(false) };
    static SUSPENDED: Cell<usize> = const { Cell::new(0) };
}

/// Turn host immutability enforcement on or off for this thread.
pub fn set_enforced(on: bool) {
    ENFORCED.with(|enforced| enforced.set(on));
}

/// Whether enforcement is switched on, ignoring suspensions.
pub fn is_enforced() -> bool {
    ENFORCED.with(Cell::get)
}

/// Whether at least one [`FreezeSuspension`] is alive on this thread.
pub fn is_suspended() -> bool {
    SUSPENDED.with(Cell::get) > 0
}

/// Whether new elements are frozen and frozen elements reject writes right now.
pub fn is_active() -> bool {
    is_enforced() && !is_suspended()
}

/// Run `f` with enforcement suspended.
pub fn suspended<R>(f: impl FnOnce() -> R) -> R {
    let _suspension = FreezeSuspension::new();
    f()
}

/// Suspends enforcement until dropped.
#[derive(Debug)]
#[must_use = "enforcement resumes as soon as the suspension is dropped"]
pub struct FreezeSuspension {
    _not_send: PhantomData<*const ()>,
}

impl FreezeSuspension {
    pub fn new() -> Self {
        let depth = SUSPENDED.with(|depth| {
            depth.set(depth.get() + 1);
            depth.get()
        });
        tracing::trace!(depth, "freeze enforcement suspended");
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Default for FreezeSuspension {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FreezeSuspension {
    fn drop(&mut self) {
        let depth = SUSPENDED.with(|depth| {
            depth.set(depth.get().saturating_sub(1));
            depth.get()
        });
        tracing::trace!(depth, "freeze suspension released");
    }
}

static_assertions::assert_not_impl_any!(FreezeSuspension: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspension_nests() {
        set_enforced(true);
        assert!(is_active());
        {
            let _outer = FreezeSuspension::new();
            assert!(!is_active());
            {
                let _inner = FreezeSuspension::new();
                assert!(!is_active());
            }
            // Inner drop must not resume enforcement early
            assert!(!is_active());
        }
        assert!(is_active());
        set_enforced(false);
    }

    #[test]
    fn test_suspension_released_on_panic() {
        set_enforced(true);
        let result = std::panic::catch_unwind(|| {
            suspended(|| {
                assert!(!is_active());
                panic!("wrap failed");
            })
        });
        assert!(result.is_err());
        assert!(is_active());
        set_enforced(false);
    }

    #[test]
    fn test_inactive_when_not_enforced() {
        set_enforced(false);
        assert!(!is_active());
        let _suspension = FreezeSuspension::new();
        assert!(is_suspended());
        assert!(!is_active());
    }
}
