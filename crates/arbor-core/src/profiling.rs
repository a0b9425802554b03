//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros expand to nothing.

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __arbor_profile_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::__arbor_profile_noop as profile_function;
#[cfg(not(feature = "profiling"))]
pub use crate::__arbor_profile_noop as profile_scope;

/// Turn puffin scope collection on or off.
///
/// # Example
/// ```
/// arbor_core::profiling::enable(true);
/// assert_eq!(arbor_core::profiling::is_enabled(), cfg!(feature = "profiling"));
/// arbor_core::profiling::enable(false);
/// ```
pub fn enable(on: bool) {
    #[cfg(feature = "profiling")]
    {
        puffin::set_scopes_on(on);
        tracing::info!("Puffin profiling scopes {}", if on { "enabled" } else { "disabled" });
    }
    #[cfg(not(feature = "profiling"))]
    let _ = on;
}

/// Whether puffin scopes are currently being collected.
pub fn is_enabled() -> bool {
    #[cfg(feature = "profiling")]
    {
        puffin::are_scopes_on()
    }
    #[cfg(not(feature = "profiling"))]
    {
        false
    }
}
