//! Logging shim: `defmt` on hardware, `tracing` in the simulator, nothing
//! otherwise.
//!
//! Format strings must stay within the subset both backends accept: plain
//! `{}` and `{:?}` placeholders, positional arguments only.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}
#[cfg(all(not(feature = "defmt"), feature = "emulator"))]
macro_rules! info {
    ($($arg:tt)*) => { ::tracing::info!($($arg)*) };
}
#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! info {
    ($($arg:tt)*) => {{ let _ = ($crate::fmt::args_used!($($arg)*)); }};
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}
#[cfg(all(not(feature = "defmt"), feature = "emulator"))]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}
#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! debug {
    ($($arg:tt)*) => {{ let _ = ($crate::fmt::args_used!($($arg)*)); }};
}

#[cfg(feature = "defmt")]
macro_rules! warn_ {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}
#[cfg(all(not(feature = "defmt"), feature = "emulator"))]
macro_rules! warn_ {
    ($($arg:tt)*) => { ::tracing::warn!($($arg)*) };
}
#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! warn_ {
    ($($arg:tt)*) => {{ let _ = ($crate::fmt::args_used!($($arg)*)); }};
}

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}
#[cfg(all(not(feature = "defmt"), feature = "emulator"))]
macro_rules! error {
    ($($arg:tt)*) => { ::tracing::error!($($arg)*) };
}
#[cfg(not(any(feature = "defmt", feature = "emulator")))]
macro_rules! error {
    ($($arg:tt)*) => {{ let _ = ($crate::fmt::args_used!($($arg)*)); }};
}

/// Evaluate the arguments of a disabled log call by reference so bindings
/// used only for logging do not trip `unused_variables`.
macro_rules! args_used {
    ($fmt:literal $(, $arg:expr)* $(,)?) => { ($(&$arg,)*) };
}

pub(crate) use {args_used, debug, error, info};
pub(crate) use warn_ as warn;
