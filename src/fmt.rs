//! Logging shim
//!
//! Library code logs through these macros so the same call sites work with
//! `defmt` on the target, `log` on a host, or nothing at all.
//! Arguments must be primitives or `&str` so every backend can format them.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($t:tt)*) => {{ defmt::error!($($t)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($t:tt)*) => {{ defmt::warn!($($t)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($t:tt)*) => {{ defmt::info!($($t)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($t:tt)*) => {{ defmt::debug!($($t)*); }};
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! error {
    ($($t:tt)*) => {{ log::error!($($t)*); }};
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! warn {
    ($($t:tt)*) => {{ log::warn!($($t)*); }};
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! info {
    ($($t:tt)*) => {{ log::info!($($t)*); }};
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! debug {
    ($($t:tt)*) => {{ log::debug!($($t)*); }};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! error {
    ($($t:tt)*) => {{ let _ = format_args!($($t)*); }};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! warn {
    ($($t:tt)*) => {{ let _ = format_args!($($t)*); }};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! info {
    ($($t:tt)*) => {{ let _ = format_args!($($t)*); }};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! debug {
    ($($t:tt)*) => {{ let _ = format_args!($($t)*); }};
}
