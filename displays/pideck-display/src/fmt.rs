//! Logging macros
//!
//! Forward to `defmt` or `tracing` depending on the enabled features. With
//! neither enabled the arguments are still type-checked but nothing is logged.
#![macro_use]
#![allow(unused_macros)]

macro_rules! log_impl {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(feature = "tracing")]
            ::tracing::$level!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "tracing")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($($t:tt)*) => { log_impl!(trace, $($t)*) };
}

macro_rules! debug {
    ($($t:tt)*) => { log_impl!(debug, $($t)*) };
}

macro_rules! info {
    ($($t:tt)*) => { log_impl!(info, $($t)*) };
}

macro_rules! warn {
    ($($t:tt)*) => { log_impl!(warn, $($t)*) };
}

macro_rules! error {
    ($($t:tt)*) => { log_impl!(error, $($t)*) };
}
