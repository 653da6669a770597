// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared across the fleetdesk crates.
//!
//! - [`wire_names!`]: `as_str()` and `Display` for unit enums
//! - [`builder!`]: test-only builder with defaults and `build()`
//! - [`setters!`]: chainable `impl Into` setters for config structs

/// Give a fieldless `Copy` enum its wire name.
///
/// Generates `const fn as_str(self)` and a `Display` impl that writes it.
///
/// ```ignore
/// crate::wire_names! {
///     PaymentStatus {
///         Unpaid => "unpaid",
///         Paid => "paid",
///     }
/// }
/// ```
#[macro_export]
macro_rules! wire_names {
    ($enum:ident { $( $variant:ident => $name:literal ),+ $(,)? }) => {
        impl $enum {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $enum::$variant => $name, )+
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Generate a test builder and `Target::builder()`.
///
/// Only compiled with `cfg(test)` or the `test-support` feature. Every
/// setter takes `impl Into<T>`. Fields under `optional` start as `None` and
/// their setter wraps the value in `Some`.
///
/// ```ignore
/// crate::builder! {
///     pub struct JobBuilder => Job {
///         required {
///             id: JobId = JobId::new("job-1"),
///             paused: bool = false,
///         }
///         optional {
///             notes: String,
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            required {
                $( $field:ident : $ty:ty = $default:expr ),* $(,)?
            }
            $(optional {
                $( $opt:ident : $opt_ty:ty ),* $(,)?
            })?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $( $field: $ty, )*
            $($( $opt: Option<$opt_ty>, )*)?
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                    $($( $opt: None, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = value.into();
                    self
                }
            )*
            $($(
                pub fn $opt(mut self, value: impl Into<$opt_ty>) -> Self {
                    self.$opt = Some(value.into());
                    self
                }
            )*)?

            pub fn build(self) -> $target {
                $target {
                    $( $field: self.$field, )*
                    $($( $opt: self.$opt, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// Chainable setters inside an existing `impl` block. Each takes `impl Into<T>`.
///
/// ```ignore
/// impl ClientConfig {
///     fd_core::setters! {
///         base_url: String,
///         request_timeout: Duration,
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    ( $( $field:ident : $ty:ty ),* $(,)? ) => {
        $(
            pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                self.$field = value.into();
                self
            }
        )*
    };
}
