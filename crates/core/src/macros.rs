// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the mj crates.
//!
//! - [`simple_display!`]: `Display` for fieldless enums via string literals
//! - [`builder!`]: fixture builders for tests (`JobRecord::builder()`)
//! - [`setters!`]: chainable setters on config and request structs

/// Implement `Display` by mapping each variant to a literal.
///
/// ```ignore
/// crate::simple_display! {
///     KillTarget {
///         Mirror => "mirror",
///         Main => "main",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => $str, )+
                })
            }
        }
    };
}

/// Fixture builder with per-field defaults.
///
/// Everything generated is compiled only for tests or with the
/// `test-support` feature. Field groups:
/// - `into`: setter accepts `impl Into<T>`, default converted with `.into()`
/// - `set`: setter takes `T` as is
/// - `option`: target field is `Option<T>`; the setter wraps in `Some`
///
/// Every field of the target must appear in exactly one group.
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            $(into {
                $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)?
            })?
            $(set {
                $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)?
            })?
            $(option {
                $( $opt_field:ident : $opt_ty:ty = $opt_default:expr ),* $(,)?
            })?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $($( $into_field: $into_ty, )*)?
            $($( $set_field: $set_ty, )*)?
            $($( $opt_field: Option<$opt_ty>, )*)?
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $($( $into_field: $into_default.into(), )*)?
                    $($( $set_field: $set_default, )*)?
                    $($( $opt_field: $opt_default, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $crate::setters! {
                $(into { $( $into_field: $into_ty ),* })?
                $(set { $( $set_field: $set_ty ),* })?
                $(option { $( $opt_field: $opt_ty ),* })?
            }

            pub fn build(self) -> $target {
                $target {
                    $($( $into_field: self.$into_field, )*)?
                    $($( $set_field: self.$set_field, )*)?
                    $($( $opt_field: self.$opt_field, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            /// Builder preloaded with fixture defaults.
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// Chainable setters, expanded inside an `impl` block.
///
/// ```ignore
/// impl LaunchRequest {
///     mj_core::setters! {
///         set { dry_run: bool }
///         option { filter: String }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (@into $field:ident : $ty:ty) => {
        #[must_use]
        pub fn $field(mut self, value: impl Into<$ty>) -> Self {
            self.$field = value.into();
            self
        }
    };
    (@set $field:ident : $ty:ty) => {
        #[must_use]
        pub fn $field(mut self, value: $ty) -> Self {
            self.$field = value;
            self
        }
    };
    (@option $field:ident : $ty:ty) => {
        #[must_use]
        pub fn $field(mut self, value: impl Into<$ty>) -> Self {
            self.$field = Some(value.into());
            self
        }
    };
    (
        $(into { $( $into_field:ident : $into_ty:ty ),* $(,)? })?
        $(set { $( $set_field:ident : $set_ty:ty ),* $(,)? })?
        $(option { $( $opt_field:ident : $opt_ty:ty ),* $(,)? })?
    ) => {
        $($( $crate::setters!(@into $into_field: $into_ty); )*)?
        $($( $crate::setters!(@set $set_field: $set_ty); )*)?
        $($( $crate::setters!(@option $opt_field: $opt_ty); )*)?
    };
}
