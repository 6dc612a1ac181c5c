//! Macro for opaque `u32` ID newtypes used as arena keys.

/// Defines a thin `u32` ID newtype that is `Copy`, `Hash`, `Ord` and
/// `Serialize`/`Deserialize`, and implements [`ArenaId`](crate::ArenaId).
///
/// ```
/// xnet_common::define_id!(
///     /// Identifies a widget.
///     WidgetId
/// );
/// let id = WidgetId::from_raw(3);
/// assert_eq!(id.as_raw(), 3);
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl $crate::ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}
