//! Opaque handle newtypes for circuit library entities.
//!
//! Each handle is a thin `u32` wrapper that is `Copy`, `Hash`, and `Serialize`/`Deserialize`.
//! Handles are issued by [`Column::push`](crate::column::Column::push) in creation order
//! and are never reused. A [`PortId`] or [`EdgeId`] is only meaningful together with the
//! [`ModelId`] that owns it.

use crate::column::Handle;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl Handle for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable handle for a circuit model in the library.
    ModelId
);

define_id!(
    /// Opaque, copyable handle for a port, scoped to its owning model.
    PortId
);

define_id!(
    /// Opaque, copyable handle for a timing edge, scoped to its owning model.
    EdgeId
);
