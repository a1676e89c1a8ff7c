/*
 * Released under the terms of the Apache 2.0 license with LLVM
 * exception. See `LICENSE` for details.
 */

//! Dense index types that collaborators can use as schedule items.

#[macro_export]
macro_rules! define_index {
    ($ix:ident, $prefix:expr) => {
        /// A dense index. Its `Debug` form is a bare identifier (for
        /// example `inst3`), so it can be used directly as a DOT label.
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "enable-serde",
            derive(::serde::Serialize, ::serde::Deserialize)
        )]
        pub struct $ix(pub u32);

        impl $ix {
            #[inline(always)]
            pub fn new(i: usize) -> Self {
                Self(i as u32)
            }
            #[inline(always)]
            pub fn index(self) -> usize {
                debug_assert!(self.is_valid());
                self.0 as usize
            }
            #[inline(always)]
            pub fn invalid() -> Self {
                Self(u32::MAX)
            }
            #[inline(always)]
            pub fn is_invalid(self) -> bool {
                self == Self::invalid()
            }
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::invalid()
            }
            #[inline(always)]
            pub fn raw_u32(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Debug for $ix {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                if self.is_invalid() {
                    write!(f, "{}_invalid", $prefix)
                } else {
                    write!(f, "{}{}", $prefix, self.0)
                }
            }
        }

        impl core::fmt::Display for $ix {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::Debug::fmt(self, f)
            }
        }
    };
}

define_index!(Inst, "inst");
