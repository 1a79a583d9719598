// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

/// Forward a no-argument `&self` method to every variant of a wrapper enum
#[macro_export]
macro_rules! impl_enum_dispatch {
    ($enum_name:ident, $($variant:ident),*; $fn_name:ident(&self) -> $ret:ty) => {
        impl $enum_name {
            pub fn $fn_name(&self) -> $ret {
                match self {
                    $(Self::$variant(v) => v.$fn_name(),)*
                }
            }
        }
    };
}
