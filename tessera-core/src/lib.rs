// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

pub mod constant;
pub mod error;
pub mod geom;
pub mod im;
pub mod io;
pub mod split;
pub mod tile;
pub mod ut;
