// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

pub mod plan;
pub mod split;
