// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
pub(crate) mod fixture_session;
pub mod reqwest_session;
pub mod traits;
