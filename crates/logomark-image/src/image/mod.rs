// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — caption crop, chroma-key, content crop and square compositing.

pub mod processor;

pub use processor::{LogoProcessor, SavedImage};
