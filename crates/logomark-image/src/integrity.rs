// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output integrity — SHA-256 fingerprints of encoded icons.

use sha2::{Digest, Sha256};

/// SHA-256 of an encoded icon as lowercase hex, recorded in the report so a
/// deployed favicon can be matched to the run that produced it.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
