// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Debug capture of request/response exchanges
//!
//! Fully optional: a session without a recorder does no capture work at all.

mod recorder;
mod snapshot;

pub use recorder::DebugRecorder;
pub use snapshot::{flatten_headers, try_decode_json, RequestSnapshot, ResponseSnapshot, Snapshot};
