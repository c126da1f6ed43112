// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Timestamp helpers for debug snapshots and callers

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDateTime, TimeZone, Utc,
};

use crate::error::{Error, Result};

/// Default text format, e.g. `2026-10-16 09:30:00`
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A captured instant at a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    now: DateTime<FixedOffset>,
}

impl Timer {
    /// Capture the current instant at `offset_hours` east of UTC
    pub fn new(offset_hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(offset_hours * 3600)
            .ok_or_else(|| Error::Config(format!("Invalid UTC offset: {}h", offset_hours)))?;
        Ok(Self {
            now: Utc::now().with_timezone(&offset),
        })
    }

    /// Capture the current instant at the host's local offset
    pub fn local() -> Self {
        let now = Local::now();
        Self {
            now: now.with_timezone(now.offset()),
        }
    }

    /// Wrap an existing instant
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Epoch seconds
    pub fn to_ts(&self) -> i64 {
        self.now.timestamp()
    }

    /// Format with `fmt`, or [`DEFAULT_FORMAT`] when `fmt` is empty
    pub fn to_str(&self, fmt: &str) -> String {
        let fmt = if fmt.is_empty() { DEFAULT_FORMAT } else { fmt };
        self.now.format(fmt).to_string()
    }

    /// The captured instant
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.now
    }

    /// Format epoch seconds `ts` at this timer's offset
    pub fn ts2str(&self, ts: i64, fmt: &str) -> Result<String> {
        let at = self
            .now
            .offset()
            .timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| Error::other(format!("Timestamp out of range: {}", ts)))?;
        Ok(Self::at(at).to_str(fmt))
    }

    /// Parse `text` as a wall-clock time at this timer's offset into epoch seconds
    pub fn str2ts(&self, text: &str, fmt: &str) -> Result<i64> {
        let fmt = if fmt.is_empty() { DEFAULT_FORMAT } else { fmt };
        let naive = NaiveDateTime::parse_from_str(text, fmt)
            .map_err(|e| Error::other(format!("Invalid time '{}': {}", text, e)))?;
        self.now
            .offset()
            .from_local_datetime(&naive)
            .single()
            .map(|at| at.timestamp())
            .ok_or_else(|| Error::other(format!("Ambiguous time '{}'", text)))
    }

    /// ISO year and week `offset` weeks from the captured instant, e.g. `2020W36`
    pub fn iso_week(&self, offset: i64) -> String {
        let week = (self.now + Duration::weeks(offset)).iso_week();
        format!("{}W{}", week.year(), week.week())
    }
}
