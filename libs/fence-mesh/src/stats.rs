//! # Build Statistics
//!
//! Summary of the last build, plus one report per segment so a host can
//! show which parts of the path were skipped or cut short.

use std::time::Duration;

/// What happened to one segment during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// Geometry was emitted.
    Built,
    /// The section had no preset; nothing was emitted.
    Skipped,
    /// The corners coincide; the build stopped here.
    Aborted,
}

/// Per-segment build report.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentReport {
    /// Index of the segment's starting section.
    pub index: usize,
    /// Outcome of the segment.
    pub outcome: SegmentOutcome,
    /// Chord length between the corners.
    pub length: f64,
    /// Posts emitted.
    pub posts: usize,
    /// Pickets emitted.
    pub pickets: usize,
    /// Post gaps whose rails hit an obstacle.
    pub obstructed_gaps: usize,
}

impl SegmentReport {
    /// Report for a segment that emitted nothing.
    pub fn empty(index: usize, outcome: SegmentOutcome, length: f64) -> Self {
        Self {
            index,
            outcome,
            length,
            posts: 0,
            pickets: 0,
            obstructed_gaps: 0,
        }
    }
}

/// Statistics from a fence build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    /// Committed vertex count.
    pub vertex_count: usize,
    /// Committed triangle count over all submeshes.
    pub triangle_count: usize,
    /// Posts emitted.
    pub post_count: usize,
    /// Pickets emitted.
    pub picket_count: usize,
    /// Summed chord length of built segments.
    pub total_length: f64,
    /// Wall time of the build.
    pub build_time: Duration,
    /// One report per visited segment, in path order.
    pub segments: Vec<SegmentReport>,
    /// Section index where a malformed path stopped the build.
    pub aborted_at: Option<usize>,
}

impl BuildStats {
    /// Folds a segment report into the totals.
    pub fn record(&mut self, report: SegmentReport) {
        if report.outcome == SegmentOutcome::Built {
            self.post_count += report.posts;
            self.picket_count += report.pickets;
            self.total_length += report.length;
        }
        if report.outcome == SegmentOutcome::Aborted {
            self.aborted_at = Some(report.index);
        }
        self.segments.push(report);
    }

    /// Number of segments that emitted geometry.
    pub fn built_segments(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.outcome == SegmentOutcome::Built)
            .count()
    }
}
