//! Optional issue annotation.
//!
//! An external collaborator (typically a natural-language generator) may
//! attach an explanatory note to detected issues. The pipeline treats the
//! note as opaque passthrough text: it is never parsed, never required, and
//! its absence changes nothing. Annotation runs strictly after detection,
//! never inside a detector, and fails open: an annotator returning `None`
//! leaves the issue complete and valid.

use crate::issue::Issue;

/// Produces an opaque annotation for an issue, or declines.
///
/// Implementations live outside the crate (the reference collaborator calls
/// a remote model). They should return `None` rather than fail; the pipeline
/// has no channel for annotation errors.
pub trait InsightAnnotator {
    /// Annotation text for one issue, if the annotator has anything to say.
    fn annotate(&self, issue: &Issue) -> Option<String>;
}

/// Annotator that declines every issue. Useful as an explicit "no
/// annotation" configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotator;

impl InsightAnnotator for NoAnnotator {
    fn annotate(&self, _issue: &Issue) -> Option<String> {
        None
    }
}

/// Applies an annotator to every issue that is not already annotated.
///
/// Counts, severities, metrics, and ordering are untouched; only the
/// `insight` field may change.
pub fn annotate_issues(issues: &mut [Issue], annotator: &dyn InsightAnnotator) {
    for issue in issues.iter_mut() {
        if issue.insight.is_none() {
            issue.insight = annotator.annotate(issue);
        }
    }
}
