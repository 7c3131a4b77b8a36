//! Conflict resolution between selected transitions.

use super::policy::RegionPriority;
use super::selector::Candidate;
use crate::core::Statechart;

/// Keep the transitions that fire together.
///
/// When one candidate's source is a proper ancestor of another's, the
/// region priority decides which of the two survives. Candidates in
/// unrelated states (for example different orthogonal regions) all survive.
/// Of several external transitions leaving the same source only the first
/// declared one survives. The result is sorted by declaration order
/// whatever the order of `candidates`.
pub fn resolve<'a>(
    statechart: &Statechart,
    candidates: &[Candidate<'a>],
    priority: RegionPriority,
) -> Vec<Candidate<'a>> {
    let mut ordered = candidates.to_vec();
    ordered.sort_by_key(|c| c.index);
    ordered.dedup_by_key(|c| c.index);

    let sources: Vec<&str> = ordered
        .iter()
        .map(|c| c.transition.source.as_str())
        .collect();

    let mut surviving: Vec<Candidate<'a>> = Vec::with_capacity(ordered.len());
    for candidate in ordered {
        let source = candidate.transition.source.as_str();
        let preempted = sources.iter().any(|other| match priority {
            RegionPriority::OuterFirst => statechart.is_ancestor(other, source),
            RegionPriority::InnerFirst => statechart.is_ancestor(source, other),
        });
        if preempted {
            tracing::trace!(transition = %candidate.transition, ?priority, "transition preempted");
            continue;
        }

        let shadowed = !candidate.transition.is_internal()
            && surviving
                .iter()
                .any(|s| !s.transition.is_internal() && s.transition.source == source);
        if shadowed {
            tracing::trace!(
                transition = %candidate.transition,
                "transition shadowed by earlier declaration"
            );
            continue;
        }
        surviving.push(candidate);
    }
    surviving
}
