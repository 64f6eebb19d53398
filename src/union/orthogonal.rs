use std::collections::HashSet;

use crate::coord::TimeAxis;

/// Find a single axis that holds every forecast time found in `axes`.
///
/// The candidate is the axis with the most distinct values; on a tie the first
/// one yielded wins. It is returned only if it has as many distinct values as
/// all axes together, which makes it a superset of every other axis. Returns
/// `None` if `axes` is empty.
///
/// If every axis is empty the first one is returned, so runs without any
/// times count as sharing an (empty) axis rather than having none in common.
pub fn test_orthogonal<'a, I>(axes: I) -> Option<&'a TimeAxis>
where
    I: IntoIterator<Item = &'a TimeAxis>,
{
    let mut union = HashSet::new();
    // Distinct counts; a repeated value must not stand in for a missing one.
    let mut max_axis: Option<(&TimeAxis, usize)> = None;
    for axis in axes {
        let distinct = axis.values().iter().collect::<HashSet<_>>().len();
        if max_axis.map_or(true, |(_, max)| distinct > max) {
            max_axis = Some((axis, distinct));
        }
        union.extend(axis.values().iter().copied());
    }

    let (max_axis, max_distinct) = max_axis?;
    if max_distinct == union.len() {
        Some(max_axis)
    } else {
        None
    }
}
