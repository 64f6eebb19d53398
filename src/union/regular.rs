use itertools::Itertools;
use vec1::Vec1;

use super::test_orthogonal;
use crate::coord::TimeAxis;

/// Test whether the runs of each hour-of-day model cycle share a single axis.
///
/// Runs are grouped by the hour of their reference date and each group is
/// tested with [`test_orthogonal`]. On success, the shared axis of every cycle
/// is returned in order of hour. If any single cycle isn't orthogonal, or
/// there are no axes at all, `None` is returned.
pub fn test_regular<'a, I>(axes: I) -> Option<Vec1<&'a TimeAxis>>
where
    I: IntoIterator<Item = &'a TimeAxis>,
{
    let cycles = axes
        .into_iter()
        .map(|axis| (axis.ref_date().hour_of_day(), axis))
        .into_group_map();

    let shared = cycles
        .into_iter()
        .sorted_by_key(|(hour, _)| *hour)
        .map(|(_, cycle)| test_orthogonal(cycle))
        .collect::<Option<Vec<_>>>()?;
    Vec1::try_from_vec(shared).ok()
}
