/// Rounded percentage of correct answers, `0` when there were no rounds.
///
/// Halves round up, matching the usual `round(correct / total * 100)`.
#[must_use]
pub fn accuracy_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct);
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
