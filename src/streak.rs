use crate::models::{ContributionDay, StreakResult};
use chrono::NaiveDate;

/// Run of consecutive active days being tracked during the scan
struct Run {
    start: NaiveDate,
    end: NaiveDate,
    len: usize,
}

/// Compute total days, the longest streak and the current streak.
///
/// `days` may arrive in any order; it is sorted ascending by date first. Only
/// strictly longer runs replace the recorded longest streak, so the earliest
/// of several equally long streaks wins.
pub fn compute_streaks(days: &[ContributionDay]) -> StreakResult {
    let mut sorted = days.to_vec();
    sorted.sort_by_key(|day| day.date);

    let mut result = StreakResult {
        total_days: sorted.len(),
        ..Default::default()
    };

    let mut run: Option<Run> = None;
    for day in &sorted {
        if day.count > 0 {
            match run.as_mut() {
                Some(r) => {
                    r.end = day.date;
                    r.len += 1;
                }
                None => {
                    run = Some(Run { start: day.date, end: day.date, len: 1 });
                }
            }
        } else if let Some(ended) = run.take() {
            close_run(&mut result, ended);
        }
    }

    // Run reaching the final day has no trailing zero to close it
    if let Some(ended) = run.take() {
        close_run(&mut result, ended);
    }

    result.current_streak = sorted
        .iter()
        .rev()
        .take_while(|day| day.count > 0)
        .count();

    result
}

fn close_run(result: &mut StreakResult, run: Run) {
    if run.len > result.longest_streak {
        result.longest_streak = run.len;
        result.longest_streak_start = Some(run.start);
        result.longest_streak_end = Some(run.end);
    }
}
