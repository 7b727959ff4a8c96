use quiz_core::model::Museum;
use services::{GamePhase, GameSnapshot, ResultView, RoundView, ShareOutcome, ShareStrategy};

pub const DATA_UNAVAILABLE: &str = "Could not load the list of paintings. Make sure paintings.json \
is served from the base URL (or from data/ or assets/ beneath it).";

/// Lines to print for the current state.
#[must_use]
pub fn render(snapshot: &GameSnapshot) -> Vec<String> {
    match snapshot.phase {
        GamePhase::Loading => vec!["Loading paintings…".to_owned()],
        GamePhase::Unavailable => vec![DATA_UNAVAILABLE.to_owned()],
        GamePhase::Playing => snapshot
            .round
            .as_ref()
            .map(|round| render_round(round, snapshot.streak))
            .unwrap_or_default(),
        GamePhase::Finished | GamePhase::ViewingSharedResult => snapshot
            .result
            .as_ref()
            .map(render_result)
            .unwrap_or_default(),
    }
}

fn render_round(round: &RoundView, streak: u32) -> Vec<String> {
    let painting = &round.painting;
    let mut lines = vec![
        format!("{} / {}    streak: {streak}", round.number, round.total),
        or_placeholder(painting.title(), "Untitled").to_owned(),
        or_placeholder(painting.artist(), "—").to_owned(),
    ];
    if !painting.year().is_empty() {
        lines.push(format!("Year: {}", painting.year()));
    }
    if !round.image_url.is_empty() {
        lines.push(format!("Image: {}", round.image_url));
    }
    lines.push(format!(
        "[1] {}   [2] {}",
        Museum::Tretyakov.label(),
        Museum::Russian.label()
    ));
    lines
}

fn render_result(result: &ResultView) -> Vec<String> {
    let best = result
        .best_streak
        .map_or_else(|| "unknown".to_owned(), |best| best.to_string());
    let mut lines = Vec::with_capacity(4);
    if result.is_shared {
        lines.push("Your friend's result".to_owned());
    } else {
        lines.push("Game over!".to_owned());
    }
    lines.push(format!(
        "Correct answers: {} of {} ({}%)",
        result.correct, result.total, result.accuracy_percent
    ));
    lines.push(format!("Best streak: {best}"));
    if result.is_shared {
        lines.push("[q] quit".to_owned());
    } else {
        lines.push("[n] new game   [s] share   [q] quit".to_owned());
    }
    lines
}

#[must_use]
pub fn describe_share(outcome: ShareOutcome) -> &'static str {
    match outcome {
        ShareOutcome::Delivered(ShareStrategy::Native) => "Shared.",
        ShareOutcome::Delivered(ShareStrategy::Dialog) => "Share dialog opened.",
        ShareOutcome::Delivered(ShareStrategy::Clipboard) => "Copied to clipboard.",
        ShareOutcome::Unavailable => "Sharing is not available here.",
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

/// Map a typed key to a museum choice.
#[must_use]
pub fn parse_choice(input: &str) -> Option<Museum> {
    match input.trim().to_lowercase().as_str() {
        "1" | "t" => Some(Museum::Tretyakov),
        "2" | "r" => Some(Museum::Russian),
        other => other.parse().ok(),
    }
}
