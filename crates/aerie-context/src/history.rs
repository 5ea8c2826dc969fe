use aerie_core::{ChatTurn, Role};

/// Flatten turns into a `role: text` transcript, collapsing runs of identical
/// turns. A turn is skipped only when both its role and its trimmed text equal
/// the previous retained turn's. This is adjacent-run collapsing, deliberately
/// not global dedup: the same message reappearing later in the conversation is
/// kept. Empty input yields the empty string.
pub fn compact_history(turns: &[ChatTurn]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(turns.len());
    let mut previous: Option<(Role, &str)> = None;

    for turn in turns {
        let text = turn.text.trim();
        if previous == Some((turn.role, text)) {
            continue;
        }
        lines.push(format!("{}: {}", turn.role, text));
        previous = Some((turn.role, text));
    }

    lines.join("\n")
}
