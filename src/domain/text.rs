pub const MAX_LIST_NAME_LENGTH: usize = 32;
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Normalizes user-entered text before it is validated and stored.
///
/// Control characters other than tab are dropped, surrounding whitespace is
/// trimmed, runs of spaces collapse to one, and the result is cut to
/// `max_chars` characters (then trimmed again so a cut never leaves a
/// trailing space).
pub fn sanitize(text: &str, max_chars: usize) -> String {
    let filtered: String = text.chars().filter(|c| *c as u32 >= 32 || *c == '\t').collect();

    let mut collapsed = String::with_capacity(filtered.len());
    let mut prev_space = false;
    for c in filtered.trim().chars() {
        if c == ' ' {
            if prev_space { continue; }
            prev_space = true;
        } else {
            prev_space = false;
        }
        collapsed.push(c);
    }

    if collapsed.chars().count() > max_chars {
        let truncated: String = collapsed.chars().take(max_chars).collect();
        truncated.trim().to_string()
    } else {
        collapsed
    }
}
