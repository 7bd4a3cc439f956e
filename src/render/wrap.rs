//! Greedy word wrapping against a rendered-width budget.

/// Splits `caption` into visual lines whose measured width stays within
/// `max_width`.
///
/// Tokens are split on whitespace and packed greedily. A single token whose
/// own width already exceeds the budget still gets a line of its own,
/// unsplit; that line may overflow and is clipped at draw time.
pub fn wrap_caption<F>(caption: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in caption.split_whitespace() {
        let candidate = if current.is_empty() {
            token.to_string()
        } else {
            format!("{current} {token}")
        };
        if current.is_empty() || measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(current);
            current = token.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
