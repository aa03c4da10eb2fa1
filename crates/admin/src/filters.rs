//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Characters kept by [`plain_excerpt`].
const EXCERPT_CHARS: usize = 140;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Post content with markup tags stripped, shortened for list views.
///
/// Usage in templates: `{{ post.content|plain_excerpt }}`
#[askama::filter_fn]
pub fn plain_excerpt(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(excerpt(&value.to_string(), EXCERPT_CHARS))
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                plain.push(' ');
            }
            _ if !in_tag => plain.push(c),
            _ => {}
        }
    }

    let words: Vec<&str> = plain.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut short: String = collapsed.chars().take(max_chars).collect();
    short.truncate(short.trim_end().len());
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_strips_tags() {
        assert_eq!(
            excerpt("<h3>Aviso</h3><b>Mañana</b> no hay clases", 140),
            "Aviso Mañana no hay clases"
        );
    }

    #[test]
    fn test_excerpt_truncates_on_chars() {
        assert_eq!(excerpt("ñandú ñandú", 5), "ñandú…");
    }

    #[test]
    fn test_excerpt_keeps_short_text() {
        assert_eq!(excerpt("  hola   mundo ", 140), "hola mundo");
    }
}
