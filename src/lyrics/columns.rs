//! Two-column splitting of rendered lyrics.

use crate::constants::layout::PARAGRAPH_BREAK;

/// Split rendered lyrics into two columns at a paragraph boundary.
///
/// With `columns <= 1`, more than two columns, or no paragraph break, the text
/// comes back whole in the first column. Otherwise the boundary whose first
/// column is closest to half the total character length wins, with the
/// earliest boundary kept on ties.
pub fn split_columns(text: &str, columns: usize) -> [String; 2] {
    let passthrough = || [text.to_string(), String::new()];

    if columns != 2 {
        return passthrough();
    }

    let paragraphs: Vec<&str> = text.split(PARAGRAPH_BREAK).collect();
    if paragraphs.len() < 2 {
        return passthrough();
    }

    let total = char_len(text);
    let sep_len = char_len(PARAGRAPH_BREAK);

    let mut best: Option<(usize, usize)> = None;
    let mut first_len = 0usize;
    for (k, paragraph) in paragraphs.iter().enumerate().take(paragraphs.len() - 1) {
        if k > 0 {
            first_len += sep_len;
        }
        first_len += char_len(paragraph);
        // Compare 2 * first against total to stay in integers.
        let diff = (2 * first_len).abs_diff(total);
        if best.is_none_or(|(_, best_diff)| diff < best_diff) {
            best = Some((k + 1, diff));
        }
    }

    let Some((boundary, _)) = best else {
        return passthrough();
    };

    [
        paragraphs[..boundary].join(PARAGRAPH_BREAK),
        paragraphs[boundary..].join(PARAGRAPH_BREAK),
    ]
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn para(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn single_column_is_passthrough() {
        let text = format!("{}{PARAGRAPH_BREAK}{}", para(5), para(5));
        assert_eq!(split_columns(&text, 1), [text.clone(), String::new()]);
        assert_eq!(split_columns(&text, 0), [text, String::new()]);
    }

    #[test]
    fn more_than_two_columns_is_passthrough() {
        let text = format!("{}{PARAGRAPH_BREAK}{}", para(5), para(5));
        assert_eq!(split_columns(&text, 3), [text, String::new()]);
    }

    #[test]
    fn no_paragraph_break_is_passthrough() {
        let text = "one<br>two<br>three";
        assert_eq!(split_columns(text, 2), [text.to_string(), String::new()]);
    }

    #[test]
    fn four_equal_paragraphs_split_in_the_middle() {
        let paragraphs = vec![para(10); 4];
        let text = paragraphs.join(PARAGRAPH_BREAK);
        let [left, right] = split_columns(&text, 2);
        assert_eq!(left, paragraphs[..2].join(PARAGRAPH_BREAK));
        assert_eq!(right, paragraphs[2..].join(PARAGRAPH_BREAK));
    }

    #[test]
    fn equal_difference_keeps_earliest_boundary() {
        // Separator is 8 chars. Paragraphs 10, 4, 2: total 32.
        // Boundary 1 gives 10 (diff 12 against 2*10=20), boundary 2 gives 22 (2*22=44, diff 12).
        let text = [para(10), para(4), para(2)].join(PARAGRAPH_BREAK);
        assert_eq!(char_len(&text), 32);
        let [left, right] = split_columns(&text, 2);
        assert_eq!(left, para(10));
        assert_eq!(right, [para(4), para(2)].join(PARAGRAPH_BREAK));
    }

    #[test]
    fn uneven_paragraphs_pick_closest_boundary() {
        let text = [para(30), para(2), para(2), para(2)].join(PARAGRAPH_BREAK);
        let [left, _] = split_columns(&text, 2);
        assert_eq!(left, para(30));
    }

    #[test]
    fn columns_rejoin_to_original() {
        let text = ["a<br>b", "c", "d<br>e<br>f", "g"].join(PARAGRAPH_BREAK);
        let [left, right] = split_columns(&text, 2);
        assert_eq!(format!("{left}{PARAGRAPH_BREAK}{right}"), text);
    }
}
