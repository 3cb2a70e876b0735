use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::Word;

/// Words sharing one visual line, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: i64,
    pub words: Vec<Word>,
}

impl Row {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Grouped rows plus any words that could not be placed on a line.
#[derive(Debug, Default)]
pub struct Grouped {
    pub rows: Vec<Row>,
    pub rejected: Vec<Word>,
}

/// Snap a vertical coordinate onto the row grid. `None` for non-finite input.
pub fn row_key(y: f64, unit: f64) -> Option<i64> {
    let snapped = (y / unit).round();
    if snapped.is_finite() {
        Some(snapped as i64)
    } else {
        None
    }
}

fn reading_order(a: &Word, b: &Word) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.text.cmp(&b.text))
}

/// Cluster words into rows by rounded y. Rows ascend top to bottom.
///
/// `unit` is the grid the y coordinate is rounded to; `1.0` rounds to the
/// nearest whole unit, absorbing sub-unit rendering jitter.
pub fn group_rows(words: Vec<Word>, unit: f64) -> Grouped {
    let mut by_key: BTreeMap<i64, Vec<Word>> = BTreeMap::new();
    let mut rejected = Vec::new();
    for word in words {
        match row_key(word.y, unit) {
            Some(key) if word.x.is_finite() => by_key.entry(key).or_default().push(word),
            _ => rejected.push(word),
        }
    }
    let rows = by_key
        .into_iter()
        .map(|(key, mut words)| {
            words.sort_by(reading_order);
            Row { key, words }
        })
        .collect();
    Grouped { rows, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(text: &str, x: f64, y: f64) -> Word {
        Word::new(text, x, y)
    }

    #[test]
    fn test_groups_by_rounded_y() {
        let grouped = group_rows(
            vec![w("b", 50.0, 100.4), w("a", 10.0, 99.6), w("c", 10.0, 120.0)],
            1.0,
        );
        assert_eq!(grouped.rows.len(), 2);
        assert_eq!(grouped.rows[0].text(), "a b");
        assert_eq!(grouped.rows[1].text(), "c");
    }

    #[test]
    fn test_rows_ascend_and_words_sort_left_to_right() {
        let grouped = group_rows(
            vec![w("z", 300.0, 10.0), w("late", 5.0, 200.0), w("y", 20.0, 10.0)],
            1.0,
        );
        let texts: Vec<String> = grouped.rows.iter().map(Row::text).collect();
        assert_eq!(texts, vec!["y z", "late"]);
    }

    #[test]
    fn test_grouping_ignores_input_permutation() {
        let words = vec![
            w("12/01", 30.0, 200.2),
            w("Coffee", 120.0, 199.9),
            w("4.50", 400.0, 200.0),
            w("Shop", 160.0, 200.1),
            w("12/02", 30.0, 215.0),
            w("Rent", 120.0, 215.3),
        ];
        let expected = group_rows(words.clone(), 1.0).rows;
        let mut rotated = words.clone();
        for _ in 0..words.len() {
            rotated.rotate_left(1);
            assert_eq!(group_rows(rotated.clone(), 1.0).rows, expected);
        }
        let mut reversed = words;
        reversed.reverse();
        assert_eq!(group_rows(reversed, 1.0).rows, expected);
    }

    #[test]
    fn test_coarser_unit_merges_nearby_lines() {
        let words = vec![w("a", 0.0, 100.0), w("b", 10.0, 101.5)];
        assert_eq!(group_rows(words.clone(), 1.0).rows.len(), 2);
        assert_eq!(group_rows(words, 4.0).rows.len(), 1);
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let grouped = group_rows(
            vec![w("ok", 1.0, 1.0), w("nan", 1.0, f64::NAN), w("inf", f64::INFINITY, 1.0)],
            1.0,
        );
        assert_eq!(grouped.rows.len(), 1);
        assert_eq!(grouped.rejected.len(), 2);
    }
}
