use crate::dates::DatePattern;
use crate::layout::ColumnLayout;
use crate::models::{ColumnKind, ColumnSpec, Word};
use crate::rows::Row;

/// Where a single word ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Column(usize),
    /// Left of the first column boundary.
    Outside,
    /// Landed in the date column but is not a date token.
    NotADate,
    /// A second date token in a row whose date is already set.
    ExtraDate,
}

/// Per-column text accumulated from one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFields {
    pub values: Vec<String>,
    date_index: usize,
}

impl RowFields {
    pub fn date(&self) -> &str {
        &self.values[self.date_index]
    }

    pub fn date_index(&self) -> usize {
        self.date_index
    }
}

/// Maps words to columns for one statement layout.
pub struct ColumnAssigner<'a> {
    spec: &'a ColumnSpec,
    layout: &'a ColumnLayout,
    dates: &'a DatePattern,
}

impl<'a> ColumnAssigner<'a> {
    pub fn new(spec: &'a ColumnSpec, layout: &'a ColumnLayout, dates: &'a DatePattern) -> Self {
        Self { spec, layout, dates }
    }

    fn place(&self, word: &Word, fields: &mut RowFields) -> Placement {
        let Some(i) = self.layout.column_for(word.x) else {
            return Placement::Outside;
        };
        match self.spec.columns()[i].kind {
            ColumnKind::Date if !self.dates.is_date(&word.text) => Placement::NotADate,
            ColumnKind::Date if !fields.values[i].is_empty() => Placement::ExtraDate,
            ColumnKind::Date => {
                fields.values[i] = word.text.clone();
                Placement::Column(i)
            }
            ColumnKind::Text => {
                fields.values[i].push_str(&word.text);
                fields.values[i].push(' ');
                Placement::Column(i)
            }
        }
    }

    /// Fill one row's column accumulators, reporting each word's placement.
    pub fn assign_row(&self, row: &Row) -> (RowFields, Vec<Placement>) {
        let mut fields = RowFields {
            values: vec![String::new(); self.spec.len()],
            date_index: self.spec.date_index(),
        };
        let placements = row.words.iter().map(|w| self.place(w, &mut fields)).collect();
        (fields, placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    fn spec() -> ColumnSpec {
        ColumnSpec::new(vec![
            Column::date("Date"),
            Column::text("Description"),
            Column::text("Amount"),
        ])
        .unwrap()
    }

    fn row(words: &[(&str, f64)]) -> Row {
        Row {
            key: 0,
            words: words.iter().map(|(t, x)| Word::new(*t, *x, 0.0)).collect(),
        }
    }

    #[test]
    fn test_text_columns_concatenate_with_trailing_space() {
        let (spec, layout, dates) = (
            spec(),
            ColumnLayout::from_boundaries(vec![20.0, 80.0, 400.0]),
            DatePattern::new().unwrap(),
        );
        let assigner = ColumnAssigner::new(&spec, &layout, &dates);
        let (fields, placements) =
            assigner.assign_row(&row(&[("1/4", 20.0), ("ACME", 80.0), ("Corp", 120.0), ("9.99", 410.0)]));
        assert_eq!(fields.values, vec!["1/4", "ACME Corp ", "9.99 "]);
        assert_eq!(fields.date(), "1/4");
        assert_eq!(
            placements,
            vec![Placement::Column(0), Placement::Column(1), Placement::Column(1), Placement::Column(2)]
        );
    }

    #[test]
    fn test_date_column_rejects_non_dates_and_keeps_first() {
        let (spec, layout, dates) = (
            spec(),
            ColumnLayout::from_boundaries(vec![20.0, 80.0, 400.0]),
            DatePattern::new().unwrap(),
        );
        let assigner = ColumnAssigner::new(&spec, &layout, &dates);
        let (fields, placements) =
            assigner.assign_row(&row(&[("Dat", 21.0), ("1/4", 30.0), ("1/5", 50.0), ("x", 5.0)]));
        assert_eq!(fields.date(), "1/4");
        assert_eq!(
            placements,
            vec![Placement::NotADate, Placement::Column(0), Placement::ExtraDate, Placement::Outside]
        );
    }

    #[test]
    fn test_every_word_gets_exactly_one_placement() {
        let (spec, layout, dates) = (
            spec(),
            ColumnLayout::from_boundaries(vec![20.0, 80.0, 400.0]),
            DatePattern::new().unwrap(),
        );
        let assigner = ColumnAssigner::new(&spec, &layout, &dates);
        let r = row(&[("a", 85.0), ("b", 300.0), ("c", 79.0), ("d", 500.0), ("2/2", 20.0)]);
        let (fields, placements) = assigner.assign_row(&r);
        assert_eq!(placements.len(), r.words.len());
        let claimed: usize = fields
            .values
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != fields.date_index())
            .map(|(_, v)| v.split_whitespace().count())
            .sum();
        assert_eq!(claimed, 3);
        assert_eq!(placements[2], Placement::NotADate);
    }
}
