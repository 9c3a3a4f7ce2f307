use std::{borrow::Cow, fmt::Write};

const COLUMN_GAP: usize = 2;

/// Fixed-width plain-text table for terminal output.
#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (width, cell) in col_widths.iter_mut().zip(row.as_ref()) {
                *width = (*width).max(display_width(cell));
            }
        }

        let rule_width =
            col_widths.iter().sum::<usize>() + COLUMN_GAP * col_count.saturating_sub(1);
        let mut table = String::with_capacity((rule_width + 1) * (self.rows.len() + 2));

        self.write_line(&mut table, self.headers, &col_widths);
        table.push_str(&"-".repeat(rule_width));
        table.push('\n');
        for row in &self.rows {
            self.write_line(&mut table, row.as_ref(), &col_widths);
        }
        table
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'_, str>], col_widths: &[usize]) {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(col_widths).enumerate() {
            if i > 0 {
                line.push_str(&" ".repeat(COLUMN_GAP));
            }
            let padding = " ".repeat(width.saturating_sub(display_width(cell)));
            match self.alignments.get(i).copied().unwrap_or_default() {
                Alignment::Left => {
                    let _ = write!(line, "{cell}{padding}");
                }
                Alignment::Right => {
                    let _ = write!(line, "{padding}{cell}");
                }
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

/// Terminal columns taken by `text`; non-ASCII characters count as two.
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_simple_table() {
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed("Name"), Cow::Borrowed("Balance")])
            .row([Cow::Borrowed("Alice"), Cow::Borrowed("+100.00")])
            .row([Cow::Borrowed("Bob"), Cow::Borrowed("-100.00")])
            .build();

        assert_eq!(
            table,
            "Name   Balance\n\
             --------------\n\
             Alice  +100.00\n\
             Bob    -100.00\n"
        );
    }

    #[rstest]
    fn test_wide_characters_are_aligned() {
        let table = TextTableBuilder::new()
            .headers(&[Cow::Borrowed("成员"), Cow::Borrowed("X")])
            .row([Cow::Borrowed("Bo"), Cow::Borrowed("1")])
            .build();

        assert_eq!(table, "成员  X\n-------\nBo    1\n");
    }

    #[rstest]
    #[case::ascii("abc", 3)]
    #[case::cjk("餐饮", 4)]
    #[case::mixed("A餐", 3)]
    fn test_display_width(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(display_width(input), expected);
    }

    #[rstest]
    fn test_empty_headers() {
        let table: String = TextTableBuilder::<[Cow<'_, str>; 0]>::new().build();
        assert!(table.is_empty());
    }
}
