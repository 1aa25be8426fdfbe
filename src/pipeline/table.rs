//! Table wrapper: a polars DataFrame plus an optional promoted index column

use anyhow::{Context, Result};
use polars::prelude::*;

/// In-memory table with a row index.
///
/// Polars frames have no index of their own, so the index lives next to the frame.
/// `index == None` means row positions are the index; `Some` holds a promoted
/// column that was removed from the frame. Every row filter is applied to both so
/// they stay aligned.
///
/// Row positions only count as the default index while they are still the
/// unbroken sequence `0..height`. Dropping a row anywhere but the tail leaves a gap
/// in the original labels, and the table stops being eligible for promotion.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    index: Option<Series>,
    sequential: bool,
}

impl Table {
    pub fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            index: None,
            sequential: true,
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn index(&self) -> Option<&Series> {
        self.index.as_ref()
    }

    /// Name of the promoted index column, if any
    pub fn index_name(&self) -> Option<&str> {
        self.index.as_ref().map(|s| s.name().as_str())
    }

    /// True while the index is still the default `0..height` row sequence
    pub fn uses_default_index(&self) -> bool {
        self.index.is_none() && self.sequential
    }

    /// Number of rows. Follows the index when the frame has no columns left.
    pub fn height(&self) -> usize {
        match &self.index {
            Some(index) => index.len(),
            None => self.frame.height(),
        }
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// (rows, columns), not counting the index
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Drop every row that is null in all columns. Returns the number of rows removed.
    ///
    /// A table without columns has no fully-null rows.
    pub fn drop_null_rows(&mut self) -> Result<usize> {
        if self.frame.width() == 0 || self.frame.height() == 0 {
            return Ok(0);
        }

        let height = self.frame.height();
        let mut all_null = BooleanChunked::full("all_null".into(), true, height);
        for column in self.frame.get_columns() {
            let is_null = column.as_materialized_series().is_null();
            all_null = &all_null & &is_null;
        }

        let dropped = all_null.num_trues();
        if dropped == 0 {
            return Ok(0);
        }

        // Trailing drops keep the labels contiguous
        let kept = height - dropped;
        let first_dropped = (&all_null).into_iter().position(|v| v == Some(true));
        if first_dropped.is_some_and(|pos| pos < kept) {
            self.sequential = false;
        }

        let keep = !&all_null;
        self.frame = self
            .frame
            .filter(&keep)
            .context("Failed to drop fully-null rows")?;
        if let Some(index) = self.index.take() {
            self.index = Some(index.filter(&keep).context("Failed to filter index")?);
        }

        Ok(dropped)
    }

    /// Move a column out of the frame and make it the index
    pub fn promote_index(&mut self, name: &str) -> Result<()> {
        let column = self
            .frame
            .drop_in_place(name)
            .with_context(|| format!("Column '{}' not found for index promotion", name))?;
        self.index = Some(column.take_materialized_series());
        Ok(())
    }

    /// Drop the named columns from the frame
    pub fn drop_columns(&mut self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.frame = self.frame.drop_many(names.iter().map(|s| s.as_str()));
    }

    /// First `n` rows, for sample display
    pub fn head(&self, n: usize) -> Table {
        Table {
            frame: self.frame.head(Some(n)),
            index: self.index.as_ref().map(|s| s.head(Some(n))),
            sequential: self.sequential,
        }
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }
}

impl From<DataFrame> for Table {
    fn from(frame: DataFrame) -> Self {
        Table::new(frame)
    }
}
