use{
    std::{
        fs,
        path::Path
    },
    super::*,
    crate::error::*
};

/// One simulator output file: a header line followed by one row per day.
///
/// Rows are stored flat in row major order.
#[derive(Debug, Clone, PartialEq)]
pub struct SimTable
{
    header: String,
    n_cols: usize,
    values: Vec<f64>
}

impl SimTable
{
    /// Load an output file and require the full output column layout.
    pub fn load(path: &Path) -> Result<Self>
    {
        Self::load_with_min_columns(path, NUM_OUTPUT_COLUMNS)
    }

    pub fn load_with_min_columns(path: &Path, min_cols: usize) -> Result<Self>
    {
        let content = read_existing(path)?;
        Self::parse(&content, true, min_cols)
            .map_err(|reason| EpiError::malformed(path, reason))
    }

    /// Load a plain numeric table without header line
    pub fn load_headerless(path: &Path, min_cols: usize) -> Result<Self>
    {
        let content = read_existing(path)?;
        Self::parse(&content, false, min_cols)
            .map_err(|reason| EpiError::malformed(path, reason))
    }

    pub fn parse(content: &str, has_header: bool, min_cols: usize) -> std::result::Result<Self, String>
    {
        let mut lines = content.lines();
        let header = if has_header {
            lines.next()
                .ok_or_else(|| "file is empty".to_owned())?
                .trim()
                .to_owned()
        } else {
            String::new()
        };

        let mut n_cols = None;
        let mut values = Vec::new();
        for (index, line) in lines.enumerate()
        {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_nr = index + 1 + has_header as usize;
            let before = values.len();
            for token in line.split_whitespace()
            {
                let val: f64 = token.parse()
                    .map_err(|_| format!("could not convert '{token}' to a number in line {line_nr}"))?;
                values.push(val);
            }
            let count = values.len() - before;
            match n_cols {
                None => n_cols = Some(count),
                Some(c) if c != count => {
                    return Err(
                        format!("line {line_nr} has {count} columns, expected {c}")
                    );
                },
                _ => ()
            }
        }

        let n_cols = n_cols
            .ok_or_else(|| "no data rows".to_owned())?;
        if n_cols < min_cols {
            return Err(
                format!("insufficient columns (found {n_cols}, need {min_cols})")
            );
        }

        Ok(
            Self{
                header,
                n_cols,
                values
            }
        )
    }

    /// Build a table from rows. All rows need the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self>
    {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(n_cols * rows.len());
        for (i, row) in rows.iter().enumerate()
        {
            if row.len() != n_cols {
                return Err(EpiError::shape(format!("row {i}"), n_cols, row.len()));
            }
            values.extend_from_slice(row);
        }
        Ok(
            Self{
                header: String::new(),
                n_cols,
                values
            }
        )
    }

    pub fn header(&self) -> &str
    {
        &self.header
    }

    pub fn n_rows(&self) -> usize
    {
        if self.n_cols == 0 {
            0
        } else {
            self.values.len() / self.n_cols
        }
    }

    pub fn n_cols(&self) -> usize
    {
        self.n_cols
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize)
    {
        (self.n_rows(), self.n_cols)
    }

    pub fn rows(&self) -> impl Iterator<Item=&[f64]>
    {
        self.values.chunks_exact(self.n_cols.max(1))
    }

    pub fn get(&self, row: usize, col: usize) -> f64
    {
        self.values[row * self.n_cols + col]
    }

    pub fn column(&self, col: usize) -> Vec<f64>
    {
        self.rows()
            .map(|row| row[col])
            .collect()
    }

    pub fn days(&self) -> Vec<f64>
    {
        self.column(COL_DAY)
    }

    pub fn sum_columns(&self, cols: &[usize]) -> Vec<f64>
    {
        self.rows()
            .map(|row| cols.iter().map(|&c| row[c]).sum())
            .collect()
    }

    pub fn metric(&self, metric: Metric) -> Vec<f64>
    {
        self.sum_columns(metric.columns())
    }

    /// Copy of the first `n` rows. Tables with fewer rows are returned unchanged.
    pub fn truncated(&self, n: usize) -> Self
    {
        let n = n.min(self.n_rows());
        Self{
            header: self.header.clone(),
            n_cols: self.n_cols,
            values: self.values[..n * self.n_cols].to_vec()
        }
    }
}

pub(crate) fn read_existing(path: &Path) -> Result<String>
{
    if !path.is_file() {
        return Err(EpiError::not_found(path));
    }
    Ok(fs::read_to_string(path)?)
}
