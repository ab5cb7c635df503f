//! Comparison configuration

/// Options controlling how two tables are joined and compared
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Columns to join the tables on; empty means positional alignment
    pub join_columns: Vec<String>,
    /// Columns excluded from the comparison on both sides
    pub ignore_columns: Vec<String>,
    /// Display alias for table 1 in reports
    pub df1_name: String,
    /// Display alias for table 2 in reports
    pub df2_name: String,
    /// Strip leading/trailing whitespace before comparing strings
    pub ignore_spaces: bool,
    /// Compare strings case-insensitively
    pub case_insensitive: bool,
    /// Lowercase column names before comparing
    pub cast_column_names_lower: bool,
    /// Absolute numeric tolerance
    pub abs_tol: f64,
    /// Relative numeric tolerance
    pub rel_tol: f64,
    /// Character encoding for reading input files; None auto-detects
    pub encoding: Option<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            join_columns: Vec::new(),
            ignore_columns: Vec::new(),
            df1_name: "df1".to_string(),
            df2_name: "df2".to_string(),
            ignore_spaces: false,
            case_insensitive: false,
            cast_column_names_lower: false,
            abs_tol: 0.0,
            rel_tol: 0.0,
            encoding: None,
        }
    }
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the join key columns
    pub fn with_join_columns(mut self, columns: Vec<String>) -> Self {
        self.join_columns = columns;
        self
    }

    /// Set columns to exclude from the comparison
    pub fn with_ignore_columns(mut self, columns: Vec<String>) -> Self {
        self.ignore_columns = columns;
        self
    }

    /// Set display aliases for the two tables
    pub fn with_names(mut self, df1_name: impl Into<String>, df2_name: impl Into<String>) -> Self {
        self.df1_name = df1_name.into();
        self.df2_name = df2_name.into();
        self
    }

    /// Ignore leading/trailing whitespace in string comparisons
    pub fn with_ignore_spaces(mut self, ignore: bool) -> Self {
        self.ignore_spaces = ignore;
        self
    }

    /// Compare strings case-insensitively
    pub fn with_case_insensitive(mut self, insensitive: bool) -> Self {
        self.case_insensitive = insensitive;
        self
    }

    /// Lowercase column names before comparing
    pub fn with_cast_column_names_lower(mut self, lower: bool) -> Self {
        self.cast_column_names_lower = lower;
        self
    }

    /// Set absolute numeric tolerance
    pub fn with_abs_tol(mut self, tol: f64) -> Self {
        self.abs_tol = tol;
        self
    }

    /// Set relative numeric tolerance
    pub fn with_rel_tol(mut self, tol: f64) -> Self {
        self.rel_tol = tol;
        self
    }

    /// Set the input file encoding
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Whether the comparison is keyed (as opposed to positional)
    pub fn is_keyed(&self) -> bool {
        !self.join_columns.is_empty()
    }
}
