//! Data loading.
//!
//! Builds one [`LabeledTable`](crate::table::LabeledTable) from a list of
//! headerless CSV files. The per-file label comes from the file name, the
//! column layout from a per-suite [`Schema`].

use regex::Regex;

use crate::common::*;
use crate::table::{KeyVal, LabeledTable, Row};

pub mod spec;

/// How to turn a data file name into its label.
///
/// The label is whatever the pattern's first capture group matches on the
/// base name. Optional cosmetics mirror the labels the benchmark embeds in
/// its file names: `euler_shared` becomes `Euler Shared` with both flags on.
#[derive(Debug, Clone)]
pub struct LabelRule {
    /// Name of the key level the labels go to.
    pub level: String,
    /// Pattern with one capture group.
    re: Regex,
    /// Title-case the label.
    title_case: bool,
    /// Replace underscores by spaces before title-casing.
    underscores_to_spaces: bool,
}
impl LabelRule {
    /// Creates a label rule.
    pub fn mk<S: Into<String>>(
        level: S,
        re: Regex,
        title_case: bool,
        underscores_to_spaces: bool,
    ) -> Self {
        LabelRule {
            level: level.into(),
            re,
            title_case,
            underscores_to_spaces,
        }
    }

    /// Creates a label rule from a pattern string.
    pub fn of_pattern(
        level: &str,
        pattern: &str,
        title_case: bool,
        underscores_to_spaces: bool,
    ) -> Res<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| format!("illegal label pattern `{}`: {}", pattern, e))?;
        if re.captures_len() < 2 {
            bail!("label pattern `{}` has no capture group", pattern)
        }
        Ok(LabelRule::mk(level, re, title_case, underscores_to_spaces))
    }

    /// Extracts the label of a data file.
    pub fn extract(&self, file: &str) -> Res<String> {
        let base = Path::new(file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string());
        let caps = self.re.captures(&base).ok_or_else(|| {
            Error::from_kind(ErrorKind::LabelExtraction(
                file.into(),
                self.re.as_str().into(),
            ))
        })?;
        let mut label = match caps.get(1) {
            Some(grp) => grp.as_str().to_string(),
            None => bail!(ErrorKind::LabelExtraction(
                file.into(),
                self.re.as_str().into()
            )),
        };
        if self.underscores_to_spaces {
            label = label.replace('_', " ")
        }
        if self.title_case {
            label = title_case(&label)
        }
        Ok(label)
    }
}

/// Fixed column layout of a suite's CSV files.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Names of the (used) CSV columns, in file order.
    pub columns: Vec<String>,
    /// CSV positions to keep, applied before `columns`. All columns if absent.
    pub use_cols: Option<Vec<usize>>,
    /// Positions within `columns` promoted to key levels.
    pub index: Vec<usize>,
}
impl Schema {
    /// Creates a schema.
    pub fn mk(columns: Vec<String>, use_cols: Option<Vec<usize>>, index: Vec<usize>) -> Self {
        Schema {
            columns,
            use_cols,
            index,
        }
    }

    /// Key level names: the label level followed by the index columns.
    pub fn levels(&self, label_level: &str) -> Vec<String> {
        let mut levels = Vec::with_capacity(1 + self.index.len());
        levels.push(label_level.to_string());
        for idx in &self.index {
            levels.push(self.columns[*idx].clone())
        }
        levels
    }

    /// Value column names: everything not promoted to a key level.
    pub fn value_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, col)| {
                if self.index.contains(&idx) {
                    None
                } else {
                    Some(col.clone())
                }
            })
            .collect()
    }
}

/// Builds a labeled table from a list of data files.
///
/// Files are concatenated in input order, each under its extracted label as
/// outermost key component. An empty file list yields an empty table.
pub fn build<C: GConfExt>(
    conf: &C,
    rule: &LabelRule,
    schema: &Schema,
    files: &[String],
) -> Res<LabeledTable> {
    let mut table = LabeledTable::mk(schema.levels(&rule.level), schema.value_columns());
    for file in files {
        let label = rule.extract(file)?;
        log! {
            conf, verb => "  {} -> {}", file, conf.emph(&label)
        }
        load_file(&mut table, schema, &label, file)
            .chain_err(|| format!("while loading data file `{}`", conf.emph(file)))?
    }
    Ok(table)
}

/// Loads the rows of one file under the given label.
fn load_file(table: &mut LabeledTable, schema: &Schema, label: &str, file: &str) -> Res<()> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_path(file)?;

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);

        let fields = project(schema, &record, file, line)?;

        let mut key = Vec::with_capacity(1 + schema.index.len());
        key.push(KeyVal::Str(label.to_string()));
        for idx in &schema.index {
            let field = fields[*idx];
            let int = i64::from_str(field).map_err(|_| {
                Error::from_kind(ErrorKind::Parse(file.into(), line, field.into()))
            })?;
            key.push(KeyVal::Int(int))
        }

        let mut values = Vec::with_capacity(fields.len() - schema.index.len());
        for (idx, field) in fields.iter().enumerate() {
            if schema.index.contains(&idx) {
                continue;
            }
            let value = f64::from_str(field).map_err(|_| {
                Error::from_kind(ErrorKind::Parse(file.into(), line, (*field).into()))
            })?;
            values.push(value)
        }

        table.push(Row { key, values })
    }
    Ok(())
}

/// Applies the schema's column projection to a record.
fn project<'a>(
    schema: &Schema,
    record: &'a ::csv::StringRecord,
    file: &str,
    line: u64,
) -> Res<Vec<&'a str>> {
    match &schema.use_cols {
        Some(cols) => {
            let needed = cols.iter().max().map(|max| max + 1).unwrap_or(0);
            if record.len() < needed {
                bail!(ErrorKind::SchemaMismatch(
                    file.into(),
                    line,
                    needed,
                    record.len()
                ))
            }
            Ok(cols
                .iter()
                .map(|col| record.get(*col).unwrap_or(""))
                .collect())
        }
        None => {
            if record.len() != schema.columns.len() {
                bail!(ErrorKind::SchemaMismatch(
                    file.into(),
                    line,
                    schema.columns.len(),
                    record.len()
                ))
            }
            Ok(record.iter().collect())
        }
    }
}

/// Title-cases a label: first letter of every word upper, rest lower.
fn title_case(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if word_start {
                res.extend(c.to_uppercase())
            } else {
                res.extend(c.to_lowercase())
            }
            word_start = false
        } else {
            res.push(c);
            word_start = true
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;

    #[test]
    fn title_casing() {
        assert_eq! { title_case("euler shared prefetch"), "Euler Shared Prefetch" }
        assert_eq! { title_case("HEUN"), "Heun" }
        assert_eq! { title_case("verlet"), "Verlet" }
    }

    #[test]
    fn label_extraction() {
        let rule = LabelRule::mk(
            "Method",
            consts::label::performance_re.clone(),
            true,
            true,
        );
        let label = rule
            .extract("results/performance-euler_shared_prefetch-run1.csv")
            .expect("matching file name");
        assert_eq! { label, "Euler Shared Prefetch" }
    }

    #[test]
    fn label_extraction_deterministic() {
        let rule = LabelRule::mk("method", consts::label::accuracy_re.clone(), false, false);
        let one = rule.extract("accuracy-heun-run1.csv").expect("match");
        let two = rule.extract("accuracy-heun-run1.csv").expect("match");
        assert_eq! { one, two }
    }

    #[test]
    fn label_extraction_failure() {
        let rule = LabelRule::mk("method", consts::label::accuracy_re.clone(), false, false);
        match rule.extract("performance-euler-run1.csv") {
            Err(e) => match e.kind() {
                ErrorKind::LabelExtraction(file, _) => {
                    assert_eq! { file.as_str(), "performance-euler-run1.csv" }
                }
                kind => panic!("expected LabelExtraction, got {}", kind),
            },
            Ok(label) => panic!("extraction must fail, got label `{}`", label),
        }
    }

    fn scratch_file(name: &str, content: &str) -> String {
        let mut path = ::std::env::temp_dir();
        path.push(format!("gravplot_{}_{}", ::std::process::id(), name));
        ::std::fs::write(&path, content).expect("writing scratch data");
        path.to_string_lossy().into_owned()
    }

    fn scratch_schema() -> Schema {
        Schema::mk(
            vec!["spheres".into(), "energy".into(), "force".into()],
            None,
            vec![0],
        )
    }

    #[test]
    fn non_numeric_field_fails_with_parse() {
        let file = scratch_file("parse.csv", "1, 0.5, 2.0\n2, oops, 4.0\n");
        let mut table = LabeledTable::mk(
            scratch_schema().levels("method"),
            scratch_schema().value_columns(),
        );
        match load_file(&mut table, &scratch_schema(), "Euler", &file) {
            Err(e) => match e.kind() {
                ErrorKind::Parse(f, line, field) => {
                    assert_eq! { f.as_str(), file.as_str() }
                    assert_eq! { *line, 2 }
                    assert_eq! { field.as_str(), "oops" }
                }
                kind => panic!("expected Parse, got {}", kind),
            },
            Ok(()) => panic!("a non-numeric field must fail the load"),
        }
        let _ = ::std::fs::remove_file(&file);
    }

    #[test]
    fn column_count_mismatch_fails_with_schema() {
        let file = scratch_file("mismatch.csv", "1, 0.5\n");
        let mut table = LabeledTable::mk(
            scratch_schema().levels("method"),
            scratch_schema().value_columns(),
        );
        match load_file(&mut table, &scratch_schema(), "Euler", &file) {
            Err(e) => match e.kind() {
                ErrorKind::SchemaMismatch(f, line, expected, got) => {
                    assert_eq! { f.as_str(), file.as_str() }
                    assert_eq! { *line, 1 }
                    assert_eq! { *expected, 3 }
                    assert_eq! { *got, 2 }
                }
                kind => panic!("expected SchemaMismatch, got {}", kind),
            },
            Ok(()) => panic!("a short row must fail the load"),
        }
        let _ = ::std::fs::remove_file(&file);
    }

    #[test]
    fn schema_split() {
        let schema = Schema::mk(
            vec![
                "Local Workgroup Size".into(),
                "Number of Spheres".into(),
                "Compute Dispatch".into(),
                "Draw Call".into(),
            ],
            None,
            vec![0, 1],
        );
        assert_eq! {
            schema.levels("Method"),
            vec![
                "Method".to_string(),
                "Local Workgroup Size".to_string(),
                "Number of Spheres".to_string(),
            ]
        }
        assert_eq! {
            schema.value_columns(),
            vec!["Compute Dispatch".to_string(), "Draw Call".to_string()]
        }
    }
}
