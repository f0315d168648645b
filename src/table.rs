//! Labeled tables and hierarchical slicing.
//!
//! A [`LabeledTable`] is the in-memory result of concatenating all input
//! files of a run: rows keyed by an ordered tuple of key levels (method
//! label, and possibly sphere count and/or workgroup size), with named
//! numeric value columns. Slicing is pure: every operation returns a new,
//! narrower table, so the same table supports every chart of a suite.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::*;

/// One component of a row's composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyVal {
    /// A method label.
    Str(String),
    /// A numeric key column (sphere count, workgroup size).
    Int(i64),
}
impl KeyVal {
    /// Integer content, fails on labels.
    pub fn to_int(&self) -> Res<i64> {
        match self {
            KeyVal::Int(i) => Ok(*i),
            KeyVal::Str(s) => bail!("expected a numeric key, got label `{}`", s),
        }
    }

    /// Filename-friendly version: lowercase, spaces become underscores.
    pub fn file_frag(&self) -> String {
        match self {
            KeyVal::Int(i) => format!("{}", i),
            KeyVal::Str(s) => s.replace(' ', "_").to_lowercase(),
        }
    }
}
impl fmt::Display for KeyVal {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyVal::Str(s) => write!(fmt, "{}", s),
            KeyVal::Int(i) => write!(fmt, "{}", i),
        }
    }
}
impl PartialOrd for KeyVal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for KeyVal {
    fn cmp(&self, other: &Self) -> Ordering {
        use self::KeyVal::*;
        match (self, other) {
            (Int(lft), Int(rgt)) => lft.cmp(rgt),
            (Str(lft), Str(rgt)) => lft.cmp(rgt),
            // Levels are homogeneous in practice, numbers first otherwise.
            (Int(_), Str(_)) => Ordering::Less,
            (Str(_), Int(_)) => Ordering::Greater,
        }
    }
}
impl From<&str> for KeyVal {
    fn from(s: &str) -> Self {
        KeyVal::Str(s.into())
    }
}
impl From<String> for KeyVal {
    fn from(s: String) -> Self {
        KeyVal::Str(s)
    }
}
impl From<i64> for KeyVal {
    fn from(i: i64) -> Self {
        KeyVal::Int(i)
    }
}

/// One row: key tuple and value vector, arities matching the owning table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Composite key, one entry per key level.
    pub key: Vec<KeyVal>,
    /// Numeric measurements, one entry per value column.
    pub values: Vec<f64>,
}

/// Narrows one key level of a table.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Exact match; the level is dropped from the result.
    Key(KeyVal),
    /// Ordered membership; rows are reordered to the list's order and the
    /// level is kept.
    Keys(Vec<KeyVal>),
    /// Inclusive numeric bounds over an integer level; the level is kept.
    Range(i64, i64),
}

/// A table of rows with a multi-level key.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    /// Key level names, outermost first.
    levels: Vec<String>,
    /// Value column names.
    columns: Vec<String>,
    /// Rows, in concatenation order.
    rows: Vec<Row>,
}
impl LabeledTable {
    /// Creates an empty table with the given level and column names.
    pub fn mk(levels: Vec<String>, columns: Vec<String>) -> Self {
        LabeledTable {
            levels,
            columns,
            rows: Vec::with_capacity(100),
        }
    }

    /// Key level names, outermost first.
    #[inline]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }
    /// Value column names.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    /// Rows, in concatenation order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    /// True if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row. Key and value arities must match the table's.
    pub fn push(&mut self, row: Row) {
        debug_assert_eq! { row.key.len(), self.levels.len() }
        debug_assert_eq! { row.values.len(), self.columns.len() }
        self.rows.push(row)
    }

    /// Position of a key level.
    fn level_pos(&self, level: &str) -> Res<usize> {
        self.levels
            .iter()
            .position(|l| l == level)
            .ok_or_else(|| format!("no key level `{}` in table", level).into())
    }

    /// Position of a value column.
    fn col_pos(&self, column: &str) -> Res<usize> {
        self.columns.iter().position(|c| c == column).ok_or_else(|| {
            format!("no value column `{}` in table", column).into()
        })
    }

    /// Permutes the key levels. `order` must mention each level exactly once.
    pub fn reorder_levels(&self, order: &[&str]) -> Res<LabeledTable> {
        if order.len() != self.levels.len() {
            bail!(
                "level permutation has {} entries, table has {} level(s)",
                order.len(),
                self.levels.len()
            )
        }
        let mut positions = Vec::with_capacity(order.len());
        for level in order {
            let pos = self.level_pos(level)?;
            if positions.contains(&pos) {
                bail!("level `{}` appears twice in permutation", level)
            }
            positions.push(pos)
        }
        let mut res = LabeledTable::mk(
            positions.iter().map(|p| self.levels[*p].clone()).collect(),
            self.columns.clone(),
        );
        for row in &self.rows {
            res.push(Row {
                key: positions.iter().map(|p| row.key[*p].clone()).collect(),
                values: row.values.clone(),
            })
        }
        Ok(res)
    }

    /// Sorted distinct values of a key level.
    pub fn level_values(&self, level: &str) -> Res<Vec<KeyVal>> {
        let pos = self.level_pos(level)?;
        let mut res: Vec<KeyVal> = Vec::with_capacity(17);
        for row in &self.rows {
            if !res.contains(&row.key[pos]) {
                res.push(row.key[pos].clone())
            }
        }
        res.sort();
        Ok(res)
    }

    /// Narrows one key level. See [`Selector`] for which selectors keep or
    /// drop the level. Row order within a key group is always preserved.
    pub fn select(&self, level: &str, selector: &Selector) -> Res<LabeledTable> {
        let pos = self.level_pos(level)?;

        match selector {
            Selector::Key(val) => {
                let levels = self
                    .levels
                    .iter()
                    .enumerate()
                    .filter_map(|(p, l)| if p == pos { None } else { Some(l.clone()) })
                    .collect();
                let mut res = LabeledTable::mk(levels, self.columns.clone());
                for row in &self.rows {
                    if &row.key[pos] == val {
                        let mut key = row.key.clone();
                        key.remove(pos);
                        res.push(Row {
                            key,
                            values: row.values.clone(),
                        })
                    }
                }
                if res.is_empty() {
                    bail!(ErrorKind::KeyNotFound(level.into(), format!("{}", val)))
                }
                Ok(res)
            }

            Selector::Keys(vals) => {
                let mut res = LabeledTable::mk(self.levels.clone(), self.columns.clone());
                for val in vals {
                    let mut found = false;
                    for row in &self.rows {
                        if &row.key[pos] == val {
                            found = true;
                            res.push(row.clone())
                        }
                    }
                    if !found {
                        bail!(ErrorKind::KeyNotFound(level.into(), format!("{}", val)))
                    }
                }
                Ok(res)
            }

            Selector::Range(lo, hi) => {
                let mut res = LabeledTable::mk(self.levels.clone(), self.columns.clone());
                for row in &self.rows {
                    let key = row.key[pos].to_int().chain_err(|| {
                        format!("range selector over non-numeric level `{}`", level)
                    })?;
                    if *lo <= key && key <= *hi {
                        res.push(row.clone())
                    }
                }
                Ok(res)
            }
        }
    }

    /// Restricts the table to the given value columns, in the given order.
    pub fn project(&self, columns: &[String]) -> Res<LabeledTable> {
        let mut positions = Vec::with_capacity(columns.len());
        for column in columns {
            positions.push(self.col_pos(column)?)
        }
        let mut res = LabeledTable::mk(self.levels.clone(), columns.to_vec());
        for row in &self.rows {
            res.push(Row {
                key: row.key.clone(),
                values: positions.iter().map(|p| row.values[*p]).collect(),
            })
        }
        Ok(res)
    }

    /// Sorts rows by decreasing value. Only defined on single-column tables.
    ///
    /// The sort is stable, so applying it twice is the same as applying it
    /// once.
    pub fn sort_desc(&self) -> Res<LabeledTable> {
        if self.columns.len() != 1 {
            bail!(
                "descending sort is only defined on single-column slices, \
                 this one has {} columns",
                self.columns.len()
            )
        }
        let mut res = self.clone();
        res.rows.sort_by(|lft, rgt| {
            rgt.values[0]
                .partial_cmp(&lft.values[0])
                .unwrap_or(Ordering::Equal)
        });
        Ok(res)
    }
}

impl fmt::Display for LabeledTable {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let key_cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.key.iter().map(|k| format!("{}", k)).collect())
            .collect();
        let val_cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.values.iter().map(|v| format!("{}", v)).collect())
            .collect();

        let mut key_widths: Vec<usize> = self.levels.iter().map(|l| l.len()).collect();
        for key in &key_cells {
            for (idx, cell) in key.iter().enumerate() {
                key_widths[idx] = ::std::cmp::max(key_widths[idx], cell.len())
            }
        }
        let mut val_widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for values in &val_cells {
            for (idx, cell) in values.iter().enumerate() {
                val_widths[idx] = ::std::cmp::max(val_widths[idx], cell.len())
            }
        }

        for (idx, level) in self.levels.iter().enumerate() {
            write!(fmt, "{:>1$}  ", level, key_widths[idx])?
        }
        write!(fmt, "|")?;
        for (idx, column) in self.columns.iter().enumerate() {
            write!(fmt, "  {:>1$}", column, val_widths[idx])?
        }
        writeln!(fmt)?;

        for (key, values) in key_cells.iter().zip(val_cells.iter()) {
            for (idx, cell) in key.iter().enumerate() {
                write!(fmt, "{:>1$}  ", cell, key_widths[idx])?
            }
            write!(fmt, "|")?;
            for (idx, cell) in values.iter().enumerate() {
                write!(fmt, "  {:>1$}", cell, val_widths[idx])?
            }
            writeln!(fmt)?
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LabeledTable {
        let mut table = LabeledTable::mk(
            vec!["method".into(), "spheres".into()],
            vec!["compute".into(), "render".into()],
        );
        for (method, spheres, compute, render) in &[
            ("euler", 2, 7.0, 1.0),
            ("euler", 4, 9.0, 1.5),
            ("heun", 2, 11.0, 1.0),
            ("heun", 4, 15.0, 1.5),
            ("verlet", 2, 8.0, 1.0),
        ] {
            table.push(Row {
                key: vec![KeyVal::from(*method), KeyVal::from(*spheres)],
                values: vec![*compute, *render],
            })
        }
        table
    }

    #[test]
    fn key_select_drops_level() {
        let table = table();
        let slice = table
            .select("spheres", &Selector::Key(KeyVal::Int(2)))
            .expect("selecting spheres = 2");
        assert_eq! { slice.levels(), &["method".to_string()] }
        assert_eq! { slice.len(), 3 }
        assert_eq! { slice.rows()[0].key, vec![KeyVal::from("euler")] }
    }

    #[test]
    fn key_select_unknown_key() {
        let table = table();
        match table.select("spheres", &Selector::Key(KeyVal::Int(42))) {
            Err(e) => match e.kind() {
                ErrorKind::KeyNotFound(level, key) => {
                    assert_eq! { level.as_str(), "spheres" }
                    assert_eq! { key.as_str(), "42" }
                }
                kind => panic!("expected KeyNotFound, got {}", kind),
            },
            Ok(_) => panic!("selecting an absent key must fail"),
        }
    }

    #[test]
    fn list_select_reorders_and_keeps_level() {
        let table = table();
        let slice = table
            .select("spheres", &Selector::Key(KeyVal::Int(2)))
            .and_then(|t| {
                t.select(
                    "method",
                    &Selector::Keys(vec!["verlet".into(), "euler".into()]),
                )
            })
            .expect("selecting two methods");
        assert_eq! { slice.levels(), &["method".to_string()] }
        let keys: Vec<String> = slice
            .rows()
            .iter()
            .map(|r| format!("{}", r.key[0]))
            .collect();
        assert_eq! { keys, vec!["verlet".to_string(), "euler".to_string()] }
    }

    #[test]
    fn range_select_bounds_inclusive() {
        let table = table();
        let slice = table
            .select("spheres", &Selector::Range(2, 4))
            .expect("range select");
        assert_eq! { slice.len(), 5 }
        let slice = table
            .select("spheres", &Selector::Range(3, 4))
            .expect("range select");
        assert_eq! { slice.len(), 2 }
        let slice = table
            .select("spheres", &Selector::Range(5, 7))
            .expect("range select");
        assert! { slice.is_empty() }
    }

    #[test]
    fn reorder_then_select() {
        let table = table();
        let flipped = table
            .reorder_levels(&["spheres", "method"])
            .expect("legal permutation");
        assert_eq! {
            flipped.levels(),
            &["spheres".to_string(), "method".to_string()]
        }
        let slice = flipped
            .select("spheres", &Selector::Key(KeyVal::Int(4)))
            .expect("selecting spheres = 4");
        assert_eq! { slice.len(), 2 }
        assert_eq! { slice.levels(), &["method".to_string()] }
    }

    #[test]
    fn level_values_sorted_distinct() {
        let table = table();
        let methods = table.level_values("method").expect("method domain");
        assert_eq! {
            methods,
            vec![
                KeyVal::from("euler"), KeyVal::from("heun"), KeyVal::from("verlet")
            ]
        }
        let spheres = table.level_values("spheres").expect("spheres domain");
        assert_eq! { spheres, vec![KeyVal::Int(2), KeyVal::Int(4)] }
    }

    #[test]
    fn sort_desc_idempotent() {
        let table = table();
        let slice = table
            .select("spheres", &Selector::Key(KeyVal::Int(2)))
            .and_then(|t| t.project(&["compute".to_string()]))
            .expect("single-column slice");
        let once = slice.sort_desc().expect("sortable");
        let twice = once.sort_desc().expect("sortable");
        assert_eq! { once, twice }
        let values: Vec<f64> = once.rows().iter().map(|r| r.values[0]).collect();
        assert_eq! { values, vec![11.0, 8.0, 7.0] }
    }

    #[test]
    fn sort_desc_needs_single_column() {
        let table = table();
        assert! { table.sort_desc().is_err() }
    }

    #[test]
    fn project_reorders_columns() {
        let table = table();
        let projected = table
            .project(&["render".to_string(), "compute".to_string()])
            .expect("both columns exist");
        assert_eq! { projected.rows()[0].values, vec![1.0, 7.0] }
    }
}
