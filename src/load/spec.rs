//! Suite specification file loader.
//!
//! A custom suite is a TOML file describing the label rule, the column
//! schema and one block per chart (see `gravplot init`). Loading goes
//! through raw `L*` mirror structs which are then finalized into a checked
//! [`ReportSpec`].

use crate::common::*;
use crate::report::{ChartDef, ReportSpec, SelectorDef, SliceStep};
use crate::table::KeyVal;

/// Loads a toml suite specification file.
pub fn toml<P, C>(gconf: &C, file: P) -> Res<ReportSpec>
where
    P: AsRef<Path>,
    C: GConfExt,
{
    let file = file.as_ref();

    let mut txt = String::new();
    File::open(file)?.read_to_string(&mut txt)?;

    let spec = match ::toml::from_str::<LSpec>(&txt) {
        Ok(spec) => spec,
        Err(e) => bail!(serde_error(gconf, &e, &txt)),
    };

    spec.finalize()
        .chain_err(|| format!("while loading suite file `{}`", gconf.emph(&file.to_string_lossy())))
}

/// Handles a serde load error.
fn serde_error<C: GConfExt>(gconf: &C, e: &::toml::de::Error, txt: &str) -> Error {
    let mut error = format!("{}", e);

    if let Some((l, c)) = e.line_col() {
        for (cnt, line) in txt.lines().enumerate() {
            if cnt == l {
                let line_count = format!("{}", l + 1);
                error += &format!("\n{} |", " ".repeat(line_count.len()));
                error += &format!("\n{} | {}", line_count, line);
                error += &format!(
                    "\n{} | {}{}",
                    " ".repeat(line_count.len()),
                    " ".repeat(c),
                    gconf.bad("^")
                );
                break;
            }
        }
    }

    error.into()
}

/// Default label level name.
fn default_level() -> String {
    "Method".into()
}

/// A suite specification right after loading.
#[derive(Debug, Deserialize)]
struct LSpec {
    name: String,
    label: LLabel,
    schema: LSchema,
    #[serde(default)]
    print_table: bool,
    #[serde(default, rename = "chart")]
    charts: Vec<LChart>,
}
impl LSpec {
    /// Finalizes a suite specification.
    fn finalize(self) -> Res<ReportSpec> {
        let LSpec {
            name,
            label,
            schema,
            print_table,
            charts,
        } = self;

        let label = crate::load::LabelRule::of_pattern(
            &label.level,
            &label.pattern,
            label.title_case,
            label.underscores_to_spaces,
        )?;

        let schema = crate::load::Schema::mk(schema.columns, schema.use_cols, schema.index);
        if let Some(use_cols) = &schema.use_cols {
            if use_cols.len() != schema.columns.len() {
                bail!(
                    "`use_cols` keeps {} column(s) but `columns` names {}",
                    use_cols.len(),
                    schema.columns.len()
                )
            }
        }
        for idx in &schema.index {
            if *idx >= schema.columns.len() {
                bail!(
                    "index position {} out of range, schema has {} column(s)",
                    idx,
                    schema.columns.len()
                )
            }
        }

        let mut chart_defs = Vec::with_capacity(charts.len());
        for chart in charts {
            chart_defs.push(
                chart
                    .finalize()
                    .chain_err(|| "while loading a `[[chart]]` block")?,
            )
        }

        Ok(ReportSpec {
            name,
            label,
            schema,
            print_table,
            charts: chart_defs,
        })
    }
}

/// A label rule right after loading.
#[derive(Debug, Deserialize)]
struct LLabel {
    pattern: String,
    #[serde(default = "default_level")]
    level: String,
    #[serde(default)]
    title_case: bool,
    #[serde(default)]
    underscores_to_spaces: bool,
}

/// A schema right after loading.
#[derive(Debug, Deserialize)]
struct LSchema {
    columns: Vec<String>,
    #[serde(default)]
    use_cols: Option<Vec<usize>>,
    #[serde(default)]
    index: Vec<usize>,
}

/// A chart block right after loading.
#[derive(Debug, Deserialize)]
struct LChart {
    file: String,
    kind: String,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    log_y: bool,
    #[serde(default)]
    columns: Option<Vec<String>>,
    #[serde(default)]
    legend: Option<Vec<String>>,
    #[serde(default)]
    order: Option<Vec<String>>,
    #[serde(default, rename = "select")]
    selects: Vec<LSelect>,
}
impl LChart {
    /// Turns itself into a `ChartDef`.
    fn finalize(self) -> Res<ChartDef> {
        let LChart {
            file,
            kind,
            sort,
            log_y,
            columns,
            legend,
            order,
            selects,
        } = self;

        let kind = ChartKind::of_str(&kind)
            .ok_or_else(|| format!("expected `{}`, got `{}`", ChartKind::values(), kind))?;

        let sort = match sort.as_deref() {
            None | Some("none") => SortPolicy::None,
            Some("descending") => SortPolicy::Descending,
            Some(other) => bail!("expected `none|descending`, got `{}`", other),
        };

        let scale = if log_y { Scale::Log } else { Scale::Linear };

        let mut steps = Vec::with_capacity(selects.len());
        for select in selects {
            steps.push(select.finalize()?)
        }

        Ok(ChartDef {
            file,
            kind,
            sort,
            scale,
            columns,
            legend,
            order,
            steps,
        })
    }
}

/// A selection step right after loading.
#[derive(Debug, Deserialize)]
struct LSelect {
    level: String,
    #[serde(default)]
    each: bool,
    #[serde(default)]
    key: Option<::toml::Value>,
    #[serde(default)]
    keys: Option<Vec<::toml::Value>>,
    #[serde(default)]
    range: Option<Vec<i64>>,
}
impl LSelect {
    /// Turns itself into a `SliceStep`.
    fn finalize(self) -> Res<SliceStep> {
        let LSelect {
            level,
            each,
            key,
            keys,
            range,
        } = self;

        let mut forms = 0;
        if each {
            forms += 1
        }
        if key.is_some() {
            forms += 1
        }
        if keys.is_some() {
            forms += 1
        }
        if range.is_some() {
            forms += 1
        }
        if forms != 1 {
            bail!(
                "select block for level `{}` must have exactly one of \
                 `each`, `key`, `keys` or `range`",
                level
            )
        }

        let selector = if each {
            SelectorDef::Each
        } else if let Some(key) = key {
            SelectorDef::Key(key_val(key)?)
        } else if let Some(keys) = keys {
            let mut vals = Vec::with_capacity(keys.len());
            for key in keys {
                vals.push(key_val(key)?)
            }
            SelectorDef::Keys(vals)
        } else if let Some(range) = range {
            if range.len() != 2 {
                bail!("`range` must have exactly two bounds, got {}", range.len())
            }
            SelectorDef::Range(range[0], range[1])
        } else {
            unreachable!("select form count was checked above")
        };

        Ok(SliceStep { level, selector })
    }
}

/// Key value of a toml value.
fn key_val(value: ::toml::Value) -> Res<KeyVal> {
    match value {
        ::toml::Value::Integer(i) => Ok(KeyVal::Int(i)),
        ::toml::Value::String(s) => Ok(KeyVal::Str(s)),
        value => bail!("expected integer or string key, got `{}`", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ChartKind;

    #[test]
    fn example_spec_loads() {
        let spec = match ::toml::from_str::<LSpec>(crate::consts::ex_spec_file) {
            Ok(spec) => spec,
            Err(e) => panic!("example spec does not parse: {}", e),
        };
        let spec = spec.finalize().expect("example spec finalizes");
        assert_eq! { spec.name, "example" }
        assert_eq! { spec.charts.len(), 2 }
        assert_eq! { spec.charts[0].kind, ChartKind::VerticalBar }
        assert_eq! { spec.charts[1].kind, ChartKind::Line }
    }

    #[test]
    fn use_cols_width_must_match_columns() {
        let txt = r#"
name = "bad"

[label]
pattern = "accuracy-(.+?)-"

[schema]
columns = ["spheres", "energy"]
use_cols = [0]
index = [1]
"#;
        let spec = ::toml::from_str::<LSpec>(txt).expect("well-formed toml");
        match spec.finalize() {
            Err(e) => {
                let msg = format!("{}", e);
                assert! {
                    msg.contains("use_cols"),
                    "expected a `use_cols` width error, got `{}`", msg
                }
            }
            Ok(_) => panic!("a `use_cols` narrower than `columns` must not finalize"),
        }
    }

    #[test]
    fn select_forms_are_exclusive() {
        let select = LSelect {
            level: "Method".into(),
            each: true,
            key: Some(::toml::Value::Integer(1)),
            keys: None,
            range: None,
        };
        assert! { select.finalize().is_err() }
    }
}
