//! Report suites: from data files to charts.
//!
//! A [`ReportSpec`] is fully declarative: a label rule, a CSV schema, and a
//! list of [`ChartDef`]s. Running a suite builds one table from the data
//! files and renders every chart from it, so all suites share the same
//! [`work`] entry point. The built-in suites cover the N-body benchmark's
//! standard runs, `gravplot custom` loads one from a toml file instead.

use crate::common::*;
use crate::consts::label;
use crate::load::{LabelRule, Schema};
use crate::table::{KeyVal, LabeledTable, Selector};

/// A full report suite.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    /// Suite name, for messages.
    pub name: String,
    /// How to label each data file.
    pub label: LabelRule,
    /// Column layout of the data files.
    pub schema: Schema,
    /// Print the full table before rendering.
    pub print_table: bool,
    /// Charts to render.
    pub charts: Vec<ChartDef>,
}

/// A selector, before `each` expansion.
#[derive(Debug, Clone)]
pub enum SelectorDef {
    /// One chart per value of the level, each rendered with a
    /// [`Selector::Key`] on that value.
    Each,
    /// Exact key.
    Key(KeyVal),
    /// Ordered key list.
    Keys(Vec<KeyVal>),
    /// Inclusive numeric bounds.
    Range(i64, i64),
}

/// One selection step of a chart.
#[derive(Debug, Clone)]
pub struct SliceStep {
    /// Level the selector applies to.
    pub level: String,
    /// What to keep of that level.
    pub selector: SelectorDef,
}

/// One chart of a suite, possibly expanding to several files via `each`.
#[derive(Debug, Clone)]
pub struct ChartDef {
    /// Output file template. `{Level Name}` is replaced by the key selected
    /// on that level, see [`interp`].
    pub file: String,
    /// Chart kind.
    pub kind: ChartKind,
    /// Sort policy.
    pub sort: SortPolicy,
    /// Value axis scale.
    pub scale: Scale,
    /// Value columns to keep, in order. All of them if absent.
    pub columns: Option<Vec<String>>,
    /// Legend labels. Series names if absent.
    pub legend: Option<Vec<String>>,
    /// Key level permutation applied before the steps. Must mention every
    /// level of the table.
    pub order: Option<Vec<String>>,
    /// Selection steps, applied in order.
    pub steps: Vec<SliceStep>,
}

/// One chart file to render: concrete selectors, interpolated file name.
struct Job {
    /// Output file name, relative to the output directory.
    file: String,
    /// Concrete selection steps.
    steps: Vec<(String, Selector)>,
}

/// Instantiates a file template.
///
/// `{Level Name}` becomes the key selected on that level: integers print as
/// such, labels are lowercased with spaces turned into underscores.
fn interp(template: &str, bindings: &[(String, KeyVal)]) -> String {
    let mut res = template.to_string();
    for (level, val) in bindings {
        res = res.replace(&format!("{{{}}}", level), &val.file_frag())
    }
    res
}

/// Expands a chart definition into concrete jobs.
///
/// Every `each` step multiplies the jobs by the sorted domain of its level
/// in the full table, and binds the level for file interpolation. `key`
/// steps bind their level too, `keys` and `range` steps bind nothing.
fn expand(table: &LabeledTable, def: &ChartDef) -> Res<Vec<Job>> {
    type Variant = (Vec<(String, Selector)>, Vec<(String, KeyVal)>);
    let mut variants: Vec<Variant> = vec![(vec![], vec![])];

    for step in &def.steps {
        match &step.selector {
            SelectorDef::Each => {
                let domain = table.level_values(&step.level)?;
                let mut next = Vec::with_capacity(variants.len() * domain.len());
                for (steps, bindings) in &variants {
                    for val in &domain {
                        let mut steps = steps.clone();
                        steps.push((step.level.clone(), Selector::Key(val.clone())));
                        let mut bindings = bindings.clone();
                        bindings.push((step.level.clone(), val.clone()));
                        next.push((steps, bindings))
                    }
                }
                variants = next
            }

            SelectorDef::Key(val) => {
                for (steps, bindings) in variants.iter_mut() {
                    steps.push((step.level.clone(), Selector::Key(val.clone())));
                    bindings.push((step.level.clone(), val.clone()))
                }
            }

            SelectorDef::Keys(vals) => {
                for (steps, _) in variants.iter_mut() {
                    steps.push((step.level.clone(), Selector::Keys(vals.clone())))
                }
            }

            SelectorDef::Range(lo, hi) => {
                for (steps, _) in variants.iter_mut() {
                    steps.push((step.level.clone(), Selector::Range(*lo, *hi)))
                }
            }
        }
    }

    Ok(variants
        .into_iter()
        .map(|(steps, bindings)| Job {
            file: interp(&def.file, &bindings),
            steps,
        })
        .collect())
}

/// Runs a suite over some data files.
pub fn work(conf: &Conf, spec: &ReportSpec, files: &[String]) -> Res<()> {
    log! {
        conf => "Loading {} data file(s)...", files.len()
    }
    let table = crate::load::build(conf, &spec.label, &spec.schema, files)
        .chain_err(|| format!("while building the `{}` table", conf.emph(&spec.name)))?;

    if spec.print_table {
        log! { conf => "" }
        print!("{}", table)
    }

    if table.is_empty() {
        warn! { conf => "no data to plot, nothing to do" }
        return Ok(());
    }
    if spec.charts.is_empty() {
        return Ok(());
    }

    mk_dir(&conf.out_dir).chain_err(|| {
        format!(
            "while creating chart directory `{}`",
            conf.emph(&conf.out_dir)
        )
    })?;

    let mut jobs = Vec::with_capacity(spec.charts.len());
    for def in &spec.charts {
        for job in expand(&table, def)? {
            jobs.push((def, job))
        }
    }

    log! {
        conf => "Rendering {} chart(s) to `{}`...",
        jobs.len(), conf.emph(&conf.out_dir)
    }

    let mut progress = if !conf.quiet() && jobs.len() > 4 {
        let mut bar = ProgressBar::new(jobs.len() as u64);
        bar.format("|##-|");
        bar.tick_format("\\|/-");
        bar.show_time_left = false;
        bar.show_speed = false;
        bar.show_tick = true;
        Some(bar)
    } else {
        None
    };

    for (def, job) in jobs {
        run_job(conf, &table, def, &job)?;
        if let Some(bar) = progress.as_mut() {
            bar.inc();
        }
    }
    if let Some(bar) = progress.as_mut() {
        bar.finish()
    }
    log! { conf => "Done" }
    Ok(())
}

/// Renders one chart file.
fn run_job(conf: &Conf, table: &LabeledTable, def: &ChartDef, job: &Job) -> Res<()> {
    let mut slice = match &def.order {
        Some(order) => {
            let order: Vec<&str> = order.iter().map(|s| s.as_str()).collect();
            table.reorder_levels(&order)?
        }
        None => table.clone(),
    };

    if let Some(columns) = &def.columns {
        slice = slice.project(columns)?
    }

    for (level, selector) in &job.steps {
        slice = slice
            .select(level, selector)
            .chain_err(|| format!("in selection step over level `{}`", conf.emph(level)))?
    }

    let path = PathBuf::from(&conf.out_dir).join(&job.file);
    let spec = ChartSpec::mk(
        def.kind,
        def.sort,
        def.scale,
        def.legend.clone(),
        path.to_string_lossy().into_owned(),
    );

    log! {
        conf, verb => "  {}", spec.file
    }
    crate::plot::work(conf, &slice, &spec)
}

/// Names of the built-in suites, in help order.
pub fn names() -> &'static [&'static str] {
    &[
        "accuracy",
        "profile",
        "acc-avg",
        "acc-methods",
        "acc-nos",
        "perf",
    ]
}

/// Built-in suite by name.
pub fn builtin(name: &str) -> Option<ReportSpec> {
    match name {
        "accuracy" => Some(accuracy()),
        "profile" => Some(profile()),
        "acc-avg" => Some(acc_avg()),
        "acc-methods" => Some(acc_methods()),
        "acc-nos" => Some(acc_nos()),
        "perf" => Some(perf()),
        _ => None,
    }
}

/// Owned strings of a string slice.
fn strs(ss: &[&str]) -> Vec<String> {
    ss.iter().map(|s| s.to_string()).collect()
}
/// `each` step.
fn each(level: &str) -> SliceStep {
    SliceStep {
        level: level.into(),
        selector: SelectorDef::Each,
    }
}
/// Integer `key` step.
fn key_int(level: &str, key: i64) -> SliceStep {
    SliceStep {
        level: level.into(),
        selector: SelectorDef::Key(KeyVal::Int(key)),
    }
}
/// `keys` step over labels.
fn keys(level: &str, keys: &[&str]) -> SliceStep {
    SliceStep {
        level: level.into(),
        selector: SelectorDef::Keys(keys.iter().map(|k| KeyVal::Str(k.to_string())).collect()),
    }
}
/// `range` step.
fn range(level: &str, lo: i64, hi: i64) -> SliceStep {
    SliceStep {
        level: level.into(),
        selector: SelectorDef::Range(lo, hi),
    }
}

/// Accuracy check: prints the drift table, no charts.
fn accuracy() -> ReportSpec {
    ReportSpec {
        name: "accuracy".into(),
        label: LabelRule::mk("method", label::accuracy_re.clone(), false, false),
        schema: Schema::mk(
            strs(&[
                "number of spheres",
                "total energy difference",
                "angular momentum difference",
                "total force difference",
            ]),
            None,
            vec![0],
        ),
        print_table: true,
        charts: vec![],
    }
}

/// Frame profile: compute/render timings over sphere counts and workgroup
/// sizes.
fn profile() -> ReportSpec {
    let order = Some(strs(&[
        "number of spheres",
        "method",
        "local workgroup size",
    ]));
    ReportSpec {
        name: "profile".into(),
        label: LabelRule::mk("method", label::profile_re.clone(), false, false),
        schema: Schema::mk(
            strs(&[
                "local workgroup size",
                "number of spheres",
                "gravity compute",
                "sphere render",
            ]),
            Some(vec![1, 2, 3, 4]),
            vec![0, 1],
        ),
        print_table: false,
        charts: vec![
            ChartDef {
                file: "gc_nos{number of spheres}.png".into(),
                kind: ChartKind::HorizontalBar,
                sort: SortPolicy::Descending,
                scale: Scale::Linear,
                columns: Some(strs(&["gravity compute"])),
                legend: None,
                order: order.clone(),
                steps: vec![each("number of spheres")],
            },
            ChartDef {
                file: "nos-method_{number of spheres}-{method}.png".into(),
                kind: ChartKind::VerticalBar,
                sort: SortPolicy::None,
                scale: Scale::Linear,
                columns: None,
                legend: None,
                order,
                steps: vec![each("number of spheres"), each("method")],
            },
            ChartDef {
                file: "method-lwgs_{method}-{local workgroup size}.png".into(),
                kind: ChartKind::Line,
                sort: SortPolicy::None,
                scale: Scale::Linear,
                columns: None,
                legend: None,
                order: None,
                steps: vec![each("method"), each("local workgroup size")],
            },
        ],
    }
}

/// Averaged accuracy: one bar per method, log scale.
fn acc_avg() -> ReportSpec {
    let chart = |file: &str, columns: &[&str]| ChartDef {
        file: file.into(),
        kind: ChartKind::VerticalBar,
        sort: SortPolicy::None,
        scale: Scale::Log,
        columns: Some(strs(columns)),
        legend: None,
        order: None,
        steps: vec![],
    };
    ReportSpec {
        name: "acc-avg".into(),
        label: LabelRule::mk("Method", label::accuracy_run_re.clone(), true, false),
        schema: Schema::mk(
            strs(&[
                "Angular Momentum X",
                "Angular Momentum Y",
                "Angular Momentum Z",
                "Total Energy",
                "Total Force Start",
                "Total Force End",
            ]),
            None,
            vec![],
        ),
        print_table: false,
        charts: vec![
            chart("acc-avg-angmom.png", &["Angular Momentum Y"]),
            chart("acc-avg-energy.png", &["Total Energy"]),
            chart(
                "acc-avg-force.png",
                &["Total Force Start", "Total Force End"],
            ),
        ],
    }
}

/// Per-sphere-count method comparison, log scale.
fn acc_methods() -> ReportSpec {
    ReportSpec {
        name: "acc-methods".into(),
        label: LabelRule::mk("Method", label::accuracy_run_re.clone(), true, false),
        schema: Schema::mk(
            strs(&[
                "number of spheres",
                "total energy",
                "angular momentum",
                "total force",
            ]),
            None,
            vec![0],
        ),
        print_table: false,
        charts: vec![ChartDef {
            file: "methods_{number of spheres}nos.png".into(),
            kind: ChartKind::VerticalBar,
            sort: SortPolicy::None,
            scale: Scale::Log,
            columns: None,
            legend: None,
            order: Some(strs(&["number of spheres", "Method"])),
            steps: vec![each("number of spheres")],
        }],
    }
}

/// Accuracy drift over sphere counts, fixed method order.
fn acc_nos() -> ReportSpec {
    let methods = &["Euler", "Heun", "Verlet"];
    let line = |file: &str, columns: &[&str], scale: Scale| ChartDef {
        file: file.into(),
        kind: ChartKind::Line,
        sort: SortPolicy::None,
        scale,
        columns: Some(strs(columns)),
        legend: Some(strs(methods)),
        order: None,
        steps: vec![keys("Method", methods)],
    };
    ReportSpec {
        name: "acc-nos".into(),
        label: LabelRule::mk("Method", label::accuracy_run_re.clone(), true, false),
        schema: Schema::mk(
            strs(&[
                "Number of Spheres",
                "Angular Momentum X",
                "Angular Momentum Y",
                "Angular Momentum Z",
                "Total Energy",
                "Total Force Start",
                "Total Force End",
            ]),
            None,
            vec![0],
        ),
        print_table: false,
        charts: vec![
            line(
                "acc-nos-angmom.png",
                &["Angular Momentum Y"],
                Scale::Linear,
            ),
            line("acc-nos-energy.png", &["Total Energy"], Scale::Linear),
            line(
                "acc-nos-angmom-log.png",
                &["Angular Momentum Y"],
                Scale::Log,
            ),
            line("acc-nos-energy-log.png", &["Total Energy"], Scale::Log),
            ChartDef {
                file: "acc-nos-force-{Method}.png".into(),
                kind: ChartKind::VerticalBar,
                sort: SortPolicy::None,
                scale: Scale::Log,
                columns: Some(strs(&["Total Force Start", "Total Force End"])),
                legend: None,
                order: None,
                steps: vec![each("Method")],
            },
        ],
    }
}

/// Performance: compute dispatch / draw call timings over method variants,
/// workgroup sizes and sphere counts.
fn perf() -> ReportSpec {
    let families: &[(&str, &[&str])] = &[
        (
            "base",
            &["Euler Naive", "Euler Interleaved", "Euler Base"],
        ),
        ("soften", &["Euler Nosoften", "Euler Base"]),
        (
            "shared",
            &["Euler Base", "Euler Shared", "Euler Shared Prefetch"],
        ),
        (
            "acc",
            &[
                "Euler Shared Prefetch",
                "Heun Shared Prefetch",
                "Verlet Shared Prefetch",
            ],
        ),
    ];

    let mut charts = Vec::with_capacity(2 * families.len() + 3);

    // Method comparisons at workgroup size 128, then over all sizes.
    for (family, methods) in families {
        charts.push(ChartDef {
            file: format!(
                "perf-methods_{}-lwgs128-nos{{Number of Spheres}}.png",
                family
            ),
            kind: ChartKind::HorizontalBar,
            sort: SortPolicy::Descending,
            scale: Scale::Linear,
            columns: Some(strs(&["Compute Dispatch"])),
            legend: None,
            order: Some(strs(&[
                "Number of Spheres",
                "Local Workgroup Size",
                "Method",
            ])),
            steps: vec![
                each("Number of Spheres"),
                key_int("Local Workgroup Size", 128),
                keys("Method", methods),
            ],
        })
    }
    for (family, methods) in families {
        charts.push(ChartDef {
            file: format!("perf-methods_{}-nos{{Number of Spheres}}.png", family),
            kind: ChartKind::HorizontalBar,
            sort: SortPolicy::Descending,
            scale: Scale::Linear,
            columns: Some(strs(&["Compute Dispatch"])),
            legend: None,
            order: Some(strs(&[
                "Number of Spheres",
                "Method",
                "Local Workgroup Size",
            ])),
            steps: vec![each("Number of Spheres"), keys("Method", methods)],
        })
    }

    // Workgroup size impact per method.
    charts.push(ChartDef {
        file: "perf-lwgs-{Method}-nos{Number of Spheres}.png".into(),
        kind: ChartKind::VerticalBar,
        sort: SortPolicy::None,
        scale: Scale::Linear,
        columns: Some(strs(&["Compute Dispatch"])),
        legend: None,
        order: Some(strs(&[
            "Number of Spheres",
            "Method",
            "Local Workgroup Size",
        ])),
        steps: vec![each("Number of Spheres"), each("Method")],
    });

    // Compute versus draw break-even over sphere counts.
    charts.push(ChartDef {
        file: "perf-breakeven_low-{Method}-lwgs{Local Workgroup Size}.png".into(),
        kind: ChartKind::Line,
        sort: SortPolicy::None,
        scale: Scale::Linear,
        columns: None,
        legend: None,
        order: None,
        steps: vec![
            each("Method"),
            each("Local Workgroup Size"),
            range("Number of Spheres", 2, 65_536),
        ],
    });
    charts.push(ChartDef {
        file: "perf-breakeven-{Method}-lwgs{Local Workgroup Size}.png".into(),
        kind: ChartKind::Line,
        sort: SortPolicy::None,
        scale: Scale::Linear,
        columns: None,
        legend: None,
        order: None,
        steps: vec![each("Method"), each("Local Workgroup Size")],
    });

    ReportSpec {
        name: "perf".into(),
        label: LabelRule::mk("Method", label::performance_re.clone(), true, true),
        schema: Schema::mk(
            strs(&[
                "Local Workgroup Size",
                "Number of Spheres",
                "Compute Dispatch",
                "Draw Call",
            ]),
            None,
            vec![0, 1],
        ),
        print_table: false,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn table() -> LabeledTable {
        let mut table = LabeledTable::mk(
            vec!["Method".into(), "Number of Spheres".into()],
            vec!["Compute Dispatch".into()],
        );
        for (method, spheres, compute) in &[
            ("Euler", 128, 3.0),
            ("Euler", 256, 5.0),
            ("Heun", 128, 4.0),
            ("Heun", 256, 7.0),
        ] {
            table.push(Row {
                key: vec![KeyVal::from(*method), KeyVal::Int(*spheres)],
                values: vec![*compute],
            })
        }
        table
    }

    #[test]
    fn file_interpolation() {
        let bindings = vec![
            ("Number of Spheres".to_string(), KeyVal::Int(1024)),
            ("Method".to_string(), KeyVal::from("Euler Shared")),
        ];
        assert_eq! {
            interp("perf-{Method}-nos{Number of Spheres}.png", &bindings),
            "perf-euler_shared-nos1024.png"
        }
    }

    #[test]
    fn each_expands_over_sorted_domain() {
        let def = ChartDef {
            file: "chart-{Method}.png".into(),
            kind: ChartKind::VerticalBar,
            sort: SortPolicy::None,
            scale: Scale::Linear,
            columns: None,
            legend: None,
            order: None,
            steps: vec![each("Method")],
        };
        let jobs = expand(&table(), &def).expect("legal expansion");
        let files: Vec<&str> = jobs.iter().map(|job| job.file.as_str()).collect();
        assert_eq! { files, vec!["chart-euler.png", "chart-heun.png"] }
        for job in &jobs {
            assert_eq! { job.steps.len(), 1 }
            match &job.steps[0].1 {
                Selector::Key(KeyVal::Str(_)) => (),
                step => panic!("expected a key selector, got {:?}", step),
            }
        }
    }

    #[test]
    fn each_expansion_is_cartesian() {
        let def = ChartDef {
            file: "chart-{Method}-{Number of Spheres}.png".into(),
            kind: ChartKind::VerticalBar,
            sort: SortPolicy::None,
            scale: Scale::Linear,
            columns: None,
            legend: None,
            order: None,
            steps: vec![each("Method"), each("Number of Spheres")],
        };
        let jobs = expand(&table(), &def).expect("legal expansion");
        assert_eq! { jobs.len(), 4 }
        assert_eq! { jobs[0].file, "chart-euler-128.png" }
        assert_eq! { jobs[3].file, "chart-heun-256.png" }
    }

    #[test]
    fn fixed_selectors_do_not_multiply() {
        let def = ChartDef {
            file: "chart.png".into(),
            kind: ChartKind::Line,
            sort: SortPolicy::None,
            scale: Scale::Linear,
            columns: None,
            legend: None,
            order: None,
            steps: vec![
                keys("Method", &["Heun", "Euler"]),
                range("Number of Spheres", 2, 65_536),
            ],
        };
        let jobs = expand(&table(), &def).expect("legal expansion");
        assert_eq! { jobs.len(), 1 }
        assert_eq! { jobs[0].file, "chart.png" }
        assert_eq! { jobs[0].steps.len(), 2 }
    }

    #[test]
    fn builtin_lookup() {
        for name in names() {
            assert! { builtin(name).is_some(), "unknown built-in suite `{}`", name }
        }
        assert! { builtin("no-such-suite").is_none() }
    }

    #[test]
    fn builtin_suites_are_consistent() {
        for name in names() {
            let spec = builtin(name).expect("known suite");
            let levels = spec.schema.levels(&spec.label.level);
            let columns = spec.schema.value_columns();
            for chart in &spec.charts {
                if let Some(cols) = &chart.columns {
                    for col in cols {
                        assert! {
                            columns.contains(col),
                            "suite `{}`: unknown column `{}` in chart `{}`",
                            name, col, chart.file
                        }
                    }
                }
                if let Some(order) = &chart.order {
                    assert_eq! {
                        order.len(), levels.len(),
                        "suite `{}`: partial level permutation in chart `{}`",
                        name, chart.file
                    }
                    for level in order {
                        assert! {
                            levels.contains(level),
                            "suite `{}`: unknown level `{}` in chart `{}`",
                            name, level, chart.file
                        }
                    }
                }
                for step in &chart.steps {
                    assert! {
                        levels.contains(&step.level),
                        "suite `{}`: unknown level `{}` in chart `{}`",
                        name, step.level, chart.file
                    }
                }
            }
        }
    }
}
