//! End-to-end checks: CSV files in, PNG files out.

extern crate gravplot;

use std::fs;
use std::path::PathBuf;

use gravplot::common::*;
use gravplot::load::{self, LabelRule, Schema};
use gravplot::report::{ChartDef, ReportSpec, SelectorDef, SliceStep};
use gravplot::table::{KeyVal, LabeledTable, Selector};

fn scratch_dir(name: &str) -> PathBuf {
    let mut dir = ::std::env::temp_dir();
    dir.push(format!("gravplot_{}_{}", name, ::std::process::id()));
    fs::create_dir_all(&dir).expect("creating scratch directory");
    dir
}

fn quiet() -> GConf {
    GConf::new(Verb::Quiet, false, false)
}

fn rule() -> LabelRule {
    LabelRule::of_pattern("method", r"accuracy-(.+?)-", true, false).expect("legal pattern")
}

fn schema() -> Schema {
    Schema::mk(
        vec!["spheres".into(), "energy".into(), "force".into()],
        None,
        vec![0],
    )
}

fn write_data(dir: &PathBuf) -> Vec<String> {
    let euler = dir.join("accuracy-euler-run1.csv");
    fs::write(&euler, "1, 0.5, 2.0\n2, 0.25, 4.0\n").expect("writing euler data");
    let heun = dir.join("accuracy-heun-run1.csv");
    fs::write(&heun, "1, 0.1, 1.0\n2, 0.05, 3.0\n").expect("writing heun data");
    vec![
        euler.to_string_lossy().into_owned(),
        heun.to_string_lossy().into_owned(),
    ]
}

#[test]
fn csv_files_to_chart() {
    let dir = scratch_dir("e2e");
    let files = write_data(&dir);

    let gconf = quiet();
    let table = load::build(&gconf, &rule(), &schema(), &files).expect("loading");
    assert_eq! { table.len(), 4 }
    assert_eq! { table.levels(), &["method".to_string(), "spheres".to_string()] }
    assert_eq! {
        table.rows()[0].key,
        vec![KeyVal::from("Euler"), KeyVal::Int(1)]
    }
    assert_eq! {
        table.rows()[2].key,
        vec![KeyVal::from("Heun"), KeyVal::Int(1)]
    }

    let slice = table
        .select("spheres", &Selector::Key(KeyVal::Int(1)))
        .expect("slicing")
        .project(&["energy".to_string()])
        .expect("projecting");
    assert_eq! { slice.len(), 2 }

    let png = dir.join("energy.png");
    let spec = ChartSpec::mk(
        ChartKind::HorizontalBar,
        SortPolicy::Descending,
        Scale::Linear,
        None,
        png.to_string_lossy().into_owned(),
    );
    let conf = Conf::mk(dir.to_string_lossy().into_owned(), gconf);
    gravplot::plot::work(&conf, &slice, &spec).expect("rendering");
    assert! { png.is_file() }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn suite_run_renders_every_chart() {
    let dir = scratch_dir("suite");
    let files = write_data(&dir);
    let out = dir.join("charts");

    let spec = ReportSpec {
        name: "test".into(),
        label: rule(),
        schema: schema(),
        print_table: false,
        charts: vec![ChartDef {
            file: "energy-nos{spheres}.png".into(),
            kind: ChartKind::VerticalBar,
            sort: SortPolicy::None,
            scale: Scale::Linear,
            columns: Some(vec!["energy".into()]),
            legend: None,
            order: None,
            steps: vec![SliceStep {
                level: "spheres".into(),
                selector: SelectorDef::Each,
            }],
        }],
    };

    let conf = Conf::mk(out.to_string_lossy().into_owned(), quiet());
    gravplot::report::work(&conf, &spec, &files).expect("suite run");
    assert! { out.join("energy-nos1.png").is_file() }
    assert! { out.join("energy-nos2.png").is_file() }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn suite_run_with_no_data_is_a_noop() {
    let spec = ReportSpec {
        name: "test".into(),
        label: rule(),
        schema: schema(),
        print_table: false,
        charts: vec![],
    };
    let conf = Conf::mk(".".into(), quiet());
    gravplot::report::work(&conf, &spec, &[]).expect("no-op run")
}

#[test]
fn rendering_an_empty_slice_fails() {
    let slice = LabeledTable::mk(vec!["method".into()], vec!["energy".into()]);
    let spec = ChartSpec::mk(
        ChartKind::VerticalBar,
        SortPolicy::None,
        Scale::Linear,
        None,
        "unused.png".into(),
    );
    let conf = Conf::mk(".".into(), quiet());
    match gravplot::plot::work(&conf, &slice, &spec) {
        Err(e) => match e.kind() {
            ErrorKind::EmptySlice(chart) => assert_eq! { chart.as_str(), "unused.png" },
            kind => panic!("expected EmptySlice, got {}", kind),
        },
        Ok(()) => panic!("rendering an empty slice must fail"),
    }
    assert! { !PathBuf::from("unused.png").is_file() }
}

#[test]
fn unknown_label_pattern_fails_the_run() {
    let dir = scratch_dir("badlabel");
    let file = dir.join("profile-euler-run1.csv");
    fs::write(&file, "1, 0.5, 2.0\n").expect("writing data");

    let files = vec![file.to_string_lossy().into_owned()];
    match load::build(&quiet(), &rule(), &schema(), &files) {
        Err(e) => match e.kind() {
            ErrorKind::LabelExtraction(_, _) => (),
            kind => panic!("expected LabelExtraction, got {}", kind),
        },
        Ok(_) => panic!("label extraction must fail on a profile file"),
    }

    let _ = fs::remove_dir_all(&dir);
}
