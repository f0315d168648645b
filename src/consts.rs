//! Constants.

/// Substitutions in user-provided paths.
pub mod subst {
    use regex::Regex;

    /// Today keyword. **Update CLAP help if you change this.**
    pub static today: &str = "<today>";
    /// Now keyword. **Update CLAP help if you change this.**
    pub static now: &str = "<now>";

    lazy_static! {
        #[doc = "Matches the `today` keyword."]
        pub static ref today_re: Regex = Regex::new(today).unwrap() ;
        #[doc = "Matches the `now` keyword."]
        pub static ref now_re: Regex = Regex::new(now).unwrap() ;
    }
}

/// Label-extraction patterns of the built-in report suites.
///
/// A label is whatever the first capture group matches on the base name of a
/// data file. The patterns are an implicit contract with the benchmark that
/// produces the files.
pub mod label {
    use regex::Regex;

    lazy_static! {
        #[doc = "Label of an accuracy run, `accuracy-<label>-...`."]
        pub static ref accuracy_re: Regex = Regex::new(
            r"accuracy-(.+?)-"
        ).unwrap() ;
        #[doc = "Label of an averaged accuracy run, `accuracy-<label>_...`."]
        pub static ref accuracy_run_re: Regex = Regex::new(
            r"accuracy-(.+?)_"
        ).unwrap() ;
        #[doc = "Label of a profile run, `profile-<label>-...`."]
        pub static ref profile_re: Regex = Regex::new(
            r"profile-(.+?)-"
        ).unwrap() ;
        #[doc = "Label of a performance run, `performance-<label>-...`."]
        pub static ref performance_re: Regex = Regex::new(
            r"performance-(.+?)-"
        ).unwrap() ;
    }
}

/// Chart rendering constants.
pub mod chart {
    use plotters::style::RGBColor;

    /// Floor of the value axis on log-scale charts.
    ///
    /// Zero and near-zero measurements would otherwise stretch the axis over
    /// dozens of decades.
    pub static log_floor: f64 = 1.0;

    /// Canvas size of a chart in pixels.
    pub static dims: (u32, u32) = (900, 600);

    /// Fraction of a category band occupied by bars.
    pub static bar_width: f64 = 0.8;

    /// Headroom factor applied to the maximum value of an axis.
    pub static headroom: f64 = 1.1;

    /// Series colors, in drawing order.
    pub static palette: [RGBColor; 10] = [
        RGBColor(31, 119, 180),
        RGBColor(255, 127, 14),
        RGBColor(44, 160, 44),
        RGBColor(214, 39, 40),
        RGBColor(148, 103, 189),
        RGBColor(140, 86, 75),
        RGBColor(227, 119, 194),
        RGBColor(127, 127, 127),
        RGBColor(188, 189, 34),
        RGBColor(23, 190, 207),
    ];

    /// Color of series `idx`, wrapping around the palette.
    pub fn color(idx: usize) -> RGBColor {
        palette[idx % palette.len()]
    }
}

/// Example suite specification dumped by `gravplot init`.
pub static ex_spec_file: &str = r#"# Example report suite for `gravplot custom --spec <this file>`.

name = "example"

# How to turn a data file name into its method label. The label becomes the
# outermost key level of the table, named `level`.
[label]
pattern = "accuracy-(.+?)_"
level = "Method"
title_case = true
underscores_to_spaces = false

# Column schema of the (headerless) CSV files. `index` lists the positions of
# the columns that become key levels instead of value columns. `use_cols`
# optionally projects the CSV columns before the schema applies.
[schema]
columns = ["Number of Spheres", "Total Energy", "Total Force"]
index = [0]

# One `[[chart]]` block per output file. `{Level Name}` in `file` is replaced
# by the selected key of that level; an `each = true` selection renders one
# chart per value of the level.
[[chart]]
file = "energy-nos{Number of Spheres}.png"
kind = "vertical-bar"
log_y = true
columns = ["Total Energy"]

[[chart.select]]
level = "Number of Spheres"
each = true

[[chart]]
file = "energy-over-nos.png"
kind = "line"
columns = ["Total Energy"]
legend = ["Euler", "Heun", "Verlet"]

[[chart.select]]
level = "Method"
keys = ["Euler", "Heun", "Verlet"]
"#;
