//! Command-Line Argument Parsing (clap).
//!
//! One subcommand per built-in report suite, plus `custom` for toml-defined
//! suites and `init` to dump an example suite specification.

use clap_lib::{App, AppSettings, Arg, ArgMatches, SubCommand};

use crate::common::*;
use crate::report;

/// Boolean of a string.
pub fn bool_of_str(s: &str) -> Option<bool> {
    match s {
        "on" | "true" => Some(true),
        "off" | "false" => Some(false),
        _ => None,
    }
}

/// Validates boolean arguments.
fn bool_validator(s: String) -> Result<(), String> {
    if bool_of_str(&s).is_some() {
        Ok(())
    } else {
        Err(format!("expected `on/true` or `off/false`, got `{}`", s))
    }
}

/// The data files argument, shared by all report subcommands.
fn data_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("DATA")
        .help("The benchmark CSV files to load")
        .value_name("FILE")
        .multiple(true)
}

/// One-line description of a built-in suite.
fn suite_about(name: &str) -> &'static str {
    match name {
        "accuracy" => "Prints the accuracy drift table",
        "profile" => "Frame profile charts (compute and render timings)",
        "acc-avg" => "Averaged accuracy bar charts, one bar per method",
        "acc-methods" => "Per-sphere-count accuracy method comparison",
        "acc-nos" => "Accuracy drift over sphere counts",
        "perf" => "Compute dispatch and draw call performance charts",
        _ => "",
    }
}

/// Parses the command-line arguments.
pub fn work() -> Res<Clap> {
    let mut app = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about("Renders charts from N-body gravity benchmark CSV files.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("-v")
                .long("--verbose")
                .help("Verbose output")
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("-q")
                .long("--quiet")
                .help("Minimal output"),
        )
        .arg(
            Arg::with_name("colored")
                .long("--color")
                .help("(De)activates colored output (default `on` on ttys)")
                .validator(bool_validator)
                .value_name("on|off")
                .takes_value(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("out_dir")
                .short("-o")
                .long("--out")
                .help(
                    "Sets the output directory, `<today>` (`<year>_<month>_<day>`) \
                     and `<now>` (`<hour>_<minute>`) are substituted",
                )
                .value_name("DIR")
                .default_value(".")
                .takes_value(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("force")
                .short("-f")
                .long("--force")
                .help("Forces `init` to overwrite an existing file"),
        )
        .subcommand(
            SubCommand::with_name("custom")
                .about("Runs a suite described by a toml specification file")
                .arg(
                    Arg::with_name("SPEC")
                        .short("-s")
                        .long("--spec")
                        .help("The suite specification file")
                        .value_name("FILE")
                        .required(true)
                        .takes_value(true)
                        .number_of_values(1),
                )
                .arg(data_arg()),
        )
        .subcommand(
            SubCommand::with_name("init")
                .about("Dumps an example suite specification file for `custom`")
                .arg(
                    Arg::with_name("FILE")
                        .help("Where to write the example specification")
                        .default_value("gravplot.toml"),
                ),
        );
    for name in report::names() {
        app = app.subcommand(
            SubCommand::with_name(name)
                .about(suite_about(name))
                .arg(data_arg()),
        )
    }

    let matches = app.get_matches();

    let verb = if matches.is_present("verbose") {
        Verb::Verbose
    } else if matches.is_present("quiet") {
        Verb::Quiet
    } else {
        Verb::Normal
    };
    let colored = match matches.value_of("colored") {
        Some(s) => bool_of_str(s)
            .ok_or_else(|| clap_err("--color", format!("expected `on|off`, got `{}`", s)))?,
        None => ::atty::is(::atty::Stream::Stdout),
    };
    let gconf = GConf::new(verb, colored, matches.is_present("force"));
    let out_dir = matches.value_of("out_dir").unwrap_or(".").to_string();

    match matches.subcommand() {
        ("init", Some(sub)) => {
            let file = sub.value_of("FILE").unwrap_or("gravplot.toml").to_string();
            Ok(Clap::Init(gconf, file))
        }

        ("custom", Some(sub)) => {
            let spec_file = sub
                .value_of("SPEC")
                .ok_or_else(|| clap_err("--spec", "expected a suite specification file"))?;
            let spec = crate::load::spec::toml(&gconf, spec_file)?;
            let data = data_files(sub);
            Ok(Clap::Report(Conf::mk(out_dir, gconf), Box::new(spec), data))
        }

        (name, Some(sub)) => {
            let spec = report::builtin(name).ok_or_else(|| clap_err(name, "unknown report suite"))?;
            let data = data_files(sub);
            Ok(Clap::Report(Conf::mk(out_dir, gconf), Box::new(spec), data))
        }

        (name, None) => Err(clap_err(name, "expected a subcommand")),
    }
}

/// Data files of a subcommand's matches, in occurrence order.
fn data_files(matches: &ArgMatches) -> Vec<String> {
    matches
        .values_of("DATA")
        .map(|values| values.map(|v| v.to_string()).collect())
        .unwrap_or_else(Vec::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_strings() {
        assert_eq! { bool_of_str("on"), Some(true) }
        assert_eq! { bool_of_str("true"), Some(true) }
        assert_eq! { bool_of_str("off"), Some(false) }
        assert_eq! { bool_of_str("false"), Some(false) }
        assert_eq! { bool_of_str("blah"), None }
    }
}
