//! Gravplot's errors and error handling.
//!
//! All failures are raised at the point of detection and terminate the run:
//! these are offline reporting runs, a failed run is simply rerun after
//! fixing the inputs.

use std::io::Write;

use crate::common::*;

error_chain! {
    types {
        Error, ErrorKind, ResExt, Res ;
    }

    foreign_links {
        Io(::std::io::Error)
        #[doc = "IO error."] ;
        Csv(::csv::Error)
        #[doc = "CSV layer error."] ;
    }

    errors {
        #[doc = "No label could be extracted from a data file name."]
        LabelExtraction(file: String, pattern: String) {
            description("label extraction error")
            display(
                "no match for label pattern `{}` in file name `{}`",
                pattern, file
            )
        }
        #[doc = "A field of a data file is not a number."]
        Parse(file: String, line: u64, field: String) {
            description("numeric parse error")
            display(
                "illegal numeric field `{}` in `{}` line {}", field, file, line
            )
        }
        #[doc = "A data file row does not match the suite's column schema."]
        SchemaMismatch(file: String, line: u64, expected: usize, got: usize) {
            description("schema mismatch")
            display(
                "column count mismatch in `{}` line {}: \
                 schema has {} column(s) but row has {}",
                file, line, expected, got
            )
        }
        #[doc = "A selector value is absent from its key level's domain."]
        KeyNotFound(level: String, key: String) {
            description("key not found")
            display("no key `{}` in level `{}`", key, level)
        }
        #[doc = "A chart's slice selected no rows at all."]
        EmptySlice(chart: String) {
            description("empty slice")
            display("nothing to plot for chart `{}`", chart)
        }
        #[doc = "Clap: argument name, error description."]
        Clap(arg: String, blah: String) {
            description("clap error")
            display(
                "clap error on {}{}", arg, if blah.is_empty() {
                    "".to_string()
                } else {
                    format!(": {}", blah)
                }
            )
        }
    }
}

/// Clap error.
pub fn clap_err<S1: Into<String>, S2: Into<String>>(arg: S1, blah: S2) -> Error {
    Error::from_kind(ErrorKind::Clap(arg.into(), blah.into()))
}

/// Prints an error and exits.
fn write_err_exit<C: ColorExt, W: Write>(
    conf: &C,
    err: &Error,
    w: &mut W,
) -> ::std::io::Result<()> {
    let (head, indent) = (conf.bad("|===| "), conf.bad("| "));
    writeln!(w, "{}{}:", head, conf.bad("Error"))?;
    for err in err.iter() {
        writeln!(w, "{}{}", indent, err)?
    }
    writeln!(w, "{}", head)?;
    Ok(())
}

/// Prints an error.
pub fn print_one_err<C: ColorExt>(conf: &C, err: &Error) {
    let stderr = &mut ::std::io::stderr();

    if let Err(io_e) = write_err_exit(conf, &err, stderr) {
        println!(
            "An error occured, but writing to stderr {}:",
            conf.bad("failed")
        );
        println!("> {}", io_e);
        println!();

        let stdout = &mut ::std::io::stdout();
        if let Err(io_e) = write_err_exit(conf, &err, stdout) {
            println!("Writing to stdout {}:", conf.bad("also failed"));
            println!("> {}", io_e);
            println!();

            println!("{} Original error:", conf.bad("|===|"));
            println!("{} {}", conf.bad("|"), err);
            println!("{}", conf.bad("|===|"))
        }
    }
}

/// Prints an error and exits if `exit` is true.
pub fn print_err<C: ColorExt>(conf: &C, err: &Error, exit: bool) {
    print_one_err(conf, err);
    if exit {
        ::std::process::exit(2)
    }
}
