//! Entry point.

extern crate gravplot;

use gravplot::common::*;

fn main() {
    match gravplot::clap::work() {
        Ok(Clap::Report(conf, spec, files)) => {
            if let Err(e) = gravplot::report::work(&conf, &spec, &files) {
                print_err(&conf, &e, true)
            }
        }

        Ok(Clap::Init(gconf, file)) => {
            if let Err(e) = example_spec_file(&gconf, &file) {
                print_err(&gconf, &e, true)
            }
        }

        Err(e) => print_err(&GConf::default(), &e, true),
    }
    ::std::process::exit(0)
}
