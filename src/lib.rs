//! Chart generation for N-body gravity simulation benchmark results.
//!
//! A `gravplot` run is strictly linear: build one labeled table from the
//! data files given on the command line, then run the report suite's list of
//! slice/chart specifications, writing one PNG per chart.

#![forbid(missing_docs)]
#![allow(non_upper_case_globals)]

extern crate ansi_term as ansi;
extern crate atty;
extern crate chrono;
#[macro_use]
extern crate clap_lib;
extern crate csv;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
extern crate pbr;
extern crate plotters;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate toml;

pub mod consts;
pub mod errors;
#[macro_use]
pub mod common;
pub mod clap;
pub mod load;
pub mod plot;
pub mod report;
pub mod table;
