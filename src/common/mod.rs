//! Common types and functions used by `gravplot`.

pub use std::fs::File;
pub use std::io::{BufRead, BufReader, Read, Write};
pub use std::path::{Path, PathBuf};
pub use std::str::FromStr;

pub use pbr::ProgressBar;

use ansi::{Colour, Style};

pub use crate::errors::*;

/// Log macro.
#[macro_export]
macro_rules! log {

    ( | internal | $pref:expr => ) => (()) ;

    ( | internal | $pref:expr => ; $($tail:tt)* ) => (
        log!(| internal | $pref => $($tail)*)
    ) ;

    ( | internal | $pref:expr => let $p:pat = $e:expr ; $($tail:tt)* ) => ({
        let $p = $e ;
        log!(| internal | $pref => $($tail)*)
    }) ;

    ( | internal | $pref:expr => { $($head:tt)+ } $($tail:tt)* ) => ({
        { $($head)+ }
        log!(| internal | $pref => $($tail)*)
    }) ;

    ( | internal | $pref:expr => $($head:expr),* ; $($tail:tt)* ) => ({
        print!("{}", $pref) ;
        println!($($head),*) ;
        log!(| internal | $pref => $($tail)*)
    }) ;

    ( $conf:expr => $($stuff:tt)+ ) => ({
        if ! $conf.quiet() {
            log!( |internal| "" => $($stuff)+ ; )
        }
    }) ;

    ( $conf:expr , verb => $($stuff:tt)+ ) => ({
        if $conf.verbose() {
            log!( |internal| "" => $($stuff)+ ; )
        }
    }) ;
}

/// Warning macro.
#[macro_export]
macro_rules! warn {
    ($conf:expr => $($stuff:tt)+) => (
        if ! $conf.quiet() {
            println!() ;
            println!("{}:", $conf.sad("|===| Warning")) ;
            warn!{ $conf, line => $($stuff)+ ; }
            println!("{}", $conf.sad("|===|")) ;
            println!()
        }
    ) ;

    ($conf:expr, line => $($stuff:tt)+) => (
        log!{ |internal| $conf.sad("| ") => $($stuff)+ ; }
    ) ;
}

pub mod chart;

pub use self::chart::{ChartKind, ChartSpec, Scale, SortPolicy};

use crate::report::ReportSpec;

/// Creates a directory if not already there.
#[inline]
pub fn mk_dir<P: AsRef<Path>>(path: P) -> Res<()> {
    ::std::fs::DirBuilder::new()
        .recursive(true)
        .create(path)
        .map_err(|e| e.into())
}

/// Clap result.
pub enum Clap {
    /// Report mode: run a suite over some data files.
    Report(Conf, Box<ReportSpec>, Vec<String>),
    /// Init mode (explanation). Second parameter is the file to dump the
    /// example suite specification to.
    Init(GConf, String),
}

/// Can color things.
pub trait ColorExt {
    /// The styles in the colorizer: emph, happy, sad, and bad.
    fn styles(&self) -> &Styles;
    /// String emphasis.
    #[inline]
    fn emph<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().emph.paint(s.as_ref()))
    }
    /// Happy string.
    #[inline]
    fn happy<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().hap.paint(s.as_ref()))
    }
    /// Sad string.
    #[inline]
    fn sad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().sad.paint(s.as_ref()))
    }
    /// Bad string.
    #[inline]
    fn bad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().bad.paint(s.as_ref()))
    }
}

/// Contains some styles for coloring.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Emphasis style.
    emph: Style,
    /// Happy style.
    hap: Style,
    /// Sad style.
    sad: Style,
    /// Bad style.
    bad: Style,
}
impl Default for Styles {
    fn default() -> Self {
        Styles::new(false)
    }
}
impl ColorExt for Styles {
    fn styles(&self) -> &Styles {
        self
    }
}
impl Styles {
    /// Creates some styles.
    pub fn new(colored: bool) -> Self {
        Styles {
            emph: if colored {
                Style::new().bold()
            } else {
                Style::new()
            },
            hap: if colored {
                Colour::Green.normal().bold()
            } else {
                Style::new()
            },
            sad: if colored {
                Colour::Yellow.normal().bold()
            } else {
                Style::new()
            },
            bad: if colored {
                Colour::Red.normal().bold()
            } else {
                Style::new()
            },
        }
    }
}

/// Has a verbosity setting.
pub trait VerbExt {
    /// Access to the verbosity.
    fn verb(&self) -> &Verb;
    /// True if quiet.
    #[inline]
    fn quiet(&self) -> bool {
        *self.verb() == Verb::Quiet
    }
    /// True if normal.
    #[inline]
    fn normal(&self) -> bool {
        *self.verb() == Verb::Normal
    }
    /// True if verbose.
    #[inline]
    fn verbose(&self) -> bool {
        *self.verb() == Verb::Verbose
    }
}

/// Verbosity.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Verb {
    /// No output.
    Quiet,
    /// Normal output.
    Normal,
    /// Verbose output.
    Verbose,
}
impl Default for Verb {
    fn default() -> Self {
        Verb::Normal
    }
}
impl VerbExt for Verb {
    fn verb(&self) -> &Verb {
        self
    }
}

/// Global configuration.
#[derive(Debug, Default, Clone)]
pub struct GConf {
    /// Verbosity.
    verb: Verb,
    /// Colored flag (for comparison).
    colored: bool,
    /// Styles.
    styles: Styles,
    /// Overwrite files when present.
    pub ow_files: bool,
}
impl PartialEq for GConf {
    fn eq(&self, other: &Self) -> bool {
        self.verb == other.verb && self.colored == other.colored && self.ow_files == other.ow_files
    }
}
impl GConfExt for GConf {
    fn gconf(&self) -> &GConf {
        self
    }
}
impl GConf {
    /// Creates a configuration.
    #[inline]
    pub fn new(verb: Verb, colored: bool, ow_files: bool) -> Self {
        GConf {
            verb,
            colored,
            styles: Styles::new(colored),
            ow_files,
        }
    }
}

/// Has a global conf.
pub trait GConfExt: ColorExt {
    /// The global conf.
    fn gconf(&self) -> &GConf;
    /// Opens a file in write mode. Creates parent directory if necessary.
    #[inline]
    fn open_file_writer<P: AsRef<Path>>(&self, path: P) -> Res<File> {
        // Create parent directory if necessary.
        {
            let mut buf = path.as_ref().to_path_buf();
            if buf.pop() && !buf.as_os_str().is_empty() {
                mk_dir(&buf).chain_err(|| "while creating parent directory")?
            }
        }
        let conf = self.gconf();
        let mut options = ::std::fs::OpenOptions::new();
        options.write(true);
        if conf.ow_files {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        options.open(path.as_ref()).map_err(|e| match e.kind() {
            ::std::io::ErrorKind::AlreadyExists => ErrorKind::Msg(format!(
                "file exists, not overwriting without {}",
                self.emph("-f")
            ))
            .into(),
            _ => e.into(),
        })
    }
}
impl<T: GConfExt> ColorExt for T {
    fn styles(&self) -> &Styles {
        &self.gconf().styles
    }
}
impl<T: GConfExt> VerbExt for T {
    fn verb(&self) -> &Verb {
        &self.gconf().verb
    }
}

/// Report configuration: where the charts go.
#[derive(Debug, Clone)]
pub struct Conf {
    /// Output directory.
    pub out_dir: String,
    /// Global conf.
    gconf: GConf,
}
impl GConfExt for Conf {
    fn gconf(&self) -> &GConf {
        &self.gconf
    }
}
impl Conf {
    /// Creates a report conf. Performs path substitutions on the output
    /// directory.
    #[inline]
    pub fn mk(out_dir: String, gconf: GConf) -> Self {
        let out_dir = out_dir.path_subst();
        Conf { out_dir, gconf }
    }
}

/// Extends string types with a substitution function.
pub trait StrExt {
    /// Replaces all non-ovelapping matches of a regex with something.
    fn subst(&self, regex: &::regex::Regex, something: &str) -> String;
    /// Performs path substitutions: `today` and `now`.
    fn path_subst(&self) -> String {
        use crate::consts::subst::{now_re, today_re};
        use chrono::{Datelike, Local, Timelike};
        let today = Local::today();
        let today = &format!("{}_{:0>2}_{:0>2}", today.year(), today.month(), today.day());
        let now = Local::now();
        let now = &format!("{:0>2}_{:0>2}", now.hour(), now.minute());
        let res = self.subst(&*today_re, today);
        res.subst(&*now_re, now)
    }
}
impl StrExt for str {
    fn subst(&self, regex: &::regex::Regex, something: &str) -> String {
        format!("{}", regex.replace_all(self, something))
    }
}
impl StrExt for String {
    fn subst(&self, regex: &::regex::Regex, something: &str) -> String {
        (self as &str).subst(regex, something)
    }
}

/// Dumps the example suite specification somewhere.
pub fn example_spec_file(conf: &GConf, file: &str) -> Res<()> {
    log! { conf => "Opening `{}`...", conf.emph(file) }
    let mut writer = conf.open_file_writer(file).chain_err(|| {
        format!(
            "while opening example specification file `{}` (write)",
            conf.emph(file)
        )
    })?;
    log! { conf => "  writing example suite specification..." }
    writer
        .write_all(crate::consts::ex_spec_file.as_bytes())
        .chain_err(|| {
            format!(
                "while writing example specification to file `{}`",
                conf.emph(file)
            )
        })?;
    log! {
        conf =>
        "Done" ;
        "" ;
        "Edit `{}` to describe your own charts, then run", conf.emph(file) ;
        "> {} {} --spec {} <data files>",
        conf.happy("gravplot"), conf.emph("custom"), file ;
        "" ;
        "The built-in suites ({}) need no specification file.",
        conf.emph("gravplot help")
    }
    Ok(())
}
