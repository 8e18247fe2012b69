use{
    serde::{Serialize, Deserialize},
    std::{
        fmt::Display,
        num::*
    }
};

pub const DEFAULT_MAX_PARALLEL: NonZeroUsize = unsafe{NonZeroUsize::new_unchecked(4)};

/// Last log line of a successful simulator run contains this
pub const COMPLETION_SENTINEL: &str = "finalized";
/// Used for cases per million of the initial seeds
pub const US_POPULATION: f64 = 330e6;

pub const BUILD_DIR_ENV: &str = "EXAEPI_BUILD";
pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const STUDIES_FILE: &str = "studies.json";
pub const MACHINES_FILE: &str = "machines.json";
pub const REGTEST_FILE: &str = "regtest.json";
pub const RUN_SPEC_FILE: &str = "run.json";
pub const OUTPUT_FILE: &str = "output.dat";
pub const HOSPITAL_FILE: &str = "num_bad_hospitals.dat";

pub fn log_file_name(machine: &str) -> String
{
    format!("out.{machine}.log")
}

/// Rounded to an integer with `,` between groups of three digits
pub fn thousands(value: f64) -> String
{
    let rounded = format!("{:.0}", value.abs());
    let digits: Vec<_> = rounded.chars().collect();
    let groups: Vec<String> = digits.rchunks(3)
        .rev()
        .map(|c| c.iter().collect())
        .collect();
    let grouped = groups.join(",");
    if value < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Two decimals with a signed exponent of at least two digits, e.g. `1.00e-03`
pub fn sci(value: f64) -> String
{
    let formatted = format!("{value:.2e}");
    match formatted.split_once('e')
    {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-')
            {
                Some(digits) => ('-', digits),
                None => ('+', exponent)
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        },
        None => formatted
    }
}

/// Successes and failures of a batch of independent cases
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Tally
{
    pub succeeded: usize,
    pub failed: Vec<(String, String)>
}

impl Tally
{
    pub fn success(&mut self)
    {
        self.succeeded += 1;
    }

    pub fn failure<N, R>(&mut self, name: N, reason: R)
    where N: Display,
        R: Display
    {
        self.failed.push((name.to_string(), reason.to_string()));
    }

    pub fn total(&self) -> usize
    {
        self.succeeded + self.failed.len()
    }

    pub fn any_succeeded(&self) -> bool
    {
        self.succeeded > 0
    }

    pub fn print_summary(&self, what: &str)
    {
        println!("\n{}", "=".repeat(80));
        println!("{what} Summary:");
        println!("  Successful: {}/{}", self.succeeded, self.total());
        println!("  Failed:     {}/{}", self.failed.len(), self.total());
        if !self.failed.is_empty() {
            println!("\nFailed cases:");
            for (name, reason) in &self.failed
            {
                println!("  ✗ {name}");
                println!("    Reason: {reason}");
            }
        }
        println!("{}", "=".repeat(80));
    }

    /// Exit status of a batch: failure only when nothing worked
    pub fn exit_code(&self) -> i32
    {
        if self.any_succeeded() {
            0
        } else {
            1
        }
    }
}
