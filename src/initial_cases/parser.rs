use{
    super::*,
    structopt::StructOpt,
    std::path::PathBuf
};

/// Totals of initial case seed files
#[derive(Debug, StructOpt, Clone)]
pub struct InitialCases{
    /// `.cases` files, relative ones are looked up in the data directory.
    /// Default: all `.cases` files of the data directory
    files: Vec<String>,

    #[structopt(long, default_value = "data", parse(from_os_str))]
    datadir: PathBuf,

    /// combined per county table of all files
    #[structopt(long, default_value = "initial_cases.dat", parse(from_os_str))]
    output: PathBuf
}

impl InitialCases{
    pub fn execute(&self) -> i32{
        summarize(&self.datadir, &self.files, &self.output)
    }
}
