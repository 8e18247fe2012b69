use{
    super::*,
    structopt::StructOpt,
    std::path::PathBuf
};

/// Difference norms between two simulator output files
#[derive(Debug, StructOpt, Clone)]
pub struct Compare{
    /// reference output
    #[structopt(parse(from_os_str))]
    baseline: PathBuf,

    /// output to compare against the reference
    #[structopt(parse(from_os_str))]
    candidate: PathBuf,

    /// also write the norms to this file
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>
}

impl Compare{
    pub fn execute(&self) -> i32{
        compare_files(&self.baseline, &self.candidate, self.output.as_deref())
    }
}
