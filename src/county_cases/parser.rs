use{
    super::*,
    structopt::StructOpt,
    std::path::PathBuf
};

/// Sum per location case files of a run into per county tables
#[derive(Debug, StructOpt, Clone)]
pub struct CountyCases{
    /// a `.run_*` simulation directory
    #[structopt(parse(from_os_str))]
    run_dir: PathBuf,

    /// time steps to convert, default: 0, every 10th and the last one
    #[structopt(long)]
    steps: Vec<u32>,

    /// defaults to `<run_dir>/county_cases`
    #[structopt(long, parse(from_os_str))]
    output_dir: Option<PathBuf>
}

impl CountyCases{
    pub fn execute(&self) -> i32{
        let output_dir = self.output_dir
            .clone()
            .unwrap_or_else(|| self.run_dir.join("county_cases"));
        convert_run(&self.run_dir, &self.steps, &output_dir)
    }
}
