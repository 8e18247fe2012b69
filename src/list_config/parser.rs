use{
    super::*,
    structopt::StructOpt,
    std::path::PathBuf,
    crate::misc_types::*
};

#[derive(Debug, StructOpt, Clone)]
pub struct ListStudies{
    /// directory with studies.json
    #[structopt(long, default_value = "config")]
    config_dir: PathBuf
}

impl ListStudies{
    pub fn execute(&self) -> i32
    {
        list_studies(&self.config_dir.join(STUDIES_FILE))
    }
}

#[derive(Debug, StructOpt, Clone)]
pub struct ListMachines{
    /// directory with machines.json
    #[structopt(long, default_value = "config")]
    config_dir: PathBuf
}

impl ListMachines{
    pub fn execute(&self) -> i32
    {
        list_machines(&self.config_dir.join(MACHINES_FILE))
    }
}

#[derive(Debug, StructOpt, Clone)]
pub struct ListCases{
    /// directory with regtest.json
    #[structopt(long, default_value = "config")]
    config_dir: PathBuf
}

impl ListCases{
    pub fn execute(&self) -> i32
    {
        list_cases(&self.config_dir.join(REGTEST_FILE))
    }
}
