use{
    super::*,
    structopt::StructOpt,
    std::num::*,
    crate::json_parsing::*,
    serde_json::Value,
    crate::{
        misc_types::*,
        regtest::{RegtestParams, TestSet}
    }
};

/// Which regression test directories a setup command works on
#[derive(Debug, StructOpt, Clone)]
pub struct SetupFlags{
    /// baselines or tests
    set: TestSet,

    #[structopt(long)]
    json: Option<String>,

    #[structopt(long)]
    machine: Option<String>,

    /// test cases or groups, may be repeated. Defaults to all
    #[structopt(long = "case")]
    cases: Vec<String>,

    /// regression test root with common/, baselines/ and tests/
    #[structopt(long)]
    root_dir: Option<String>,

    /// directory with regtest.json and machines.json, defaults to `<root-dir>/config`
    #[structopt(long)]
    config_dir: Option<String>
}

impl SetupFlags{
    pub fn parse(&self) -> (RegtestParams, Value){
        let (mut opt, mut json): (RegtestParams, Value) = parse_or_default(self.json.as_ref(), true);
        if let Some(r) = &self.root_dir {
            opt.root_dir = r.clone();
        }
        if self.machine.is_some() {
            opt.machine = self.machine.clone();
        }
        if !self.cases.is_empty() {
            opt.cases = self.cases.clone();
        }
        if self.config_dir.is_some() {
            opt.config_dir = self.config_dir.clone();
        }
        json = serde_json::to_value(&opt).unwrap_or(json);
        (opt, json)
    }
}

/// Create the `<case>.<machine>` directories of the baselines or tests
#[derive(Debug, StructOpt, Clone)]
pub struct RegtestCreate{
    #[structopt(flatten)]
    flags: SetupFlags
}

impl RegtestCreate{
    pub fn execute(&self) -> i32{
        let (opt, _json) = self.flags.parse();
        create_set(&opt, self.flags.set)
    }
}

/// Start the simulator in the baseline or test directories of a machine
#[derive(Debug, StructOpt, Clone)]
pub struct RegtestRun{
    #[structopt(flatten)]
    flags: SetupFlags,

    /// how many simulations run at the same time on interactive machines
    #[structopt(long)]
    max_parallel: Option<NonZeroUsize>,

    /// directory containing the simulator build
    #[structopt(long, env = "EXAEPI_BUILD")]
    build_dir: Option<String>
}

impl RegtestRun{
    pub fn execute(&self) -> i32{
        let (opt, _json) = self.flags.parse();
        run_set(
            &opt,
            self.flags.set,
            self.max_parallel.unwrap_or(DEFAULT_MAX_PARALLEL),
            self.build_dir.as_deref()
        )
    }
}
