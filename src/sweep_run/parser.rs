use{
    super::*,
    structopt::StructOpt,
    std::num::*,
    crate::json_parsing::*,
    serde::{Serialize, Deserialize},
    serde_json::Value,
    crate::{
        config::*,
        misc_types::*
    }
};

/// Launch the pending runs of a sweep
#[derive(Debug, StructOpt, Clone)]
pub struct SweepRun{
    #[structopt(long)]
    json: Option<String>,

    #[structopt(flatten)]
    target: TargetFlags,

    /// how many simulations run at the same time on interactive machines
    #[structopt(long)]
    max_parallel: Option<NonZeroUsize>,

    /// directory containing the simulator build
    #[structopt(long, env = "EXAEPI_BUILD")]
    build_dir: Option<String>
}

impl SweepRun{
    pub fn parse(&self) -> (SweepRunParams, Value){
        let (mut opt, mut json): (SweepRunParams, Value) = parse_or_default(self.json.as_ref(), self.target.is_given());
        self.target.apply(&mut opt.target);
        if let Some(p) = self.max_parallel {
            opt.max_parallel = p;
        }
        if self.build_dir.is_some() {
            opt.build_dir = self.build_dir.clone();
        }
        json = serde_json::to_value(&opt).unwrap_or(json);
        (opt, json)
    }
    pub fn execute(&self) -> i32{
        let (opt, _json) = self.parse();
        run_sweep(&opt)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SweepRunParams{
    pub target: SweepTarget,
    pub max_parallel: NonZeroUsize,
    pub build_dir: Option<String>
}

impl Default for SweepRunParams{
    fn default() -> Self{
        Self{
            target: SweepTarget::default(),
            max_parallel: DEFAULT_MAX_PARALLEL,
            build_dir: None
        }
    }
}
