use{
    std::{
        collections::BTreeMap,
        fmt,
        path::Path
    },
    serde::{Serialize, Deserialize},
    crate::{
        error::*,
        json_parsing::read_json_file
    }
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler
{
    None,
    Slurm,
    Flux
}

impl Default for Scheduler
{
    fn default() -> Self
    {
        Self::None
    }
}

impl fmt::Display for Scheduler
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let s = match self {
            Self::None => "none",
            Self::Slurm => "slurm",
            Self::Flux => "flux"
        };
        f.write_str(s)
    }
}

/// Resources that differ for a single case, e.g. a small region on one GPU
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOverride
{
    #[serde(default)]
    pub tasks: Option<usize>,
    #[serde(default)]
    pub gpus: Option<usize>
}

fn default_tasks() -> usize
{
    4
}

fn default_nodes() -> usize
{
    1
}

fn default_launcher() -> String
{
    "mpirun".to_owned()
}

fn default_gpu_flag() -> String
{
    "amrex.use_gpu_aware_mpi=0".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig
{
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub scheduler: Scheduler,
    #[serde(default)]
    pub batch_mode: bool,
    #[serde(default = "default_tasks")]
    pub tasks: usize,
    #[serde(default = "default_nodes")]
    pub nodes: usize,
    #[serde(default)]
    pub gpus: usize,
    /// launcher command, may contain arguments
    #[serde(default = "default_launcher")]
    pub mpi_launcher: String,
    #[serde(default)]
    pub mpi_flags: Vec<String>,
    /// appended to the simulator arguments when gpus are used
    #[serde(default = "default_gpu_flag")]
    pub gpu_aware_mpi: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// batch submission command, defaults to the scheduler's
    #[serde(default)]
    pub submit_command: Option<String>,
    #[serde(default)]
    pub case_overrides: BTreeMap<String, ResourceOverride>
}

impl Default for MachineConfig
{
    fn default() -> Self
    {
        Self{
            display_name: None,
            scheduler: Scheduler::None,
            batch_mode: false,
            tasks: default_tasks(),
            nodes: default_nodes(),
            gpus: 0,
            mpi_launcher: default_launcher(),
            mpi_flags: Vec::new(),
            gpu_aware_mpi: default_gpu_flag(),
            env: BTreeMap::new(),
            submit_command: None,
            case_overrides: BTreeMap::new()
        }
    }
}

/// What a run needs to start the simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCommand
{
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>
}

impl fmt::Display for LaunchCommand
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.program)?;
        for arg in &self.args
        {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl MachineConfig
{
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str
    {
        self.display_name.as_deref().unwrap_or(key)
    }

    /// (tasks, gpus) for a case
    pub fn resources(&self, case: &str) -> (usize, usize)
    {
        match self.case_overrides.get(case) {
            Some(o) => (o.tasks.unwrap_or(self.tasks), o.gpus.unwrap_or(self.gpus)),
            None => (self.tasks, self.gpus)
        }
    }

    pub fn submit_command(&self) -> Option<String>
    {
        self.submit_command.clone()
            .or_else(
                || match self.scheduler {
                    Scheduler::Slurm => Some("sbatch".to_owned()),
                    Scheduler::Flux => Some("flux batch".to_owned()),
                    Scheduler::None => None
                }
            )
    }

    /// `<launcher> <flags> -n <tasks> <executable> <input> <args> [gpu flag]`
    pub fn launch_command(&self, case: &str, executable: &Path, input: &str, sim_args: &[String]) -> LaunchCommand
    {
        let (tasks, gpus) = self.resources(case);
        let mut words = self.mpi_launcher.split_whitespace()
            .map(str::to_owned);
        let program = words.next().unwrap_or_else(default_launcher);
        let mut args: Vec<String> = words.collect();
        args.extend(self.mpi_flags.iter().cloned());
        args.push("-n".to_owned());
        args.push(tasks.to_string());
        args.push(executable.display().to_string());
        args.push(input.to_owned());
        args.extend(sim_args.iter().cloned());
        if gpus > 0 {
            args.push(self.gpu_aware_mpi.clone());
        }
        LaunchCommand{
            program,
            args,
            env: self.env.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachinesConfig
{
    pub machines: BTreeMap<String, MachineConfig>,
    #[serde(default)]
    pub machine_groups: BTreeMap<String, Vec<String>>
}

impl MachinesConfig
{
    pub fn load(path: &Path) -> Result<Self>
    {
        read_json_file(path)
    }

    pub fn machine(&self, name: &str) -> Option<&MachineConfig>
    {
        self.machines.get(name)
    }
}

#[cfg(test)]
mod testing
{
    use super::*;

    const MACHINES: &str = r#"{
        "machines": {
            "linux": {"display_name": "Linux workstation"},
            "linux-gpu": {
                "gpus": 1,
                "tasks": 2,
                "mpi_launcher": "mpirun --oversubscribe",
                "mpi_flags": ["--bind-to", "none"],
                "env": {"OMP_NUM_THREADS": "1"},
                "case_overrides": {"Bay": {"tasks": 1}}
            },
            "dane": {"scheduler": "slurm", "batch_mode": true, "tasks": 25},
            "tuolumne": {"scheduler": "flux", "batch_mode": true, "submit_command": "flux batch -q pdebug"}
        },
        "machine_groups": {"lc": ["dane", "tuolumne"]}
    }"#;

    fn machines() -> MachinesConfig
    {
        serde_json::from_str(MACHINES).unwrap()
    }

    #[test]
    fn defaults_fill_in()
    {
        let m = machines();
        let linux = m.machine("linux").unwrap();
        assert_eq!(linux.scheduler, Scheduler::None);
        assert_eq!(linux.tasks, 4);
        assert_eq!(linux.display_name("linux"), "Linux workstation");
        assert_eq!(m.machine("dane").unwrap().display_name("dane"), "dane");
        assert_eq!(linux.submit_command(), None);
        assert_eq!(m.machine("dane").unwrap().submit_command().as_deref(), Some("sbatch"));
        assert_eq!(
            m.machine("tuolumne").unwrap().submit_command().as_deref(),
            Some("flux batch -q pdebug")
        );
        assert_eq!(m.machine_groups["lc"].len(), 2);
    }

    #[test]
    fn command_line()
    {
        let m = machines();
        let gpu = m.machine("linux-gpu").unwrap();
        let args = vec!["agent.med_workers_proportion=0.05".to_owned()];
        let cmd = gpu.launch_command("CA", Path::new("/build/bin/agent"), "inputs.CA", &args);
        assert_eq!(cmd.program, "mpirun");
        assert_eq!(
            cmd.to_string(),
            "mpirun --oversubscribe --bind-to none -n 2 /build/bin/agent inputs.CA \
             agent.med_workers_proportion=0.05 amrex.use_gpu_aware_mpi=0"
        );
        assert_eq!(cmd.env["OMP_NUM_THREADS"], "1");

        let cmd = gpu.launch_command("Bay", Path::new("agent"), "inputs.Bay", &[]);
        assert_eq!(cmd.args[4], "1");

        let cpu = m.machine("linux").unwrap();
        let cmd = cpu.launch_command("CA", Path::new("agent"), "inputs.CA", &[]);
        assert_eq!(cmd.to_string(), "mpirun -n 4 agent inputs.CA");
    }
}
