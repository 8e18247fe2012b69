use{
    std::{
        collections::BTreeMap,
        fs,
        path::{Path, PathBuf}
    },
    super::*,
    crate::error::*
};

/// Per-county totals, ordered by 5 digit FIPS code
pub type CountyCounts = BTreeMap<String, f64>;

pub fn fips_string(code: u64) -> String
{
    format!("{code:05}")
}

/// Location index -> county FIPS code
#[derive(Debug, Clone, PartialEq)]
pub struct FipsMapping
{
    fips: Vec<String>
}

impl FipsMapping
{
    /// The first line holds the number of locations, every following line
    /// has the FIPS code in its fourth field.
    pub fn load(path: &Path) -> Result<Self>
    {
        let content = read_existing(path)?;
        Self::parse(&content)
            .map_err(|reason| EpiError::malformed(path, reason))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String>
    {
        let mut fips = Vec::new();
        for (index, line) in content.lines().enumerate().skip(1)
        {
            if line.trim().is_empty() {
                continue;
            }
            let field = line.split_whitespace()
                .nth(3)
                .ok_or_else(|| format!("line {} has no FIPS field", index + 1))?;
            let code: u64 = field.parse()
                .map_err(|_| format!("invalid FIPS code '{field}' in line {}", index + 1))?;
            fips.push(fips_string(code));
        }
        Ok(Self{fips})
    }

    pub fn from_codes(fips: Vec<String>) -> Self
    {
        Self{fips}
    }

    pub fn len(&self) -> usize
    {
        self.fips.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.fips.is_empty()
    }

    pub fn num_counties(&self) -> usize
    {
        let mut codes: Vec<_> = self.fips.iter().collect();
        codes.sort_unstable();
        codes.dedup();
        codes.len()
    }

    /// Sum location counts per county
    pub fn aggregate(&self, cases: &[f64]) -> Result<CountyCounts>
    {
        if cases.len() != self.fips.len() {
            return Err(
                EpiError::shape("case counts vs. location mapping", self.fips.len(), cases.len())
            );
        }
        let mut counties = CountyCounts::new();
        for (code, &count) in self.fips.iter().zip(cases)
        {
            *counties.entry(code.clone()).or_insert(0.0) += count;
        }
        Ok(counties)
    }
}

/// All numbers of a case count file in location order
pub fn load_case_counts(path: &Path) -> Result<Vec<f64>>
{
    let content = read_existing(path)?;
    content.lines()
        .map(str::trim)
        .filter(|l| !l.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(
            |token|
            token.parse::<f64>()
                .map_err(|_| EpiError::malformed(path, format!("'{token}' is not a number")))
        ).collect()
}

/// Locate the case count file of a time step.
///
/// Disease specific output is either `cases_<disease>_<step>` or
/// `<disease>/cases<step>`.
pub fn case_file_path(run_dir: &Path, step: u32, disease: Option<&str>) -> Result<PathBuf>
{
    let candidates = match disease {
        None => vec![run_dir.join(format!("cases{step:05}"))],
        Some(d) => vec![
            run_dir.join(format!("cases_{d}_{step:05}")),
            run_dir.join(d).join(format!("cases{step:05}"))
        ]
    };
    candidates.iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| EpiError::not_found(&candidates[0]))
}

/// Time steps for which `casesNNNNN` files exist, sorted
pub fn detect_steps(run_dir: &Path) -> Result<Vec<u32>>
{
    let mut steps: Vec<u32> = fs::read_dir(run_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(
            |entry|
            {
                let name = entry.file_name().into_string().ok()?;
                let digits = name.strip_prefix("cases")?;
                if digits.chars().count() != 5 {
                    return None;
                }
                digits.parse().ok()
            }
        ).collect();
    steps.sort_unstable();
    Ok(steps)
}

/// Initial seed file: `FIPS count` per line
#[derive(Debug, Clone, PartialEq)]
pub struct SeedCases
{
    pub entries: Vec<(String, u64)>
}

impl SeedCases
{
    pub fn load(path: &Path) -> Result<Self>
    {
        let content = read_existing(path)?;
        let mut entries = Vec::new();
        for line in content.lines().map(str::trim)
        {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<_> = line.split_whitespace().collect();
            if parts.len() < 2 {
                continue;
            }
            let parse = |s: &str| s.parse::<u64>()
                .map_err(|_| EpiError::malformed(path, format!("'{s}' is not an integer")));
            entries.push((fips_string(parse(parts[0])?), parse(parts[1])?));
        }
        Ok(Self{entries})
    }

    pub fn total(&self) -> u64
    {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn num_counties(&self) -> usize
    {
        self.entries.len()
    }

    pub fn per_million(&self, population: f64) -> f64
    {
        self.total() as f64 / population * 1e6
    }
}
