use{
    std::path::Path,
    serde::Serialize,
    super::RUN_DIR_PREFIX
};

/// Diseases the simulator ships parameter sets for, with display labels
pub const KNOWN_DISEASES: [(&str, &str); 5] = [
    ("Cov19S1", "SARS-CoV-2 Ancestral"),
    ("Cov19S2", "SARS-CoV-2 Delta"),
    ("FluS1", "Influenza A/H3N2"),
    ("FluS2", "Influenza A/H1N1pdm09"),
    ("PneuS1", "S. pneumoniae"),
];

pub fn disease_label(disease: &str) -> &str
{
    KNOWN_DISEASES.iter()
        .find(|(name, _)| *name == disease)
        .map_or(disease, |(_, label)| label)
}

/// Case, platform and diseases of a multi disease run directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInfo
{
    pub case: String,
    pub platform: String,
    pub diseases: Vec<String>
}

fn dir_name(path: &Path) -> String
{
    path.components()
        .next_back()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `.run_bay_02D_Cov19S1_FluS1_tuolumne` -> case `bay_02D_Cov19S1_FluS1`,
/// platform `tuolumne`, diseases `Cov19S1` and `FluS1`
pub fn detect_run_info(run_dir: &Path) -> RunInfo
{
    let full = dir_name(run_dir);
    let name = full.strip_prefix(RUN_DIR_PREFIX).unwrap_or(&full);
    let parts: Vec<_> = name.split('_').collect();
    let (case, platform) = match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() => (rest.join("_"), last.to_string()),
        _ => (name.to_owned(), "unknown".to_owned())
    };
    let diseases = parts.iter()
        .filter(|p| p.starts_with("Cov") || p.starts_with("Flu"))
        .map(|p| p.to_string())
        .collect();
    RunInfo{case, platform, diseases}
}

/// `Jan1_FluS1.cases` -> `FluS1`
pub fn disease_from_filename(path: &Path) -> String
{
    let stem = path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some((known, _)) = KNOWN_DISEASES.iter().find(|(d, _)| stem.contains(d)) {
        return known.to_string();
    }
    match stem.rsplit_once('_') {
        Some((_, last)) => last.to_owned(),
        None => stem
    }
}

/// Regression test directories are called `<case>.<machine>`
pub fn split_case_machine(dir_name: &str) -> Option<(&str, &str)>
{
    dir_name.rsplit_once('.')
        .filter(|(case, machine)| !case.is_empty() && !machine.is_empty())
}
