use{
    std::path::Path,
    tracing::error,
    crate::config::*
};

pub fn list_studies(path: &Path) -> i32
{
    let config = match StudiesConfig::load(path)
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load {}: {e}", path.display());
            return 1;
        }
    };
    println!("\nAvailable parameter sweep studies:\n");
    for (key, study) in &config.studies
    {
        println!("  {key}");
        println!("    Name: {}", study.name);
        println!("    Description: {}", study.description);
        println!("    Cases: {}", study.cases.join(", "));
        let combinations = study.num_combinations();
        if study.baseline.is_some() {
            println!("    Runs: {combinations} parameter combinations + 1 baseline");
        } else {
            println!("    Runs: {combinations} parameter combinations");
        }
        println!();
    }
    0
}

pub fn list_machines(path: &Path) -> i32
{
    let config = match MachinesConfig::load(path)
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load {}: {e}", path.display());
            return 1;
        }
    };
    println!("\nAvailable machines:\n");
    for (key, machine) in &config.machines
    {
        let mode = if machine.batch_mode { "batch" } else { "interactive" };
        println!(
            "  {key:<15} {} ({}, {mode})",
            machine.display_name(key),
            machine.scheduler
        );
    }
    if !config.machine_groups.is_empty() {
        println!("\nMachine groups:");
        for (group, members) in &config.machine_groups
        {
            println!("  {group:<15} - {}", members.join(", "));
        }
    }
    0
}

pub fn list_cases(path: &Path) -> i32
{
    let config = match TestCasesConfig::load(path)
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load {}: {e}", path.display());
            return 1;
        }
    };
    println!("Available test cases:\n");
    for (key, case) in &config.test_cases
    {
        println!("  {key:<15} - {}", case.display_name(key));
        if !case.description.is_empty() {
            println!("                    {}", case.description);
        }
        if !case.tags.is_empty() {
            println!("                    Tags: {}", case.tags.join(", "));
        }
        println!();
    }
    if !config.test_groups.is_empty() {
        println!("\nTest groups:");
        for (group, members) in &config.test_groups
        {
            println!("  {group:<15} - {}", members.join(", "));
        }
    }
    0
}

#[cfg(test)]
mod testing
{
    use super::*;
    use std::fs;

    #[test]
    fn missing_files_fail()
    {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(list_cases(&tmp.path().join("regtest.json")), 1);
        assert_eq!(list_machines(&tmp.path().join("machines.json")), 1);
    }

    #[test]
    fn cases_are_listed()
    {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("regtest.json");
        fs::write(&path, r#"{"test_cases": {"Bay": {"input_file": "inputs.bay"}}, "test_groups": {"all_small": ["Bay"]}}"#).unwrap();
        assert_eq!(list_cases(&path), 0);
    }
}
