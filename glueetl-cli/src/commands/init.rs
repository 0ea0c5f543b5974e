//! Init command handler
//!
//! Scaffolds a job project: a sample job configuration, a script stub and
//! a README describing how to deploy and run it.

use anyhow::{Context, Result, bail};
use colored::*;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"job:
  name: sample-glue-job
  role_name: AWSGlueServiceRoleSample
  script_location: s3://glue-job-scripts/sample-glue-job/script.py
  max_concurrent_runs: 10
  command_name: glueetl
  max_retries: 0
  timeout: 28800
  max_capacity: 10
  connections:
    - first_connection
    - second_connection
  trigger:
    name: trigger-sample-glue-job
    schedule: cron(5 * * * ? *)
  tags:
    key1: value1
    key2: value2
"#;

const SCRIPT_TEMPLATE: &str = "# This is your Glue job's script.
# Please write your code in this file!
";

const README_TEMPLATE: &str = "# sample-glue-job

## Deploy

```
glueetl deploy
```

## Run

```
glueetl run --arg1=value1 --arg2=value2
```
";

/// Files written by `init`, in order
const SCAFFOLD: [(&str, &str); 3] = [
    ("config.yaml", CONFIG_TEMPLATE),
    ("script.py", SCRIPT_TEMPLATE),
    ("README.md", README_TEMPLATE),
];

/// Write the scaffold into `dir`.
///
/// Without `force`, nothing is written if any of the files already exists.
pub fn handle_init(dir: &Path, force: bool) -> Result<()> {
    if !force {
        let existing: Vec<&str> = SCAFFOLD
            .iter()
            .filter(|(name, _)| dir.join(name).exists())
            .map(|(name, _)| *name)
            .collect();

        if !existing.is_empty() {
            bail!(
                "Refusing to overwrite {} in {}; pass --force to replace",
                existing.join(", "),
                dir.display()
            );
        }
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    for (name, content) in SCAFFOLD {
        let path = dir.join(name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        println!("  {} {}", "Created".green(), name);
    }

    println!();
    println!("{}", "Next steps:".bold());
    println!("  1. Edit config.yaml and script.py");
    println!("  2. Use {} to publish the job", "glueetl deploy".cyan());
    println!(
        "  3. Use {} to run it",
        "glueetl run --key=value".cyan()
    );

    Ok(())
}
