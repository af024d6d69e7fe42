use crate::cli::{Cli, Commands};
use crate::json::ErrorJson;
use anyhow::Result;
use console::style;

pub fn run(cli: Cli) -> Result<()> {
    let json = cli.json;

    let result = match cli.command {
        Commands::Validate { inputs } => crate::commands::validate(inputs, json),
        Commands::Plan {
            inputs,
            digest_algorithm,
        } => crate::commands::plan(inputs, digest_algorithm, json),
    };

    if let Err(e) = &result {
        report_error(e, json)?;
    }

    result
}

fn error_json(e: &anyhow::Error) -> ErrorJson<'static> {
    ErrorJson {
        status: "error",
        error: e.to_string(),
        causes: e.chain().skip(1).map(|c| c.to_string()).collect(),
    }
}

/// Print the error chain, as JSON on stdout or styled on stderr.
fn report_error(e: &anyhow::Error, json: bool) -> Result<()> {
    let payload = error_json(e);

    if json {
        println!("{}", serde_json::to_string(&payload)?);
        return Ok(());
    }

    eprintln!("\n{} {}", style("[ERROR]").red().bold(), style(e).red());
    if !payload.causes.is_empty() {
        eprintln!("\n    Caused by:");
        for cause in &payload.causes {
            eprintln!("      - {}", style(cause).red());
        }
    }
    eprintln!();
    Ok(())
}
