//! Build automation tasks for esdump
//!
//! Currently generates the CLI reference from the clap definitions.

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for esdump", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,

        /// Fail if the file on disk differs instead of rewriting it
        #[arg(long)]
        check: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir, check } => generate_cli_docs(&output_dir, check)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str, check: bool) -> anyhow::Result<()> {
    let markdown = clap_markdown::help_markdown::<esdump_cli::Cli>();

    let content = format!(
        r#"# esdump CLI Reference

This file is generated from the CLI source. To update it, run `cargo xtask generate-cli-docs`.

## Quick Start

```bash
# Copy an index between clusters
esdump transfer -i http://localhost:9200/logs -o http://backup:9200/logs

# Back up documents, mapping and settings to files
esdump backup -i http://localhost:9200/logs -o logs.ndjson
esdump backup -i http://localhost:9200/logs -o logs.mapping.json -t mapping
esdump backup -i http://localhost:9200/logs -o logs.settings.json -t settings

# Restore them into a fresh index
esdump restore -i logs.settings.json -o http://localhost:9200/logs-restored -t settings
esdump restore -i logs.mapping.json -o http://localhost:9200/logs-restored -t mapping
esdump restore -i logs.ndjson -o http://localhost:9200/logs-restored
```

## Environment Variables

- `ESDUMP_USERNAME` / `ESDUMP_PASSWORD` - Basic auth for both clusters (flags override)
- `ESDUMP_TIMEOUT_SECS` - Per-request timeout (default: `300`)
- `LOG_LEVEL` - `trace`, `debug`, `info`, `warn` or `error`
- `LOG_OUTPUT` - `console`, `file` or `both`
- `LOG_DIR` - Directory for log files when logging to a file

{}
"#,
        markdown
    );

    let file_path = PathBuf::from(output_dir).join("cli-reference.md");

    if check {
        let current = fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        if current != content {
            bail!("{} is out of date; run `cargo xtask generate-cli-docs`", file_path.display());
        }
        println!("✅ {} is up to date", file_path.display());
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
