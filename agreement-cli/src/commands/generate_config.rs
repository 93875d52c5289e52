//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, self.generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Point the [inputs] paths at your result files");
        println!("2. Check the inputs:");
        println!("   agreement validate <FILES>...");
        println!("3. Run the analysis:");
        println!("   agreement run --config {}", self.output.display());

        Ok(())
    }

    /// Generate template configuration content
    fn generate_template(&self) -> String {
        r#"# Article agreement analysis configuration
#
# Relative paths are resolved against the directory of this file.
# Command-line flags override every value set here.

[inputs]
single_token = "results/single-token.csv"
multitok_nonmorph = "results/multitok-nonmorph.csv"
multitok_morph = "results/multitok-morph.csv"

# Word frequency table joined onto the wide table (optional)
# frequency = "data/frequencies.csv"

# Column names of the frequency table
[frequency]
word_column = "Word"
value_column = "Log10(freq count+1)"

[output]
# Wide analysis table
path = "out/agreement-wide.csv"

# Merged long-form table (optional)
# merged = "out/agreement-long.csv"

# Condition summary destination, stdout when unset
# summary = "out/summary.md"

# Summary format: text, json or markdown
format = "text"

[processing]
# Fail on items without exactly one singular and one plural observation
# instead of leaving their derived values empty
strict = false
"#
        .to_string()
    }
}
