use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "model-provisioner")]
#[command(about = "Ensure the declared model variants exist on the model service")]
pub struct CliArgs {
    /// Path to a TOML manifest; the built-in manifest is used when omitted
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be provisioned without contacting the model service
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from(["model-provisioner", "-m", "models.toml", "--dry-run"]);

        assert_eq!(args.manifest.as_deref(), Some("models.toml"));
        assert!(args.dry_run);
        assert!(!args.verbose);
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["model-provisioner"]);

        assert!(args.manifest.is_none());
        assert!(!args.dry_run);
    }
}
