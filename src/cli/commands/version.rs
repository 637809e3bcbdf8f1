use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(short = 'd', long = "detailed")]
    pub detailed: bool,
}

pub async fn execute(args: VersionArgs) -> Result<()> {
    println!("{} {}", crate::PKG_NAME, crate::VERSION);

    if args.detailed {
        println!("Description: {}", crate::PKG_DESCRIPTION);
        println!("Rust Edition: 2024");
        println!("Built with: clap 4.5.41, tokio 1.46.1, lopdf 0.34");
        println!("Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
        println!("Target: {}-{}", std::env::consts::ARCH, std::env::consts::OS);
    }
    Ok(())
}
