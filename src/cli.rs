use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "zerowait",
    version,
    about = "TUI for finding nearby services and joining their queues"
)]
pub struct Args {
    /// Service category to preselect (e.g., "pharmacy", "hospital")
    #[arg(short, long)]
    pub service: Option<String>,

    /// Color theme (e.g., "Catppuccin Mocha")
    #[arg(short, long)]
    pub theme: Option<String>,
}
