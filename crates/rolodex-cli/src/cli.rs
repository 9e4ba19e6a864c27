use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rolodex")]
#[command(about = "Browse a seeded contact book through the incremental pager", long_about = None)]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page through the contact list from the top
    List(ListArgs),
    /// Jump to the first surname at or after a letter
    Jump(JumpArgs),
    /// Print the maintained contact counter
    Count(SeedArgs),
}

#[derive(Args)]
pub struct SeedArgs {
    /// Number of contacts to seed
    #[arg(long, default_value_t = 50)]
    pub count: usize,

    /// Seed for the contact generator (same seed, same contacts)
    #[arg(long, default_value_t = 42, env = "ROLODEX_SEED")]
    pub seed: u64,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub seed: SeedArgs,

    /// Number of pages to load before printing
    #[arg(long, default_value_t = 3)]
    pub pages: usize,

    /// Rows requested per page
    #[arg(long, default_value_t = 10)]
    pub page_len: usize,
}

#[derive(Args)]
pub struct JumpArgs {
    #[command(flatten)]
    pub seed: SeedArgs,

    /// Letter to jump to (A-Z)
    #[arg(long)]
    pub letter: String,

    /// Also load one page above the jump point
    #[arg(long)]
    pub back: bool,

    /// Rows requested per page
    #[arg(long, default_value_t = 10)]
    pub page_len: usize,
}
