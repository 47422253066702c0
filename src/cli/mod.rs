pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lm-alugueis")]
#[command(about = "LM Aluguéis - rental listing API server and maintenance tasks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Use a process-local store instead of Postgres")]
        in_memory: bool,
    },

    #[command(about = "Apply pending SQL migrations")]
    Migrate,

    #[command(about = "Create the default admin and its landlord record if absent")]
    Seed,

    #[command(about = "Provision an admin account")]
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value_t = 1)]
        level: i64,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { in_memory: false }) {
        Commands::Serve { in_memory } => commands::serve::handle(in_memory).await,
        Commands::Migrate => commands::database::migrate().await,
        Commands::Seed => commands::database::seed().await,
        Commands::CreateAdmin {
            name,
            email,
            password,
            level,
        } => commands::admin::create(name, email, password, level).await,
    }
}
