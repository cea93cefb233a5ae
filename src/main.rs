use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use userpages::repository::RepositoryError;
use userpages::requests::UserRequests;
use userpages::site::{Site, SiteError};
use userpages::{config, logging, output};

#[derive(Parser)]
#[command(name = "userpages")]
#[command(about = "Static site generator for user pages")]
#[command(long_about = "\
Static site generator for user pages

Rows from a data source become users; every user gets a page and the index
lists them all.

Site structure:

  site/
  ├── config.toml                  # Site config (optional)
  └── users.json                   # Data file named by [data] path (optional)

  dist/
  ├── index.html                   # Listing page
  └── user/
      └── jwage.html               # One page per user

Page names are lowercased usernames. When two usernames differ only in case
the later one is written as user/<name>-2.html, then -3, and so on.

Without a data file the built-in user list is used.

Run 'userpages gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Data file, overrides [data] path from config.toml
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print the render requests, in order
    List,
    /// Print a single user
    Show {
        /// Username to look up (exact match)
        username: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Build { output: out_dir } => {
            let site = Site::load(&cli.config, cli.data.as_deref())?;
            println!("==> Generating HTML → {}", out_dir.display());
            let report = site.build(&out_dir)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", out_dir.display());
        }
        Command::List => {
            let site = Site::load(&cli.config, cli.data.as_deref())?;
            let requests = UserRequests::new(&site.repository).get_users();
            output::print_requests(&requests);
        }
        Command::Show { username } => {
            let site = Site::load(&cli.config, cli.data.as_deref())?;
            match site.repository.find_one_by_username(&username) {
                Ok(user) => output::print_user(user),
                Err(RepositoryError::NotFound { .. }) => {
                    eprintln!("No user named '{username}'");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(SiteError::from(e).into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}
