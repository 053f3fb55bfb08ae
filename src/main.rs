use clap::Parser;
use env_logger::Env;
use std::path::Path;
use std::str::FromStr;
use t2press::application::{init, BuildSiteService, RenderPageService};
use t2press::cli::{format_build_report, format_diagnostics, Cli, Commands};
use t2press::domain::TableHeaderPolicy;
use t2press::error::{PressError, Result};
use t2press::infrastructure::{Credentials, NotionClient, SiteConfig};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => init(&path),
        Commands::Build {
            output,
            table_headers,
        } => {
            let mut config = load_config(&cli.root, table_headers.as_deref())?;
            if let Some(output) = output {
                config.output_dir = output;
            }

            let client = NotionClient::new(Credentials::from_env()?, config.notion.clone())?;
            let service = BuildSiteService::new(client, config, cli.root);
            let report = service.execute()?;
            print!("{}", format_build_report(&report));
            Ok(())
        }
        Commands::Render {
            page_id,
            table_headers,
        } => {
            let config = load_config(&cli.root, table_headers.as_deref())?;

            let client = NotionClient::new(Credentials::token_from_env()?, config.notion.clone())?;
            let page = RenderPageService::new(client, config.render).execute(&page_id)?;
            println!("{}", page.html);
            eprint!("{}", format_diagnostics(&page.diagnostics));
            Ok(())
        }
    }
}

/// Load config.toml, applying a `--table-headers` override
fn load_config(root: &Path, table_headers: Option<&str>) -> Result<SiteConfig> {
    let mut config = SiteConfig::load_from_dir(root)?;
    if let Some(policy) = table_headers {
        config.render.table_headers =
            TableHeaderPolicy::from_str(policy).map_err(PressError::Config)?;
    }
    Ok(config)
}
