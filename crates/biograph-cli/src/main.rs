mod render;
mod session;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};
use futures::future::join_all;
use tracing_subscriber::EnvFilter;

use biograph_core::config::DEFAULT_PER_PAGE;
use biograph_core::export::{pdf_links, ExportFormat};
use biograph_core::graph::Category;
use biograph_core::publications::{PublicationPage, PublicationQuery, PublicationsApi};
use biograph_core::{ApiError, Config, HttpBackend, SubgraphOptions};

use render::spinner;
use session::Session;

#[derive(Parser)]
#[command(name = "biograph")]
#[command(about = "Explore the NASA bioscience knowledge graph", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config and BIOGRAPH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the saved view state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search graph nodes by name or paper title
    Search {
        #[arg(required = true)]
        term: Vec<String>,
        /// Maximum number of candidates
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Load the subgraph around a node into the view
    Open {
        #[arg(required = true)]
        name: Vec<String>,
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long)]
        max_nodes: Option<u32>,
        #[arg(long)]
        min_degree: Option<u32>,
        /// Restrict to these node labels (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Expand nodes by id; several ids are fetched concurrently
    Expand {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show category filters, or change one
    Filter {
        category: Option<Category>,
        #[arg(long, conflicts_with_all = ["disable", "toggle"])]
        enable: bool,
        #[arg(long, conflicts_with = "toggle")]
        disable: bool,
        #[arg(long)]
        toggle: bool,
        /// Visible-node cap; 0 or less disables the category
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Print the current view
    Show {
        /// Emit the render-ready view as JSON
        #[arg(long)]
        json: bool,
        /// Include hidden nodes and edges
        #[arg(long)]
        all: bool,
    },
    /// Summarize the saved view
    Status,
    /// Forget the view and delete its saved state
    Clear,
    /// Browse the publication catalogue
    Papers(PaperArgs),
    /// Show one publication
    Paper { pmcid: String },
    /// Catalogue statistics
    Stats,
    /// Export publications as CSV, BibTeX or RIS
    Export {
        #[arg(long, short, default_value = "csv")]
        format: ExportFormat,
        #[command(flatten)]
        selection: PaperArgs,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print PDF download links instead of citations
        #[arg(long)]
        pdf_links: bool,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        default: bool,
    },
}

#[derive(Args)]
struct PaperArgs {
    /// Free-text query
    #[arg(long, short)]
    query: Option<String>,
    /// Category filter (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    journal: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// Only publications with a downloaded PDF
    #[arg(long)]
    has_pdf: bool,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,
}

impl PaperArgs {
    fn has_filters(&self) -> bool {
        !self.categories.is_empty()
            || self.year.is_some()
            || self.journal.is_some()
            || self.author.is_some()
            || self.has_pdf
    }

    fn to_query(&self) -> PublicationQuery {
        let mut query = PublicationQuery::new().page(self.page).per_page(self.per_page);
        for category in &self.categories {
            query = query.category(category.as_str());
        }
        if let Some(year) = self.year {
            query = query.year(year);
        }
        if let Some(journal) = &self.journal {
            query = query.journal(journal.as_str());
        }
        if let Some(author) = &self.author {
            query = query.author(author.as_str());
        }
        if self.has_pdf {
            query = query.has_pdf(true);
        }
        if let Some(text) = &self.query {
            query = query.text(text.as_str());
        }
        query
    }

    /// Pick the endpoint that matches the given arguments.
    async fn fetch(&self, backend: &HttpBackend) -> Result<PublicationPage, ApiError> {
        let query = self.to_query();
        match (&self.query, self.has_filters()) {
            (_, true) => backend.filter(&query).await,
            (Some(text), false) => backend.search_papers(text, &query).await,
            (None, false) => backend.list(&query).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Papers(args) => {
            let backend = HttpBackend::from_config(&config.api)?;
            let pb = spinner("Fetching publications");
            let page = args.fetch(&backend).await;
            pb.finish_and_clear();
            render::papers(&page?);
        }
        Commands::Paper { pmcid } => {
            let backend = HttpBackend::from_config(&config.api)?;
            let item = backend
                .get(&pmcid)
                .await
                .wrap_err_with(|| format!("Failed to fetch {}", pmcid))?;
            let pdf_url = if item.has_pdf() {
                Some(backend.pdf_url(&pmcid)?.to_string())
            } else {
                None
            };
            render::paper(&item, pdf_url.as_deref());
        }
        Commands::Stats => {
            let backend = HttpBackend::from_config(&config.api)?;
            let stats = backend.stats().await?;
            render::catalog_stats(&stats);
        }
        Commands::Export {
            format,
            selection,
            output,
            pdf_links: links_only,
        } => {
            let backend = HttpBackend::from_config(&config.api)?;
            let pb = spinner("Fetching publications");
            let page = selection.fetch(&backend).await;
            pb.finish_and_clear();
            let items = page?.publications;

            if items.is_empty() {
                eprintln!("No publications matched; nothing to export.");
                return Ok(());
            }

            let content = if links_only {
                let mut links = pdf_links(&items, backend.base_url()).join("\n");
                links.push('\n');
                links
            } else {
                format.render(&items)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Exported {} publications to {}", items.len(), path.display());
                }
                None => print!("{}", content),
            }
        }
        Commands::Config { default } => {
            if default {
                print!("{}", Config::default_config_string());
            } else {
                print!("{}", config.to_toml_string());
            }
        }
        command => run_graph(config, command).await?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BIOGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().wrap_err("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.persistence.data_dir = Some(dir.to_string_lossy().into_owned());
    }
    Ok(config)
}

/// Run a command against the persisted view. The session is always closed so
/// pending state reaches disk even when the command fails.
async fn run_graph(mut config: Config, command: Commands) -> Result<()> {
    if let Commands::Search {
        limit: Some(limit), ..
    } = &command
    {
        config.api.search_limit = *limit;
    }

    let session = Session::open(&config)?;
    let result = graph_command(&session, command).await;
    session.close().await;
    result
}

async fn graph_command(session: &Session, command: Commands) -> Result<()> {
    let explorer = &session.explorer;

    match command {
        Commands::Search { term, .. } => {
            let term = term.join(" ");
            let pb = spinner(format!("Searching for '{}'", term));
            let hits = explorer.search(&term).await;
            pb.finish_and_clear();
            render::hits(&hits?);
        }
        Commands::Open {
            name,
            depth,
            max_nodes,
            min_degree,
            labels,
        } => {
            let name = name.join(" ");
            let mut options = SubgraphOptions::from_config(&session.config.api);
            if let Some(depth) = depth {
                options = options.with_depth(depth);
            }
            if let Some(max_nodes) = max_nodes {
                options = options.with_max_nodes(max_nodes);
            }
            if let Some(min_degree) = min_degree {
                options.min_degree = min_degree;
            }
            if !labels.is_empty() {
                options = options.with_labels(labels);
            }

            let pb = spinner(format!("Loading subgraph around '{}'", name));
            let stats = explorer.load_subgraph(&name, Some(options)).await;
            pb.finish_and_clear();
            render::merge_summary(&name, &stats?, session);
        }
        Commands::Expand { ids } => {
            let pb = spinner(format!("Expanding {} node(s)", ids.len()));
            let results = join_all(ids.iter().map(|id| explorer.expand(id))).await;
            pb.finish_and_clear();

            let mut failures = 0;
            for (id, result) in ids.iter().zip(results) {
                match result {
                    Ok(stats) => render::merge_summary(id, &stats, session),
                    Err(e) => {
                        eprintln!("{}: {}", id, e);
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                bail!("{} of {} expansions failed", failures, ids.len());
            }
        }
        Commands::Filter {
            category,
            enable,
            disable,
            toggle,
            limit,
        } => {
            match category {
                Some(category) => {
                    if enable || disable {
                        explorer.set_category_enabled(category, enable)?;
                    }
                    if toggle {
                        explorer.toggle_category(category)?;
                    }
                    if let Some(limit) = limit {
                        explorer.set_category_limit(category, limit)?;
                    }
                }
                None if enable || disable || toggle || limit.is_some() => {
                    bail!("Name a category to change, e.g. 'biograph filter Gene --limit 5'");
                }
                None => {}
            }
            render::filters(session);
        }
        Commands::Show { json, all } => {
            let view = explorer.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                render::view(&view, all);
            }
        }
        Commands::Status => render::status(session),
        Commands::Clear => {
            explorer.clear().await;
            println!("Cleared saved view in {}", session.state_dir.display());
        }
        Commands::Papers(_)
        | Commands::Paper { .. }
        | Commands::Stats
        | Commands::Export { .. }
        | Commands::Config { .. } => bail!("This command does not operate on the graph view"),
    }

    Ok(())
}
