use std::io::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use appsel_engine::AppSource;
use appsel_engine::ApplicationDescriptor;
use appsel_engine::Facets;
use appsel_engine::Hierarchy;
use appsel_engine::JsonFileSource;
use appsel_engine::QueryCase;
use appsel_engine::SelectorConfig;
use appsel_engine::evaluate_with;
use appsel_tui::AppPicker;
use appsel_tui::PickerOutcome;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tracing::info;
use tracing::warn;

mod logging;
mod output;

#[derive(Debug, Parser)]
#[command(
    name = "appsel",
    version,
    about = "Browse, filter and pick applications from an inventory"
)]
pub struct Cli {
    /// Picker configuration (TOML)
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the grouped and filtered inventory
    List(ListArgs),

    /// Print the source kinds and profile types present in the inventory
    Facets(FacetsArgs),

    /// Choose an application interactively
    Pick(PickArgs),
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// JSON application list
    #[arg(long, short = 'a', value_name = "FILE")]
    pub apps: PathBuf,

    /// Substring to search for in application names
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Only applications collected by this spy
    #[arg(long = "spy", value_name = "KIND")]
    pub source_kind: Option<String>,

    /// Only applications with this profile type
    #[arg(long, value_name = "TYPE")]
    pub profile_type: Option<String>,

    /// Match the query case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,
}

impl FilterArgs {
    /// Flags given on the command line win over the config file.
    fn apply(&self, config: &mut SelectorConfig) -> Result<()> {
        if let Some(query) = &self.query {
            config.query = query.clone();
        }
        if let Some(kind) = &self.source_kind {
            config.source_kind = Some(kind.clone());
        }
        if let Some(profile_type) = &self.profile_type {
            config.profile_type = Some(profile_type.clone());
        }
        if self.case_sensitive {
            config.query_case = QueryCase::Sensitive;
        }
        config.validate().map_err(anyhow::Error::msg)
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print the display tree as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FacetsArgs {
    /// JSON application list
    #[arg(long, short = 'a', value_name = "FILE")]
    pub apps: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PickArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Start with every group open
    #[arg(long)]
    pub expand_all: bool,

    /// Currently selected application, shown until another is picked
    #[arg(long, value_name = "NAME")]
    pub current: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let owns_terminal = matches!(self.command, Command::Pick(_));
        let _guard = logging::init(self.log_file.as_deref(), owns_terminal)?;

        let config = match &self.config {
            Some(path) => SelectorConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SelectorConfig::default(),
        };

        match self.command {
            Command::List(args) => run_list(args, config),
            Command::Facets(args) => run_facets(args),
            Command::Pick(args) => run_pick(args, config).await,
        }
    }
}

fn load_apps(path: &std::path::Path) -> Result<Vec<ApplicationDescriptor>> {
    let source = JsonFileSource::new(path);
    source
        .fetch()
        .with_context(|| format!("failed to read applications from {}", source.describe()))
}

fn run_list(args: ListArgs, mut config: SelectorConfig) -> Result<ExitCode> {
    args.filter.apply(&mut config)?;
    let descriptors = load_apps(&args.filter.apps)?;
    warn_on_absent_facets(&config, &Facets::collect(&descriptors));
    let hierarchy = Hierarchy::build(&descriptors);
    let tree = evaluate_with(
        &hierarchy,
        &config.initial_selection(),
        config.match_options(),
    );
    info!(
        groups = hierarchy.len(),
        rows = tree.len(),
        "evaluated application list"
    );

    let stdout = std::io::stdout();
    let styled = stdout.is_terminal();
    let mut out = stdout.lock();
    if args.json {
        output::write_tree_json(&mut out, &tree)?;
    } else {
        output::write_tree(&mut out, &tree, styled)?;
    }
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// A filter on a value nobody in the inventory carries can only produce an
/// empty list.
fn warn_on_absent_facets(config: &SelectorConfig, facets: &Facets) {
    if let Some(kind) = config
        .source_kind
        .as_deref()
        .filter(|kind| !facets.has_source_kind(kind))
    {
        warn!("no application in the inventory uses source kind {kind}");
    }
    if let Some(profile_type) = config
        .profile_type
        .as_deref()
        .filter(|profile_type| !facets.has_profile_type(profile_type))
    {
        warn!("no application in the inventory has profile type {profile_type}");
    }
}

fn run_facets(args: FacetsArgs) -> Result<ExitCode> {
    let descriptors = load_apps(&args.apps)?;
    let facets = Facets::collect(&descriptors);

    let stdout = std::io::stdout();
    let styled = stdout.is_terminal();
    let mut out = stdout.lock();
    if args.json {
        output::write_facets_json(&mut out, &facets)?;
    } else {
        output::write_facets(&mut out, &facets, styled)?;
    }
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

async fn run_pick(args: PickArgs, mut config: SelectorConfig) -> Result<ExitCode> {
    args.filter.apply(&mut config)?;
    config.expand_all |= args.expand_all;

    let source = JsonFileSource::new(&args.filter.apps);
    let mut picker = AppPicker::new(Box::new(source), &config).with_current_app(args.current);

    let mut terminal = appsel_tui::init().context("failed to initialise terminal")?;
    let outcome = appsel_tui::run_app_picker(&mut terminal, &mut picker).await;
    appsel_tui::restore(&mut terminal).context("failed to restore terminal")?;

    match outcome? {
        PickerOutcome::Selected(name) => {
            println!("{name}");
            Ok(ExitCode::SUCCESS)
        }
        PickerOutcome::Cancelled => {
            info!("picker cancelled");
            Ok(ExitCode::from(1))
        }
    }
}
