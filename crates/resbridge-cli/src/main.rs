mod io;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use resbridge_core::config::{self, BridgeConfig, CONFIG_FILE_NAME};
use resbridge_core::convert::{forward, reverse, ForwardOptions, ReverseOptions};
use resbridge_core::docgen::{self, DocOptions, DocServer};
use resbridge_core::ir::ResourceSchema;
use resbridge_core::{extractor_for, Conversion, ExtractorKind};

use crate::io::Input;

#[derive(Parser)]
#[command(name = "resbridge", about = "Resource definition converter", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract an IR document from serializer DSL source
    Extract {
        /// Source file to scan
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_enum)]
        extractor: Option<ExtractorArg>,

        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Convert source or an IR document to a definition document
    Convert {
        /// Source file or IR document (YAML/JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_enum)]
        extractor: Option<ExtractorArg>,

        /// Synthesize CRUD operations per resource
        #[arg(long)]
        operations: bool,

        /// Leave relationships out of the generated models
        #[arg(long)]
        no_relationships: bool,

        #[arg(long)]
        namespace: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        api_version: Option<String>,

        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Convert a definition document back to an IR document
    Reverse {
        /// Definition document (YAML/JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Generate a REST documentation document
    Docs {
        /// Source file or IR document (YAML/JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_enum)]
        extractor: Option<ExtractorArg>,

        /// Nest attributes/relationships instead of flattening them
        #[arg(long)]
        structured: bool,

        /// Server URL to advertise (repeatable)
        #[arg(long)]
        server: Vec<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        api_version: Option<String>,

        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Summarize the resources recovered from an input
    Inspect {
        /// Source file or IR document (YAML/JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_enum)]
        extractor: Option<ExtractorArg>,

        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Initialize a resbridge configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtractorArg {
    Heuristic,
    Tree,
}

impl From<ExtractorArg> for ExtractorKind {
    fn from(arg: ExtractorArg) -> Self {
        match arg {
            ExtractorArg::Heuristic => ExtractorKind::Heuristic,
            ExtractorArg::Tree => ExtractorKind::Tree,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            extractor,
            format,
        } => cmd_extract(input, extractor, format),

        Commands::Convert {
            input,
            extractor,
            operations,
            no_relationships,
            namespace,
            title,
            api_version,
            format,
        } => cmd_convert(
            input,
            extractor,
            operations,
            no_relationships,
            namespace,
            title,
            api_version,
            format,
        ),

        Commands::Reverse { input, format } => cmd_reverse(input, format),

        Commands::Docs {
            input,
            extractor,
            structured,
            server,
            title,
            api_version,
            format,
        } => cmd_docs(input, extractor, structured, server, title, api_version, format),

        Commands::Inspect {
            input,
            extractor,
            format,
        } => cmd_inspect(input, extractor, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "resbridge", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the project config from the current directory, if there is one.
fn try_load_config() -> Result<Option<BridgeConfig>> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    config::parse_config(&content).map(Some).map_err(|e| anyhow::anyhow!(e))
}

fn resolve_extractor(flag: Option<ExtractorArg>, cfg: &BridgeConfig) -> ExtractorKind {
    flag.map(ExtractorKind::from).unwrap_or(cfg.extractor)
}

/// Turn an input path into an IR schema, extracting when it's source text.
fn load_schema(input: &PathBuf, kind: ExtractorKind) -> Result<ResourceSchema> {
    match io::load_input(input)? {
        Input::Schema(schema) => Ok(schema),
        Input::Source { text, fallback } => {
            let resource = extractor_for(kind)
                .extract(&text, &fallback)
                .with_context(|| format!("no resource found in {}", input.display()))?;
            Ok(ResourceSchema::single(resource))
        }
    }
}

fn print_value<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Print diagnostics to stderr; a non-empty error list makes the command
/// fail after the (safe, possibly empty) result has been printed.
fn report_diagnostics<T>(outcome: &Conversion<T>) -> Result<()> {
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    for error in &outcome.errors {
        eprintln!("error: {error}");
    }
    if outcome.has_errors() {
        anyhow::bail!("conversion finished with errors");
    }
    Ok(())
}

fn cmd_extract(
    input: PathBuf,
    extractor: Option<ExtractorArg>,
    format: OutputFormat,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let schema = load_schema(&input, resolve_extractor(extractor, &cfg))?;
    print_value(&schema, format)
}

#[allow(clippy::too_many_arguments)]
fn cmd_convert(
    input: PathBuf,
    extractor: Option<ExtractorArg>,
    operations: bool,
    no_relationships: bool,
    namespace: Option<String>,
    title: Option<String>,
    api_version: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let schema = load_schema(&input, resolve_extractor(extractor, &cfg))?;

    let options = ForwardOptions {
        namespace: namespace.unwrap_or_else(|| cfg.convert.namespace.clone()),
        include_relationships: !no_relationships && cfg.convert.include_relationships,
        generate_operations: operations || cfg.convert.generate_operations,
        title: title.or_else(|| cfg.convert.title.clone()),
        version: api_version.or_else(|| cfg.convert.version.clone()),
        description: cfg.convert.description.clone(),
    };

    let outcome = forward(&schema, &options);
    print_value(&outcome.value, format)?;
    report_diagnostics(&outcome)
}

fn cmd_reverse(input: PathBuf, format: OutputFormat) -> Result<()> {
    let definition = io::load_definition(&input)?;
    let outcome = reverse(&definition, &ReverseOptions::default());
    print_value(&outcome.value, format)?;
    report_diagnostics(&outcome)
}

fn cmd_docs(
    input: PathBuf,
    extractor: Option<ExtractorArg>,
    structured: bool,
    servers: Vec<String>,
    title: Option<String>,
    api_version: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let schema = load_schema(&input, resolve_extractor(extractor, &cfg))?;

    let mut doc_servers: Vec<DocServer> = cfg.docs.servers.clone();
    doc_servers.extend(servers.into_iter().map(|url| DocServer {
        url,
        description: None,
    }));

    let options = DocOptions {
        title,
        version: api_version,
        description: None,
        servers: doc_servers,
        structured_format: structured || cfg.docs.structured,
    };

    let doc = docgen::generate(&schema, &options);
    print_value(&doc, format)
}

fn cmd_inspect(
    input: PathBuf,
    extractor: Option<ExtractorArg>,
    format: OutputFormat,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let schema = load_schema(&input, resolve_extractor(extractor, &cfg))?;
    print_value(&build_summary(&schema), format)
}

fn build_summary(schema: &ResourceSchema) -> serde_json::Value {
    let resources: Vec<serde_json::Value> = schema
        .resources
        .iter()
        .map(|r| {
            serde_json::json!({
                "name": r.name,
                "type": r.slug(),
                "namespace": r.namespace,
                "attributes": r.attributes.len(),
                "relationships": r.relationships.len(),
            })
        })
        .collect();

    serde_json::json!({
        "title": schema.title,
        "resources": resources,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
    }
    fs::write(&path, config::default_config_content())?;
    eprintln!("Created {}", path.display());
    Ok(())
}
