mod exec;
mod list;
mod manage;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, CommandFactory, FromArgMatches, Parser};

use faker::listing::SortBy;
use faker::load_store;
use faker::store_file;

#[derive(Parser, Debug)]
#[command(
    name = "faker",
    version,
    about = "Run hierarchical command aliases",
    group(ArgGroup::new("action").multiple(false))
)]
struct Cli {
    /// Path to the store file (auto-detected if not specified)
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Log file path (in addition to stderr)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Add or replace an alias; ARGS are the program and its argument template
    #[arg(long, value_name = "NAME", group = "action")]
    add: Option<String>,

    /// Comment shown when listing, used with --add (must precede the program)
    #[arg(long, requires = "add")]
    comment: Option<String>,

    /// Remove an alias
    #[arg(long, value_name = "NAME", group = "action")]
    remove: Option<String>,

    /// Protect an alias from being replaced or removed
    #[arg(long, value_name = "NAME", group = "action")]
    lock: Option<String>,

    /// Remove the protection set by --lock
    #[arg(long, value_name = "NAME", group = "action")]
    unlock: Option<String>,

    /// List aliases by name, optionally only those under the namespace in ARGS
    #[arg(long, visible_alias = "list-by-name", group = "action")]
    list: bool,

    /// List aliases sorted by program
    #[arg(long, group = "action")]
    list_by_path: bool,

    /// Show settings, or set them from `KEY VALUE` pairs in ARGS (submatch, autolock)
    #[arg(long, group = "action")]
    config: bool,

    /// Alias name segments followed by arguments passed to the aliased program
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn usage(app: &str) -> String {
    format!(
        "Examples:
  # add (replace) an alias
  {app} --add gitinit git init
  # run it, passing extra arguments
  {app} gitinit --quiet
  # nested names
  {app} --add m.c calc
  {app} m c
  # pipes inside the template
  {app} --add count sort '|uniq' -c
  # abbreviations
  {app} --config submatch true
  {app} --add sub notepad
  {app} s
  {app} --add subsub calc
  {app} s    # error: ambiguous
  {app} sub  # exact name wins

Store file: <exe dir>/{app}.json (or .yaml/.yml), then <config dir>/{folder}/{app}.json",
        folder = store_file::CONFIG_FOLDER
    )
}

fn parse_cli(app: &str) -> Cli {
    let matches = Cli::command()
        .bin_name(app.to_string())
        .after_help(usage(app))
        .get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let app = store_file::app_name();
    let cli = parse_cli(&app);

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    faker::logger::init(log_file);

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| store_file::find_store(&app));
    let mut registry = load_store(&store_path)?;

    if cli.config {
        return manage::config(&mut registry, &store_path, &cli.args);
    }
    if let Some(ref name) = cli.add {
        return manage::add(
            &mut registry,
            &store_path,
            name,
            &cli.args,
            cli.comment.clone(),
        );
    }
    if let Some(ref name) = cli.remove {
        return manage::remove(&mut registry, &store_path, name);
    }
    if let Some(ref name) = cli.lock {
        return manage::lock(&mut registry, &store_path, name, true);
    }
    if let Some(ref name) = cli.unlock {
        return manage::lock(&mut registry, &store_path, name, false);
    }
    if cli.list_by_path {
        return Ok(list::run(&registry, &store_path, SortBy::Path, &cli.args));
    }
    if cli.list || cli.args.is_empty() {
        return Ok(list::run(&registry, &store_path, SortBy::Name, &cli.args));
    }

    exec::run(&registry, &cli.args)
}
