//! Command-line argument parsing, in the shape of `pueue`'s derive-style `CliArguments`.
use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Run a list of commands concurrently, interleaving their output and aggregating their
/// exit statuses.
#[derive(Parser, Debug)]
#[command(name = "paracmd", version, about)]
pub struct CliArguments {
    /// The commands to run, one positional argument each.
    #[arg(required = true)]
    pub commands: Vec<String>,

    /// Comma-split override list of task names, applied by post-expansion index.
    #[arg(long, visible_alias = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Parallelism cap; defaults to the number of expanded tasks.
    #[arg(long)]
    pub max_processes: Option<usize>,

    /// Comma-split membership in `{success, failure}`.
    #[arg(long, value_delimiter = ',')]
    pub kill_others_on: Vec<String>,

    /// Aggregator choice. Defaults to `all` when neither this nor the config file set one.
    #[arg(long)]
    pub success_condition: Option<String>,

    /// Forward every child's streams unprefixed and uncolored.
    #[arg(long)]
    pub raw: bool,

    /// Default working directory for tasks that don't set their own.
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Prefix kind (`none|index|name|pid|time|command`) or a template string.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Positional color list applied by task index; `auto` is permitted.
    #[arg(
        long,
        visible_alias = "prefixColor",
        visible_alias = "prefixColors",
        value_delimiter = ','
    )]
    pub prefix_colors: Vec<String>,

    /// Pattern used to render the `{time}` prefix token.
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Global shell hint. Bare `--shell` means "use the platform default shell"; `--shell
    /// <name>` (or `--shell=<name>`) names one of the known shells explicitly when `<name>`
    /// is one of `cmd|powershell|pwsh|bash|sh` — see [`normalize_shell_arg`], which performs
    /// that lookahead before clap ever sees the argument list. `require_equals` here just
    /// stops clap's own optional-value handling from greedily swallowing the *next*
    /// positional command once normalization has already decided not to consume it.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub shell: Option<String>,

    /// Wildcard script ordering.
    #[arg(long, conflicts_with = "no_wildcard_sort")]
    pub wildcard_sort: Option<String>,

    /// Shorthand for `--wildcard-sort package`.
    #[arg(long)]
    pub no_wildcard_sort: bool,

    /// Drop unavailable tasks instead of admitting them to fail at spawn time.
    #[arg(long)]
    pub ignore_missing: bool,

    /// Increase log verbosity; repeatable.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Explicit path to a `paracmd.toml` config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Shell names `--shell` recognizes as a value to consume, per §6.
const KNOWN_SHELL_NAMES: &[&str] = &["cmd", "powershell", "pwsh", "bash", "sh"];

/// Parse a raw argument list into [`CliArguments`], resolving `--shell`'s optional value
/// the way §6 specifies: peek the token right after a bare `--shell` and consume it only
/// when it names a known shell, leaving it as an ordinary positional command otherwise.
///
/// Clap alone can't express "consume the next token only if its *content* matches a known
/// name" — `num_args = 0..=1` decides arity from the token's *shape* (does it look like
/// another flag), not its content. So this rewrites `--shell <name>` into `--shell=<name>`
/// before handing the list to clap whenever `<name>` is recognized, and leaves the
/// argument list untouched otherwise; clap's `require_equals` then guarantees it never
/// consumes an un-rewritten bare token.
pub fn parse_args<I, T>(args: I) -> Result<CliArguments, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let normalized = normalize_shell_arg(args.into_iter().map(Into::into).collect());
    CliArguments::try_parse_from(normalized)
}

fn normalize_shell_arg(args: Vec<OsString>) -> Vec<OsString> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.into_iter().peekable();
    while let Some(arg) = iter.next() {
        if arg == "--shell" {
            let names_known_shell = iter
                .peek()
                .and_then(|next| next.to_str())
                .map(|next| KNOWN_SHELL_NAMES.contains(&next))
                .unwrap_or(false);
            if names_known_shell {
                let value = iter.next().unwrap();
                let mut rewritten = OsString::from("--shell=");
                rewritten.push(value);
                out.push(rewritten);
                continue;
            }
        }
        out.push(arg);
    }
    out
}
