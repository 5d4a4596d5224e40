use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Flatten project files into a single file with descriptive paths.",
    long_about = "xflatten collects files, directories, or glob patterns and writes them into \none combined output file, each section prefixed with its original path. \nOptionally pulls in each file's one-hop local imports.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  xflatten init\n  xflatten flatten ./src/components/Button.tsx --with-imports\n  xflatten flatten ./src/ --recursive\n  xflatten flatten '**/readme.md' --recursive -o docs.md\n  xflatten examples",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Initialize the project with a .flatten directory and configuration.")]
    Init,

    #[command(about = "Remove the .flatten directory and update .gitignore.")]
    Uninit,

    #[command(
        visible_alias = "f",
        about = "Flatten files or directories into a single file."
    )]
    Flatten(FlattenArgs),

    #[command(about = "Show practical usage examples.")]
    Examples,
}

#[derive(Args, Debug, Clone)]
pub struct FlattenArgs {
    #[arg(
        required = true,
        value_name = "PATHS",
        help = "Files, directories, or patterns (e.g., ./file.js, ./src/, **/readme.md)."
    )]
    pub paths: Vec<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "OUTPUT",
        help = "Output file name (default: <project>_flattened.<format>).",
        help_heading = "Output Control"
    )]
    pub output: Option<String>,

    #[arg(
        short = 'r',
        long,
        help = "Flatten directories recursively (also enables '**' glob segments).",
        help_heading = "Collection"
    )]
    pub recursive: bool,

    #[arg(
        long,
        help = "Include one-depth imports/requires for files.",
        help_heading = "Collection"
    )]
    pub with_imports: bool,
}
