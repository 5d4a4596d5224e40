use colored::*;

/// Print practical usage examples, mirroring the built-in help epilog but
/// with short explanations per scenario.
pub fn handle_examples_command() {
    println!("{}", "xflatten usage examples".yellow().bold());
    println!();
    println!("{}", "Initialize a project:".bold());
    println!("  xflatten init");
    println!();
    println!("{}", "Flatten a single component with its direct imports:".bold());
    println!("  xflatten flatten ./src/components/Button.tsx --with-imports");
    println!();
    println!("{}", "Flatten a directory tree:".bold());
    println!("  xflatten flatten ./src/ --recursive");
    println!();
    println!("{}", "Collect every readme into one document:".bold());
    println!("  xflatten flatten '**/readme.md' --recursive -o docs.md");
    println!();
    println!("{}", "Remove the configuration again:".bold());
    println!("  xflatten uninit");
    println!();
    println!("{}", "Notes:".bold());
    println!("  - Paths are relative to the current working directory.");
    println!("  - Quote '**' patterns so your shell does not expand them first.");
    println!("  - Edit .flatten/config.json to change extensions, exclusions, or the line limit.");
}
