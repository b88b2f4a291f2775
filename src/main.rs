use clap::Parser;
use dfmkit::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Validate(args) => dfmkit::cli::commands::validate::run(args, &global),
        Commands::Cost(args) => dfmkit::cli::commands::cost::run(args, &global),
        Commands::Inspect(args) => dfmkit::cli::commands::inspect::run(args, &global),
        Commands::Components(cmd) => dfmkit::cli::commands::components::run(cmd, &global),
        Commands::Tables(cmd) => dfmkit::cli::commands::tables::run(cmd, &global),
        Commands::Completions(args) => dfmkit::cli::commands::completions::run(args),
    }
}
