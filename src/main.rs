use clap::Parser;
use miette::Result;
use packlist::cli::{Cli, Commands};

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
        Commands::Init(args) => packlist::cli::commands::init::run(args),
        Commands::Vehicle(cmd) => packlist::cli::commands::vehicle::run(cmd, &global),
        Commands::Place(cmd) => packlist::cli::commands::place::run(cmd, &global),
        Commands::Item(cmd) => packlist::cli::commands::item::run(cmd, &global),
        Commands::Doc(cmd) => packlist::cli::commands::doc::run(cmd, &global),
        Commands::Import(args) => packlist::cli::commands::import::run(args, &global),
        Commands::Export(args) => packlist::cli::commands::export::run(args, &global),
        Commands::Search(args) => packlist::cli::commands::search::run(args, &global),
        Commands::History(args) => packlist::cli::commands::history::run(args, &global),
        Commands::Config(cmd) => packlist::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => packlist::cli::commands::completions::run(args),
    }
}
