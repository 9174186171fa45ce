use clap::{Parser, Subcommand};

use crate::determinism::DeterminismFixture;
use crate::error::Result;
use crate::run::{RunArgs, run_scroller};

#[derive(Debug, Parser)]
#[command(
    name = "gremlins-harness",
    about = "Unleash gremlins on an in-memory document and record what they do",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Errors are reported as JSON when the run itself emits JSON lines.
    pub fn wants_json(&self) -> bool {
        matches!(&self.command, Commands::Run(args) if args.jsonl)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Invoke a scroller gremlin repeatedly on a virtual clock.
    Run(RunArgs),

    /// Print the seed and determinism settings a run would use.
    Env,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_scroller(args),
        Commands::Env => {
            let fixture = DeterminismFixture::new("scroller", None);
            println!("{}", serde_json::to_string(&fixture.env_snapshot())?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use gremlins_core::Size;

    use super::{Cli, Commands, run};

    #[test]
    fn env_command_dispatches_successfully() {
        assert!(run(Cli { command: Commands::Env }).is_ok());
    }

    #[test]
    fn run_arguments_parse() {
        let cli = Cli::try_parse_from([
            "gremlins-harness",
            "run",
            "--seed",
            "9",
            "--invocations",
            "3",
            "--tick-ms",
            "16",
            "--viewport",
            "640x480",
            "--content",
            "640x2000",
            "--no-show",
            "--jsonl",
        ])
        .unwrap();
        assert!(cli.wants_json());
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.invocations, 3);
        assert_eq!(args.tick_ms, 16);
        assert_eq!(args.viewport, Some(Size::new(640, 480)));
        assert_eq!(args.content, Some(Size::new(640, 2000)));
        assert!(args.no_show);
    }

    #[test]
    fn run_defaults_apply() {
        let cli = Cli::try_parse_from(["gremlins-harness", "run"]).unwrap();
        assert!(!cli.wants_json());
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.seed, None);
        assert_eq!(args.invocations, 10);
        assert_eq!(args.tick_ms, 100);
    }

    #[test]
    fn document_conflicts_with_explicit_geometry() {
        let result = Cli::try_parse_from([
            "gremlins-harness",
            "run",
            "--document",
            "doc.json",
            "--viewport",
            "10x10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_size_is_rejected() {
        let result = Cli::try_parse_from(["gremlins-harness", "run", "--viewport", "wide"]);
        assert!(result.is_err());
    }
}
