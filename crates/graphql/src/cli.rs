use clap::CommandFactory;
use crate::commands;

#[derive(clap::Parser, Debug)]
/// Decodes complete and incremental GraphQL responses against compiled
/// operation descriptors.
#[command(name = "graphql", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    #[arg(
        help="Log decoder and merger activity at debug level.",
        long,
        short='v',
    )]
    pub verbose: bool,
}
impl Cli {
    pub(crate) async fn run_default(self) -> anyhow::Result<()> {
        Self::command().print_help()?;
        Ok(())
    }
}
