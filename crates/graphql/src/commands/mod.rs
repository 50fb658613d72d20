mod decode;
mod merge;

use crate::Cli;
use crate::CommandResult;
use decode::DecodeCmd;
use merge::MergeCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "graphql")]
pub(crate) enum CommandEnum {
    /// Decode complete GraphQL responses against an operation.
    Decode(Box<DecodeCmd>),

    /// Merge an incremental (`@defer`/`@stream`) multipart response.
    Merge(Box<MergeCmd>),
}
impl CommandEnum {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Merge(_) => "merge",
        }
    }

    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Decode(cmd) => cmd.run(cli).await,
            Self::Merge(cmd) => cmd.run(cli).await,
        }
    }
}
