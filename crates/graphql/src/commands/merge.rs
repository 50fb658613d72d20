use crate::input_utils;
use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use futures::StreamExt;
use libgraphql_response::DecodeContext;
use libgraphql_response::DecodeOptions;
use libgraphql_response::IncrementalMerger;
use libgraphql_response::IncrementalResponseStream;
use libgraphql_response::ScalarAdapterRegistry;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, clap::Args)]
pub(crate) struct MergeCmd {
    #[arg(
        help="Path to the JSON descriptor of the operation the response \
             answers.",
        long,
        short='o',
    )]
    operation: PathBuf,

    #[arg(
        help="Operation variables as a JSON object. Used to evaluate \
             `@skip`/`@include` conditions.",
        long,
    )]
    variables: Option<String>,

    #[arg(
        default_value="-",
        help="The multipart boundary the body was written with.",
        long,
    )]
    boundary: String,

    #[arg(
        default_value_t=4096,
        help="Size of the chunks the body is fed to the decoder in.",
        long,
    )]
    chunk_size: usize,

    #[arg(
        help="Path to a `multipart/mixed` incremental response body.",
        name="FILE",
    )]
    file: PathBuf,
}

#[inherent::inherent]
impl RunnableCommand for MergeCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let loaded = input_utils::load_operation(&self.operation).and_then(|operation| {
            let variables = input_utils::parse_variables(self.variables.as_deref())?;
            Ok((operation, variables))
        });
        let (operation, variables) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        };
        let body = match std::fs::read(&self.file) {
            Ok(body) => body,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} Failed to read {:#?}: {e}",
                output_utils::RED_X,
                self.file,
            )),
        };
        log::debug!(
            "Merging a {}-byte incremental response for `{}`.",
            body.len(),
            operation.name(),
        );

        let operation = Arc::new(operation);
        let registry = Arc::new(ScalarAdapterRegistry::empty());
        let options = DecodeOptions {
            require_registered_scalars: false,
            ..DecodeOptions::default()
        };
        let merger = IncrementalMerger::new(operation.clone(), registry.clone(), variables.clone())
            .with_options(options);
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = body
            .chunks(self.chunk_size.max(1))
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();
        let mut responses = IncrementalResponseStream::new(futures::stream::iter(chunks), merger)
            .with_boundary(&self.boundary);

        let ctx = DecodeContext::new(&registry, &variables).with_options(options);
        let mut stdout = String::new();
        let mut stderr = String::new();
        while let Some(result) = responses.next().await {
            let rendered = result
                .map_err(anyhow::Error::from)
                .and_then(|response| output_utils::render_response(&operation, &response, &ctx));
            match rendered {
                Ok(line) => {
                    let _ = writeln!(stdout, "{line}");
                },
                Err(e) => {
                    let _ = writeln!(stderr, "{} {e:#}", output_utils::RED_X);
                },
            }
        }

        CommandResult::report(
            stdout.trim_end().to_string(),
            stderr.trim_end().to_string(),
        )
    }
}
