use crate::input_utils;
use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use libgraphql_response::DecodeContext;
use libgraphql_response::DecodeOptions;
use libgraphql_response::ScalarAdapterRegistry;
use std::collections::HashSet;
use std::fmt::Write;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct DecodeCmd {
    #[arg(
        help="Path to the JSON descriptor of the operation the responses \
             answer.",
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
        default_values_t=["json".to_string()],
        help="Set of file extensions to filter to when searching for files \
             within a directory.",
        long,
        value_delimiter = ',',
    )]
    response_file_exts: Vec<String>,

    #[arg(
        help="Paths to one or more response files or directories containing \
             response files which need to be decoded.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}
impl DecodeCmd {
    fn find_response_files(&self) -> (Vec<PathBuf>, Vec<walkdir::Error>) {
        let response_file_exts: HashSet<String> =
            self.response_file_exts.iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect();

        log::debug!(
            "Scanning {} input paths...",
            self.file_or_dir_paths.len(),
        );
        let mut file_paths = vec![];
        let mut errors = vec![];
        for path in &self.file_or_dir_paths {
            for entry in WalkDir::new(path.as_path()).follow_links(true) {
                match entry {
                    Ok(entry) => {
                        let path = entry.path();
                        if !entry.file_type().is_file() {
                            log::trace!("Skipping non-file: {path:#?}.");
                            continue;
                        }
                        if let Some(ext) = path.extension().map(|s| s.to_string_lossy())
                            && response_file_exts.contains::<str>(&ext) {
                            log::trace!("Found response file at {path:#?}.");
                            file_paths.push(path.to_path_buf());
                        }
                    },

                    Err(e) => {
                        log::trace!(
                            "Encountered an error while iterating recursive \
                            filesystem entities at/under {path:#?}."
                        );
                        errors.push(e);
                    },
                }
            }
        }

        // A single file named explicitly is decoded whatever its extension.
        if file_paths.is_empty()
            && self.file_or_dir_paths.len() == 1
            && let Some(first_arg_path) = self.file_or_dir_paths.first()
            && first_arg_path.is_file() {
            log::warn!(
                "Proceeding to decode {first_arg_path:#?} even though it \
                doesn't match any of the --response-file-exts ({}).",
                response_file_exts.iter()
                    .map(|ext| format!("`{ext}`"))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            file_paths.push(first_arg_path.clone());
        }

        (file_paths, errors)
    }
}

#[inherent::inherent]
impl RunnableCommand for DecodeCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let operation = match input_utils::load_operation(&self.operation) {
            Ok(operation) => operation,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        };
        let variables = match input_utils::parse_variables(self.variables.as_deref()) {
            Ok(variables) => variables,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        };
        // No adapters are available here, so custom scalars pass through as
        // raw JSON.
        let registry = ScalarAdapterRegistry::empty();
        let ctx = DecodeContext::new(&registry, &variables)
            .with_options(DecodeOptions {
                require_registered_scalars: false,
                ..DecodeOptions::default()
            });

        let (file_paths, walk_errors) = self.find_response_files();
        log::debug!(
            "Found {} response files to be decoded.",
            file_paths.len(),
        );

        let mut stdout = String::new();
        let mut stderr = String::new();
        for e in walk_errors {
            let _ = writeln!(stderr, "{} {e}", output_utils::RED_X);
        }
        for file_path in &file_paths {
            let decoded = std::fs::read_to_string(file_path)
                .map_err(anyhow::Error::from)
                .and_then(|text| Ok(operation.decode_response(&text, &ctx)?))
                .and_then(|response| output_utils::render_response(&operation, &response, &ctx));
            match decoded {
                Ok(rendered) => {
                    let _ = writeln!(
                        stdout,
                        "{} {}: {rendered}",
                        output_utils::GREEN_CHECK,
                        file_path.display(),
                    );
                },
                Err(e) => {
                    log::debug!("Failed to decode {file_path:#?}: {e:?}");
                    let _ = writeln!(
                        stderr,
                        "{} {}: {e:#}",
                        output_utils::RED_X,
                        file_path.display(),
                    );
                },
            }
        }

        CommandResult::report(
            stdout.trim_end().to_string(),
            stderr.trim_end().to_string(),
        )
    }
}
