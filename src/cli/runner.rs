//! CLI runner - inventories every configured array into one sink

use crate::cli::commands::CommonArgs;
use crate::config::load_config;
use crate::connector::Connector;
use crate::engine::Collector;
use crate::error::{Error, Result};
use crate::output::{open_sink, Sink};
use crate::types::Backend;
use tracing::{debug, error, info, warn};

/// Exit code of a configuration error
pub const EXIT_CONFIG: u8 = 1;
/// Exit code of a sink creation or write error
pub const EXIT_OUTPUT: u8 = 2;

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Arrays fully inventoried
    pub collected: Vec<String>,
    /// Arrays skipped after an error
    pub skipped: Vec<String>,
    /// Records saved across all arrays
    pub records: usize,
}

/// CLI runner
pub struct Runner {
    backend: Backend,
    args: CommonArgs,
}

impl Runner {
    /// Create a new runner
    pub fn new(backend: Backend, args: CommonArgs) -> Self {
        Self { backend, args }
    }

    /// Load the configuration, open the sink and inventory every array.
    ///
    /// Errors returned here are fatal for the run; a failing array is
    /// logged, skipped, and listed in [`RunSummary::skipped`].
    pub async fn run(&self) -> Result<RunSummary> {
        let config = load_config(&self.args.config).inspect_err(|e| {
            error!("Error while parsing configuration: {e}");
        })?;

        let mut sink = open_sink(self.args.format, &self.args.path, &self.args.file)
            .inspect_err(|e| error!("Error while creation file: {e}"))?;

        let mut summary = RunSummary::default();
        for endpoint in &config.arrays {
            info!("Inventory: {}", endpoint.name);
            let connector = Connector::open(self.backend, endpoint, &config.settings).await;
            collect_array(&endpoint.name, connector, &mut *sink, &mut summary)
                .await
                .inspect_err(|e| error!("Error while writing file: {e}"))?;
        }

        sink.finish()
            .inspect_err(|e| error!("Error while writing file: {e}"))?;
        Ok(summary)
    }
}

/// Inventory one array into `sink` and record the outcome in `summary`.
///
/// `connector` is the result of opening the array. Connection, factory and
/// backend errors skip the array; only fatal errors (sink) are returned.
pub async fn collect_array(
    name: &str,
    connector: Result<Connector>,
    sink: &mut dyn Sink,
    summary: &mut RunSummary,
) -> Result<()> {
    let result = match connector {
        Ok(connector) => {
            let result = Collector::new().collect(sink, &connector).await;
            if let Err(e) = connector.close().await {
                debug!("Closing {connector} failed: {e}");
            }
            result
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(stats) => {
            summary.records += stats.records_saved;
            summary.collected.push(name.to_string());
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            error!("Error: {e}");
            warn!("Skip {name} and go ahead");
            summary.skipped.push(name.to_string());
            Ok(())
        }
    }
}

/// Process exit code of a fatal error
pub fn exit_code(error: &Error) -> u8 {
    match error {
        Error::Config { .. } | Error::MissingConfigField { .. } | Error::YamlParse(_) => EXIT_CONFIG,
        _ => EXIT_OUTPUT,
    }
}
