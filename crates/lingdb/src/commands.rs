use std::io::{self, Write};

use clap::Subcommand;
use lingdb::{
    BindingError, ConfigError, DatasetCatalog, LingDbConfig, RequestHandler, ResponseStatus,
};
use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("No language named '{language}' in dataset {dataset}")]
    NoSuchLanguage { dataset: String, language: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// How a request failure would be reported, if this is one.
    pub fn status(&self) -> Option<ResponseStatus> {
        match self {
            CliError::Binding(err) => Some(err.status()),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lists the loaded datasets and their sizes.
    Datasets,
    /// Runs a URL-style query string and prints the responses as JSON.
    Query {
        /// e.g. `Get=consonants&Intersection=p;t;k&ExtractContext=&Geq=2&FilterLanguages=`
        query_string: String,
    },
    /// Prints one language record as JSON.
    Describe { dataset: String, language: String },
}

impl Command {
    pub fn run(self, config: &LingDbConfig) -> Result<(), CliError> {
        let catalog = DatasetCatalog::load(config)?;
        debug!(event = "catalog_ready", datasets = catalog.len());

        let mut stdout = io::stdout().lock();
        match self {
            Command::Datasets => list_datasets(&catalog, &mut stdout)?,
            Command::Query { query_string } => {
                let handler = RequestHandler::configured(catalog, config);
                let responses = handler.handle_query_string(&query_string)?;
                serde_json::to_writer_pretty(&mut stdout, &responses)?;
                writeln!(stdout)?;
            }
            Command::Describe { dataset, language } => {
                let languages = catalog.get(&dataset)?;
                let record = languages
                    .get(&language)
                    .ok_or_else(|| CliError::NoSuchLanguage {
                        dataset: dataset.clone(),
                        language: language.clone(),
                    })?;
                serde_json::to_writer_pretty(&mut stdout, record)?;
                writeln!(stdout)?;
            }
        }
        Ok(())
    }
}

fn list_datasets(catalog: &DatasetCatalog, out: &mut impl Write) -> io::Result<()> {
    let width = catalog.names().iter().map(|n| n.len()).max().unwrap_or(0);
    for (name, languages) in catalog.iter() {
        let marker = if name == catalog.latest() {
            " (latest)".bright_green().to_string()
        } else {
            String::new()
        };
        writeln!(
            out,
            "{:<width$}  {:>8} languages{}",
            name.bold(),
            languages.len().to_formatted_string(&Locale::en),
            marker,
        )?;
    }
    Ok(())
}
