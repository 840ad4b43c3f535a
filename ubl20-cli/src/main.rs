use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ubl20_core::DocumentType;
use ubl20_core::config::{Config, XmlFormat};
use ubl20_core::marshal::UblMarshaller;
use ubl20_core::model::{CreditNote, Invoice, Order, UblDocument};

#[derive(Parser)]
#[command(name = "ubl20")]
#[command(about = "Read, validate and rewrite UBL 2.0 documents")]
struct Cli {
    /// `xsd` directory of the UBL 2.0 schema distribution
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered document types
    Types,
    /// Print the document type of an XML file
    Detect {
        #[arg(long)]
        document: PathBuf,
    },
    /// Validate an XML file against the schema of its root namespace
    Validate {
        #[arg(long)]
        document: PathBuf,
    },
    /// Read a document and write it back out in canonical form
    Normalize {
        #[arg(long)]
        document: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.schema_dir {
        Some(dir) => Config::new(dir),
        None => Config::default(),
    };
    debug!(schema_dir = %config.schema_dir().display(), "using schemas");

    match cli.command {
        Commands::Types => {
            let marshaller = UblMarshaller::from_config(&config);
            let mut out = io::stdout().lock();
            for descriptor in marshaller.registry().iter() {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    descriptor.document_type(),
                    descriptor.namespace_uri(),
                    descriptor.schema_path().display()
                )?;
            }
        }
        Commands::Detect { document } => {
            let marshaller = UblMarshaller::from_config(&config);
            let xml = read_document(&document)?;
            let document_type = marshaller.detect_document_type(&xml)?;
            println!("{document_type}");
        }
        Commands::Validate { document } => {
            let marshaller = UblMarshaller::from_config(&config);
            let errors = marshaller.validate_xml_file(&document);
            if errors.is_empty() {
                println!("OK");
            } else {
                for event in &errors {
                    println!("{event}");
                }
                bail!(
                    "{} failed validation with {} event(s)",
                    document.display(),
                    errors.len()
                );
            }
        }
        Commands::Normalize {
            document,
            output,
            compact,
        } => {
            let config = if compact {
                config.with_format(XmlFormat::Compact)
            } else {
                config
            };
            let marshaller = UblMarshaller::from_config(&config);
            let xml = read_document(&document)?;
            let document_type = marshaller.detect_document_type(&xml)?;
            info!(%document_type, "normalizing {}", document.display());
            match document_type {
                DocumentType::Invoice => {
                    normalize::<Invoice>(&marshaller, &xml, output.as_deref())?
                }
                DocumentType::CreditNote => {
                    normalize::<CreditNote>(&marshaller, &xml, output.as_deref())?
                }
                DocumentType::Order => normalize::<Order>(&marshaller, &xml, output.as_deref())?,
                other => bail!("normalize does not support {other} documents"),
            }
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn normalize<T: UblDocument>(
    marshaller: &UblMarshaller,
    xml: &[u8],
    output: Option<&Path>,
) -> Result<()> {
    let value: T = marshaller.read_bytes(xml, None)?;
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = BufWriter::new(file);
            marshaller.write(&value, T::DOCUMENT_TYPE, None, &mut sink)?;
            writeln!(sink)?;
        }
        None => {
            let mut out = io::stdout().lock();
            marshaller.write(&value, T::DOCUMENT_TYPE, None, &mut out)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
