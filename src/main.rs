use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rust_sqlblueprint::{list_schemas, load_schema, report, xml, BlueprintError, ConnectionConfig, LoadOptions};

#[derive(Parser)]
#[command(name = "rust-sqlblueprint")]
#[command(author, version, about = "Read SQL Server catalog metadata into table blueprints")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the user databases on the server
    Schemas {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// Load a schema and print its blueprints
    Inspect {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Schema name to tag blueprints with
        #[arg(short, long)]
        schema: String,

        /// Catalog database to read (defaults to the connection database)
        #[arg(short, long)]
        database: Option<String>,

        /// SQL schema whose tables are read (SQL_SERVER_SCHEMA, then dbo)
        #[arg(long)]
        table_schema: Option<String>,

        /// Only print this table
        #[arg(short, long)]
        table: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Connection flags; anything left unset comes from the environment
#[derive(Args)]
struct ConnectionArgs {
    /// Server host (SQL_SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port (SQL_SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Login name (SQL_SERVER_USER)
    #[arg(long)]
    user: Option<String>,

    /// Login password (SQL_SERVER_PASSWORD)
    #[arg(long)]
    password: Option<String>,
}

impl ConnectionArgs {
    fn into_config(self) -> Result<ConnectionConfig> {
        let mut config = ConnectionConfig::from_env()?;
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(user) = self.user {
            config.user = user;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        Ok(config)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Xml,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn emit(content: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .map_err(|e| BlueprintError::OutputWriteError { path, source: e })?;
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Schemas { connection } => {
            let config = connection.into_config()?;
            for name in list_schemas(&config)? {
                println!("{}", name);
            }
        }
        Commands::Inspect {
            connection,
            schema,
            database,
            table_schema,
            table,
            format,
            output,
        } => {
            let options = LoadOptions {
                connection: connection.into_config()?,
                schema,
                database,
                table_schema,
            };
            let schema = load_schema(options)?;

            let content = match (&table, format) {
                (Some(name), Format::Text) => report::render_table(schema.table(name)?),
                (Some(name), Format::Xml) => xml::table_to_string(schema.table(name)?)?,
                (None, Format::Text) => report::render_report(&schema),
                (None, Format::Xml) => xml::schema_to_string(&schema)?,
            };
            emit(&content, output)?;
        }
    }

    Ok(())
}
