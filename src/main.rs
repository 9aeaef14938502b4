use clap::{Parser as ClapParser, Subcommand};
use jmespath_engine::{
    Runtime,
    cli::{self, CliError, SearchOptions, SearchResult},
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "jp")]
#[command(about = "jp - Query JSON documents with JMESPath expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a JMESPath expression against a JSON document
    Search {
        /// The JMESPath expression to evaluate
        expression: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,

        /// Enable the powertools_json, powertools_base64 and
        /// powertools_base64_gzip functions
        #[arg(long)]
        powertools: bool,
    },

    /// List the available functions and their signatures
    Functions {
        /// Include the powertools extension functions
        #[arg(long)]
        powertools: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            expression,
            input,
            pretty,
            syntax_only,
            powertools,
        } => run_search(SearchOptions {
            expression,
            input,
            pretty,
            syntax_only,
            powertools,
        }),
        Commands::Functions { powertools } => {
            let runtime = if powertools {
                Runtime::builder().with_powertools_functions().build()
            } else {
                Runtime::new()
            };
            print!("{}", cli::get_functions_overview(&runtime));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_search(mut options: SearchOptions) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_search(&options)? {
        SearchResult::SyntaxValid => println!("Syntax is valid"),
        SearchResult::Success(output) => println!("{}", cli::render(&output, options.pretty)?),
    }
    Ok(())
}
