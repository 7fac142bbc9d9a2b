use std::error::Error;

use clap::{Parser, Subcommand};
use itertools::Itertools;
use simple_logger::SimpleLogger;

use ecocalc::*;

const ABOUT: &'static str = r#"Estimates and compares the CO2 emitted by one traveller on a trip between two places:
* by car (petrol, diesel or electric), plane, bus, train or motorcycle
* using the road distance between both places
* keeping the 10 most recent calculations on disk
"#;

#[derive(Parser, Debug)]
#[command(author, version, about = ABOUT)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Base url of the Nominatim-compatible search service
    #[arg(long, default_value = config::DEFAULT_SEARCH_URL)]
    search_url: String,
    /// Base url of the OSRM-compatible routing service
    #[arg(long, default_value = config::DEFAULT_ROUTE_URL)]
    route_url: String,
    /// Directory where the history is kept
    #[arg(long, default_value = config::DEFAULT_STORAGE_DIR)]
    storage_dir: String,
    /// Log what is being requested
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the places matching a query
    Search { query: String },
    /// Calculates the emissions of a trip
    Calculate {
        /// Where the trip starts
        #[arg(long)]
        from: String,
        /// Where the trip ends
        #[arg(long)]
        to: String,
        /// Number of people sharing a car or motorcycle
        #[arg(short, long, default_value = "1")]
        passengers: String,
        /// Which of the places matching `from` to use
        #[arg(long, default_value_t = 0)]
        pick_from: usize,
        /// Which of the places matching `to` to use
        #[arg(long, default_value_t = 0)]
        pick_to: usize,
    },
    /// Lists the most recent calculations
    History,
    /// Shows a calculation from the history, without recalculating it
    Show { index: usize },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            search_url: self.search_url.clone(),
            route_url: self.route_url.clone(),
            storage_dir: self.storage_dir.clone(),
            ..Default::default()
        }
    }
}

fn pick(session: &mut Session, field: Field, index: usize) -> Result<(), Box<dyn Error>> {
    if session.select(field, index) {
        let location = session.state().field(field).selected.as_ref();
        log::info!("{field:?}: {}", location.map(|l| l.name.as_str()).unwrap_or_default());
        return Ok(());
    }
    let query = &session.state().field(field).query;
    Err(format!("No place #{index} found for \"{query}\"").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(if cli.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .init()
        .unwrap();

    let config = cli.config();
    let locations = Nominatim::new(&config)?;
    let routes = Osrm::new(&config)?;
    let mut session = Session::start(&locations, &routes, &LocalDisk, &config.history_key()).await;

    match cli.command {
        Command::Search { query } => {
            let found = session.search(Field::Origin, &query).await;
            if found.is_empty() {
                println!("No places found for \"{query}\"");
            }
            for (i, location) in found.iter().enumerate() {
                println!("{i}: {} ({:.4}, {:.4})", location.name, location.lat, location.lon);
            }
        }
        Command::Calculate {
            from,
            to,
            passengers,
            pick_from,
            pick_to,
        } => {
            // both inputs are independent
            let from_request = session.issue_search(Field::Origin, &from);
            let to_request = session.issue_search(Field::Destination, &to);
            let (from_found, to_found) = futures::join!(
                async {
                    match &from_request {
                        Some(request) => session.resolve(request).await,
                        None => vec![],
                    }
                },
                async {
                    match &to_request {
                        Some(request) => session.resolve(request).await,
                        None => vec![],
                    }
                }
            );
            if let Some(request) = from_request {
                session.complete_search(request, from_found);
            }
            if let Some(request) = to_request {
                session.complete_search(request, to_found);
            }
            pick(&mut session, Field::Origin, pick_from)?;
            pick(&mut session, Field::Destination, pick_to)?;
            session.set_passengers(&passengers);

            let result = session.calculate().await?;
            println!("{}", report::render(&result)?);
        }
        Command::History => {
            if session.history().entries().is_empty() {
                println!("No trips calculated yet.");
            } else {
                println!(
                    "{}",
                    session
                        .history()
                        .entries()
                        .iter()
                        .enumerate()
                        .map(|(i, entry)| format!("{i}: {}", report::summary(entry)))
                        .join("\n")
                );
            }
        }
        Command::Show { index } => {
            let result = session
                .restore(index)
                .ok_or_else(|| Into::<Box<dyn Error>>::into("History entry not found"))?;
            println!("{}", report::render(result)?);
        }
    }

    Ok(())
}
