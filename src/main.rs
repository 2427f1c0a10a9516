use boat_reallocator::config::{Config, Mode};
use boat_reallocator::dates;
use boat_reallocator::display::{print_boat_schedule, print_summary, write_boat_schedule_to_file};
use boat_reallocator::parser::load_manifest;
use boat_reallocator::realloc::{reallocate_on, TracingReporter};
use boat_reallocator::web::{self, AppState};
use boat_reallocator::Reservation;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let today = config.today.unwrap_or_else(dates::today);

    match config.mode {
        Mode::Web { port } => {
            let boats = match &config.manifest {
                Some(path) => load_manifest(path)?,
                None => Vec::new(),
            };
            println!("Starting web server on port {}...", port);
            println!("Loaded {} boats", boats.len());
            println!("Access the API at http://localhost:{}/api/boats", port);

            web::start_server(port, AppState::new(boats, config.today)).await?;
        }
        Mode::Plan {
            manifest,
            boat,
            first_day,
            last_day,
            client,
        } => {
            println!("Loading boats from {}...", manifest);
            let mut boats = load_manifest(&manifest)?;
            info!(boats = boats.len(), "manifest loaded");

            let boat = boats
                .iter_mut()
                .find(|b| b.name() == boat)
                .ok_or_else(|| format!("boat '{}' not found in {}", boat, manifest))?;

            print_boat_schedule(boat, today);

            let id = boat
                .next_reservation_id()
                .ok_or_else(|| format!("no reservation ids left on boat '{}'", boat.name()))?;
            let reservation = Reservation::new(id, client, first_day, last_day)?;
            println!("\n=== Inserting reservation ({}) ===", dates::format_range(first_day, last_day));

            let summary = reallocate_on(boat, reservation, today, &mut TracingReporter)?;
            print_summary(&summary);
            print_boat_schedule(boat, today);

            let filename = format!("schedule_{}.txt", boat.name().to_lowercase().replace(' ', "_"));
            write_boat_schedule_to_file(boat, today, &filename)?;
            println!("Schedule saved to {}", filename);
        }
    }

    Ok(())
}
