use chrono::Local;
use courtbook::adapter::gateway::config::Config;
use courtbook::adapter::gateway::venue_repository::VenueRepository;
use courtbook::application::interface::VenueRepositoryTrait;
use courtbook::application::show_venues::show_venues;
use courtbook::entity::venue::{read_category, CategoryFilter};
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 3 {
        eprintln!("usage: {} [fixtures_dir] [category]", &args[0]);
        process::exit(2);
    }

    let config = Config::from_args_and_env(args.get(1).map(|s| s.as_str()));
    let filter = match args.get(2) {
        Some(category) => match read_category(category) {
            Some(filter) => filter,
            None => {
                eprintln!("unknown category: {}", category);
                process::exit(2);
            }
        },
        None => CategoryFilter::All,
    };

    let mut repository = VenueRepository::new(config.get_fixtures_dir());
    repository.sync_clock(Local::now());
    if let Err(err) = repository.load() {
        eprintln!("{}", err);
        process::exit(1);
    }

    show_venues(&repository, filter, false);
}
