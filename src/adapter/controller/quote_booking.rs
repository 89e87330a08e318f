use chrono::{Local, NaiveDate};
use courtbook::adapter::controller::command::parse_24_hour_pick;
use courtbook::adapter::gateway::config::Config;
use courtbook::adapter::gateway::venue_repository::VenueRepository;
use courtbook::adapter::presenter::booking_view::render_review;
use courtbook::application::interface::VenueRepositoryTrait;
use courtbook::application::quote_booking::quote_booking;
use courtbook::error::BookingError;
use std::env;
use std::process;

fn run(args: &[String]) -> Result<Vec<String>, BookingError> {
    let venue_id = &args[1];
    let date = NaiveDate::parse_from_str(&args[2], "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidTime(args[2].to_string()))?;
    let start = parse_24_hour_pick(&args[3])?;
    let end = parse_24_hour_pick(&args[4])?;

    // フィクスチャの場所は環境変数でのみ変えられる
    let config = Config::from_args_and_env(None);
    let mut repository = VenueRepository::new(config.get_fixtures_dir());
    repository.sync_clock(Local::now());
    repository.load()?;

    let review = quote_booking(&repository, venue_id, &date, &start, &end)?;
    Ok(render_review(&review))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("usage: {} <venue_id> <YYYY-MM-DD> <HH:MM> <HH:MM>", &args[0]);
        process::exit(2);
    }

    match run(&args) {
        Ok(lines) => {
            for line in lines.iter() {
                println!("{}", line);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
