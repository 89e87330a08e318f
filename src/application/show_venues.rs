use crate::application::interface::VenueRepositoryTrait;
use crate::entity::venue::{filter_venues, CategoryFilter};

pub fn show_venues(repository: &dyn VenueRepositoryTrait, filter: CategoryFilter, only_new: bool) {
    let venues = filter_venues(repository.get_all_venues(), filter, only_new);

    for venue in venues.iter() {
        let new_mark = if venue.is_new() { "NEW" } else { "" };
        println!(
            "{}\t{}\t{}\t{}\t{:.1}\t{:.1} km\t{}",
            venue.get_id(),
            venue.get_name(),
            venue.get_location(),
            venue.get_sport(),
            venue.get_rating(),
            venue.get_distance_km(),
            new_mark
        );
    }

    log::debug!("{} venues shown", venues.len());
}
