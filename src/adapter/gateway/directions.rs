use crate::entity::venue::Venue;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use url::Url;

#[cfg(test)]
use crate::entity::venue::Sport;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

// 住所で地図検索するURL
pub fn directions_url(venue: &Venue) -> Option<Url> {
    let query = format!("{}, {}", venue.get_name(), venue.get_address());
    let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC).to_string();

    let base = Url::parse(MAPS_SEARCH_URL).ok()?;
    let mut url = base.join(&encoded).ok()?;
    url.set_query(Some("api=1"));

    Some(url)
}

pub fn open_directions(venue: &Venue) -> Option<Url> {
    let url = directions_url(venue)?;

    match webbrowser::open(url.as_str()) {
        Ok(()) => {
            log::info!("opened directions for {}", venue.get_id());
        }
        Err(err) => {
            log::warn!("failed to open browser: {}", err);
        }
    }

    Some(url)
}

#[test]
fn test_directions_url_住所がエンコードされること() {
    let venue = Venue::new("1", "Rekket Space", "BSD", Sport::Badminton)
        .with_address("Jalan Buaran/7, BSD");
    let actual = directions_url(&venue).unwrap();

    assert_eq!(actual.host_str(), Some("www.google.com"));
    assert!(actual.path().starts_with("/maps/search/Rekket%20Space%2C%20Jalan%20Buaran%2F7"));
    assert_eq!(actual.query(), Some("api=1"));
}
