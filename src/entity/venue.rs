use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sport {
    Football,
    Basketball,
    Badminton,
    Tennis,
    MiniSoccer,
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sport::Football => write!(f, "Football"),
            Sport::Basketball => write!(f, "Basketball"),
            Sport::Badminton => write!(f, "Badminton"),
            Sport::Tennis => write!(f, "Tennis"),
            Sport::MiniSoccer => write!(f, "Mini Soccer"),
        }
    }
}

// "mini soccer" / "mini_soccer" / "MiniSoccer" を同一視する
pub fn read_sport(s: &str) -> Option<Sport> {
    let lc: String = s
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    match lc.as_str() {
        "football" => Some(Sport::Football),
        "basketball" => Some(Sport::Basketball),
        "badminton" => Some(Sport::Badminton),
        "tennis" => Some(Sport::Tennis),
        "minisoccer" => Some(Sport::MiniSoccer),
        _ => None,
    }
}

#[test]
#[allow(non_snake_case)]
fn test_read_sport_区切り文字と大文字小文字を無視すること() {
    assert_eq!(read_sport("Mini Soccer"), Some(Sport::MiniSoccer));
    assert_eq!(read_sport("mini_soccer"), Some(Sport::MiniSoccer));
    assert_eq!(read_sport("BADMINTON"), Some(Sport::Badminton));
    assert_eq!(read_sport("curling"), None);
}

// 会場一覧のカテゴリタブ
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Sport),
}

pub fn read_category(s: &str) -> Option<CategoryFilter> {
    if s.eq_ignore_ascii_case("all") {
        return Some(CategoryFilter::All);
    }

    read_sport(s).map(CategoryFilter::Only)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Venue {
    id: String,
    name: String,
    location: String,
    address: String,
    sport: Sport,
    rating: f64,
    distance_km: f64,
    is_new: bool,
}

impl Venue {
    pub fn new(id: &str, name: &str, location: &str, sport: Sport) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            address: String::new(),
            sport,
            rating: 0.0,
            distance_km: 0.0,
            is_new: false,
        }
    }

    pub fn with_address(self, address: &str) -> Self {
        Self {
            address: address.to_string(),
            ..self
        }
    }

    pub fn with_rating(self, rating: f64) -> Self {
        Self { rating, ..self }
    }

    pub fn with_distance_km(self, distance_km: f64) -> Self {
        Self {
            distance_km,
            ..self
        }
    }

    pub fn with_is_new(self, is_new: bool) -> Self {
        Self { is_new, ..self }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_location(&self) -> &str {
        &self.location
    }

    // 住所が未登録なら地域名で代用する
    pub fn get_address(&self) -> &str {
        if self.address.is_empty() {
            &self.location
        } else {
            &self.address
        }
    }

    pub fn get_sport(&self) -> Sport {
        self.sport
    }

    pub fn get_rating(&self) -> f64 {
        self.rating
    }

    pub fn get_distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }
}

pub fn filter_venues(venues: &[Venue], filter: CategoryFilter, only_new: bool) -> Vec<&Venue> {
    venues
        .iter()
        .filter(|venue| match filter {
            CategoryFilter::All => true,
            CategoryFilter::Only(sport) => venue.sport == sport,
        })
        .filter(|venue| !only_new || venue.is_new)
        .collect()
}

#[cfg(test)]
fn sample_venues() -> Vec<Venue> {
    vec![
        Venue::new("1", "Rekket Space", "Rawa Buntu", Sport::Badminton).with_is_new(true),
        Venue::new("2", "Central Court", "Central Park", Sport::Basketball),
        Venue::new("3", "Royal Badminton", "BSD", Sport::Badminton),
    ]
}

#[test]
fn test_filter_venues_allは全件を返すこと() {
    let venues = sample_venues();
    let actual = filter_venues(&venues, CategoryFilter::All, false);

    assert_eq!(actual.len(), 3);
}

#[test]
fn test_filter_venues_競技で絞り込むこと() {
    let venues = sample_venues();
    let actual: Vec<&str> = filter_venues(&venues, CategoryFilter::Only(Sport::Badminton), false)
        .iter()
        .map(|venue| venue.get_id())
        .collect();

    assert_eq!(actual, vec!["1", "3"]);
}

#[test]
fn test_filter_venues_新着のみ() {
    let venues = sample_venues();
    let actual: Vec<&str> = filter_venues(&venues, CategoryFilter::All, true)
        .iter()
        .map(|venue| venue.get_id())
        .collect();

    assert_eq!(actual, vec!["1"]);
}

#[test]
fn test_get_address_未登録なら地域名() {
    let venue = Venue::new("2", "Central Court", "Central Park", Sport::Basketball);
    assert_eq!(venue.get_address(), "Central Park");

    let venue = venue.with_address("Jalan Buaran, BSD");
    assert_eq!(venue.get_address(), "Jalan Buaran, BSD");
}
