use crate::entity::venue::{Sport, Venue};
use crate::error::BookingError;
use chrono::{Days, NaiveDate, NaiveTime};

#[cfg(test)]
use chrono::Timelike;

pub const ACTIVITIES: [&str; 4] = ["Venue Booking", "Open Play", "Sparring", "Competition"];

pub const LOCATIONS: [&str; 7] = [
    "Jakarta Barat",
    "Jakarta Timur",
    "Jakarta Selatan",
    "Jakarta Pusat",
    "Jakarta Utara",
    "Tangerang",
    "Bekasi",
];

pub const TIME_OPTION_HOURS: [u32; 7] = [8, 10, 12, 14, 16, 18, 20];

// 今日から数えて選べる日数
pub const DATE_OPTION_DAYS: u64 = 7;

#[derive(Clone, Debug, PartialEq)]
pub enum SearchCriterion {
    Activity(String),
    Location(String),
    Sport(Sport),
    Date(NaiveDate),
    Time(NaiveTime),
}

fn find_option(options: &[&'static str], kind: &'static str, value: &str) -> Result<String, BookingError> {
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(value.trim()))
        .map(|option| option.to_string())
        .ok_or_else(|| BookingError::UnknownSearchOption {
            kind,
            value: value.to_string(),
        })
}

pub fn date_options(today: &NaiveDate) -> Vec<NaiveDate> {
    (0..DATE_OPTION_DAYS)
        .filter_map(|i| today.checked_add_days(Days::new(i)))
        .collect()
}

pub fn time_options() -> Vec<NaiveTime> {
    TIME_OPTION_HOURS
        .iter()
        .filter_map(|hour| NaiveTime::from_hms_opt(*hour, 0, 0))
        .collect()
}

// 探索画面の絞り込み。5項目が揃うまで検索できない
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ExploreSearch {
    activity: Option<String>,
    location: Option<String>,
    sport: Option<Sport>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<'a> {
    pub activity: String,
    pub location: String,
    pub sport: Sport,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venues: Vec<&'a Venue>,
}

impl ExploreSearch {
    pub fn get_activity(&self) -> Option<&str> {
        self.activity.as_deref()
    }

    pub fn get_location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn get_sport(&self) -> Option<Sport> {
        self.sport
    }

    pub fn get_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn get_time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn choose(&self, criterion: SearchCriterion, today: &NaiveDate) -> Result<Self, BookingError> {
        let mut next = self.clone();

        match criterion {
            SearchCriterion::Activity(activity) => {
                next.activity = Some(find_option(&ACTIVITIES, "activity", &activity)?);
            }
            SearchCriterion::Location(location) => {
                next.location = Some(find_option(&LOCATIONS, "location", &location)?);
            }
            SearchCriterion::Sport(sport) => {
                next.sport = Some(sport);
            }
            SearchCriterion::Date(date) => {
                if !date_options(today).contains(&date) {
                    return Err(BookingError::UnselectableDate(date));
                }
                next.date = Some(date);
            }
            SearchCriterion::Time(time) => {
                if !time_options().contains(&time) {
                    return Err(BookingError::InvalidTime(time.format("%H:%M").to_string()));
                }
                next.time = Some(time);
            }
        }

        Ok(next)
    }

    pub fn is_ready(&self) -> bool {
        self.activity.is_some()
            && self.location.is_some()
            && self.sport.is_some()
            && self.date.is_some()
            && self.time.is_some()
    }

    // 競技が一致する会場を近い順に返す
    pub fn search<'a>(&self, venues: &'a [Venue]) -> Result<SearchResult<'a>, BookingError> {
        let (activity, location, sport, date, time) = match (
            &self.activity,
            &self.location,
            self.sport,
            self.date,
            self.time,
        ) {
            (Some(activity), Some(location), Some(sport), Some(date), Some(time)) => {
                (activity.to_string(), location.to_string(), sport, date, time)
            }
            _ => return Err(BookingError::SearchIncomplete),
        };

        let mut matched: Vec<&Venue> = venues
            .iter()
            .filter(|venue| venue.get_sport() == sport)
            .collect();
        matched.sort_by(|a, b| a.get_distance_km().total_cmp(&b.get_distance_km()));

        log::info!(
            "search {} {} {} {} {}: {} venues",
            activity,
            location,
            sport,
            date,
            time,
            matched.len()
        );
        Ok(SearchResult {
            activity,
            location,
            sport,
            date,
            time,
            venues: matched,
        })
    }
}

#[cfg(test)]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[cfg(test)]
fn filled_search() -> ExploreSearch {
    let today = today();
    ExploreSearch::default()
        .choose(SearchCriterion::Activity("open play".to_string()), &today)
        .unwrap()
        .choose(SearchCriterion::Location("Tangerang".to_string()), &today)
        .unwrap()
        .choose(SearchCriterion::Sport(Sport::Badminton), &today)
        .unwrap()
        .choose(
            SearchCriterion::Date(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()),
            &today,
        )
        .unwrap()
        .choose(
            SearchCriterion::Time(NaiveTime::from_hms_opt(14, 0, 0).unwrap()),
            &today,
        )
        .unwrap()
}

#[test]
fn test_search_全項目を選ぶまで検索できないこと() {
    let today = today();
    let search = ExploreSearch::default()
        .choose(SearchCriterion::Activity("Sparring".to_string()), &today)
        .unwrap()
        .choose(SearchCriterion::Sport(Sport::Tennis), &today)
        .unwrap();

    assert!(!search.is_ready());
    assert_eq!(search.search(&[]), Err(BookingError::SearchIncomplete));
}

#[test]
fn test_search_競技が一致する会場を近い順に返すこと() {
    let venues = vec![
        Venue::new("1", "Far Hall", "BSD", Sport::Badminton).with_distance_km(7.0),
        Venue::new("2", "Court", "BSD", Sport::Basketball).with_distance_km(1.0),
        Venue::new("3", "Near Hall", "BSD", Sport::Badminton).with_distance_km(2.5),
    ];
    let search = filled_search();
    assert!(search.is_ready());

    let result = search.search(&venues).unwrap();

    assert_eq!(result.activity, "Open Play");
    assert_eq!(result.location, "Tangerang");
    let ids: Vec<&str> = result.venues.iter().map(|venue| venue.get_id()).collect();
    assert_eq!(ids, vec!["3", "1"]);
}

#[test]
fn test_choose_一覧に無い選択肢は異常系() {
    let today = today();
    let search = ExploreSearch::default();

    assert_eq!(
        search.choose(SearchCriterion::Location("Bandung".to_string()), &today),
        Err(BookingError::UnknownSearchOption {
            kind: "location",
            value: "Bandung".to_string()
        })
    );
    assert_eq!(
        search.choose(
            SearchCriterion::Time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            &today
        ),
        Err(BookingError::InvalidTime("09:00".to_string()))
    );
}

#[test]
fn test_choose_日付は今日から7日間だけ選べること() {
    let today = today();
    let search = ExploreSearch::default();
    let last = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
    let too_far = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
    let yesterday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

    assert!(search.choose(SearchCriterion::Date(today), &today).is_ok());
    assert!(search.choose(SearchCriterion::Date(last), &today).is_ok());
    assert_eq!(
        search.choose(SearchCriterion::Date(too_far), &today),
        Err(BookingError::UnselectableDate(too_far))
    );
    assert_eq!(
        search.choose(SearchCriterion::Date(yesterday), &today),
        Err(BookingError::UnselectableDate(yesterday))
    );
}

#[test]
fn test_time_options_2時間おき() {
    let hours: Vec<u32> = time_options().iter().map(|time| time.hour()).collect();
    assert_eq!(hours, vec![8, 10, 12, 14, 16, 18, 20]);
}
