use crate::adapter::presenter::booking_view::render_venue_line;
use crate::entity::chat::{Chat, ChatInbox};
use crate::entity::datetime::{format_long_date, format_short_date};
use crate::entity::profile::SportProfile;
use crate::entity::search::{ExploreSearch, SearchResult};

#[cfg(test)]
use crate::entity::chat::ChatMessage;
#[cfg(test)]
use crate::entity::profile::SkillLevel;
#[cfg(test)]
use crate::entity::search::SearchCriterion;
#[cfg(test)]
use crate::entity::venue::{Sport, Venue};
#[cfg(test)]
use chrono::{NaiveDate, NaiveTime};

pub fn render_profile(profile: &SportProfile) -> Vec<String> {
    let mut lines = vec!["My Sports".to_string()];

    if profile.get_sports().is_empty() {
        lines.push("  (none)".to_string());
    }
    for (i, sport) in profile.get_sports().iter().enumerate() {
        lines.push(format!(
            "  {}. {} - {}",
            i + 1,
            sport.get_sport(),
            sport.get_skill_level()
        ));
    }

    let available = profile.available_sports();
    if !available.is_empty() {
        let names: Vec<String> = available.iter().map(|sport| sport.to_string()).collect();
        lines.push(format!("Can add: {}", names.join(", ")));
    }
    lines
}

pub fn render_chats(inbox: &ChatInbox) -> Vec<String> {
    if inbox.get_chats().is_empty() {
        return vec!["No chats".to_string()];
    }

    inbox
        .get_chats()
        .iter()
        .map(|chat| {
            let community = if chat.is_community() { " [community]" } else { "" };
            let unread = if chat.get_unread() > 0 {
                format!(" ({})", chat.get_unread())
            } else {
                String::new()
            };
            format!(
                "{}: {}{}{}  {}  {}",
                chat.get_id(),
                chat.get_name(),
                community,
                unread,
                chat.get_last_message(),
                chat.get_time()
            )
        })
        .collect()
}

// 自分の発言は右寄せの代わりに > を付ける
pub fn render_chat(chat: &Chat) -> Vec<String> {
    let mut lines = vec![chat.get_name().to_string()];

    for message in chat.get_messages().iter() {
        if message.is_me() {
            lines.push(format!("  > {}  {}", message.get_text(), message.get_time()));
        } else {
            lines.push(format!(
                "  {}: {}  {}",
                message.get_sender(),
                message.get_text(),
                message.get_time()
            ));
        }
    }
    lines
}

pub fn render_search(search: &ExploreSearch) -> Vec<String> {
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        format!("Activity: {}", or_dash(search.get_activity().map(|s| s.to_string()))),
        format!("Location: {}", or_dash(search.get_location().map(|s| s.to_string()))),
        format!("Sport:    {}", or_dash(search.get_sport().map(|s| s.to_string()))),
        format!("Date:     {}", or_dash(search.get_date().map(|d| format_short_date(&d)))),
        format!(
            "Time:     {}",
            or_dash(search.get_time().map(|t| t.format("%H:%M").to_string()))
        ),
    ];

    if search.is_ready() {
        lines.push("Ready: `search`".to_string());
    }
    lines
}

pub fn render_search_result(result: &SearchResult) -> Vec<String> {
    let mut lines = vec![format!(
        "{} / {} venues in {} for {} at {}",
        result.activity,
        result.sport,
        result.location,
        format_long_date(&result.date),
        result.time.format("%H:%M")
    )];

    if result.venues.is_empty() {
        lines.push("No venues".to_string());
    }
    lines.extend(result.venues.iter().map(|venue| render_venue_line(venue)));
    lines
}

#[test]
fn test_render_profile_番号付きでレベルを表示すること() {
    let profile = SportProfile::default().set_skill_level(Sport::Tennis, SkillLevel::Advanced);

    assert_eq!(
        render_profile(&profile),
        vec![
            "My Sports",
            "  1. Badminton - Intermediate",
            "  2. Tennis - Advanced",
            "  3. Mini Soccer - Advanced",
            "Can add: Basketball, Football",
        ]
    );
}

#[test]
fn test_render_chat_自分の発言を区別すること() {
    let chat = Chat::new("d1", "Budi Santoso").with_messages(vec![
        ChatMessage::new("d1m1", "Jadi main?", "Budi Santoso", "12:40 PM"),
        ChatMessage::new("d1m2", "Jadi", "You", "Just now"),
    ]);

    assert_eq!(
        render_chat(&chat),
        vec!["Budi Santoso", "  Budi Santoso: Jadi main?  12:40 PM", "  > Jadi  Just now"]
    );
}

#[test]
fn test_render_chats_未読数とコミュニティの印() {
    let inbox = ChatInbox::new(vec![Chat::new("c1", "Futsal Jakarta Barat")
        .with_last_message("Ada yang mau main?", "10:30 AM")
        .with_unread(3)
        .with_is_community(true)]);

    assert_eq!(
        render_chats(&inbox),
        vec!["c1: Futsal Jakarta Barat [community] (3)  Ada yang mau main?  10:30 AM"]
    );
}

#[test]
fn test_render_search_未選択の項目はハイフン() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let search = ExploreSearch::default()
        .choose(SearchCriterion::Time(NaiveTime::from_hms_opt(8, 0, 0).unwrap()), &today)
        .unwrap();

    let actual = render_search(&search);

    assert_eq!(actual[0], "Activity: -");
    assert_eq!(actual[4], "Time:     08:00");
    assert_eq!(actual.len(), 5);
}

#[test]
fn test_render_search_result_見出しと会場() {
    let venues = vec![Venue::new("4", "Royal Badminton", "Serpong", Sport::Badminton)
        .with_rating(4.5)
        .with_distance_km(3.0)];
    let result = SearchResult {
        activity: "Sparring".to_string(),
        location: "Tangerang".to_string(),
        sport: Sport::Badminton,
        date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
        time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        venues: venues.iter().collect(),
    };

    assert_eq!(
        render_search_result(&result),
        vec![
            "Sparring / Badminton venues in Tangerang for Wednesday, 12 Mar 2025 at 14:00",
            "4: Royal Badminton (Serpong, Badminton) ★4.5 3.0 km",
        ]
    );
}
