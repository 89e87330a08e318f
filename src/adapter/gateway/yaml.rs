use crate::entity::account::GuestAccount;
use crate::entity::booking::PaymentReceipt;
use crate::entity::chat::{Chat, ChatMessage};
use crate::entity::datetime::{format_24_hour, format_long_date};
use crate::entity::payment_method::PaymentMethodOption;
use crate::entity::venue::{read_sport, Venue};
use crate::error::BookingError;
use linked_hash_map::LinkedHashMap;
use yaml_rust::{Yaml, YamlEmitter};

#[cfg(test)]
use crate::entity::booking::{PaymentHandoff, ReviewHandoff};
#[cfg(test)]
use crate::entity::venue::Sport;
#[cfg(test)]
use chrono::NaiveDate;
#[cfg(test)]
use yaml_rust::YamlLoader;

fn parse_error(path: &str, message: String) -> BookingError {
    BookingError::FixtureParse {
        path: path.to_string(),
        message,
    }
}

// 数字だけのidはクォート無しでも読めるようにする
fn yaml_to_string(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::String(s) => Some(s.to_string()),
        Yaml::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

fn yaml_to_f64(yaml: &Yaml) -> Option<f64> {
    yaml.as_f64().or_else(|| yaml.as_i64().map(|i| i as f64))
}

pub fn yaml_to_venue(yaml: &Yaml, path: &str) -> Result<Venue, BookingError> {
    let id = yaml_to_string(&yaml["id"])
        .ok_or_else(|| parse_error(path, "venue without id".to_string()))?;
    let name = yaml["name"]
        .as_str()
        .ok_or_else(|| parse_error(path, format!("venue {} without name", id)))?;
    let sport_str = yaml["sport"].as_str().unwrap_or("");
    let sport = read_sport(sport_str)
        .ok_or_else(|| parse_error(path, format!("unknown sport: {:?}", sport_str)))?;

    let venue = Venue::new(&id, name, yaml["location"].as_str().unwrap_or(""), sport)
        .with_address(yaml["address"].as_str().unwrap_or(""))
        .with_rating(yaml_to_f64(&yaml["rating"]).unwrap_or(0.0))
        .with_distance_km(yaml_to_f64(&yaml["distance_km"]).unwrap_or(0.0))
        .with_is_new(yaml["is_new"].as_bool().unwrap_or(false));

    Ok(venue)
}

#[test]
fn test_yaml_to_venue_全てのキーが読めること() {
    let s = "
id: '1'
name: 'Rekket Space Badminton Hall'
location: 'Rawa Buntu'
address: 'Jalan Buaran viktor, BSD'
sport: 'Badminton'
rating: 4.8
distance_km: 2.5
is_new: true
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_venue(&docs[0], "test").unwrap();

    let expected = Venue::new("1", "Rekket Space Badminton Hall", "Rawa Buntu", Sport::Badminton)
        .with_address("Jalan Buaran viktor, BSD")
        .with_rating(4.8)
        .with_distance_km(2.5)
        .with_is_new(true);
    assert_eq!(actual, expected);
}

#[test]
fn test_yaml_to_venue_省略可能なキーが無い場合は既定値になること() {
    let s = "
id: 7
name: 'Royal Badminton'
sport: 'badminton'
rating: 5
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_venue(&docs[0], "test").unwrap();

    let expected = Venue::new("7", "Royal Badminton", "", Sport::Badminton).with_rating(5.0);
    assert_eq!(actual, expected);
}

#[test]
fn test_yaml_to_venue_sportが不正な時は異常系() {
    let s = "
id: '1'
name: 'Ice Rink'
sport: 'curling'
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_venue(&docs[0], "venue.yaml");

    assert!(matches!(actual, Err(BookingError::FixtureParse { .. })));
}

pub fn yaml_to_payment_method(yaml: &Yaml, path: &str) -> Result<PaymentMethodOption, BookingError> {
    let id = yaml["id"]
        .as_str()
        .ok_or_else(|| parse_error(path, "payment method without id".to_string()))?;
    let name = yaml["name"].as_str().unwrap_or(id);
    let fee = yaml["fee"].as_i64().unwrap_or(0);

    let mut option = PaymentMethodOption::new(id, name, fee);
    if yaml["expandable"].as_bool().unwrap_or(false) {
        option = option.expandable();
    }
    if let Some(reason) = yaml["disabled_reason"].as_str() {
        option = option.disabled(reason);
    }

    Ok(option)
}

#[test]
fn test_yaml_to_payment_method_disabled_reasonがあれば利用不可() {
    let s = "
id: 'ovo'
name: 'OVO'
fee: 3478
disabled_reason: 'OVO is Currently under maintenance'
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_payment_method(&docs[0], "test").unwrap();

    assert!(!actual.is_enabled());
    assert_eq!(actual.get_fee(), 3478);
    assert_eq!(
        actual.get_disabled_reason(),
        Some("OVO is Currently under maintenance")
    );
}

#[test]
fn test_yaml_to_payment_method_nameが無い場合はidを使うこと() {
    let s = "
id: 'qris'
expandable: true
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_payment_method(&docs[0], "test").unwrap();

    assert_eq!(actual, PaymentMethodOption::new("qris", "qris", 0).expandable());
}

pub fn yaml_to_guest_account(yaml: &Yaml) -> Option<GuestAccount> {
    match (yaml["email"].as_str(), yaml["password"].as_str()) {
        (Some(email), Some(password)) => Some(GuestAccount::new(email, password)),
        _ => None,
    }
}

pub fn yaml_to_chat(yaml: &Yaml, path: &str) -> Result<Chat, BookingError> {
    let id = yaml_to_string(&yaml["id"])
        .ok_or_else(|| parse_error(path, "chat without id".to_string()))?;
    let name = yaml["name"].as_str().unwrap_or(&id).to_string();

    let mut messages = vec![];
    for (i, message_yaml) in yaml["messages"].as_vec().unwrap_or(&vec![]).iter().enumerate() {
        let text = message_yaml["text"]
            .as_str()
            .ok_or_else(|| parse_error(path, format!("message in chat {} without text", id)))?;
        let message_id =
            yaml_to_string(&message_yaml["id"]).unwrap_or_else(|| format!("{}m{}", id, i + 1));
        messages.push(ChatMessage::new(
            &message_id,
            text,
            message_yaml["sender"].as_str().unwrap_or(""),
            message_yaml["time"].as_str().unwrap_or(""),
        ));
    }

    let unread = yaml["unread"].as_i64().unwrap_or(0).max(0) as u32;
    let chat = Chat::new(&id, &name)
        .with_last_message(
            yaml["last_message"].as_str().unwrap_or(""),
            yaml["time"].as_str().unwrap_or(""),
        )
        .with_unread(unread)
        .with_is_community(yaml["is_community"].as_bool().unwrap_or(false))
        .with_messages(messages);

    Ok(chat)
}

#[test]
fn test_yaml_to_chat_自分の発言が判別できること() {
    let s = "
id: 'd1'
name: 'Budi Santoso'
last_message: 'Jadi main futsal nanti malam?'
time: '12:45 PM'
unread: 2
messages:
  - id: 'd1m1'
    text: 'Halo'
    sender: 'Budi Santoso'
    time: '12:40 PM'
  - text: 'Jadi'
    sender: 'You'
    time: '12:45 PM'
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_chat(&docs[0], "test").unwrap();

    assert_eq!(actual.get_unread(), 2);
    assert!(!actual.is_community());
    assert_eq!(actual.get_messages().len(), 2);
    assert!(!actual.get_messages()[0].is_me());
    assert!(actual.get_messages()[1].is_me());
    // idが無いメッセージは連番で補う
    assert_eq!(actual.get_messages()[1].get_id(), "d1m2");
}

#[test]
fn test_yaml_to_chat_本文の無いメッセージは異常系() {
    let s = "
id: 'c1'
messages:
  - sender: 'Ahmad'
";
    let docs = YamlLoader::load_from_str(s).unwrap();

    assert!(matches!(
        yaml_to_chat(&docs[0], "chats.yaml"),
        Err(BookingError::FixtureParse { .. })
    ));
}

fn entry(hash: &mut LinkedHashMap<Yaml, Yaml>, key: &str, value: Yaml) {
    hash.insert(Yaml::String(key.to_string()), value);
}

pub fn receipt_to_yaml(receipt: &PaymentReceipt) -> Yaml {
    let mut slots = vec![];
    for booked in receipt.get_booked_slots().iter() {
        let mut slot_hash = LinkedHashMap::new();
        entry(
            &mut slot_hash,
            "booking_id",
            Yaml::String(booked.get_booking_id().to_string()),
        );
        entry(
            &mut slot_hash,
            "start_time",
            Yaml::String(format_24_hour(&booked.get_slot().get_start())),
        );
        entry(
            &mut slot_hash,
            "end_time",
            Yaml::String(format_24_hour(&booked.get_slot().get_end())),
        );
        entry(
            &mut slot_hash,
            "price",
            Yaml::Integer(booked.get_slot().get_price()),
        );
        slots.push(Yaml::Hash(slot_hash));
    }

    let mut receipt_hash = LinkedHashMap::new();
    entry(
        &mut receipt_hash,
        "order_id",
        Yaml::String(receipt.get_order_id().to_string()),
    );
    entry(
        &mut receipt_hash,
        "payment_method",
        Yaml::String(receipt.get_payment_method().get_id().to_string()),
    );
    entry(
        &mut receipt_hash,
        "venue",
        Yaml::String(receipt.get_venue_name().to_string()),
    );
    entry(
        &mut receipt_hash,
        "date",
        Yaml::String(format_long_date(&receipt.get_selected_date())),
    );
    entry(&mut receipt_hash, "booking_slots", Yaml::Array(slots));
    entry(&mut receipt_hash, "subtotal", Yaml::Integer(receipt.get_subtotal()));
    entry(&mut receipt_hash, "fee", Yaml::Integer(receipt.get_fee()));
    entry(
        &mut receipt_hash,
        "total_payment",
        Yaml::Integer(receipt.get_total_payment()),
    );

    let mut doc_hash = LinkedHashMap::new();
    entry(&mut doc_hash, "receipt", Yaml::Hash(receipt_hash));
    Yaml::Hash(doc_hash)
}

pub fn dump_yaml(doc: &Yaml) -> String {
    let mut out_str = String::new();
    let mut emitter = YamlEmitter::new(&mut out_str);

    match emitter.dump(doc) {
        Ok(()) => {}
        Err(err) => {
            log::warn!("failed to emit yaml: {:?}", err);
        }
    }

    out_str += "\n";
    out_str
}

#[test]
fn test_receipt_to_yaml_読み直すと同じ金額になること() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();
    let review = ReviewHandoff {
        venue_name: "Rekket Space BSD".to_string(),
        selected_date: date,
        start_time: date.and_hms_opt(10, 0, 0).unwrap(),
        end_time: date.and_hms_opt(12, 0, 0).unwrap(),
        total_price: 118_000,
    };
    let payment = PaymentHandoff {
        payment_method: "alfamart".to_string(),
        total_price: 118_000,
    };
    let method = PaymentMethodOption::new("alfamart", "Alfamart", 6500);
    let receipt = PaymentReceipt::issue(&review, &payment, &method, "5", &review.selected_date);

    let dumped = dump_yaml(&receipt_to_yaml(&receipt));
    let docs = YamlLoader::load_from_str(&dumped).unwrap();
    let receipt_yaml = &docs[0]["receipt"];

    assert_eq!(receipt_yaml["payment_method"].as_str(), Some("alfamart"));
    assert_eq!(receipt_yaml["date"].as_str(), Some("Tuesday, 8 Apr 2025"));
    assert_eq!(receipt_yaml["booking_slots"].as_vec().map(|v| v.len()), Some(2));
    assert_eq!(
        receipt_yaml["booking_slots"][1]["start_time"].as_str(),
        Some("11:00")
    );
    assert_eq!(receipt_yaml["total_payment"].as_i64(), Some(124_500));
}
