use crate::entity::datetime::{read_meridiem, to_12_hour};
use crate::entity::profile::{read_skill_level, SkillLevel};
use crate::entity::search::SearchCriterion;
use crate::entity::time_selector::{TimeChoice, TimeField, TimePick};
use crate::entity::venue::{read_category, read_sport, CategoryFilter, Sport};
use crate::error::BookingError;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

#[cfg(test)]
use crate::entity::datetime::Meridiem;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Login { email: String, password: String },
    Venues { filter: CategoryFilter, only_new: bool },
    Venue(String),
    Book(String),
    NextMonth,
    PrevMonth,
    Day(u32),
    Start(TimePick),
    End(TimePick),
    Choose(TimeField, TimeChoice),
    Continue,
    Methods,
    Method(String),
    Pay,
    Back,
    Directions,
    Profile,
    AddSports(Vec<Sport>),
    RemoveSport(Sport),
    MoveSportUp(usize),
    MoveSportDown(usize),
    SetSkillLevel(Sport, SkillLevel),
    Chats,
    OpenChat(String),
    Say(String),
    Find(SearchCriterion),
    Search,
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP_LINES: [&str; 22] = [
    "login <email> <password>",
    "venues [all|football|basketball|badminton|tennis|mini soccer]",
    "new                      new venues only",
    "venue <id>               show a venue",
    "book <id>                start booking a venue",
    "prev | next              move the calendar by a month",
    "date <day>               pick a day of the shown month",
    "start <h:mm> <AM|PM>     set start time (end = start + 1 hour)",
    "end <h:mm> <AM|PM>       set end time",
    "hour|minute|ampm <start|end> <value>",
    "continue                 go to the next step",
    "method <id>              choose a payment method",
    "pay                      pay with the chosen method",
    "back                     go back one step",
    "directions | show | help | q",
    "profile                  show your sports",
    "sport add <sport>, ...   add sports (start as Beginner)",
    "sport rm <sport> | sport up <n> | sport down <n>",
    "sport level <sport> <beginner|intermediate|advanced|professional>",
    "chats | chat <id>        list chats, open one",
    "say <text>               send to the open chat",
    "find activity|location|sport|date|time <value>, then `search`",
];

fn regex(pattern: &str) -> Result<Regex, BookingError> {
    Regex::new(pattern).map_err(|err| BookingError::InvalidPattern(err.to_string()))
}

#[test]
fn test_regex_不正なパターンは時刻のエラーにしないこと() {
    assert!(matches!(regex("("), Err(BookingError::InvalidPattern(_))));
}

// "9:30 AM" / "9:30am" / "12:00 pm"
pub fn parse_time_pick(s: &str) -> Result<TimePick, BookingError> {
    let re = regex(r"^(\d{1,2}):(\d{2})\s*([AaPp][Mm])$")?;
    let caps = re
        .captures(s.trim())
        .ok_or_else(|| BookingError::InvalidTime(s.to_string()))?;

    let hour: u32 = caps[1]
        .parse()
        .map_err(|_| BookingError::InvalidTime(s.to_string()))?;
    let minute: u32 = caps[2]
        .parse()
        .map_err(|_| BookingError::InvalidTime(s.to_string()))?;
    let meridiem =
        read_meridiem(&caps[3]).ok_or_else(|| BookingError::InvalidTime(s.to_string()))?;

    TimePick::new(hour, minute, meridiem)
}

// "14:30"
pub fn parse_24_hour_pick(s: &str) -> Result<TimePick, BookingError> {
    let re = regex(r"^(\d{1,2}):(\d{2})$")?;
    let caps = re
        .captures(s.trim())
        .ok_or_else(|| BookingError::InvalidTime(s.to_string()))?;

    let hour24: u32 = caps[1]
        .parse()
        .map_err(|_| BookingError::InvalidTime(s.to_string()))?;
    let minute: u32 = caps[2]
        .parse()
        .map_err(|_| BookingError::InvalidTime(s.to_string()))?;
    if hour24 > 23 {
        return Err(BookingError::InvalidTime(s.to_string()));
    }

    let (hour, meridiem) = to_12_hour(hour24);
    TimePick::new(hour, minute, meridiem)
}

#[test]
#[allow(non_snake_case)]
fn test_parse_time_pick_AMPMの表記揺れを許すこと() {
    let expected = TimePick::new(9, 30, Meridiem::Am).unwrap();
    assert_eq!(parse_time_pick("9:30 AM"), Ok(expected));
    assert_eq!(parse_time_pick("09:30am"), Ok(expected));
    assert_eq!(
        parse_time_pick("12:15 pm"),
        Ok(TimePick::new(12, 15, Meridiem::Pm).unwrap())
    );
}

#[test]
fn test_parse_time_pick_異常系() {
    assert_eq!(
        parse_time_pick("9:30"),
        Err(BookingError::InvalidTime("9:30".to_string()))
    );
    assert_eq!(parse_time_pick("9:20 AM"), Err(BookingError::InvalidMinute(20)));
    assert_eq!(parse_time_pick("13:00 PM"), Err(BookingError::InvalidHour(13)));
}

#[test]
fn test_parse_24_hour_pick_正常系() {
    assert_eq!(
        parse_24_hour_pick("14:30"),
        Ok(TimePick::new(2, 30, Meridiem::Pm).unwrap())
    );
    assert_eq!(
        parse_24_hour_pick("00:00"),
        Ok(TimePick::new(12, 0, Meridiem::Am).unwrap())
    );
    assert_eq!(
        parse_24_hour_pick("24:00"),
        Err(BookingError::InvalidTime("24:00".to_string()))
    );
}

fn read_field(s: &str) -> Option<TimeField> {
    match s.to_lowercase().as_str() {
        "start" | "開始" => Some(TimeField::Start),
        "end" | "終了" => Some(TimeField::End),
        _ => None,
    }
}

fn parse_choice(kind: &str, tokens: &[&str]) -> Result<Command, BookingError> {
    let (field_str, value) = match tokens {
        [field, value] => (*field, *value),
        _ => return Err(BookingError::InvalidTime(tokens.join(" "))),
    };
    let field = read_field(field_str).ok_or_else(|| BookingError::InvalidTime(field_str.to_string()))?;
    let number = || {
        value
            .parse::<u32>()
            .map_err(|_| BookingError::InvalidTime(value.to_string()))
    };

    let choice = match kind {
        "hour" => TimeChoice::Hour(number()?),
        "minute" => TimeChoice::Minute(number()?),
        _ => TimeChoice::Meridiem(
            read_meridiem(value).ok_or_else(|| BookingError::InvalidTime(value.to_string()))?,
        ),
    };

    Ok(Command::Choose(field, choice))
}

// "add badminton, mini soccer" / "rm tennis" / "up 2" / "level tennis pro"
fn parse_sport_command(rest: &[&str]) -> Option<Command> {
    let (action, args) = rest.split_first()?;

    match *action {
        "add" => {
            let joined = args.join(" ");
            let mut sports = vec![];
            for name in joined.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
                sports.push(read_sport(name)?);
            }
            Some(Command::AddSports(sports))
        }
        "rm" | "remove" => read_sport(&args.join(" ")).map(Command::RemoveSport),
        "up" | "down" => {
            let position = match args {
                [n] => n.parse::<usize>().ok().filter(|n| *n > 0)?,
                _ => return None,
            };
            if *action == "up" {
                Some(Command::MoveSportUp(position))
            } else {
                Some(Command::MoveSportDown(position))
            }
        }
        "level" => {
            let (level, sport_words) = args.split_last()?;
            let sport = read_sport(&sport_words.join(" "))?;
            Some(Command::SetSkillLevel(sport, read_skill_level(level)?))
        }
        _ => None,
    }
}

// "date 2025-03-12" / "time 14:00"
fn parse_criterion(rest: &[&str]) -> Result<Option<SearchCriterion>, BookingError> {
    let (kind, args) = match rest.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };
    let value = args.join(" ");
    if value.is_empty() {
        return Ok(None);
    }

    let criterion = match *kind {
        "activity" => SearchCriterion::Activity(value),
        "location" => SearchCriterion::Location(value),
        "sport" => match read_sport(&value) {
            Some(sport) => SearchCriterion::Sport(sport),
            None => return Ok(None),
        },
        "date" => match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
            Ok(date) => SearchCriterion::Date(date),
            Err(_) => return Ok(None),
        },
        "time" => {
            let time = NaiveTime::parse_from_str(&value, "%H:%M")
                .map_err(|_| BookingError::InvalidTime(value.to_string()))?;
            SearchCriterion::Time(time)
        }
        _ => return Ok(None),
    };

    Ok(Some(criterion))
}

pub fn parse_command(untrimmed_line: &str) -> Result<Command, BookingError> {
    // 整形
    let re = regex(r"\s+")?;
    let line: String = re.replace_all(untrimmed_line, " ").trim().to_string();

    if line.is_empty() {
        return Ok(Command::Empty);
    }

    let tokens: Vec<&str> = line.split(' ').collect();
    let rest = &tokens[1..];

    let command = match tokens[0] {
        "入" | "login" => match rest {
            [email, password] => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            _ => Command::Unknown(line.clone()),
        },
        "一覧" | "venues" | "ls" => {
            let category = rest.join(" ");
            let filter = if category.is_empty() {
                Some(CategoryFilter::All)
            } else {
                read_category(&category)
            };
            match filter {
                Some(filter) => Command::Venues {
                    filter,
                    only_new: false,
                },
                None => Command::Unknown(line.clone()),
            }
        }
        "新" | "new" => Command::Venues {
            filter: CategoryFilter::All,
            only_new: true,
        },
        "見" | "venue" => match rest {
            [id] => Command::Venue(id.to_string()),
            _ => Command::Unknown(line.clone()),
        },
        "予" | "book" => match rest {
            [id] => Command::Book(id.to_string()),
            _ => Command::Unknown(line.clone()),
        },
        "次" | "next" => Command::NextMonth,
        "前" | "prev" => Command::PrevMonth,
        "日" | "date" => match rest {
            [day] => match day.parse::<u32>() {
                Ok(day) => Command::Day(day),
                Err(_) => Command::Unknown(line.clone()),
            },
            _ => Command::Unknown(line.clone()),
        },
        "始" | "start" => Command::Start(parse_time_pick(&rest.join(" "))?),
        "終" | "end" => Command::End(parse_time_pick(&rest.join(" "))?),
        "hour" | "minute" | "ampm" => parse_choice(tokens[0], rest)?,
        "進" | "continue" | "c" => Command::Continue,
        "方法" | "methods" => Command::Methods,
        "選" | "method" => match rest {
            [id] => Command::Method(id.to_string()),
            _ => Command::Unknown(line.clone()),
        },
        "払" | "pay" => Command::Pay,
        "戻" | "back" => Command::Back,
        "道" | "directions" => Command::Directions,
        "profile" | "me" => Command::Profile,
        "sport" => parse_sport_command(rest).unwrap_or_else(|| Command::Unknown(line.clone())),
        "chats" => Command::Chats,
        "chat" => match rest {
            [id] => Command::OpenChat(id.to_string()),
            _ => Command::Unknown(line.clone()),
        },
        "say" => Command::Say(rest.join(" ")),
        "find" => match parse_criterion(rest)? {
            Some(criterion) => Command::Find(criterion),
            None => Command::Unknown(line.clone()),
        },
        "search" => Command::Search,
        "表" | "show" => Command::Show,
        "助" | "help" | "?" => Command::Help,
        "q" | "quit" => Command::Quit,
        _ => Command::Unknown(line.clone()),
    };

    Ok(command)
}

#[test]
fn test_parse_command_空白は詰められること() {
    assert_eq!(parse_command("  book    5 "), Ok(Command::Book("5".to_string())));
    assert_eq!(parse_command("   "), Ok(Command::Empty));
}

#[test]
fn test_parse_command_日本語の別名() {
    assert_eq!(parse_command("次"), Ok(Command::NextMonth));
    assert_eq!(parse_command("日 12"), Ok(Command::Day(12)));
}

#[test]
fn test_parse_command_時刻の指定() {
    assert_eq!(
        parse_command("start 2:30 PM"),
        Ok(Command::Start(TimePick::new(2, 30, Meridiem::Pm).unwrap()))
    );
    assert_eq!(
        parse_command("minute end 45"),
        Ok(Command::Choose(TimeField::End, TimeChoice::Minute(45)))
    );
    assert_eq!(
        parse_command("ampm start pm"),
        Ok(Command::Choose(TimeField::Start, TimeChoice::Meridiem(Meridiem::Pm)))
    );
}

#[test]
fn test_parse_command_カテゴリ指定() {
    assert_eq!(
        parse_command("venues mini soccer"),
        Ok(Command::Venues {
            filter: CategoryFilter::Only(Sport::MiniSoccer),
            only_new: false,
        })
    );
}

#[test]
fn test_parse_command_不明なカテゴリは全件表示にしないこと() {
    assert_eq!(
        parse_command("venues curling"),
        Ok(Command::Unknown("venues curling".to_string()))
    );
    assert_eq!(
        parse_command("venues"),
        Ok(Command::Venues {
            filter: CategoryFilter::All,
            only_new: false,
        })
    );
}

#[test]
fn test_parse_command_不明なコマンド() {
    assert_eq!(
        parse_command("dance"),
        Ok(Command::Unknown("dance".to_string()))
    );
    assert_eq!(
        parse_command("date tomorrow"),
        Ok(Command::Unknown("date tomorrow".to_string()))
    );
}

#[test]
fn test_parse_command_スポーツの追加はカンマ区切り() {
    assert_eq!(
        parse_command("sport add basketball, mini soccer"),
        Ok(Command::AddSports(vec![Sport::Basketball, Sport::MiniSoccer]))
    );
    assert_eq!(parse_command("sport add"), Ok(Command::AddSports(vec![])));
    assert_eq!(
        parse_command("sport add basketball, curling"),
        Ok(Command::Unknown("sport add basketball, curling".to_string()))
    );
}

#[test]
fn test_parse_command_スポーツの並べ替えとレベル() {
    assert_eq!(parse_command("sport up 2"), Ok(Command::MoveSportUp(2)));
    assert_eq!(parse_command("sport down 1"), Ok(Command::MoveSportDown(1)));
    assert_eq!(
        parse_command("sport up 0"),
        Ok(Command::Unknown("sport up 0".to_string()))
    );
    assert_eq!(
        parse_command("sport rm mini soccer"),
        Ok(Command::RemoveSport(Sport::MiniSoccer))
    );
    assert_eq!(
        parse_command("sport level mini soccer Professional"),
        Ok(Command::SetSkillLevel(Sport::MiniSoccer, SkillLevel::Professional))
    );
}

#[test]
fn test_parse_command_チャットへの送信() {
    assert_eq!(parse_command("chat c1"), Ok(Command::OpenChat("c1".to_string())));
    assert_eq!(
        parse_command("say  sampai   besok "),
        Ok(Command::Say("sampai besok".to_string()))
    );
    assert_eq!(parse_command("say"), Ok(Command::Say(String::new())));
}

#[test]
fn test_parse_command_検索条件() {
    assert_eq!(
        parse_command("find location Jakarta Barat"),
        Ok(Command::Find(SearchCriterion::Location("Jakarta Barat".to_string())))
    );
    assert_eq!(
        parse_command("find date 2025-03-12"),
        Ok(Command::Find(SearchCriterion::Date(
            NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
        )))
    );
    assert_eq!(
        parse_command("find time 14:00"),
        Ok(Command::Find(SearchCriterion::Time(
            NaiveTime::from_hms_opt(14, 0, 0).unwrap()
        )))
    );
    assert_eq!(
        parse_command("find time 2pm"),
        Err(BookingError::InvalidTime("2pm".to_string()))
    );
    assert_eq!(
        parse_command("find weather sunny"),
        Ok(Command::Unknown("find weather sunny".to_string()))
    );
}
