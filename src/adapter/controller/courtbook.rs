use chrono::{DateTime, Local};
use courtbook::adapter::controller::command::{parse_command, Command, HELP_LINES};
use courtbook::adapter::gateway::config::Config;
use courtbook::adapter::gateway::directions::open_directions;
use courtbook::adapter::gateway::venue_repository::VenueRepository;
use courtbook::adapter::gateway::yaml::{dump_yaml, receipt_to_yaml};
use courtbook::adapter::presenter::booking_view::{
    render_stage, render_venue_detail, render_venue_line,
};
use courtbook::adapter::presenter::community_view::{
    render_chat, render_chats, render_profile, render_search, render_search_result,
};
use courtbook::adapter::presenter::line_editor::LineEditor;
use courtbook::application::booking_flow::{BackOutcome, BookingFlow, FlowStage};
use courtbook::application::interface::VenueRepositoryTrait;
use courtbook::entity::chat::ChatInbox;
use courtbook::entity::profile::SportProfile;
use courtbook::entity::search::ExploreSearch;
use courtbook::entity::venue::filter_venues;
use courtbook::error::BookingError;
use std::io::{self, stdin, stdout, Stdout, Write};
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::{IntoRawMode, RawTerminal};
use termion::style;

#[cfg(test)]
use chrono::TimeZone;
#[cfg(test)]
use courtbook::entity::venue::CategoryFilter;

const MAX_COL: u16 = 999;
const HEADER: &str = "courtbook>";

#[derive(Default)]
struct Session {
    styled: bool,
    logged_in_email: Option<String>,
    venue_id: Option<String>,
    flow: Option<BookingFlow>,
    profile: SportProfile,
    // 最初に開いた時にリポジトリから読む
    inbox: Option<ChatInbox>,
    search: ExploreSearch,
}

impl Session {
    fn flow_mut(&mut self, action: &'static str) -> Result<&mut BookingFlow, BookingError> {
        self.flow.as_mut().ok_or(BookingError::WrongStage {
            action,
            stage: "Venue List",
        })
    }

    fn require_login(&self) -> Result<(), BookingError> {
        match self.logged_in_email {
            Some(_) => Ok(()),
            None => Err(BookingError::NotLoggedIn),
        }
    }

    fn inbox_mut(&mut self, repository: &dyn VenueRepositoryTrait) -> &mut ChatInbox {
        self.inbox
            .get_or_insert_with(|| ChatInbox::new(repository.get_chats().clone()))
    }

    fn render_current(&self) -> Vec<String> {
        match &self.flow {
            Some(flow) => render_stage(flow.current(), self.styled),
            None => vec!["No booking in progress. Try `venues` and `book <id>`".to_string()],
        }
    }
}

fn execute(
    repository: &dyn VenueRepositoryTrait,
    session: &mut Session,
    command: Command,
) -> Result<Vec<String>, BookingError> {
    match command {
        Command::Login { email, password } => {
            let account = repository
                .get_guest_account()
                .ok_or(BookingError::InvalidCredentials)?;
            account.authenticate(&email, &password)?;

            log::info!("logged in as {}", email);
            let lines = vec![format!("Logged in as {}", email)];
            session.logged_in_email = Some(email);
            Ok(lines)
        }
        Command::Venues { filter, only_new } => {
            let venues = filter_venues(repository.get_all_venues(), filter, only_new);
            if venues.is_empty() {
                return Ok(vec!["No venues".to_string()]);
            }
            Ok(venues.iter().map(|venue| render_venue_line(venue)).collect())
        }
        Command::Venue(id) => {
            let venue = repository
                .get_by_id(&id)
                .ok_or(BookingError::UnknownVenue(id))?;
            Ok(render_venue_detail(venue))
        }
        Command::Book(id) => {
            session.require_login()?;
            let venue = repository
                .get_by_id(&id)
                .ok_or_else(|| BookingError::UnknownVenue(id.to_string()))?;

            session.flow = Some(BookingFlow::start(venue, &repository.get_today()));
            session.venue_id = Some(id);
            Ok(session.render_current())
        }
        Command::NextMonth => {
            session
                .flow_mut("change the month")?
                .update_schedule(|stage| Ok(stage.show_next_month()))?;
            Ok(session.render_current())
        }
        Command::PrevMonth => {
            session
                .flow_mut("change the month")?
                .update_schedule(|stage| Ok(stage.show_previous_month()))?;
            Ok(session.render_current())
        }
        Command::Day(day) => {
            session
                .flow_mut("pick a date")?
                .update_schedule(|stage| Ok(stage.tap_day(day)))?;
            Ok(session.render_current())
        }
        Command::Start(pick) => {
            session
                .flow_mut("pick a time")?
                .update_schedule(|stage| stage.with_start(&pick))?;
            Ok(session.render_current())
        }
        Command::End(pick) => {
            session
                .flow_mut("pick a time")?
                .update_schedule(|stage| stage.with_end(&pick))?;
            Ok(session.render_current())
        }
        Command::Choose(field, choice) => {
            session
                .flow_mut("pick a time")?
                .update_schedule(|stage| stage.with_choice(field, choice))?;
            Ok(session.render_current())
        }
        Command::Continue => {
            // 支払い方法選択画面で進むのは支払うのと同じ
            let in_payment = session
                .flow
                .as_ref()
                .map_or(false, |flow| matches!(flow.current(), FlowStage::Payment(_)));
            if in_payment {
                return execute(repository, session, Command::Pay);
            }

            let catalog = repository.get_payment_methods();
            let flow = session.flow_mut("continue")?;
            if matches!(flow.current(), FlowStage::Schedule(_)) {
                flow.continue_to_review()?;
            } else if matches!(flow.current(), FlowStage::Review(_)) {
                flow.continue_to_payment(catalog)?;
            } else {
                return Err(BookingError::WrongStage {
                    action: "continue",
                    stage: flow.current().name(),
                });
            }
            Ok(session.render_current())
        }
        Command::Methods => match session.flow.as_ref().map(|flow| flow.current()) {
            Some(FlowStage::Payment(_)) => Ok(session.render_current()),
            Some(other) => Err(BookingError::WrongStage {
                action: "list payment methods",
                stage: other.name(),
            }),
            None => Err(BookingError::WrongStage {
                action: "list payment methods",
                stage: "Venue List",
            }),
        },
        Command::Method(id) => {
            session
                .flow_mut("change the payment method")?
                .update_payment(|stage| stage.select(&id))?;
            Ok(session.render_current())
        }
        Command::Pay => {
            let receipt = session.flow_mut("pay")?.pay()?.clone();

            let mut lines = session.render_current();
            lines.extend(dump_yaml(&receipt_to_yaml(&receipt)).lines().map(|l| l.to_string()));
            Ok(lines)
        }
        Command::Back => {
            let outcome = session.flow_mut("go back")?.go_back()?;
            match outcome {
                BackOutcome::Returned => Ok(session.render_current()),
                BackOutcome::Abandoned => {
                    session.flow = None;
                    Ok(vec!["Booking abandoned".to_string()])
                }
            }
        }
        Command::Directions => {
            let venue = session
                .venue_id
                .as_deref()
                .and_then(|id| repository.get_by_id(id))
                .ok_or(BookingError::WrongStage {
                    action: "open directions",
                    stage: "Venue List",
                })?;

            match open_directions(venue) {
                Some(url) => Ok(vec![format!("Directions: {}", url)]),
                None => Ok(vec!["No directions for this venue".to_string()]),
            }
        }
        Command::Profile => {
            session.require_login()?;
            Ok(render_profile(&session.profile))
        }
        Command::AddSports(sports) => {
            session.require_login()?;
            session.profile = session.profile.add_sports(&sports)?;
            Ok(render_profile(&session.profile))
        }
        Command::RemoveSport(sport) => {
            session.require_login()?;
            session.profile = session.profile.remove_sport(sport);
            Ok(render_profile(&session.profile))
        }
        Command::MoveSportUp(position) => {
            session.require_login()?;
            session.profile = session.profile.move_up(position - 1);
            Ok(render_profile(&session.profile))
        }
        Command::MoveSportDown(position) => {
            session.require_login()?;
            session.profile = session.profile.move_down(position - 1);
            Ok(render_profile(&session.profile))
        }
        Command::SetSkillLevel(sport, skill_level) => {
            session.require_login()?;
            session.profile = session.profile.set_skill_level(sport, skill_level);
            Ok(render_profile(&session.profile))
        }
        Command::Chats => {
            session.require_login()?;
            Ok(render_chats(session.inbox_mut(repository)))
        }
        Command::OpenChat(id) => {
            session.require_login()?;
            let chat = session.inbox_mut(repository).open(&id)?;
            Ok(render_chat(chat))
        }
        Command::Say(text) => {
            session.require_login()?;
            let inbox = session.inbox_mut(repository);
            if !inbox.send(&text) {
                return Ok(vec![]);
            }
            Ok(inbox.get_opened().map(render_chat).unwrap_or_default())
        }
        Command::Find(criterion) => {
            session.search = session.search.choose(criterion, &repository.get_today())?;
            Ok(render_search(&session.search))
        }
        Command::Search => {
            let result = session.search.search(repository.get_all_venues())?;
            Ok(render_search_result(&result))
        }
        Command::Show => Ok(session.render_current()),
        Command::Help => Ok(HELP_LINES.iter().map(|line| line.to_string()).collect()),
        Command::Quit | Command::Empty => Ok(vec![]),
        Command::Unknown(line) => Ok(vec![format!("Unknown command: {} (try `help`)", line)]),
    }
}

// 1行ごとに時計を合わせてから実行する。Noneは終了
fn execute_line(
    repository: &mut dyn VenueRepositoryTrait,
    session: &mut Session,
    line: &str,
    now: DateTime<Local>,
) -> Result<Option<Vec<String>>, BookingError> {
    repository.sync_clock(now);

    match parse_command(line)? {
        Command::Quit => Ok(None),
        command => execute(&*repository, session, command).map(Some),
    }
}

#[cfg(test)]
fn loaded_repository() -> VenueRepository {
    let mut repository = VenueRepository::new(None);
    repository.load().unwrap();
    repository.sync_clock(Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap());
    repository
}

#[cfg(test)]
fn run(
    repository: &VenueRepository,
    session: &mut Session,
    line: &str,
) -> Result<Vec<String>, BookingError> {
    execute(repository, session, parse_command(line).unwrap())
}

#[test]
fn test_execute_ログインしないと予約できないこと() {
    let repository = loaded_repository();
    let mut session = Session::default();

    assert_eq!(run(&repository, &mut session, "book 1"), Err(BookingError::NotLoggedIn));
    assert_eq!(
        run(&repository, &mut session, "login ayo.guest@gmail.com wrong"),
        Err(BookingError::InvalidCredentials)
    );
    assert!(run(&repository, &mut session, "login ayo.guest@gmail.com ayoguest123").is_ok());
    assert!(run(&repository, &mut session, "book 1").is_ok());
}

#[test]
fn test_execute_予約から支払いまで() {
    let repository = loaded_repository();
    let mut session = Session::default();
    run(&repository, &mut session, "login ayo.guest@gmail.com ayoguest123").unwrap();
    run(&repository, &mut session, "book 1").unwrap();

    // 日付を選ばずに進むことはできない
    assert_eq!(
        run(&repository, &mut session, "continue"),
        Err(BookingError::NoDateSelected)
    );

    run(&repository, &mut session, "next").unwrap();
    run(&repository, &mut session, "date 8").unwrap();
    run(&repository, &mut session, "start 10:00 AM").unwrap();
    run(&repository, &mut session, "end 12:00 PM").unwrap();
    run(&repository, &mut session, "continue").unwrap();
    run(&repository, &mut session, "continue").unwrap();

    assert!(matches!(
        run(&repository, &mut session, "method ovo"),
        Err(BookingError::PaymentMethodDisabled { .. })
    ));
    run(&repository, &mut session, "method alfamart").unwrap();

    let lines = run(&repository, &mut session, "pay").unwrap();
    assert!(lines.iter().any(|line| line.contains("Rp 124.500")));
    assert!(lines.iter().any(|line| line.contains("total_payment: 124500")));
    assert!(session.flow.as_ref().unwrap().is_finished());
}

#[test]
fn test_execute_最初の段階で戻ると予約を破棄すること() {
    let repository = loaded_repository();
    let mut session = Session::default();
    run(&repository, &mut session, "login ayo.guest@gmail.com ayoguest123").unwrap();
    run(&repository, &mut session, "book 1").unwrap();

    let lines = run(&repository, &mut session, "back").unwrap();
    assert_eq!(lines, vec!["Booking abandoned".to_string()]);
    assert!(session.flow.is_none());
}

#[test]
fn test_execute_会場一覧の絞り込み() {
    let repository = loaded_repository();
    let mut session = Session::default();

    let all = execute(
        &repository,
        &mut session,
        Command::Venues {
            filter: CategoryFilter::All,
            only_new: false,
        },
    )
    .unwrap();
    let only_new = run(&repository, &mut session, "new").unwrap();

    assert_eq!(all.len(), repository.get_all_venues().len());
    assert!(only_new.len() < all.len());
    assert!(only_new.iter().all(|line| line.ends_with("[NEW]")));
}

#[test]
fn test_execute_line_行ごとに今日の日付が更新されること() {
    let mut repository = loaded_repository();
    let mut session = Session::default();
    let next_day = Local.with_ymd_and_hms(2025, 3, 11, 0, 5, 0).unwrap();

    execute_line(&mut repository, &mut session, "login ayo.guest@gmail.com ayoguest123", next_day)
        .unwrap();
    execute_line(&mut repository, &mut session, "book 1", next_day).unwrap();
    // 日付が変わったので10日はもう過去
    execute_line(&mut repository, &mut session, "date 10", next_day).unwrap();

    assert_eq!(repository.get_last_synced_time(), next_day);
    let flow = session.flow.as_ref().unwrap();
    match flow.current() {
        FlowStage::Schedule(stage) => assert_eq!(stage.get_draft().get_selected_date(), None),
        other => panic!("unexpected stage: {}", other.name()),
    }
}

#[test]
#[allow(non_snake_case)]
fn test_execute_line_終了はNoneを返すこと() {
    let mut repository = loaded_repository();
    let mut session = Session::default();
    let now = Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

    assert_eq!(execute_line(&mut repository, &mut session, "q", now), Ok(None));
    assert_eq!(
        execute_line(&mut repository, &mut session, "help", now).map(|lines| lines.map(|l| l.len())),
        Ok(Some(HELP_LINES.len()))
    );
}

#[test]
fn test_execute_プロフィールのスポーツを編集できること() {
    let repository = loaded_repository();
    let mut session = Session::default();

    assert_eq!(run(&repository, &mut session, "profile"), Err(BookingError::NotLoggedIn));
    run(&repository, &mut session, "login ayo.guest@gmail.com ayoguest123").unwrap();

    assert_eq!(
        run(&repository, &mut session, "sport add"),
        Err(BookingError::NoSportSelected)
    );
    run(&repository, &mut session, "sport add basketball").unwrap();
    run(&repository, &mut session, "sport rm tennis").unwrap();
    run(&repository, &mut session, "sport up 3").unwrap();
    let lines = run(&repository, &mut session, "sport level basketball pro").unwrap();

    assert_eq!(
        lines,
        vec![
            "My Sports",
            "  1. Badminton - Intermediate",
            "  2. Basketball - Professional",
            "  3. Mini Soccer - Advanced",
            "Can add: Tennis, Football",
        ]
    );
}

#[test]
fn test_execute_開いたチャットに送信できること() {
    let repository = loaded_repository();
    let mut session = Session::default();
    run(&repository, &mut session, "login ayo.guest@gmail.com ayoguest123").unwrap();

    // チャットを開く前は何もしない
    assert_eq!(run(&repository, &mut session, "say halo"), Ok(vec![]));
    assert_eq!(
        run(&repository, &mut session, "chat c9"),
        Err(BookingError::UnknownChat("c9".to_string()))
    );

    run(&repository, &mut session, "chat d1").unwrap();
    assert_eq!(run(&repository, &mut session, "say"), Ok(vec![]));
    let lines = run(&repository, &mut session, "say Jadi, jam 7").unwrap();
    assert_eq!(lines.last().unwrap(), "  > Jadi, jam 7  Just now");

    let chats = run(&repository, &mut session, "chats").unwrap();
    assert_eq!(chats.last().unwrap(), "d1: Budi Santoso  Jadi, jam 7  Just now");
}

#[test]
fn test_execute_検索は全項目を選ぶまでできないこと() {
    let repository = loaded_repository();
    let mut session = Session::default();

    run(&repository, &mut session, "find activity sparring").unwrap();
    run(&repository, &mut session, "find location tangerang").unwrap();
    run(&repository, &mut session, "find sport badminton").unwrap();
    run(&repository, &mut session, "find date 2025-03-12").unwrap();
    assert_eq!(
        run(&repository, &mut session, "search"),
        Err(BookingError::SearchIncomplete)
    );

    run(&repository, &mut session, "find time 14:00").unwrap();
    let lines = run(&repository, &mut session, "search").unwrap();

    assert_eq!(
        lines[0],
        "Sparring / Badminton venues in Tangerang for Wednesday, 12 Mar 2025 at 14:00"
    );
    assert!(lines.len() > 1);
    assert!(lines[1..].iter().all(|line| line.contains("Badminton")));
}

fn print_lines(stdout: &mut RawTerminal<Stdout>, lines: &[String]) -> io::Result<()> {
    for line in lines.iter() {
        write!(stdout, "{}\r\n", line)?;
    }
    stdout.flush()
}

fn rerender(stdout: &mut RawTerminal<Stdout>, editor: &LineEditor) -> io::Result<()> {
    write!(
        stdout,
        "{}{}",
        termion::cursor::Left(MAX_COL),
        termion::clear::CurrentLine
    )?;

    let width = editor.width_for_rerender();
    write!(stdout, "{}{}", editor.get_header(), editor.get_line())?;
    write!(
        stdout,
        "{}{}",
        termion::cursor::Left(MAX_COL),
        termion::cursor::Right(width)
    )?;
    stdout.flush()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let arg = std::env::args().nth(1);
    let config = Config::from_args_and_env(arg.as_deref());
    let mut repository = VenueRepository::new(config.get_fixtures_dir());

    // controllerで実体を見るのを避けるために、1つ関数を切る
    if let Err(err) = application(&mut repository) {
        log::error!("{}", err);
        eprintln!("{}", err);
    }
}

fn application(repository: &mut dyn VenueRepositoryTrait) -> Result<(), Box<dyn std::error::Error>> {
    // 初期化
    repository.sync_clock(Local::now());
    repository.load()?;

    let mut session = Session {
        styled: true,
        ..Session::default()
    };

    // RawModeを有効にする
    let mut stdout = stdout().into_raw_mode()?;

    write!(stdout, "{}", termion::clear::All)?;
    write!(stdout, "{}{}", termion::cursor::Goto(1, 1), termion::cursor::BlinkingBar)?;
    print_lines(
        &mut stdout,
        &["Welcome to courtbook. `login <email> <password>` to start, `help` for commands".to_string()],
    )?;

    let mut editor = LineEditor::new(HEADER);
    rerender(&mut stdout, &editor)?;

    // キー入力を受け付ける
    for key in stdin().keys() {
        match key? {
            Key::Ctrl('d') | Key::Ctrl('c') => {
                if editor.is_empty() {
                    break;
                }
            }
            Key::Left | Key::Ctrl('b') => {
                let width = editor.move_left();
                if width > 0 {
                    write!(stdout, "{}", termion::cursor::Left(width))?;
                    stdout.flush()?;
                }
            }
            Key::Right | Key::Ctrl('f') => {
                let width = editor.move_right();
                if width > 0 {
                    write!(stdout, "{}", termion::cursor::Right(width))?;
                    stdout.flush()?;
                }
            }
            Key::Ctrl('a') => {
                editor.move_home();
                rerender(&mut stdout, &editor)?;
            }
            Key::Ctrl('e') => {
                editor.move_end();
                rerender(&mut stdout, &editor)?;
            }
            Key::Ctrl('u') => {
                editor.clear();
                rerender(&mut stdout, &editor)?;
            }
            Key::Ctrl('k') => {
                editor.kill_to_end();
                rerender(&mut stdout, &editor)?;
            }
            Key::Backspace | Key::Ctrl('h') => {
                editor.backspace();
                rerender(&mut stdout, &editor)?;
            }
            Key::Char('\n') | Key::Ctrl('m') => {
                let line = editor.take_line();
                write!(stdout, "\r\n")?;

                match execute_line(repository, &mut session, &line, Local::now()) {
                    Ok(None) => break,
                    Ok(Some(lines)) => print_lines(&mut stdout, &lines)?,
                    Err(err) => {
                        log::debug!("{:?}", err);
                        let message = format!("{}{}{}", style::Bold, err, style::Reset);
                        print_lines(&mut stdout, &[message])?;
                    }
                }

                // 予約中は段階名をプロンプトに出す
                let header = match session.flow.as_ref() {
                    Some(flow) if !flow.is_finished() => {
                        format!("courtbook({})>", flow.current().name())
                    }
                    _ => HEADER.to_string(),
                };
                editor.set_header(&header);
                rerender(&mut stdout, &editor)?;
            }
            Key::Char(c) => {
                editor.insert(c);
                rerender(&mut stdout, &editor)?;
            }
            _ => {}
        }
    }

    write!(stdout, "\r\n{}", termion::cursor::BlinkingBlock)?;
    stdout.flush()?;

    Ok(())
}
