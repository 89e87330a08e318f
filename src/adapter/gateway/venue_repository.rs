use crate::adapter::gateway::yaml::{
    yaml_to_chat, yaml_to_guest_account, yaml_to_payment_method, yaml_to_venue,
};
use crate::application::interface::VenueRepositoryTrait;
use crate::entity::account::GuestAccount;
use crate::entity::chat::Chat;
use crate::entity::payment_method::PaymentMethodCatalog;
use crate::entity::venue::Venue;
use crate::error::BookingError;
use chrono::{DateTime, Local, NaiveDate};
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use walkdir::WalkDir;
use yaml_rust::{Yaml, YamlLoader};

#[cfg(test)]
use chrono::TimeZone;

const BUILTIN_VENUES: &str = include_str!("../../../fixtures/venues.yaml");
const BUILTIN_PAYMENT_METHODS: &str = include_str!("../../../fixtures/payment_methods.yaml");
const BUILTIN_ACCOUNT: &str = include_str!("../../../fixtures/account.yaml");
const BUILTIN_CHATS: &str = include_str!("../../../fixtures/chats.yaml");

const VENUE_FILE_NAME: &str = "venue.yaml";
const PAYMENT_METHODS_FILE_NAME: &str = "payment_methods.yaml";
const ACCOUNT_FILE_NAME: &str = "account.yaml";
const CHATS_FILE_NAME: &str = "chats.yaml";

fn read_text(path: &Path) -> Result<String, BookingError> {
    let read_error = |err: std::io::Error| BookingError::FixtureRead {
        path: path.display().to_string(),
        message: err.to_string(),
    };

    let mut file = File::open(path).map_err(read_error)?;
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(read_error)?;

    Ok(text)
}

fn load_first_doc(text: &str, path: &str) -> Result<Yaml, BookingError> {
    let mut docs = YamlLoader::load_from_str(text).map_err(|err| BookingError::FixtureParse {
        path: path.to_string(),
        message: err.to_string(),
    })?;

    if docs.is_empty() {
        return Ok(Yaml::Null);
    }
    Ok(docs.swap_remove(0))
}

// 会場データはYAMLのフィクスチャから読む。
// ディレクトリ指定が無ければバイナリに埋め込んだものを使う
pub struct VenueRepository {
    fixtures_dir: Option<String>,
    venues: Vec<Venue>,
    payment_methods: PaymentMethodCatalog,
    guest_account: Option<GuestAccount>,
    chats: Vec<Chat>,
    last_synced_time: DateTime<Local>,
}

impl VenueRepository {
    pub fn new(fixtures_dir: Option<&str>) -> Self {
        Self {
            fixtures_dir: fixtures_dir.map(|dir| dir.to_string()),
            venues: vec![],
            payment_methods: PaymentMethodCatalog::default(),
            guest_account: None,
            chats: vec![],
            last_synced_time: DateTime::<Local>::MIN_UTC.into(),
        }
    }

    fn load_builtin_venues(&mut self) -> Result<(), BookingError> {
        let doc = load_first_doc(BUILTIN_VENUES, "<builtin venues>")?;

        for venue_yaml in doc["venues"].as_vec().unwrap_or(&vec![]).iter() {
            let venue = yaml_to_venue(venue_yaml, "<builtin venues>")?;
            self.venues.push(venue);
        }

        Ok(())
    }

    // 1会場につき1ディレクトリ、その中の venue.yaml を読む
    fn load_venues_from_dir(&mut self, dir: &str) -> Result<(), BookingError> {
        let mut paths = vec![];
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if entry.file_name() == VENUE_FILE_NAME {
                paths.push(entry.path().to_path_buf());
            }
        }
        // 表示順を安定させる
        paths.sort();

        for path in paths.iter() {
            let path_str = path.display().to_string();
            let text = read_text(path)?;
            let doc = load_first_doc(&text, &path_str)?;
            let venue = yaml_to_venue(&doc["venue"], &path_str)?;

            log::debug!("loaded venue {} from {}", venue.get_id(), path_str);
            self.venues.push(venue);
        }

        Ok(())
    }

    // ディレクトリに置かれていればそちらを優先する
    fn read_fixture(&self, file_name: &str, builtin: &str) -> Result<(String, String), BookingError> {
        if let Some(dir) = &self.fixtures_dir {
            let path = Path::new(dir).join(file_name);
            if path.exists() {
                let text = read_text(&path)?;
                return Ok((text, path.display().to_string()));
            }
        }

        Ok((builtin.to_string(), format!("<builtin {}>", file_name)))
    }

    fn load_payment_methods(&mut self) -> Result<(), BookingError> {
        let (text, path) = self.read_fixture(PAYMENT_METHODS_FILE_NAME, BUILTIN_PAYMENT_METHODS)?;
        let doc = load_first_doc(&text, &path)?;

        let mut options = vec![];
        for method_yaml in doc["payment_methods"].as_vec().unwrap_or(&vec![]).iter() {
            options.push(yaml_to_payment_method(method_yaml, &path)?);
        }
        self.payment_methods = PaymentMethodCatalog::new(options);

        Ok(())
    }

    fn load_guest_account(&mut self) -> Result<(), BookingError> {
        let (text, path) = self.read_fixture(ACCOUNT_FILE_NAME, BUILTIN_ACCOUNT)?;
        let doc = load_first_doc(&text, &path)?;
        self.guest_account = yaml_to_guest_account(&doc["guest_account"]);

        Ok(())
    }

    fn load_chats(&mut self) -> Result<(), BookingError> {
        let (text, path) = self.read_fixture(CHATS_FILE_NAME, BUILTIN_CHATS)?;
        let doc = load_first_doc(&text, &path)?;

        let mut chats = vec![];
        for chat_yaml in doc["chats"].as_vec().unwrap_or(&vec![]).iter() {
            chats.push(yaml_to_chat(chat_yaml, &path)?);
        }
        self.chats = chats;

        Ok(())
    }
}

impl VenueRepositoryTrait for VenueRepository {
    fn load(&mut self) -> Result<(), BookingError> {
        self.venues.clear();

        match self.fixtures_dir.clone() {
            Some(dir) => self.load_venues_from_dir(&dir)?,
            None => self.load_builtin_venues()?,
        }
        self.load_payment_methods()?;
        self.load_guest_account()?;
        self.load_chats()?;

        log::info!(
            "loaded {} venues and {} payment methods",
            self.venues.len(),
            self.payment_methods.get_options().len()
        );
        Ok(())
    }

    fn sync_clock(&mut self, now: DateTime<Local>) {
        self.last_synced_time = now;
    }

    fn get_last_synced_time(&self) -> DateTime<Local> {
        self.last_synced_time
    }

    // 時刻を切り捨てた今日の日付
    fn get_today(&self) -> NaiveDate {
        self.last_synced_time.date_naive()
    }

    fn get_all_venues(&self) -> &Vec<Venue> {
        &self.venues
    }

    fn get_by_id(&self, id: &str) -> Option<&Venue> {
        self.venues.iter().find(|venue| venue.get_id() == id)
    }

    fn get_payment_methods(&self) -> &PaymentMethodCatalog {
        &self.payment_methods
    }

    fn get_guest_account(&self) -> Option<&GuestAccount> {
        self.guest_account.as_ref()
    }

    fn get_chats(&self) -> &Vec<Chat> {
        &self.chats
    }
}

#[test]
fn test_load_埋め込みのフィクスチャが読めること() {
    let mut repository = VenueRepository::new(None);
    repository.load().unwrap();

    assert!(!repository.get_all_venues().is_empty());
    assert_eq!(
        repository.get_by_id("1").map(|venue| venue.get_name()),
        Some("Rekket Space Badminton Hall")
    );

    let catalog = repository.get_payment_methods();
    assert_eq!(
        catalog.default_option().map(|option| option.get_id()),
        Some("virtual_account")
    );
    assert_eq!(catalog.get_by_id("ovo").map(|o| o.is_enabled()), Some(false));

    let account = repository.get_guest_account().unwrap();
    assert_eq!(account.authenticate("ayo.guest@gmail.com", "ayoguest123"), Ok(()));

    let chat_ids: Vec<&str> = repository.get_chats().iter().map(|chat| chat.get_id()).collect();
    assert_eq!(chat_ids, vec!["c1", "c2", "c4", "d1"]);
}

#[test]
fn test_load_ディレクトリ指定の場合はvenue_yamlを全て読むこと() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");
    let mut repository = VenueRepository::new(Some(dir));
    repository.load().unwrap();

    let ids: Vec<&str> = repository
        .get_all_venues()
        .iter()
        .map(|venue| venue.get_id())
        .collect();
    assert_eq!(ids, vec!["central-court", "rekket-bsd"]);

    // 支払い方法はディレクトリ直下のものを読む
    assert_eq!(repository.get_payment_methods().get_options().len(), 8);
}

#[test]
fn test_load_存在しないディレクトリは会場0件() {
    let mut repository = VenueRepository::new(Some("/nonexistent/courtbook/fixtures"));
    repository.load().unwrap();

    assert!(repository.get_all_venues().is_empty());
    assert_eq!(repository.get_payment_methods().get_options().len(), 8);
}

#[test]
fn test_get_today_同期した時刻の日付になること() {
    let mut repository = VenueRepository::new(None);
    repository.sync_clock(Local.with_ymd_and_hms(2025, 3, 10, 23, 59, 0).unwrap());

    assert_eq!(
        repository.get_today(),
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    );
}
