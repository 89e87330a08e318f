use std::env;

pub const FIXTURES_DIR_ENV: &str = "COURTBOOK_FIXTURES_DIR";

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Config {
    // Noneならバイナリに埋め込んだフィクスチャを使う
    fixtures_dir: Option<String>,
}

impl Config {
    pub fn new(fixtures_dir: Option<&str>) -> Self {
        Self {
            fixtures_dir: fixtures_dir
                .filter(|dir| !dir.is_empty())
                .map(|dir| dir.to_string()),
        }
    }

    // コマンドライン引数が環境変数より優先
    pub fn from_args_and_env(arg: Option<&str>) -> Self {
        match arg {
            Some(dir) => Self::new(Some(dir)),
            None => {
                let from_env = env::var(FIXTURES_DIR_ENV).ok();
                Self::new(from_env.as_deref())
            }
        }
    }

    pub fn get_fixtures_dir(&self) -> Option<&str> {
        self.fixtures_dir.as_deref()
    }
}

#[test]
fn test_new_空文字は指定なしとして扱うこと() {
    assert_eq!(Config::new(Some("")).get_fixtures_dir(), None);
    assert_eq!(Config::new(Some("fixtures")).get_fixtures_dir(), Some("fixtures"));
}

#[test]
fn test_from_args_and_env_引数が優先されること() {
    let config = Config::from_args_and_env(Some("/tmp/venues"));
    assert_eq!(config.get_fixtures_dir(), Some("/tmp/venues"));
}
