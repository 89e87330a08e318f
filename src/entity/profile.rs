use crate::entity::venue::Sport;
use crate::error::BookingError;
use std::fmt;

pub const ALL_SPORTS: [Sport; 5] = [
    Sport::Badminton,
    Sport::Tennis,
    Sport::MiniSoccer,
    Sport::Basketball,
    Sport::Football,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkillLevel::Beginner => write!(f, "Beginner"),
            SkillLevel::Intermediate => write!(f, "Intermediate"),
            SkillLevel::Advanced => write!(f, "Advanced"),
            SkillLevel::Professional => write!(f, "Professional"),
        }
    }
}

pub fn read_skill_level(s: &str) -> Option<SkillLevel> {
    match s.to_lowercase().as_str() {
        "beginner" => Some(SkillLevel::Beginner),
        "intermediate" => Some(SkillLevel::Intermediate),
        "advanced" => Some(SkillLevel::Advanced),
        "professional" | "pro" => Some(SkillLevel::Professional),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProfileSport {
    sport: Sport,
    skill_level: SkillLevel,
}

impl ProfileSport {
    pub fn new(sport: Sport, skill_level: SkillLevel) -> Self {
        Self { sport, skill_level }
    }

    pub fn get_sport(&self) -> Sport {
        self.sport
    }

    pub fn get_skill_level(&self) -> SkillLevel {
        self.skill_level
    }
}

// プロフィール画面のスポーツ一覧。並び順も利用者が決める
#[derive(Clone, Debug, PartialEq)]
pub struct SportProfile {
    sports: Vec<ProfileSport>,
}

impl Default for SportProfile {
    fn default() -> Self {
        Self::new(vec![
            ProfileSport::new(Sport::Badminton, SkillLevel::Intermediate),
            ProfileSport::new(Sport::Tennis, SkillLevel::Beginner),
            ProfileSport::new(Sport::MiniSoccer, SkillLevel::Advanced),
        ])
    }
}

impl SportProfile {
    pub fn new(sports: Vec<ProfileSport>) -> Self {
        Self { sports }
    }

    pub fn get_sports(&self) -> &Vec<ProfileSport> {
        &self.sports
    }

    fn contains(&self, sport: Sport) -> bool {
        self.sports.iter().any(|s| s.sport == sport)
    }

    // まだ登録していないスポーツ
    pub fn available_sports(&self) -> Vec<Sport> {
        ALL_SPORTS
            .iter()
            .copied()
            .filter(|sport| !self.contains(*sport))
            .collect()
    }

    // 追加したものは Beginner から始まる。登録済みのものは無視する
    pub fn add_sports(&self, selected: &[Sport]) -> Result<Self, BookingError> {
        let mut sports = self.sports.clone();
        for sport in selected.iter() {
            if !sports.iter().any(|s| s.sport == *sport) {
                sports.push(ProfileSport::new(*sport, SkillLevel::Beginner));
            }
        }

        if sports.len() == self.sports.len() {
            return Err(BookingError::NoSportSelected);
        }
        Ok(Self::new(sports))
    }

    pub fn remove_sport(&self, sport: Sport) -> Self {
        Self::new(
            self.sports
                .iter()
                .filter(|s| s.sport != sport)
                .copied()
                .collect(),
        )
    }

    // 先頭では何もしない
    pub fn move_up(&self, index: usize) -> Self {
        if index == 0 || index >= self.sports.len() {
            return self.clone();
        }

        let mut sports = self.sports.clone();
        sports.swap(index, index - 1);
        Self::new(sports)
    }

    // 末尾では何もしない
    pub fn move_down(&self, index: usize) -> Self {
        if index + 1 >= self.sports.len() {
            return self.clone();
        }

        let mut sports = self.sports.clone();
        sports.swap(index, index + 1);
        Self::new(sports)
    }

    pub fn set_skill_level(&self, sport: Sport, skill_level: SkillLevel) -> Self {
        Self::new(
            self.sports
                .iter()
                .map(|s| {
                    if s.sport == sport {
                        ProfileSport::new(sport, skill_level)
                    } else {
                        *s
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
fn sport_order(profile: &SportProfile) -> Vec<Sport> {
    profile.get_sports().iter().map(|s| s.get_sport()).collect()
}

#[test]
#[allow(non_snake_case)]
fn test_add_sports_新しいスポーツはBeginnerで末尾に追加されること() {
    let profile = SportProfile::default()
        .add_sports(&[Sport::Basketball, Sport::Tennis])
        .unwrap();

    assert_eq!(profile.get_sports().len(), 4);
    assert_eq!(
        profile.get_sports()[3],
        ProfileSport::new(Sport::Basketball, SkillLevel::Beginner)
    );
    // 登録済みのTennisはそのまま
    assert_eq!(
        profile.get_sports()[1],
        ProfileSport::new(Sport::Tennis, SkillLevel::Beginner)
    );
}

#[test]
fn test_add_sports_一つも選ばないと異常系() {
    let profile = SportProfile::default();

    assert_eq!(profile.add_sports(&[]), Err(BookingError::NoSportSelected));
    assert_eq!(
        profile.add_sports(&[Sport::Badminton]),
        Err(BookingError::NoSportSelected)
    );
}

#[test]
fn test_available_sports_登録済みのものは出ないこと() {
    let profile = SportProfile::default();
    assert_eq!(
        profile.available_sports(),
        vec![Sport::Basketball, Sport::Football]
    );
}

#[test]
fn test_remove_sport_指定したスポーツだけ消えること() {
    let profile = SportProfile::default().remove_sport(Sport::Tennis);
    assert_eq!(sport_order(&profile), vec![Sport::Badminton, Sport::MiniSoccer]);
}

#[test]
fn test_move_up_先頭では何もしないこと() {
    let profile = SportProfile::default();

    assert_eq!(profile.move_up(0), profile);
    assert_eq!(
        sport_order(&profile.move_up(2)),
        vec![Sport::Badminton, Sport::MiniSoccer, Sport::Tennis]
    );
}

#[test]
fn test_move_down_末尾では何もしないこと() {
    let profile = SportProfile::default();

    assert_eq!(profile.move_down(2), profile);
    assert_eq!(profile.move_down(10), profile);
    assert_eq!(
        sport_order(&profile.move_down(0)),
        vec![Sport::Tennis, Sport::Badminton, Sport::MiniSoccer]
    );
}

#[test]
fn test_set_skill_level_指定したスポーツだけ変わること() {
    let profile = SportProfile::default().set_skill_level(Sport::Tennis, SkillLevel::Professional);

    assert_eq!(
        profile.get_sports()[1].get_skill_level(),
        SkillLevel::Professional
    );
    assert_eq!(
        profile.get_sports()[0].get_skill_level(),
        SkillLevel::Intermediate
    );
}

#[test]
fn test_read_skill_level_大文字小文字を無視すること() {
    assert_eq!(read_skill_level("Advanced"), Some(SkillLevel::Advanced));
    assert_eq!(read_skill_level("PRO"), Some(SkillLevel::Professional));
    assert_eq!(read_skill_level("expert"), None);
}
