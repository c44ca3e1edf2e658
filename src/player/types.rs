use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// Only `player_id` is required; every biographical and career field is free-form
/// text exactly as the source data carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
  pub player_id: String,
  #[serde(default)]
  pub birth_year: Option<String>,
  #[serde(default)]
  pub birth_month: Option<String>,
  #[serde(default)]
  pub birth_day: Option<String>,
  #[serde(default)]
  pub birth_country: Option<String>,
  #[serde(default)]
  pub birth_state: Option<String>,
  #[serde(default)]
  pub birth_city: Option<String>,
  #[serde(default)]
  pub death_year: Option<String>,
  #[serde(default)]
  pub death_month: Option<String>,
  #[serde(default)]
  pub death_day: Option<String>,
  #[serde(default)]
  pub death_country: Option<String>,
  #[serde(default)]
  pub death_state: Option<String>,
  #[serde(default)]
  pub death_city: Option<String>,
  #[serde(default)]
  pub first_name: Option<String>,
  #[serde(default)]
  pub last_name: Option<String>,
  #[serde(default)]
  pub given_name: Option<String>,
  #[serde(default)]
  pub weight: Option<String>,
  #[serde(default)]
  pub height: Option<String>,
  #[serde(default)]
  pub bats: Option<String>,
  #[serde(default)]
  pub throw_stats: Option<String>,
  #[serde(default)]
  pub debut: Option<String>,
  #[serde(default)]
  pub final_game: Option<String>,
  #[serde(default)]
  pub retro_id: Option<String>,
  #[serde(default)]
  pub bbref_id: Option<String>,
}

impl Player {
  /// Create a player with only the identifier set.
  pub fn new(player_id: impl Into<String>) -> Self {
    Self {
      player_id: player_id.into(),
      ..Self::default()
    }
  }

  pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
    self.first_name = Some(first.into());
    self.last_name = Some(last.into());
    self
  }
}

/// Unpaginated listing envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Players {
  pub players: Vec<Player>,
}

impl From<Vec<Player>> for Players {
  fn from(players: Vec<Player>) -> Self {
    Self { players }
  }
}

/// Sortable player fields.
///
/// Every field is addressed by its serialized (camelCase) name. `id` is accepted as
/// a shorthand for `playerId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerField {
  PlayerId,
  BirthYear,
  BirthMonth,
  BirthDay,
  BirthCountry,
  BirthState,
  BirthCity,
  DeathYear,
  DeathMonth,
  DeathDay,
  DeathCountry,
  DeathState,
  DeathCity,
  FirstName,
  LastName,
  GivenName,
  Weight,
  Height,
  Bats,
  ThrowStats,
  Debut,
  FinalGame,
  RetroId,
  BbrefId,
}

impl PlayerField {
  pub const ALL: [PlayerField; 24] = [
    Self::PlayerId,
    Self::BirthYear,
    Self::BirthMonth,
    Self::BirthDay,
    Self::BirthCountry,
    Self::BirthState,
    Self::BirthCity,
    Self::DeathYear,
    Self::DeathMonth,
    Self::DeathDay,
    Self::DeathCountry,
    Self::DeathState,
    Self::DeathCity,
    Self::FirstName,
    Self::LastName,
    Self::GivenName,
    Self::Weight,
    Self::Height,
    Self::Bats,
    Self::ThrowStats,
    Self::Debut,
    Self::FinalGame,
    Self::RetroId,
    Self::BbrefId,
  ];

  /// Resolve a field by its serialized name (case-sensitive, like the JSON keys).
  pub fn parse(name: &str) -> Option<Self> {
    if name == "id" {
      return Some(Self::PlayerId);
    }
    Self::ALL.into_iter().find(|field| field.name() == name)
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::PlayerId => "playerId",
      Self::BirthYear => "birthYear",
      Self::BirthMonth => "birthMonth",
      Self::BirthDay => "birthDay",
      Self::BirthCountry => "birthCountry",
      Self::BirthState => "birthState",
      Self::BirthCity => "birthCity",
      Self::DeathYear => "deathYear",
      Self::DeathMonth => "deathMonth",
      Self::DeathDay => "deathDay",
      Self::DeathCountry => "deathCountry",
      Self::DeathState => "deathState",
      Self::DeathCity => "deathCity",
      Self::FirstName => "firstName",
      Self::LastName => "lastName",
      Self::GivenName => "givenName",
      Self::Weight => "weight",
      Self::Height => "height",
      Self::Bats => "bats",
      Self::ThrowStats => "throwStats",
      Self::Debut => "debut",
      Self::FinalGame => "finalGame",
      Self::RetroId => "retroId",
      Self::BbrefId => "bbrefId",
    }
  }

  /// Column backing this field in the `PLAYERS` table.
  pub fn column(self) -> &'static str {
    match self {
      Self::PlayerId => "playerid",
      Self::BirthYear => "birthyear",
      Self::BirthMonth => "birthmonth",
      Self::BirthDay => "birthday",
      Self::BirthCountry => "birthcountry",
      Self::BirthState => "birthstate",
      Self::BirthCity => "birthcity",
      Self::DeathYear => "deathyear",
      Self::DeathMonth => "deathmonth",
      Self::DeathDay => "deathday",
      Self::DeathCountry => "deathcountry",
      Self::DeathState => "deathstate",
      Self::DeathCity => "deathcity",
      Self::FirstName => "namefirst",
      Self::LastName => "namelast",
      Self::GivenName => "namegiven",
      Self::Weight => "weight",
      Self::Height => "height",
      Self::Bats => "bats",
      Self::ThrowStats => "throws",
      Self::Debut => "debut",
      Self::FinalGame => "finalgame",
      Self::RetroId => "retroid",
      Self::BbrefId => "bbrefid",
    }
  }

  /// Value of this field on `player`; `None` when the field is unset.
  pub fn value(self, player: &Player) -> Option<&str> {
    let value = match self {
      Self::PlayerId => return Some(&player.player_id),
      Self::BirthYear => &player.birth_year,
      Self::BirthMonth => &player.birth_month,
      Self::BirthDay => &player.birth_day,
      Self::BirthCountry => &player.birth_country,
      Self::BirthState => &player.birth_state,
      Self::BirthCity => &player.birth_city,
      Self::DeathYear => &player.death_year,
      Self::DeathMonth => &player.death_month,
      Self::DeathDay => &player.death_day,
      Self::DeathCountry => &player.death_country,
      Self::DeathState => &player.death_state,
      Self::DeathCity => &player.death_city,
      Self::FirstName => &player.first_name,
      Self::LastName => &player.last_name,
      Self::GivenName => &player.given_name,
      Self::Weight => &player.weight,
      Self::Height => &player.height,
      Self::Bats => &player.bats,
      Self::ThrowStats => &player.throw_stats,
      Self::Debut => &player.debut,
      Self::FinalGame => &player.final_game,
      Self::RetroId => &player.retro_id,
      Self::BbrefId => &player.bbref_id,
    };
    value.as_deref()
  }
}
