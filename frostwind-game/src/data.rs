//! Static configuration tables: unit archetypes, buildings, commander tiers,
//! the campaign graph, quest templates and the random event table.
//!
//! Tables ship as JSON assets and are validated once at load time, so the
//! simulation can index them without re-checking references on every tick.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

use crate::constants::{ELITE_MULTIPLIER, ROOKIE_MULTIPLIER, VETERAN_MULTIPLIER};
use crate::numbers::{floor_f64_to_i64, i64_to_f64};

const UNITS_JSON: &str = include_str!("../assets/data/units.json");
const BUILDINGS_JSON: &str = include_str!("../assets/data/buildings.json");
const COMMANDERS_JSON: &str = include_str!("../assets/data/commanders.json");
const TERRITORIES_JSON: &str = include_str!("../assets/data/territories.json");
const QUESTS_JSON: &str = include_str!("../assets/data/quests.json");
const EVENTS_JSON: &str = include_str!("../assets/data/events.json");

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} table is empty")]
    EmptyTable { table: &'static str },
    #[error("duplicate id {id} in {table} table")]
    DuplicateId { table: &'static str, id: String },
    #[error("unit archetype {0} is missing")]
    MissingArchetype(UnitKind),
    #[error("building {0} is missing")]
    MissingBuilding(BuildingKind),
    #[error("rarity weights must sum to 1.0 (got {total:.3})")]
    RarityWeights { total: f64 },
    #[error("rarity {rarity} stat bounds invalid (min {min} > max {max})")]
    StatBounds { rarity: Rarity, min: u32, max: u32 },
    #[error("territory {territory} unlocks unknown territory {target}")]
    UnknownUnlock { territory: String, target: String },
    #[error("campaign graph must have exactly one start territory (found {roots})")]
    CampaignRoots { roots: usize },
    #[error("campaign graph has a cycle through {territory}")]
    CampaignCycle { territory: String },
    #[error("event {0} has no choices")]
    EventWithoutChoices(String),
    #[error("event {event} grants an empty unit")]
    EmptyUnitGrant { event: String },
    #[error("opening quest references template {index} (only {available} templates)")]
    OpeningTemplate { index: usize, available: usize },
    #[error("{field} must be {expected} (got {value})")]
    InvalidRule {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

fn parse_table<T: serde::de::DeserializeOwned>(
    table: &'static str,
    json: &str,
) -> Result<T, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse { table, source })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Infantry,
    Engineer,
    Scout,
    Medic,
    Cbrn,
    SpecialForces,
    HeavyInfantry,
    LightCavalry,
    HeavyCavalry,
    BeastCavalry,
    Musketeer,
    Artillery,
    Mage,
}

impl UnitKind {
    pub const ALL: [Self; 13] = [
        Self::Infantry,
        Self::Engineer,
        Self::Scout,
        Self::Medic,
        Self::Cbrn,
        Self::SpecialForces,
        Self::HeavyInfantry,
        Self::LightCavalry,
        Self::HeavyCavalry,
        Self::BeastCavalry,
        Self::Musketeer,
        Self::Artillery,
        Self::Mage,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infantry => "infantry",
            Self::Engineer => "engineer",
            Self::Scout => "scout",
            Self::Medic => "medic",
            Self::Cbrn => "cbrn",
            Self::SpecialForces => "special_forces",
            Self::HeavyInfantry => "heavy_infantry",
            Self::LightCavalry => "light_cavalry",
            Self::HeavyCavalry => "heavy_cavalry",
            Self::BeastCavalry => "beast_cavalry",
            Self::Musketeer => "musketeer",
            Self::Artillery => "artillery",
            Self::Mage => "mage",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Basic,
    Special,
    Cavalry,
    Ranged,
    Magic,
}

/// Combat attributes shared by archetypes and fielded units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub power: i64,
    #[serde(default)]
    pub mobility: i64,
    #[serde(default)]
    pub range: i64,
    #[serde(default)]
    pub magic: i64,
}

impl Attributes {
    /// Scale every attribute by `multiplier`, flooring the result.
    #[must_use]
    pub fn scaled(self, multiplier: f64) -> Self {
        let scale = |value: i64| floor_f64_to_i64(i64_to_f64(value) * multiplier);
        Self {
            power: scale(self.power),
            mobility: scale(self.mobility),
            range: scale(self.range),
            magic: scale(self.magic),
        }
    }
}

/// Fixed template for a unit kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitArchetype {
    pub kind: UnitKind,
    pub category: UnitCategory,
    pub name: String,
    pub cost: i64,
    pub maintenance: i64,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Rookie,
    Veteran,
    Elite,
}

impl Quality {
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Rookie => ROOKIE_MULTIPLIER,
            Self::Veteran => VETERAN_MULTIPLIER,
            Self::Elite => ELITE_MULTIPLIER,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rookie => "Rookie",
            Self::Veteran => "Veteran",
            Self::Elite => "Elite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Barracks,
    Market,
    Hospital,
    Walls,
}

impl BuildingKind {
    pub const ALL: [Self; 4] = [Self::Barracks, Self::Market, Self::Hospital, Self::Walls];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Barracks => "barracks",
            Self::Market => "market",
            Self::Hospital => "hospital",
            Self::Walls => "walls",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub kind: BuildingKind,
    pub name: String,
    pub base_cost: i64,
    pub cost_multiplier: f64,
}

impl BuildingConfig {
    /// Gold needed to raise the building from `level` to `level + 1`.
    #[must_use]
    pub fn upgrade_cost(&self, level: u32) -> i64 {
        let exponent = i32::try_from(level).unwrap_or(i32::MAX);
        floor_f64_to_i64(i64_to_f64(self.base_cost) * self.cost_multiplier.powi(exponent))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    N,
    R,
    #[serde(rename = "SR")]
    Sr,
    #[serde(rename = "SSR")]
    Ssr,
}

impl Rarity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::R => "R",
            Self::Sr => "SR",
            Self::Ssr => "SSR",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rung of the commander lottery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityTier {
    pub rarity: Rarity,
    pub weight: f64,
    pub min_stat: u32,
    pub max_stat: u32,
    pub cost_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommanderPool {
    pub tiers: Vec<RarityTier>,
    pub titles: Vec<String>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    F,
    E,
    D,
    C,
    B,
    A,
    S,
    #[serde(rename = "SS")]
    Ss,
}

impl Difficulty {
    /// Scale applied to the base power of generated quests.
    #[must_use]
    pub const fn power_multiplier(self) -> f64 {
        match self {
            Self::F => 0.5,
            Self::E => 1.0,
            Self::D => 2.0,
            Self::C => 3.0,
            Self::B => 4.0,
            Self::A => 6.0,
            Self::S => 10.0,
            Self::Ss => 20.0,
        }
    }
}

/// Attribute weighting a quest applies to the deployed army.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBias {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: String,
    pub name: String,
    pub required_power: i64,
    pub difficulty: Difficulty,
    pub reward_gold: i64,
    #[serde(default)]
    pub passive_income: i64,
    #[serde(default)]
    pub passive_pop_cap: i64,
    #[serde(default)]
    pub unlocks: SmallVec<[String; 2]>,
    #[serde(default)]
    pub combat_bias: Option<StatBias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub title: String,
    pub difficulty: Difficulty,
    pub reward_gold: i64,
    pub duration: u32,
    pub danger_level: u32,
    #[serde(default)]
    pub bias: Option<StatBias>,
}

/// Fixed quest offered on day one before the board first regenerates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningQuest {
    pub template: usize,
    pub required_power: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestBoard {
    pub templates: Vec<QuestTemplate>,
    #[serde(default)]
    pub opening: Vec<OpeningQuest>,
}

/// Typed effect applied when an event choice is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventEffect {
    Gold {
        amount: i64,
    },
    Reputation {
        amount: i64,
    },
    GrantUnit {
        archetype: UnitKind,
        name: String,
        count: u32,
        #[serde(default)]
        quality: Quality,
        attributes: Attributes,
        morale: u32,
        stamina: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    pub label: String,
    #[serde(default)]
    pub effects: Vec<EventEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub choices: Vec<EventChoice>,
}

#[derive(Deserialize)]
struct UnitTable {
    archetypes: Vec<UnitArchetype>,
}

#[derive(Deserialize)]
struct BuildingTable {
    buildings: Vec<BuildingConfig>,
}

#[derive(Deserialize)]
struct TerritoryTable {
    territories: Vec<Territory>,
}

#[derive(Deserialize)]
struct EventTable {
    events: Vec<EventDef>,
}

/// Raw JSON sources for every table, used by loaders that fetch assets elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct TableSources<'a> {
    pub units: &'a str,
    pub buildings: &'a str,
    pub commanders: &'a str,
    pub territories: &'a str,
    pub quests: &'a str,
    pub events: &'a str,
}

impl TableSources<'static> {
    /// The tables compiled into the crate.
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            units: UNITS_JSON,
            buildings: BUILDINGS_JSON,
            commanders: COMMANDERS_JSON,
            territories: TERRITORIES_JSON,
            quests: QUESTS_JSON,
            events: EVENTS_JSON,
        }
    }
}

/// All static configuration, validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTables {
    pub archetypes: Vec<UnitArchetype>,
    pub buildings: Vec<BuildingConfig>,
    pub commanders: CommanderPool,
    pub territories: Vec<Territory>,
    pub quests: QuestBoard,
    pub events: Vec<EventDef>,
}

impl GameTables {
    /// Load the tables embedded in the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded asset fails to parse or validate.
    pub fn load_from_static() -> Result<Self, ConfigError> {
        Self::from_sources(&TableSources::embedded())
    }

    /// Parse and validate tables from raw JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if any table cannot be parsed or the combined tables
    /// violate a reference or graph invariant.
    pub fn from_sources(sources: &TableSources<'_>) -> Result<Self, ConfigError> {
        let units: UnitTable = parse_table("units", sources.units)?;
        let buildings: BuildingTable = parse_table("buildings", sources.buildings)?;
        let commanders: CommanderPool = parse_table("commanders", sources.commanders)?;
        let territories: TerritoryTable = parse_table("territories", sources.territories)?;
        let quests: QuestBoard = parse_table("quests", sources.quests)?;
        let events: EventTable = parse_table("events", sources.events)?;
        let tables = Self {
            archetypes: units.archetypes,
            buildings: buildings.buildings,
            commanders,
            territories: territories.territories,
            quests,
            events: events.events,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Check cross-table references and the campaign graph shape.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in UnitKind::ALL {
            if self.archetype(kind).is_none() {
                return Err(ConfigError::MissingArchetype(kind));
            }
        }
        ensure_unique("units", self.archetypes.iter().map(|a| a.kind.to_string()))?;

        for kind in BuildingKind::ALL {
            if self.building(kind).is_none() {
                return Err(ConfigError::MissingBuilding(kind));
            }
        }

        self.validate_commanders()?;
        self.validate_campaign()?;

        if self.quests.templates.is_empty() {
            return Err(ConfigError::EmptyTable { table: "quests" });
        }
        for opening in &self.quests.opening {
            if opening.template >= self.quests.templates.len() {
                return Err(ConfigError::OpeningTemplate {
                    index: opening.template,
                    available: self.quests.templates.len(),
                });
            }
        }

        if self.events.is_empty() {
            return Err(ConfigError::EmptyTable { table: "events" });
        }
        ensure_unique("events", self.events.iter().map(|e| e.id.clone()))?;
        for event in &self.events {
            if event.choices.is_empty() {
                return Err(ConfigError::EventWithoutChoices(event.id.clone()));
            }
            let empty_grant = event.choices.iter().flat_map(|c| &c.effects).any(|effect| {
                matches!(effect, EventEffect::GrantUnit { count, .. } if *count == 0)
            });
            if empty_grant {
                return Err(ConfigError::EmptyUnitGrant {
                    event: event.id.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_commanders(&self) -> Result<(), ConfigError> {
        let pool = &self.commanders;
        if pool.tiers.is_empty() {
            return Err(ConfigError::EmptyTable { table: "rarity tiers" });
        }
        if pool.names.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: "commander names",
            });
        }
        if pool.titles.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: "commander titles",
            });
        }
        let total: f64 = pool.tiers.iter().map(|tier| tier.weight).sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(ConfigError::RarityWeights { total });
        }
        for tier in &pool.tiers {
            if tier.min_stat > tier.max_stat {
                return Err(ConfigError::StatBounds {
                    rarity: tier.rarity,
                    min: tier.min_stat,
                    max: tier.max_stat,
                });
            }
        }
        Ok(())
    }

    fn validate_campaign(&self) -> Result<(), ConfigError> {
        if self.territories.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: "territories",
            });
        }
        ensure_unique("territories", self.territories.iter().map(|t| t.id.clone()))?;

        let known: HashSet<&str> = self.territories.iter().map(|t| t.id.as_str()).collect();
        for territory in &self.territories {
            if let Some(target) = territory
                .unlocks
                .iter()
                .find(|target| !known.contains(target.as_str()))
            {
                return Err(ConfigError::UnknownUnlock {
                    territory: territory.id.clone(),
                    target: target.clone(),
                });
            }
        }

        let roots = self.root_territories();
        if roots.len() != 1 {
            return Err(ConfigError::CampaignRoots { roots: roots.len() });
        }

        let edges: HashMap<&str, &[String]> = self
            .territories
            .iter()
            .map(|t| (t.id.as_str(), t.unlocks.as_slice()))
            .collect();
        let mut finished: HashSet<&str> = HashSet::new();
        for territory in &self.territories {
            let mut visiting: HashSet<&str> = HashSet::new();
            if let Some(cycle_at) =
                find_cycle(territory.id.as_str(), &edges, &mut visiting, &mut finished)
            {
                return Err(ConfigError::CampaignCycle {
                    territory: cycle_at.to_string(),
                });
            }
        }
        Ok(())
    }

    fn root_territories(&self) -> Vec<&Territory> {
        let targets: HashSet<&str> = self
            .territories
            .iter()
            .flat_map(|t| t.unlocks.iter().map(String::as_str))
            .collect();
        self.territories
            .iter()
            .filter(|t| !targets.contains(t.id.as_str()))
            .collect()
    }

    /// The single territory no other territory unlocks.
    ///
    /// Validated tables always have exactly one; unvalidated ones fall back to
    /// the first entry.
    #[must_use]
    pub fn start_territory(&self) -> Option<&Territory> {
        self.root_territories()
            .into_iter()
            .next()
            .or_else(|| self.territories.first())
    }

    #[must_use]
    pub fn archetype(&self, kind: UnitKind) -> Option<&UnitArchetype> {
        self.archetypes.iter().find(|a| a.kind == kind)
    }

    #[must_use]
    pub fn building(&self, kind: BuildingKind) -> Option<&BuildingConfig> {
        self.buildings.iter().find(|b| b.kind == kind)
    }

    #[must_use]
    pub fn territory(&self, id: &str) -> Option<&Territory> {
        self.territories.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn event(&self, id: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.id == id)
    }
}

fn ensure_unique(
    table: &'static str,
    ids: impl IntoIterator<Item = String>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            return Err(ConfigError::DuplicateId { table, id });
        }
    }
    Ok(())
}

fn find_cycle<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, &'a [String]>,
    visiting: &mut HashSet<&'a str>,
    finished: &mut HashSet<&'a str>,
) -> Option<&'a str> {
    if finished.contains(node) {
        return None;
    }
    if !visiting.insert(node) {
        return Some(node);
    }
    for next in edges.get(node).copied().unwrap_or_default() {
        if let Some(hit) = find_cycle(next.as_str(), edges, visiting, finished) {
            return Some(hit);
        }
    }
    visiting.remove(node);
    finished.insert(node);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_load_and_validate() {
        let tables = GameTables::load_from_static().unwrap();
        assert_eq!(tables.archetypes.len(), UnitKind::ALL.len());
        assert_eq!(tables.commanders.tiers.len(), 4);
        assert_eq!(tables.start_territory().unwrap().id, "t_start");
        assert_eq!(tables.events.len(), 3);
        let infantry = tables.archetype(UnitKind::Infantry).unwrap();
        assert_eq!(infantry.cost, 50);
        assert_eq!(infantry.attributes.power, 10);
    }

    #[test]
    fn unit_kind_display_matches_wire_name() {
        for kind in UnitKind::ALL {
            let wire = serde_json::to_string(&kind).unwrap();
            assert_eq!(wire, format!("\"{kind}\""));
        }
    }

    #[test]
    fn building_cost_curve_compounds() {
        let tables = GameTables::load_from_static().unwrap();
        let barracks = tables.building(BuildingKind::Barracks).unwrap();
        assert_eq!(barracks.upgrade_cost(0), 2_000);
        assert_eq!(barracks.upgrade_cost(1), 3_000);
        assert_eq!(barracks.upgrade_cost(2), 4_500);
    }

    #[test]
    fn quality_scaling_floors_attributes() {
        let base = Attributes {
            power: 10,
            mobility: 10,
            range: 5,
            magic: 0,
        };
        let veteran = base.scaled(Quality::Veteran.multiplier());
        assert_eq!(veteran.power, 12);
        assert_eq!(veteran.range, 6);
        let elite = base.scaled(Quality::Elite.multiplier());
        assert_eq!(elite.power, 15);
        assert_eq!(elite.range, 7);
    }

    #[test]
    fn cyclic_campaign_is_rejected() {
        let mut tables = GameTables::load_from_static().unwrap();
        let fort = tables
            .territories
            .iter_mut()
            .find(|t| t.id == "t_capital")
            .unwrap();
        fort.unlocks.push("t_mine".to_string());
        let err = tables.validate().unwrap_err();
        assert!(matches!(err, ConfigError::CampaignCycle { .. }), "{err}");
    }

    #[test]
    fn dangling_unlock_is_rejected() {
        let mut tables = GameTables::load_from_static().unwrap();
        tables.territories[0].unlocks.push("t_nowhere".to_string());
        let err = tables.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownUnlock { ref target, .. } if target == "t_nowhere"
        ));
    }

    #[test]
    fn rarity_weights_must_sum_to_one() {
        let mut tables = GameTables::load_from_static().unwrap();
        tables.commanders.tiers[0].weight = 0.9;
        assert!(matches!(
            tables.validate(),
            Err(ConfigError::RarityWeights { .. })
        ));
    }

    #[test]
    fn malformed_json_reports_table() {
        let sources = TableSources {
            events: "{ not json",
            ..TableSources::embedded()
        };
        let err = GameTables::from_sources(&sources).unwrap_err();
        assert!(err.to_string().contains("events"));
    }

    #[test]
    fn event_effects_parse_as_tagged_variants() {
        let tables = GameTables::load_from_static().unwrap();
        let refugees = tables.event("evt_refugees").unwrap();
        assert!(matches!(
            refugees.choices[0].effects[2],
            EventEffect::GrantUnit { count: 20, archetype: UnitKind::Infantry, .. }
        ));
        assert!(tables.event("evt_merchant").unwrap().choices[2].effects.is_empty());
    }
}
