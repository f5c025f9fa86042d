use schema::{Generation, PokemonType, StatName};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Shown when a record carries no usable artwork.
pub const PLACEHOLDER_IMAGE: &str = "/images/pokeball-placeholder.png";

/// A catalog record as list, search and detail queries return it.
///
/// Field names follow the remote schema so rows decode straight off the wire
/// and persist verbatim inside the comparison set. Every relation defaults to
/// empty so a sparse row never fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32, // decimetres
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: u32, // hectograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_experience: Option<u32>,
    #[serde(
        rename = "pokemon_v2_pokemonsprites",
        default,
        deserialize_with = "null_as_default"
    )]
    pub sprites: Vec<SpriteRow>,
    #[serde(
        rename = "pokemon_v2_pokemontypes",
        default,
        deserialize_with = "null_as_default"
    )]
    pub types: Vec<TypeSlot>,
    #[serde(
        rename = "pokemon_v2_pokemonstats",
        default,
        deserialize_with = "null_as_default"
    )]
    pub stats: Vec<StatEntry>,
    #[serde(
        rename = "pokemon_v2_pokemonspecy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub species: Option<SpeciesInfo>,
    #[serde(
        rename = "pokemon_v2_pokemonabilities",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub abilities: Vec<AbilitySlot>,
    #[serde(
        rename = "pokemon_v2_pokemonmoves",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub moves: Vec<LearnedMove>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "pokemon_v2_type")]
    pub type_ref: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_stat: u16,
    #[serde(rename = "pokemon_v2_stat")]
    pub stat: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteRow {
    #[serde(deserialize_with = "deserialize_sprites", default)]
    pub sprites: SpriteSet,
}

/// The subset of the sprite payload we render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_shiny: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(
        rename = "official-artwork",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub official_artwork: Option<FrontSprite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<FrontSprite>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontSprite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_default: Option<String>,
}

/// Reads an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The sprites column is JSON, but older deployments serve it as an encoded
/// string. Accept both; anything unreadable becomes an empty set.
fn deserialize_sprites<'de, D>(deserializer: D) -> Result<SpriteSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let value = match raw {
        serde_json::Value::String(text) => match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(SpriteSet::default()),
        },
        other => other,
    };
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution_chain_id: Option<u32>,
    #[serde(
        rename = "pokemon_v2_pokemonspeciesflavortexts",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub flavor_texts: Vec<FlavorText>,
    #[serde(
        rename = "pokemon_v2_evolutionchain",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub evolution_chain: Option<EvolutionChain>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySlot {
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(rename = "pokemon_v2_ability")]
    pub ability: Ability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: u32,
    pub name: String,
    #[serde(rename = "pokemon_v2_abilityeffecttexts", default)]
    pub effect_texts: Vec<EffectText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectText {
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub short_effect: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedMove {
    #[serde(default)]
    pub level: u32,
    #[serde(rename = "pokemon_v2_move")]
    pub move_info: MoveInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub pp: Option<u32>,
    #[serde(rename = "pokemon_v2_type", default)]
    pub move_type: Option<NamedRef>,
    #[serde(rename = "pokemon_v2_movedamageclass", default)]
    pub damage_class: Option<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionChain {
    #[serde(rename = "pokemon_v2_pokemonspecies", default)]
    pub species: Vec<EvolutionSpecies>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionSpecies {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub evolves_from_species_id: Option<u32>,
    #[serde(rename = "pokemon_v2_pokemonevolutions", default)]
    pub evolutions: Vec<EvolutionDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionDetail {
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(rename = "pokemon_v2_evolutiontrigger", default)]
    pub trigger: Option<NamedRef>,
    #[serde(rename = "pokemon_v2_item", default)]
    pub item: Option<NamedRef>,
}

/// One step of an evolution line, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionStage {
    pub species_id: u32,
    pub name: String,
    pub depth: usize,
    pub min_level: Option<u32>,
    pub trigger: Option<String>,
    pub item: Option<String>,
}

impl Pokemon {
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|slot| slot.type_ref.name.as_str()).collect()
    }

    pub fn primary_type(&self) -> Option<PokemonType> {
        self.types
            .first()
            .and_then(|slot| slot.type_ref.name.parse().ok())
    }

    /// Base value for the named stat, or 0 when the row doesn't carry it.
    pub fn stat_value(&self, stat: StatName) -> u16 {
        self.stats
            .iter()
            .find(|entry| entry.stat.name == stat.api_name())
            .map(|entry| entry.base_stat)
            .unwrap_or(0)
    }

    pub fn base_stat_total(&self) -> u32 {
        self.stats.iter().map(|entry| u32::from(entry.base_stat)).sum()
    }

    pub fn generation(&self) -> Option<Generation> {
        self.species
            .as_ref()
            .and_then(|species| species.generation_id)
            .and_then(|id| u8::try_from(id).ok())
            .and_then(Generation::new)
    }

    /// Best available artwork: official artwork, then home render, then the
    /// basic front sprite, then the placeholder.
    pub fn image_url(&self) -> &str {
        let Some(sprites) = self.sprites.first().map(|row| &row.sprites) else {
            return PLACEHOLDER_IMAGE;
        };
        let other = sprites.other.as_ref();
        other
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|s| s.front_default.as_deref())
            .or_else(|| {
                other
                    .and_then(|o| o.home.as_ref())
                    .and_then(|s| s.front_default.as_deref())
            })
            .or(sprites.front_default.as_deref())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// The species' flavour text with the catalog's embedded line and page
    /// breaks collapsed to single spaces.
    pub fn description(&self) -> Option<String> {
        let text = self
            .species
            .as_ref()?
            .flavor_texts
            .first()?
            .flavor_text
            .as_str();
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        (!cleaned.is_empty()).then_some(cleaned)
    }

    /// The evolution line this record belongs to, base form first.
    pub fn evolution_stages(&self) -> Vec<EvolutionStage> {
        self.species
            .as_ref()
            .and_then(|species| species.evolution_chain.as_ref())
            .map(EvolutionChain::stages)
            .unwrap_or_default()
    }

    /// Height in metres.
    pub fn height_m(&self) -> f32 {
        self.height as f32 / 10.0
    }

    /// Weight in kilograms.
    pub fn weight_kg(&self) -> f32 {
        self.weight as f32 / 10.0
    }

    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }
}

impl EvolutionChain {
    /// Orders the chain by walking `evolves_from_species_id` links from the
    /// base form(s). Species whose parent is missing from the payload are
    /// treated as roots.
    pub fn stages(&self) -> Vec<EvolutionStage> {
        let known: Vec<u32> = self.species.iter().map(|s| s.id).collect();
        let mut stages = Vec::with_capacity(self.species.len());
        let mut frontier: Vec<(u32, usize)> = self
            .species
            .iter()
            .filter(|s| match s.evolves_from_species_id {
                Some(parent) => !known.contains(&parent),
                None => true,
            })
            .map(|s| (s.id, 0))
            .collect();
        frontier.sort_by_key(|(id, _)| *id);

        let mut index = 0;
        while index < frontier.len() {
            let (id, depth) = frontier[index];
            index += 1;
            let Some(species) = self.species.iter().find(|s| s.id == id) else {
                continue;
            };
            let evolution = species.evolutions.first();
            stages.push(EvolutionStage {
                species_id: species.id,
                name: species.name.clone(),
                depth,
                min_level: evolution.and_then(|e| e.min_level),
                trigger: evolution
                    .and_then(|e| e.trigger.as_ref())
                    .map(|t| t.name.clone()),
                item: evolution
                    .and_then(|e| e.item.as_ref())
                    .map(|i| i.name.clone()),
            });
            let mut children: Vec<u32> = self
                .species
                .iter()
                .filter(|s| s.evolves_from_species_id == Some(id))
                .map(|s| s.id)
                .collect();
            children.sort_unstable();
            frontier.extend(children.into_iter().map(|child| (child, depth + 1)));
        }
        stages
    }
}

impl fmt::Display for Pokemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:04} {}", self.id, self.display_name())?;
        let types = self.type_names();
        if !types.is_empty() {
            write!(f, " [{}]", types.join("/"))?;
        }
        // Alternate form also lists the stats the row carries.
        if f.alternate() && !self.stats.is_empty() {
            for entry in &self.stats {
                let label = StatName::from_api_name(&entry.stat.name)
                    .map(|s| s.label())
                    .unwrap_or(entry.stat.name.as_str());
                write!(f, "\n  {:<12}{:>3}", label, entry.base_stat)?;
            }
        }
        Ok(())
    }
}

/// "mr-mime" -> "Mr Mime".
pub fn capitalize(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal list-view row with the given stats (hp, attack, ...).
    pub fn pokemon(id: u32, name: &str, types: &[&str], stats: &[(StatName, u16)]) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            height: 0,
            weight: 0,
            base_experience: None,
            sprites: Vec::new(),
            types: types
                .iter()
                .map(|t| TypeSlot {
                    type_ref: NamedRef {
                        id: None,
                        name: t.to_string(),
                    },
                })
                .collect(),
            stats: stats
                .iter()
                .map(|(stat, value)| StatEntry {
                    base_stat: *value,
                    stat: NamedRef {
                        id: None,
                        name: stat.api_name().to_string(),
                    },
                })
                .collect(),
            species: None,
            abilities: Vec::new(),
            moves: Vec::new(),
        }
    }

    pub fn named(id: u32, name: &str) -> Pokemon {
        pokemon(id, name, &["normal"], &[])
    }
}
