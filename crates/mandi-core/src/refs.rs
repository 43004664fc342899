//! Tagged references into the category and location taxonomies.
//!
//! Raw ids are only unique within a single taxonomy level, so every node is
//! addressed by a `(level, id)` pair once the taxonomy is loaded. Ward-level
//! selections additionally use [`CompositeLocationRef`], which distinguishes a
//! whole ward from one of its free-text local addresses.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLevel {
    Domain,
    Field,
    Item,
}

impl fmt::Display for CategoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryLevel::Domain => write!(f, "domain"),
            CategoryLevel::Field => write!(f, "field"),
            CategoryLevel::Item => write!(f, "item"),
        }
    }
}

impl FromStr for CategoryLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "domain" => Ok(CategoryLevel::Domain),
            "field" => Ok(CategoryLevel::Field),
            "item" => Ok(CategoryLevel::Item),
            other => Err(format!("unknown category level '{other}'")),
        }
    }
}

/// A category node addressed unambiguously by level and per-level id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub level: CategoryLevel,
    pub id: i64,
}

impl CategoryRef {
    #[must_use]
    pub fn domain(id: i64) -> Self {
        Self {
            level: CategoryLevel::Domain,
            id,
        }
    }

    #[must_use]
    pub fn field(id: i64) -> Self {
        Self {
            level: CategoryLevel::Field,
            id,
        }
    }

    #[must_use]
    pub fn item(id: i64) -> Self {
        Self {
            level: CategoryLevel::Item,
            id,
        }
    }
}

impl fmt::Display for CategoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.id)
    }
}

/// Raw, possibly ambiguous category identifier as handed in by a caller.
///
/// Resolved to a [`CategoryRef`] by [`crate::resolve::resolve_category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLookup {
    #[serde(default)]
    pub level: Option<CategoryLevel>,
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryLookup {
    #[must_use]
    pub fn by_id(id: i64) -> Self {
        Self {
            level: None,
            id,
            name: None,
        }
    }

    #[must_use]
    pub fn named(id: i64, name: impl Into<String>) -> Self {
        Self {
            level: None,
            id,
            name: Some(name.into()),
        }
    }

    #[must_use]
    pub fn tagged(category: CategoryRef) -> Self {
        Self {
            level: Some(category.level),
            id: category.id,
            name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationLevel {
    Province,
    District,
    LocalLevel,
    Ward,
}

impl fmt::Display for LocationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationLevel::Province => write!(f, "province"),
            LocationLevel::District => write!(f, "district"),
            LocationLevel::LocalLevel => write!(f, "local_level"),
            LocationLevel::Ward => write!(f, "ward"),
        }
    }
}

impl FromStr for LocationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "province" => Ok(LocationLevel::Province),
            "district" => Ok(LocationLevel::District),
            "local_level" | "locallevel" => Ok(LocationLevel::LocalLevel),
            "ward" => Ok(LocationLevel::Ward),
            other => Err(format!("unknown location level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationRef {
    pub level: LocationLevel,
    pub id: i64,
}

impl LocationRef {
    #[must_use]
    pub fn province(id: i64) -> Self {
        Self {
            level: LocationLevel::Province,
            id,
        }
    }

    #[must_use]
    pub fn district(id: i64) -> Self {
        Self {
            level: LocationLevel::District,
            id,
        }
    }

    #[must_use]
    pub fn local_level(id: i64) -> Self {
        Self {
            level: LocationLevel::LocalLevel,
            id,
        }
    }

    #[must_use]
    pub fn ward(id: i64) -> Self {
        Self {
            level: LocationLevel::Ward,
            id,
        }
    }
}

/// A selectable ward-level leaf: either the whole ward or one of its local
/// addresses, addressed by position in the ward's address list.
///
/// Text form is `"7"` for a ward and `"7-2"` for address index 2 of ward 7.
/// Serialized as a JSON number for wards and a string for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompositeLocationRef {
    Ward(i64),
    Address { ward: i64, index: u32 },
}

impl CompositeLocationRef {
    #[must_use]
    pub fn ward_id(&self) -> i64 {
        match *self {
            CompositeLocationRef::Ward(ward) | CompositeLocationRef::Address { ward, .. } => ward,
        }
    }

    #[must_use]
    pub fn address_index(&self) -> Option<u32> {
        match *self {
            CompositeLocationRef::Ward(_) => None,
            CompositeLocationRef::Address { index, .. } => Some(index),
        }
    }
}

impl fmt::Display for CompositeLocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeLocationRef::Ward(ward) => write!(f, "{ward}"),
            CompositeLocationRef::Address { ward, index } => write!(f, "{ward}-{index}"),
        }
    }
}

impl FromStr for CompositeLocationRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || CoreError::InvalidLocationRef(s.to_owned());

        match raw.split_once('-') {
            None => raw
                .parse::<i64>()
                .map(CompositeLocationRef::Ward)
                .map_err(|_| invalid()),
            Some((ward, index)) => {
                if ward.is_empty() || index.is_empty() {
                    return Err(invalid());
                }
                let ward = ward.parse::<i64>().map_err(|_| invalid())?;
                let index = index.parse::<u32>().map_err(|_| invalid())?;
                Ok(CompositeLocationRef::Address { ward, index })
            }
        }
    }
}

impl Serialize for CompositeLocationRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CompositeLocationRef::Ward(ward) => serializer.serialize_i64(*ward),
            CompositeLocationRef::Address { .. } => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for CompositeLocationRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CompositeVisitor;

        impl de::Visitor<'_> for CompositeVisitor {
            type Value = CompositeLocationRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a ward id or a \"ward-index\" string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(CompositeLocationRef::Ward(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(CompositeLocationRef::Ward)
                    .map_err(|_| E::custom(format!("ward id {v} out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CompositeVisitor)
    }
}

/// Either a tagged branch ref or a ward-level composite, used where an API
/// accepts any location node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationTarget {
    Branch(LocationRef),
    Leaf(CompositeLocationRef),
}

impl fmt::Display for LocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationTarget::Branch(branch) => write!(f, "{}:{}", branch.level, branch.id),
            LocationTarget::Leaf(leaf) => write!(f, "{leaf}"),
        }
    }
}

/// `"district:27"` names a branch; anything else is read as a composite
/// (`"7"`, `"7-2"`).
impl FromStr for LocationTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((level, id)) = s.split_once(':') else {
            return s.parse().map(LocationTarget::Leaf);
        };
        let invalid = || CoreError::InvalidLocationRef(s.to_owned());
        let level = level.parse::<LocationLevel>().map_err(|_| invalid())?;
        let id = id.trim().parse::<i64>().map_err(|_| invalid())?;
        Ok(LocationTarget::Branch(LocationRef { level, id }))
    }
}
