//! Normalized geographic taxonomy (Province → District → Local level → Ward),
//! with free-text local addresses hanging off each ward.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{clean_name, keep_node};
use crate::refs::{CompositeLocationRef, LocationLevel, LocationRef};
use crate::taxonomy::raw::{RawDistrict, RawLocalLevel, RawProvince, RawWard};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardNode {
    pub id: i64,
    pub ward_number: Option<String>,
    /// Addressed only by position; index 0 doubles as "unspecified".
    pub local_addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalLevelNode {
    pub id: i64,
    pub name: String,
    pub kind: Option<String>,
    pub wards: Vec<WardNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictNode {
    pub id: i64,
    pub name: String,
    pub local_levels: Vec<LocalLevelNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceNode {
    pub id: i64,
    pub name: String,
    pub districts: Vec<DistrictNode>,
}

impl WardNode {
    #[must_use]
    pub fn label(&self) -> String {
        match &self.ward_number {
            Some(number) => format!("Ward {number}"),
            None => format!("Ward #{}", self.id),
        }
    }

    /// The ward itself plus one composite per local address.
    pub fn leaves(&self) -> impl Iterator<Item = CompositeLocationRef> + '_ {
        let ward = self.id;
        std::iter::once(CompositeLocationRef::Ward(ward)).chain(
            (0..self.local_addresses.len())
                .filter_map(move |index| u32::try_from(index).ok())
                .map(move |index| CompositeLocationRef::Address { ward, index }),
        )
    }
}

impl LocalLevelNode {
    pub fn wards(&self) -> impl Iterator<Item = &WardNode> {
        self.wards.iter()
    }
}

impl DistrictNode {
    pub fn wards(&self) -> impl Iterator<Item = &WardNode> {
        self.local_levels.iter().flat_map(LocalLevelNode::wards)
    }
}

impl ProvinceNode {
    pub fn wards(&self) -> impl Iterator<Item = &WardNode> {
        self.districts.iter().flat_map(DistrictNode::wards)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationTree {
    provinces: Vec<ProvinceNode>,
}

impl LocationTree {
    #[must_use]
    pub fn from_raw(raw: Vec<RawProvince>) -> Self {
        let provinces = raw.into_iter().filter_map(normalize_province).collect();
        Self { provinces }
    }

    #[must_use]
    pub fn new(provinces: Vec<ProvinceNode>) -> Self {
        Self { provinces }
    }

    #[must_use]
    pub fn provinces(&self) -> &[ProvinceNode] {
        &self.provinces
    }

    pub fn wards(&self) -> impl Iterator<Item = &WardNode> {
        self.provinces.iter().flat_map(ProvinceNode::wards)
    }

    #[must_use]
    pub fn find_ward(&self, id: i64) -> Option<&WardNode> {
        self.wards().find(|w| w.id == id)
    }

    /// Whether `target` names a node present in the tree.
    #[must_use]
    pub fn contains(&self, target: LocationRef) -> bool {
        self.wards_under(target).is_some()
    }

    /// Wards beneath (or equal to) `target`, or `None` when `target` is unknown.
    #[must_use]
    pub fn wards_under(&self, target: LocationRef) -> Option<Vec<&WardNode>> {
        let id = target.id;
        match target.level {
            LocationLevel::Province => self
                .provinces
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.wards().collect()),
            LocationLevel::District => self
                .provinces
                .iter()
                .flat_map(|p| p.districts.iter())
                .find(|d| d.id == id)
                .map(|d| d.wards().collect()),
            LocationLevel::LocalLevel => self
                .provinces
                .iter()
                .flat_map(|p| p.districts.iter())
                .flat_map(|d| d.local_levels.iter())
                .find(|l| l.id == id)
                .map(|l| l.wards().collect()),
            LocationLevel::Ward => self.find_ward(id).map(|w| vec![w]),
        }
    }

    /// The authoritative leaf set of a branch: every ward id and every
    /// `ward-index` composite beneath it. Empty when `target` is unknown.
    #[must_use]
    pub fn leaf_set(&self, target: LocationRef) -> BTreeSet<CompositeLocationRef> {
        self.wards_under(target)
            .unwrap_or_default()
            .into_iter()
            .flat_map(WardNode::leaves)
            .collect()
    }
}

fn normalize_province(raw: RawProvince) -> Option<ProvinceNode> {
    let districts: Vec<DistrictNode> = raw
        .districts
        .into_iter()
        .filter_map(normalize_district)
        .collect();
    let name = clean_name(raw.name);
    let id = keep_node("province", raw.id, &name, !districts.is_empty())?;
    Some(ProvinceNode {
        id,
        name,
        districts,
    })
}

fn normalize_district(raw: RawDistrict) -> Option<DistrictNode> {
    let local_levels: Vec<LocalLevelNode> = raw
        .local_levels
        .into_iter()
        .filter_map(normalize_local_level)
        .collect();
    let name = clean_name(raw.name);
    let id = keep_node("district", raw.id, &name, !local_levels.is_empty())?;
    Some(DistrictNode {
        id,
        name,
        local_levels,
    })
}

fn normalize_local_level(raw: RawLocalLevel) -> Option<LocalLevelNode> {
    let wards: Vec<WardNode> = raw.wards.into_iter().filter_map(normalize_ward).collect();
    let name = clean_name(raw.name);
    let id = keep_node("local_level", raw.id, &name, !wards.is_empty())?;
    Some(LocalLevelNode {
        id,
        name,
        kind: raw.kind.map(|k| k.trim().to_owned()).filter(|k| !k.is_empty()),
        wards,
    })
}

fn normalize_ward(raw: RawWard) -> Option<WardNode> {
    let ward_number = raw
        .ward_number
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty());
    let label = ward_number.clone().unwrap_or_default();
    let id = keep_node("ward", raw.id, &label, !raw.local_addresses.is_empty())?;
    Some(WardNode {
        id,
        ward_number,
        local_addresses: raw.local_addresses,
    })
}
