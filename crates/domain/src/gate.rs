//! Category gate
//!
//! Decides, per category, whether the caller may see it and which query
//! variant to run. The rules live in [`GATE_TABLE`] as data: each category
//! has an optional coarse capability and a list of alternatives, where an
//! alternative is satisfied when its request flag is set and its capability
//! is held. Gyms and pokestops are the only categories with two alternatives
//! (raids and quests are subset views over the same records).

use crate::capability::{Capability, CapabilitySet};
use crate::category::{Category, CategoryRequest, RequestFlag};

/// One way a category can become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    pub flag: RequestFlag,
    pub capability: Capability,
}

/// Gate rule for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateRule {
    pub category: Category,
    /// Must be held before any alternative is considered.
    pub coarse: Option<Capability>,
    pub alternatives: &'static [Alternative],
}

const fn alt(flag: RequestFlag, capability: Capability) -> Alternative {
    Alternative { flag, capability }
}

pub const GATE_TABLE: [GateRule; 8] = [
    GateRule {
        category: Category::Gyms,
        coarse: Some(Capability::ViewMap),
        alternatives: &[
            alt(RequestFlag::Gyms, Capability::ViewMapGym),
            alt(RequestFlag::Raids, Capability::ViewMapRaid),
        ],
    },
    GateRule {
        category: Category::Pokestops,
        coarse: Some(Capability::ViewMap),
        alternatives: &[
            alt(RequestFlag::Pokestops, Capability::ViewMapPokestop),
            alt(RequestFlag::Quests, Capability::ViewMapQuest),
        ],
    },
    GateRule {
        category: Category::Pokemon,
        coarse: Some(Capability::ViewMap),
        alternatives: &[alt(RequestFlag::Pokemon, Capability::ViewMapPokemon)],
    },
    GateRule {
        category: Category::Spawnpoints,
        coarse: Some(Capability::ViewMap),
        alternatives: &[alt(RequestFlag::Spawnpoints, Capability::ViewMapSpawnpoint)],
    },
    GateRule {
        category: Category::PokemonFilters,
        coarse: Some(Capability::ViewMap),
        alternatives: &[alt(RequestFlag::PokemonFilter, Capability::ViewMap)],
    },
    // Fleet views: a map-only grant must never reach these.
    GateRule {
        category: Category::Devices,
        coarse: None,
        alternatives: &[alt(RequestFlag::Devices, Capability::AdminSetting)],
    },
    GateRule {
        category: Category::Instances,
        coarse: None,
        alternatives: &[alt(RequestFlag::Instances, Capability::AdminSetting)],
    },
    GateRule {
        category: Category::Assignments,
        coarse: None,
        alternatives: &[alt(RequestFlag::Assignments, Capability::AdminSetting)],
    },
];

/// Variant flags for the gym query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GymQuery {
    /// Only gyms with an active raid.
    pub raids_only: bool,
    /// Populate raid sub-fields.
    pub show_raids: bool,
}

/// Variant flags for the pokestop query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PokestopQuery {
    /// Only stops carrying a quest.
    pub quests_only: bool,
    /// Populate quest sub-fields.
    pub show_quests: bool,
}

/// Which query to run for a permitted category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryVariant {
    Gyms(GymQuery),
    Pokestops(PokestopQuery),
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Denied,
    Allowed(QueryVariant),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed(_))
    }
}

impl GateRule {
    /// Evaluate this rule for one caller.
    pub fn decide(&self, request: &CategoryRequest, caps: &CapabilitySet) -> GateDecision {
        if let Some(coarse) = self.coarse {
            if !caps.contains(coarse) {
                return GateDecision::Denied;
            }
        }

        let satisfied = |flag: RequestFlag| {
            self.alternatives
                .iter()
                .any(|a| a.flag == flag && request.is_set(a.flag) && caps.contains(a.capability))
        };

        if !self.alternatives.iter().any(|a| satisfied(a.flag)) {
            return GateDecision::Denied;
        }

        let variant = match self.category {
            // A caller who asked for gyms without the gym grant only gets
            // the raid subset.
            Category::Gyms => QueryVariant::Gyms(GymQuery {
                raids_only: !satisfied(RequestFlag::Gyms),
                show_raids: caps.contains(Capability::ViewMapRaid),
            }),
            Category::Pokestops => QueryVariant::Pokestops(PokestopQuery {
                quests_only: !satisfied(RequestFlag::Pokestops),
                show_quests: caps.contains(Capability::ViewMapQuest),
            }),
            _ => QueryVariant::Plain,
        };

        GateDecision::Allowed(variant)
    }
}

/// Look up the rule for a category.
pub fn rule_for(category: Category) -> &'static GateRule {
    // GATE_TABLE is laid out in declaration order of Category.
    &GATE_TABLE[category as usize]
}

/// One decision per category, in `Category::ALL` order.
pub fn evaluate(request: &CategoryRequest, caps: &CapabilitySet) -> Vec<(Category, GateDecision)> {
    Category::ALL
        .into_iter()
        .map(|category| (category, rule_for(category).decide(request, caps)))
        .collect()
}
