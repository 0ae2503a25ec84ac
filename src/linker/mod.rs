//! Cross-linking reagents.
//!
//! A [`Linker`] joins two [`ReactionGroup`]s and carries one mass per
//! reaction category. A category without a mass is disabled: the linker
//! never produces candidates of that kind.
//!
//! | linker       | interlink | intralink | deadend              | groups          |
//! |--------------|-----------|-----------|----------------------|-----------------|
//! | light-bs3    | 138.06808 | 138.06808 | 138.06808 + H2O      | Nh2, Nh2        |
//! | heavy-bs3    | 150.15    | 150.15    | 150.15 + H2O         | Nh2, Nh2        |
//! | edc          | -19.018   | -19.018   | 43.042               | Carboxyl, Lys   |
//! | formaldehyde | 12.0      | 12.0      | 12.0                 | Lys, Lys        |
//! | disulfide    | -2.0156   | -2.0156   | disabled             | Cys, Cys        |

mod group;

use std::fmt;
use std::sync::LazyLock;

use crate::mass::constants;

pub use group::{IntraReactionGroup, ReactionGroup};

/// Symbol used to mark the linked residue in reports.
pub const DEFAULT_LINKER_SYMBOL: char = '!';

/// Name of the linker used when none is configured.
pub const DEFAULT_LINKER: &str = "light-bs3";

static BUILTIN_LINKERS: LazyLock<Vec<Linker>> = LazyLock::new(|| {
    let bs3 = |name: &str, mass: f64| {
        Linker::new(name, ReactionGroup::nh2(), ReactionGroup::nh2())
            .with_interlink(mass)
            .with_intralink(mass)
            .with_deadend(mass + constants::H2O)
    };
    vec![
        bs3("light-bs3", 138.06808),
        bs3("heavy-bs3", 150.15),
        Linker::new("edc", ReactionGroup::carboxyl(), ReactionGroup::lys())
            .with_interlink(-19.018)
            .with_intralink(-19.018)
            .with_deadend(43.042),
        Linker::new("formaldehyde", ReactionGroup::lys(), ReactionGroup::lys())
            .with_interlink(12.0)
            .with_intralink(12.0)
            .with_deadend(12.0),
        Linker::new("disulfide", ReactionGroup::cys(), ReactionGroup::cys())
            .with_interlink(-2.0156)
            .with_intralink(-2.0156),
    ]
});

/// Every built-in linker.
pub fn builtin_linkers() -> &'static [Linker] {
    &BUILTIN_LINKERS
}

/// A cross-linking reagent.
#[derive(Debug, Clone, PartialEq)]
pub struct Linker {
    name: String,
    symbol: char,
    interlink_mass: Option<f64>,
    intralink_mass: Option<f64>,
    deadend_mass: Option<f64>,
    group1: ReactionGroup,
    group2: ReactionGroup,
    intra_group: IntraReactionGroup,
}

impl Linker {
    /// A linker between two groups with every category disabled.
    pub fn new(name: impl Into<String>, group1: ReactionGroup, group2: ReactionGroup) -> Self {
        let intra_group = IntraReactionGroup::new(&group1, &group2);
        Self {
            name: name.into(),
            symbol: DEFAULT_LINKER_SYMBOL,
            interlink_mass: None,
            intralink_mass: None,
            deadend_mass: None,
            group1,
            group2,
            intra_group,
        }
    }

    /// Look up a built-in linker by name.
    pub fn builtin(name: &str) -> Option<Self> {
        builtin_linkers()
            .iter()
            .find(|linker| linker.name == name)
            .cloned()
    }

    /// Replace the report symbol.
    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }

    /// Enable interlinks adding `mass`.
    pub fn with_interlink(mut self, mass: f64) -> Self {
        self.interlink_mass = Some(mass);
        self
    }

    /// Enable intralinks adding `mass`.
    pub fn with_intralink(mut self, mass: f64) -> Self {
        self.intralink_mass = Some(mass);
        self
    }

    /// Enable deadends adding `mass`.
    pub fn with_deadend(mut self, mass: f64) -> Self {
        self.deadend_mass = Some(mass);
        self
    }

    /// Linker name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Report symbol.
    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Mass added by an interlink, if enabled.
    pub fn interlink_mass(&self) -> Option<f64> {
        self.interlink_mass
    }

    /// Mass added by an intralink, if enabled.
    pub fn intralink_mass(&self) -> Option<f64> {
        self.intralink_mass
    }

    /// Mass added by a deadend, if enabled.
    pub fn deadend_mass(&self) -> Option<f64> {
        self.deadend_mass
    }

    /// Whether the linker forms interlinks.
    pub fn can_interlink(&self) -> bool {
        self.interlink_mass.is_some()
    }

    /// Whether the linker forms intralinks.
    pub fn can_intralink(&self) -> bool {
        self.intralink_mass.is_some()
    }

    /// Whether the linker forms deadends.
    pub fn can_deadend(&self) -> bool {
        self.deadend_mass.is_some()
    }

    /// Group bound by the first end.
    pub fn group1(&self) -> &ReactionGroup {
        &self.group1
    }

    /// Group bound by the second end.
    pub fn group2(&self) -> &ReactionGroup {
        &self.group2
    }

    /// Both ends on one peptide.
    pub fn intra_group(&self) -> &IntraReactionGroup {
        &self.intra_group
    }

    /// Whether both ends bind the same sites.
    pub fn is_symmetric(&self) -> bool {
        self.group1 == self.group2
    }
}

impl fmt::Display for Linker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mass = |m: Option<f64>| m.map_or_else(|| "-".to_string(), |m| format!("{m:.5}"));
        write!(
            f,
            "{} ({}) inter={} intra={} deadend={} groups={} {}",
            self.name,
            self.symbol,
            mass(self.interlink_mass),
            mass(self.intralink_mass),
            mass(self.deadend_mass),
            self.group1,
            self.group2
        )
    }
}
