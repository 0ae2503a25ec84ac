//! Search configuration.
//!
//! A [`Config`] mirrors the configuration file; [`Config::resolve`] validates
//! it into the immutable [`SearchOptions`] every later stage reads.
//!
//! ```toml
//! [job]
//! id = "bs3-run"
//!
//! [digest]
//! protease = "trypsin"
//! trypticity = "full"
//! max_missed_cleavages = 2
//!
//! [sequence]
//! mass_type = "monoisotopic"
//!
//! [sequence.static_mods]
//! residue_mods = [{ residue = "C", mods = ["#"] }]
//! mod_masses = [{ symbol = "#", mass = 57.02146 }]
//!
//! [[linkers]]
//! name = "light-bs3"
//!
//! [analysis.precursor_search]
//! type = "ppm"
//! tolerance = 20.0
//! ```
//!
//! Files ending in `.json` are read as JSON with the same layout.

mod error;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::digest::{CleavageRule, DigestMode, DigestTolerance, DEFAULT_PROTEASE};
use crate::index::SearchTolerance;
use crate::linker::{Linker, ReactionGroup, DEFAULT_LINKER};
use crate::mass::{MassType, ResidueMasses};
use crate::mass_gen::SequenceOptions;
use crate::modification::{ModificationTable, ResidueMods};

pub use error::ConfigError;

/// Default absolute precursor window, in m/z units.
pub const DEFAULT_MZ_TOLERANCE: f64 = 0.6;

/// Default relative precursor window, in ppm.
pub const DEFAULT_PPM_TOLERANCE: f64 = 250.0;

/// Root of a configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Job identification.
    pub job: JobConfig,
    /// Protein digestion.
    pub digest: DigestConfig,
    /// Residue masses and modifications.
    pub sequence: SequenceConfig,
    /// Cross-linkers to search for.
    pub linkers: Vec<LinkerConfig>,
    /// Precursor matching.
    pub analysis: AnalysisConfig,
    /// Worker pool.
    pub runtime: RuntimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job: JobConfig::default(),
            digest: DigestConfig::default(),
            sequence: SequenceConfig::default(),
            linkers: vec![LinkerConfig::builtin(DEFAULT_LINKER)],
            analysis: AnalysisConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Job identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Job name, used for output naming.
    pub id: String,
    /// Who submitted the job.
    pub owner: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            id: "results".to_string(),
            owner: None,
        }
    }
}

/// Protein digestion settings. Upper bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Built-in protease name, or the name of `custom_rule`.
    pub protease: String,
    /// Cleavage patterns replacing the built-in table.
    pub custom_rule: Option<CleavageRuleConfig>,
    /// `full`, `partial` or `none`.
    pub trypticity: String,
    /// Shortest peptide.
    pub min_length: usize,
    /// Longest peptide.
    pub max_length: usize,
    /// Most missed cleavages.
    pub max_missed_cleavages: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            protease: DEFAULT_PROTEASE.to_string(),
            custom_rule: None,
            trypticity: DigestMode::Full.to_string(),
            min_length: 6,
            max_length: 30,
            max_missed_cleavages: 3,
        }
    }
}

/// A custom protease.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleavageRuleConfig {
    /// Regex matching residues the protease cuts after.
    pub cleaves: String,
    /// Regex matching residues that block a cut when they follow it.
    #[serde(default)]
    pub restrict: Option<String>,
}

/// Residue masses and modifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Identifier of the option set.
    pub id: String,
    /// `monoisotopic` or `average`.
    pub mass_type: String,
    /// Extra or overridden residue masses.
    pub additional: Vec<ResidueMassConfig>,
    /// Reverse proteins on load.
    pub reverse: bool,
    /// Always-applied modifications.
    pub static_mods: ModificationConfig,
    /// Optionally applied modifications.
    pub dynamic_mods: ModificationConfig,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            id: "std".to_string(),
            mass_type: MassType::Monoisotopic.to_string(),
            additional: Vec::new(),
            reverse: false,
            static_mods: ModificationConfig::default(),
            dynamic_mods: ModificationConfig::default(),
        }
    }
}

/// Mass of one residue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidueMassConfig {
    /// Residue letter.
    pub residue: char,
    /// Residue mass.
    pub mass: f64,
}

/// One modification table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModificationConfig {
    /// Symbols each residue may carry.
    pub residue_mods: Vec<ResidueModConfig>,
    /// Mass of each symbol.
    pub mod_masses: Vec<ModMassConfig>,
}

/// Symbols one residue may carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidueModConfig {
    /// Residue letter.
    pub residue: char,
    /// Modification symbols.
    pub mods: Vec<char>,
}

/// Mass of one modification symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModMassConfig {
    /// Modification symbol.
    pub symbol: char,
    /// Mass delta.
    pub mass: f64,
}

/// A built-in linker by name, or a custom definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    /// Linker name.
    pub name: String,
    /// Report symbol.
    pub symbol: Option<char>,
    /// Interlink mass; absent disables interlinks.
    pub inter_mass: Option<f64>,
    /// Intralink mass; absent disables intralinks.
    pub intra_mass: Option<f64>,
    /// Deadend mass; absent disables deadends.
    pub deadend_mass: Option<f64>,
    /// One group (used for both ends) or two.
    pub reaction_groups: Option<Vec<ReactionGroupConfig>>,
}

impl LinkerConfig {
    /// Reference to a built-in linker.
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn is_reference(&self) -> bool {
        self.symbol.is_none()
            && self.inter_mass.is_none()
            && self.intra_mass.is_none()
            && self.deadend_mass.is_none()
            && self.reaction_groups.is_none()
    }

    fn resolve(&self) -> Result<Linker, ConfigError> {
        if self.is_reference() {
            return Linker::builtin(&self.name)
                .ok_or_else(|| ConfigError::UnknownLinker(self.name.clone()));
        }
        let groups: Vec<ReactionGroup> = self
            .reaction_groups
            .iter()
            .flatten()
            .map(ReactionGroupConfig::to_group)
            .collect();
        let (group1, group2) = match groups.as_slice() {
            [only] => (only.clone(), only.clone()),
            [first, second] => (first.clone(), second.clone()),
            other => {
                return Err(ConfigError::InvalidReactionGroups {
                    linker: self.name.clone(),
                    count: other.len(),
                })
            }
        };
        let mut linker = Linker::new(self.name.clone(), group1, group2);
        if let Some(symbol) = self.symbol {
            linker = linker.with_symbol(symbol);
        }
        if let Some(mass) = self.inter_mass {
            linker = linker.with_interlink(mass);
        }
        if let Some(mass) = self.intra_mass {
            linker = linker.with_intralink(mass);
        }
        if let Some(mass) = self.deadend_mass {
            linker = linker.with_deadend(mass);
        }
        Ok(linker)
    }
}

/// One end of a custom linker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionGroupConfig {
    /// Residue letters bound.
    pub residues: String,
    /// Binds the protein N-terminus.
    pub binds_n_terminus: bool,
    /// Binds the protein C-terminus.
    pub binds_c_terminus: bool,
}

impl ReactionGroupConfig {
    fn to_group(&self) -> ReactionGroup {
        ReactionGroup::new(self.residues.chars(), self.binds_n_terminus, self.binds_c_terminus)
    }
}

/// Analysis settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Precursor matching window.
    pub precursor_search: PrecursorSearchConfig,
}

/// Precursor matching window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecursorSearchConfig {
    /// `ppm` or `mz`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Window size; defaults depend on the type.
    pub tolerance: Option<f64>,
}

impl Default for PrecursorSearchConfig {
    fn default() -> Self {
        Self {
            kind: "ppm".to_string(),
            tolerance: None,
        }
    }
}

impl PrecursorSearchConfig {
    fn resolve(&self) -> Result<SearchTolerance, ConfigError> {
        let invalid = |value: f64| ConfigError::InvalidTolerance {
            kind: self.kind.clone(),
            value,
        };
        match self.kind.as_str() {
            "ppm" => {
                let ppm = self.tolerance.unwrap_or(DEFAULT_PPM_TOLERANCE);
                if !(0.0..1e6).contains(&ppm) {
                    return Err(invalid(ppm));
                }
                Ok(SearchTolerance::Ppm(ppm))
            }
            "mz" => {
                let window = self.tolerance.unwrap_or(DEFAULT_MZ_TOLERANCE);
                if !(window >= 0.0 && window.is_finite()) {
                    return Err(invalid(window));
                }
                Ok(SearchTolerance::Mass(window))
            }
            other => Err(ConfigError::UnknownToleranceType(other.to_string())),
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Worker threads; 0 uses one per CPU.
    pub threads: usize,
}

/// Validated settings shared read-only by every search task.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Job name.
    pub job_id: String,
    /// Job owner.
    pub owner: Option<String>,
    /// Protease.
    pub rule: CleavageRule,
    /// Required cleavage specificity.
    pub mode: DigestMode,
    /// Peptide acceptance bounds.
    pub digest_tolerance: DigestTolerance,
    /// Residue masses and modifications.
    pub sequence: SequenceOptions,
    /// Linkers to search for.
    pub linkers: Vec<Arc<Linker>>,
    /// Precursor matching window.
    pub precursor_tolerance: SearchTolerance,
    /// Worker threads; 0 uses one per CPU.
    pub threads: usize,
}

impl Config {
    /// Load a configuration file; `.json` files are JSON, anything else TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parse TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate into runtime options.
    pub fn resolve(&self) -> Result<SearchOptions, ConfigError> {
        let digest = &self.digest;
        let rule = match &digest.custom_rule {
            Some(custom) => {
                CleavageRule::new(&digest.protease, &custom.cleaves, custom.restrict.as_deref())
                    .map_err(|source| ConfigError::InvalidCleavageRule {
                        name: digest.protease.clone(),
                        source,
                    })?
            }
            None => CleavageRule::builtin(&digest.protease)
                .ok_or_else(|| ConfigError::UnknownProtease(digest.protease.clone()))?,
        };
        let mode: DigestMode = digest.trypticity.parse().map_err(ConfigError::UnknownTrypticity)?;
        if digest.min_length > digest.max_length {
            return Err(ConfigError::InvalidLengthBounds {
                min: digest.min_length,
                max: digest.max_length,
            });
        }
        let digest_tolerance = DigestTolerance::from_inclusive(
            digest.min_length,
            digest.max_length,
            digest.max_missed_cleavages,
        );

        let linkers = self
            .linkers
            .iter()
            .map(|linker| linker.resolve().map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchOptions {
            job_id: self.job.id.clone(),
            owner: self.job.owner.clone(),
            rule,
            mode,
            digest_tolerance,
            sequence: self.sequence.resolve()?,
            linkers,
            precursor_tolerance: self.analysis.precursor_search.resolve()?,
            threads: self.runtime.threads,
        })
    }
}

impl SequenceConfig {
    fn resolve(&self) -> Result<SequenceOptions, ConfigError> {
        let mass_type: MassType = self.mass_type.parse().map_err(ConfigError::UnknownMassType)?;
        let mut residue_masses = ResidueMasses::standard(mass_type);
        for extra in &self.additional {
            residue_masses.set(extra.residue, extra.mass);
        }
        Ok(SequenceOptions {
            id: self.id.clone(),
            mass_type,
            residue_masses,
            static_mods: self.static_mods.resolve()?,
            dynamic_mods: self.dynamic_mods.resolve()?,
            reverse: self.reverse,
        })
    }
}

impl ModificationConfig {
    fn resolve(&self) -> Result<ModificationTable, ConfigError> {
        let masses: BTreeMap<char, f64> =
            self.mod_masses.iter().map(|m| (m.symbol, m.mass)).collect();
        let mut residue_mods = ResidueMods::new();
        for entry in &self.residue_mods {
            for &symbol in &entry.mods {
                if !masses.contains_key(&symbol) {
                    return Err(ConfigError::MissingModMass(symbol));
                }
                residue_mods.entry(entry.residue).or_default().insert(symbol);
            }
        }
        Ok(ModificationTable::from_maps(residue_mods, masses))
    }
}
