//! Protease cleavage rules.

use regex::Regex;

/// Built-in protease definitions: name, cleaving residues, residues that block
/// cleavage when they follow the site.
pub const BUILTIN_RULES: &[(&str, &str, Option<&str>)] = &[
    ("trypsin", "[KR]", Some("P")),
    ("chemotrypsin", "[YWFLM]", Some("P")),
    ("gluc", "[DE]", Some("P")),
    ("photo", "[KRkr]", Some("[Pp]")),
];

/// Name of the default protease.
pub const DEFAULT_PROTEASE: &str = "trypsin";

/// Where a protease cuts: after every residue matched by `cleaves`, unless the
/// next residue matches `restrict`.
#[derive(Debug, Clone)]
pub struct CleavageRule {
    name: String,
    cleaves: Regex,
    restrict: Option<Regex>,
}

impl CleavageRule {
    /// Compile a rule from regular expressions over residues.
    pub fn new(
        name: impl Into<String>,
        cleaves: &str,
        restrict: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let cleaves = Regex::new(cleaves)?;
        let restrict = match restrict {
            Some(pattern) => Some(Regex::new(&format!("^(?:{pattern})"))?),
            None => None,
        };
        Ok(Self {
            name: name.into(),
            cleaves,
            restrict,
        })
    }

    /// Look up a built-in protease by name.
    pub fn builtin(name: &str) -> Option<Self> {
        BUILTIN_RULES
            .iter()
            .find(|(known, _, _)| *known == name)
            .and_then(|&(known, cleaves, restrict)| Self::new(known, cleaves, restrict).ok())
    }

    /// Protease name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positions of residues after which the protease cuts.
    pub fn sites(&self, residues: &str) -> Vec<usize> {
        self.cleaves
            .find_iter(residues)
            .filter(|found| !found.is_empty())
            .filter(|found| match &self.restrict {
                Some(restrict) => !restrict.is_match(&residues[found.end()..]),
                None => true,
            })
            .map(|found| found.end() - 1)
            .collect()
    }
}

impl PartialEq for CleavageRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.cleaves.as_str() == other.cleaves.as_str()
            && self.restrict.as_ref().map(Regex::as_str)
                == other.restrict.as_ref().map(Regex::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trypsin_sites() {
        let trypsin = CleavageRule::builtin("trypsin").unwrap();
        assert_eq!(trypsin.sites("AAKBBRCCKPDDR"), vec![2, 5, 12]);
        assert!(trypsin.sites("GGGG").is_empty());
    }

    #[test]
    fn test_builtin_lookup() {
        let trypsin = CleavageRule::new("trypsin", "[KR]", Some("P")).unwrap();
        assert_eq!(CleavageRule::builtin("trypsin"), Some(trypsin));
        let gluc = CleavageRule::builtin("gluc").unwrap();
        assert_eq!(gluc.sites("AEPDGE"), vec![3, 5]);
        assert!(CleavageRule::builtin("pepsin").is_none());
    }

    #[test]
    fn test_photo_is_case_insensitive() {
        let photo = CleavageRule::builtin("photo").unwrap();
        assert_eq!(photo.sites("AkpRGk"), vec![3, 5]);
    }

    #[test]
    fn test_unrestricted_rule() {
        let rule = CleavageRule::new("lysc", "K", None).unwrap();
        assert_eq!(rule.sites("KPK"), vec![0, 2]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(CleavageRule::new("broken", "[KR", None).is_err());
    }
}
