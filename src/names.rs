//! Region names built from syllable tables

use std::collections::HashSet;

use rand::Rng;

use crate::rng::GameRng;

// Prefix + suffix from syllable tables: "Valmark", "Orsend", "Kethia"

const REGION_PREFIXES: &[&str] = &[
    "Val", "Or", "Keth", "Brin", "Cal", "Dor", "Esk", "Fal", "Gar", "Hal", "Ist", "Jor", "Kar",
    "Lor", "Mar", "Nor", "Ost", "Pel", "Rav", "Sol", "Tar", "Ul", "Ven", "Wes", "Zar",
];

const REGION_SUFFIXES: &[&str] = &[
    "mark", "send", "ia", "land", "heim", "mor", "dale", "vania", "gard", "oria", "reach", "wick",
    "stan", "ora", "mere", "holt", "ara", "ence", "fell", "tor",
];

// Occasional qualifier: "Upper Valmark", "Orsend March"
const REGION_PATTERNS: &[&str] = &["{name}", "{name}", "{name}", "Upper {name}", "Lower {name}", "{name} March"];

/// Attempts at a fresh name before falling back to a numbered one
const MAX_NAME_ATTEMPTS: usize = 32;

/// Generate a region name from syllable tables.
pub fn generate_region_name(rng: &mut GameRng) -> String {
    let prefix = REGION_PREFIXES[rng.gen_range(0..REGION_PREFIXES.len())];
    let suffix = REGION_SUFFIXES[rng.gen_range(0..REGION_SUFFIXES.len())];
    let pattern = REGION_PATTERNS[rng.gen_range(0..REGION_PATTERNS.len())];
    pattern.replace("{name}", &format!("{prefix}{suffix}"))
}

/// Hands out region names that are unique within one planet
#[derive(Debug, Clone, Default)]
pub struct RegionNamer {
    used: HashSet<String>,
}

impl RegionNamer {
    /// Create a namer with no names handed out yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused name
    pub fn next_name(&mut self, rng: &mut GameRng) -> String {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = generate_region_name(rng);
            if self.used.insert(name.clone()) {
                return name;
            }
        }
        let base = generate_region_name(rng);
        let mut n = 2;
        loop {
            let name = format!("{base} {n}");
            if self.used.insert(name.clone()) {
                return name;
            }
            n += 1;
        }
    }
}
