//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks on workstep defaults.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for WorkstepConfig.
///
/// Any new field added to WorkstepConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [kb_shift]
        "kb_shift",
        "kb_shift.default_zflat",
        "kb_shift.confirm_positive_zflat",
        "kb_shift.intersection_half_length",
        "kb_shift.decimals",
        // [distance]
        "distance",
        "distance.default_threshold",
        "distance.decimals",
        // [presentation]
        "presentation",
        "presentation.set_color",
        "presentation.set_symbol",
        // [log]
        "log",
        "log.level",
        "log.format",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (*k, levenshtein(unknown, k)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Most decimals any report is printed with.
const MAX_DECIMALS: usize = 6;

/// Validate value ranges on a parsed WorkstepConfig.
///
/// Returns (errors, warnings). Errors are values no workstep can run with;
/// warnings are suspicious but not fatal.
pub fn validate_ranges(config: &super::WorkstepConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let kb = &config.kb_shift;
    if !kb.default_zflat.is_finite() {
        errors.push(format!(
            "kb_shift.default_zflat = {} must be finite",
            kb.default_zflat
        ));
    }
    if !(kb.intersection_half_length.is_finite() && kb.intersection_half_length > 0.0) {
        errors.push(format!(
            "kb_shift.intersection_half_length = {} must be a positive finite number",
            kb.intersection_half_length
        ));
    }
    if kb.decimals > MAX_DECIMALS {
        errors.push(format!(
            "kb_shift.decimals = {} exceeds {MAX_DECIMALS}",
            kb.decimals
        ));
    }
    if kb.default_zflat > 0.0 && !kb.confirm_positive_zflat {
        warnings.push(ValidationWarning {
            field: "kb_shift.default_zflat".to_string(),
            message: format!(
                "default_zflat = {:.2} is above the datum and will be applied without confirmation",
                kb.default_zflat
            ),
            suggestion: None,
        });
    }

    let d = &config.distance;
    if !(d.default_threshold.is_finite() && d.default_threshold > 0.0) {
        errors.push(format!(
            "distance.default_threshold = {} must be a positive finite number",
            d.default_threshold
        ));
    }
    if d.decimals > MAX_DECIMALS {
        errors.push(format!(
            "distance.decimals = {} exceeds {MAX_DECIMALS}",
            d.decimals
        ));
    }

    if !config.presentation.set_color && !config.presentation.set_symbol {
        warnings.push(ValidationWarning {
            field: "presentation".to_string(),
            message: "presentation.set_color and presentation.set_symbol are both false; \
                      set-color needs an explicit flag on every run"
                .to_string(),
            suggestion: None,
        });
    }

    if tracing_subscriber::EnvFilter::try_new(&config.log.level).is_err() {
        errors.push(format!(
            "log.level = '{}' is not a valid filter directive",
            config.log.level
        ));
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
