use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::appraisal::IrrSettings;
use crate::condition::{ClassifierThresholds, MethodologyTables};
use crate::cost::CostTable;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub methodology: MethodologyTables,
    #[serde(default)]
    pub classifier: ClassifierThresholds,
    #[serde(default)]
    pub costs: CostTable,
    #[serde(default)]
    pub appraisal: IrrSettings,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_iterations: Option<u32>,
    pub tolerance: Option<f64>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/road-appraisal/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        parsed
            .appraisal
            .validate()
            .with_context(|| format!("invalid [appraisal] section in {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(max_iterations) = overrides.max_iterations {
            self.appraisal.max_iterations = max_iterations;
        }
        if let Some(tolerance) = overrides.tolerance {
            self.appraisal.tolerance = tolerance;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[methodology]
required_modulus_mpa = 200.0
required_friction = 0.35
rigid_strength_factor = 1.2

# Maximum design traffic, vehicles/day
[methodology.design_intensity]
I = 20000.0
II = 12000.0
III = 6000.0
IV = 2000.0
V = 500.0

# m/km
[methodology.allowed_evenness]
I = 3.1
II = 3.1
III = 4.0
IV = 4.0
V = 4.0

# mm
[methodology.allowed_rut_depth]
I = 20.0
II = 20.0
III = 30.0
IV = 30.0
V = 30.0

[methodology.min_strength]
I = 1.0
II = 0.98
III = 0.95
IV = 0.9
V = 0.85

[classifier]
pass_threshold = 1.0
strength_pass_threshold = 0.85
severe_ratio = 0.8

# Unit costs, thousand currency units per km
[costs.current_repair]
I = 2900.0
II = 2300.0
III = 1700.0
IV = 1200.0
V = 800.0

[costs.capital_repair]
I = 24000.0
II = 18500.0
III = 13000.0
IV = 9000.0
V = 6000.0

[costs.reconstruction]
I = 95000.0
II = 70000.0
III = 48000.0
IV = 32000.0
V = 21000.0

# Leave empty to cost every region at the base rate
[costs.region_factors]

[appraisal]
max_iterations = 100
tolerance = 1e-6
lower_bound = -0.99
upper_bound = 10.0
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
