// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for moodseq.
//!
//! A mood file adds moods to the registry (or replaces built-in ones with
//! the same name) and adjusts rendering. YAML and TOML are both accepted;
//! the format is chosen from the file extension.
//!
//! ```yaml
//! render:
//!   swing_ms: 8
//! moods:
//!   - name: dreamy
//!     scale: { key: D, type: dorian, octave: 4 }
//!     tempo: 90
//!     instrument: 89
//!     harmony: minor_third
//!     transitions:
//!       kind: weighted
//!       fallback: neighbor
//!       table:
//!         - from: 62
//!           to: [{ pitch: 65, weight: 2.0 }, { pitch: 69 }]
//!     rhythm:
//!       kind: pattern
//!       beats: [1.0, 0.5, 0.5]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::generators::rhythm::{Fixed, Pattern, QuarterOrEighth, QUARTER};
use crate::generators::transition::{
    ScaleNeighbor, TransitionStrategy, TransitionTable, UniformScale, WeightedGraph,
};
use crate::mood::{MoodProfile, MoodRegistry, DEFAULT_VELOCITY};
use crate::music::{Harmony, Pitch, Scale, MAX_PITCH};
use crate::render::RenderConfig;

/// Root of a mood configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MoodFile {
    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,
    /// Extra or replacement moods
    #[serde(default)]
    pub moods: Vec<MoodConfig>,
}

impl MoodFile {
    /// Load a mood file, choosing TOML or YAML by extension
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let file = if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        };
        let file = file.with_context(|| format!("Failed to parse config file: {:?}", path))?;

        info!(path = %path.display(), moods = file.moods.len(), "loaded mood file");
        Ok(file)
    }

    /// Parse a mood file from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: Self = serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        file.render.validate()?;
        Ok(file)
    }

    /// Parse a mood file from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        file.render.validate()?;
        Ok(file)
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Build every configured mood into `registry`.
    ///
    /// Nothing is inserted unless all moods are valid. Returns the number
    /// of moods added or replaced.
    pub fn apply_to(&self, registry: &mut MoodRegistry) -> Result<usize> {
        let profiles = self
            .moods
            .iter()
            .map(MoodConfig::to_profile)
            .collect::<Result<Vec<_>>>()?;

        let count = profiles.len();
        for profile in profiles {
            if registry.contains(profile.name()) {
                debug!(mood = profile.name(), "replacing mood");
            }
            registry.insert(profile);
        }
        Ok(count)
    }
}

/// One mood definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodConfig {
    /// Mood name
    pub name: String,
    /// Pitch palette
    pub scale: ScaleConfig,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: u16,
    /// General MIDI program (0-127)
    #[serde(default)]
    pub instrument: u8,
    #[serde(default)]
    pub harmony: Harmony,
    /// Base velocity (1-127)
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    #[serde(default)]
    pub transitions: TransitionConfig,
    #[serde(default)]
    pub rhythm: RhythmConfig,
}

fn default_tempo() -> u16 {
    120
}
fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl MoodConfig {
    /// Build the runtime profile
    pub fn to_profile(&self) -> Result<MoodProfile> {
        let scale = self.scale.to_scale()?;
        let profile = MoodProfile::new(&self.name, scale, self.tempo, self.instrument)?
            .with_shared_transitions(self.transitions.to_strategy(&self.name)?)
            .with_harmony(self.harmony)
            .with_velocity(self.velocity);

        let profile = match &self.rhythm {
            RhythmConfig::Fixed { beats } => {
                if !(beats.is_finite() && *beats > 0.0) {
                    return Err(Error::InvalidProfile(format!(
                        "mood '{}': fixed duration must be positive (got {})",
                        self.name, beats
                    )));
                }
                profile.with_rhythm(Fixed(*beats))
            }
            RhythmConfig::QuarterOrEighth => profile.with_rhythm(QuarterOrEighth),
            RhythmConfig::Pattern { beats } => {
                if beats.is_empty() {
                    return Err(Error::InvalidProfile(format!(
                        "mood '{}': rhythm pattern is empty",
                        self.name
                    )));
                }
                if let Some(bad) = beats.iter().find(|b| !(b.is_finite() && **b > 0.0)) {
                    return Err(Error::InvalidProfile(format!(
                        "mood '{}': pattern durations must be positive (got {})",
                        self.name, bad
                    )));
                }
                profile.with_rhythm(Pattern::new(beats.iter().copied()))
            }
        };

        Ok(profile)
    }
}

/// Scale as an explicit list or as a key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScaleConfig {
    /// Explicit pitches, in walk order
    Pitches(Vec<Pitch>),
    /// Root note, scale type and octave
    Key {
        key: String,
        #[serde(rename = "type", default = "default_scale_type")]
        scale_type: String,
        #[serde(default = "default_octave")]
        octave: i8,
        /// Append the root an octave up
        #[serde(default = "default_close_octave")]
        close_octave: bool,
    },
}

fn default_scale_type() -> String {
    "major".to_string()
}
fn default_octave() -> i8 {
    4
}
fn default_close_octave() -> bool {
    true
}

impl ScaleConfig {
    pub fn to_scale(&self) -> Result<Scale> {
        match self {
            ScaleConfig::Pitches(pitches) => Scale::new(pitches.iter().copied()),
            ScaleConfig::Key {
                key,
                scale_type,
                octave,
                close_octave,
            } => Scale::parse(key, scale_type, *octave, *close_octave),
        }
    }
}

/// Transition strategy selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionConfig {
    /// Any scale pitch with equal weight
    #[default]
    Uniform,
    /// Adjacent scale pitches or stay
    Neighbor,
    /// Explicit weighted graph
    Weighted {
        table: Vec<TransitionRow>,
        /// Strategy for pitches without a row
        #[serde(default)]
        fallback: FallbackKind,
    },
}

/// Strategy used by a weighted graph for pitches it does not list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    #[default]
    Uniform,
    Neighbor,
}

/// Outgoing edges of one pitch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionRow {
    pub from: Pitch,
    pub to: Vec<TransitionEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionEdge {
    pub pitch: Pitch,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl TransitionConfig {
    /// Build the strategy, validating any weighted table
    pub fn to_strategy(&self, mood: &str) -> Result<Arc<dyn TransitionStrategy>> {
        let strategy: Arc<dyn TransitionStrategy> = match self {
            TransitionConfig::Uniform => Arc::new(UniformScale),
            TransitionConfig::Neighbor => Arc::new(ScaleNeighbor),
            TransitionConfig::Weighted { table, fallback } => {
                let graph = WeightedGraph::new(build_table(mood, table)?);
                match fallback {
                    FallbackKind::Uniform => Arc::new(graph),
                    FallbackKind::Neighbor => Arc::new(graph.with_fallback(Arc::new(ScaleNeighbor))),
                }
            }
        };
        Ok(strategy)
    }
}

fn build_table(mood: &str, rows: &[TransitionRow]) -> Result<TransitionTable> {
    let invalid = |reason: String| Error::InvalidProfile(format!("mood '{}': {}", mood, reason));

    let mut seen = BTreeSet::new();
    let mut table = TransitionTable::new();
    for row in rows {
        if row.from > MAX_PITCH {
            return Err(invalid(format!("pitch {} is outside the MIDI range", row.from)));
        }
        if !seen.insert(row.from) {
            return Err(invalid(format!("pitch {} has more than one row", row.from)));
        }

        let mut edges = Vec::with_capacity(row.to.len());
        for edge in &row.to {
            if edge.pitch > MAX_PITCH {
                return Err(invalid(format!("pitch {} is outside the MIDI range", edge.pitch)));
            }
            if !(edge.weight.is_finite() && edge.weight > 0.0) {
                return Err(invalid(format!(
                    "transition {} -> {} has weight {}",
                    row.from, edge.pitch, edge.weight
                )));
            }
            edges.push((edge.pitch, edge.weight));
        }

        if edges.is_empty() {
            return Err(invalid(format!("pitch {} has no targets", row.from)));
        }
        table.insert(row.from, edges);
    }
    Ok(table)
}

/// Duration policy selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RhythmConfig {
    /// Same length for every note
    Fixed {
        #[serde(default = "default_beats")]
        beats: f64,
    },
    /// Coin toss between quarter and eighth
    #[default]
    QuarterOrEighth,
    /// Repeating list of lengths
    Pattern { beats: Vec<f64> },
}

fn default_beats() -> f64 {
    QUARTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
render:
  swing_ms: 8
  ppqn: 96
moods:
  - name: Dreamy
    scale: { key: D, type: dorian, octave: 4 }
    tempo: 90
    instrument: 89
    harmony: minor_third
    velocity: 70
    transitions:
      kind: weighted
      fallback: neighbor
      table:
        - from: 62
          to: [{ pitch: 65, weight: 2.0 }, { pitch: 69 }]
    rhythm:
      kind: pattern
      beats: [1.0, 0.5, 0.5]
  - name: sad
    scale: [48, 50, 51, 53, 55]
    tempo: 50
"#;

    const TOML: &str = r#"
[render]
velocity_jitter = 10

[[moods]]
name = "stormy"
scale = [40, 43, 46, 49]
tempo = 160
instrument = 30

[moods.transitions]
kind = "neighbor"

[moods.rhythm]
kind = "fixed"
beats = 0.5
"#;

    #[test]
    fn test_parse_yaml() {
        let file = MoodFile::from_yaml(YAML).unwrap();
        assert_eq!(file.render.swing_ms, 8);
        assert_eq!(file.render.ppqn, 96);
        assert_eq!(file.render.velocity_jitter, RenderConfig::default().velocity_jitter);
        assert_eq!(file.moods.len(), 2);

        let dreamy = &file.moods[0];
        assert_eq!(dreamy.harmony, Harmony::MinorThird);
        assert_eq!(
            dreamy.scale,
            ScaleConfig::Key {
                key: "D".to_string(),
                scale_type: "dorian".to_string(),
                octave: 4,
                close_octave: true,
            }
        );
        match &dreamy.transitions {
            TransitionConfig::Weighted { table, fallback } => {
                assert_eq!(*fallback, FallbackKind::Neighbor);
                assert_eq!(table[0].to[1].weight, 1.0);
            }
            other => panic!("unexpected transitions {:?}", other),
        }

        let sad = &file.moods[1];
        assert_eq!(sad.velocity, DEFAULT_VELOCITY);
        assert_eq!(sad.transitions, TransitionConfig::Uniform);
        assert_eq!(sad.rhythm, RhythmConfig::QuarterOrEighth);
    }

    #[test]
    fn test_parse_toml() {
        let file = MoodFile::from_toml(TOML).unwrap();
        assert_eq!(file.render.velocity_jitter, 10);
        assert_eq!(file.render.swing_ms, 5);

        let stormy = &file.moods[0];
        assert_eq!(stormy.scale, ScaleConfig::Pitches(vec![40, 43, 46, 49]));
        assert_eq!(stormy.transitions, TransitionConfig::Neighbor);
        assert_eq!(stormy.rhythm, RhythmConfig::Fixed { beats: 0.5 });
    }

    #[test]
    fn test_profile_from_config() {
        let file = MoodFile::from_yaml(YAML).unwrap();
        let dreamy = file.moods[0].to_profile().unwrap();

        assert_eq!(dreamy.name(), "dreamy");
        assert_eq!(dreamy.scale().pitches(), &[62, 64, 65, 67, 69, 71, 72, 74]);
        assert_eq!(dreamy.tempo_bpm(), 90);
        assert_eq!(dreamy.instrument(), 89);
        assert_eq!(dreamy.velocity(), 70);
        assert_eq!(dreamy.transitions().name(), "weighted");
        assert_eq!(dreamy.rhythm().name(), "pattern");

        let table = dreamy.transition_table().unwrap();
        assert_eq!(table[&62], vec![(65, 2.0), (69, 1.0)]);

        // 64 has no row and falls back to its scale neighbors
        let candidates = dreamy.transitions().next_candidates(64, dreamy.scale());
        assert_eq!(candidates.pitches().collect::<Vec<_>>(), vec![62, 64, 65]);
    }

    #[test]
    fn test_apply_overrides_builtin() {
        let mut registry = MoodRegistry::builtin();
        let before = registry.len();
        let count = MoodFile::from_yaml(YAML).unwrap().apply_to(&mut registry).unwrap();

        assert_eq!(count, 2);
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.lookup("sad").unwrap().tempo_bpm(), 50);
        assert!(registry.contains("DREAMY"));
    }

    #[test]
    fn test_invalid_mood_leaves_registry_untouched() {
        let yaml = r#"
moods:
  - name: fine
    scale: [60, 62]
  - name: broken
    scale: []
"#;
        let mut registry = MoodRegistry::builtin();
        let before = registry.len();
        let result = MoodFile::from_yaml(yaml).unwrap().apply_to(&mut registry);

        assert!(matches!(result, Err(Error::InvalidProfile(_))));
        assert_eq!(registry.len(), before);
        assert!(!registry.contains("fine"));
    }

    #[test]
    fn test_weighted_table_validation() {
        let row = |from, to: Vec<TransitionEdge>| TransitionRow { from, to };
        let edge = |pitch, weight| TransitionEdge { pitch, weight };

        assert!(build_table("m", &[row(60, vec![])]).is_err());
        assert!(build_table("m", &[row(60, vec![edge(62, 0.0)])]).is_err());
        assert!(build_table("m", &[row(60, vec![edge(200, 1.0)])]).is_err());
        assert!(build_table("m", &[row(60, vec![edge(62, 1.0)]), row(60, vec![edge(64, 1.0)])]).is_err());

        let table = build_table("m", &[row(60, vec![edge(62, 3.0), edge(74, 1.0)])]).unwrap();
        assert_eq!(table[&60], vec![(62, 3.0), (74, 1.0)]);
    }

    #[test]
    fn test_bad_fixed_duration_rejected() {
        let config = MoodConfig {
            name: "odd".to_string(),
            scale: ScaleConfig::Pitches(vec![60]),
            tempo: 100,
            instrument: 0,
            harmony: Harmony::Solo,
            velocity: 80,
            transitions: TransitionConfig::Uniform,
            rhythm: RhythmConfig::Fixed { beats: 0.0 },
        };
        assert!(matches!(config.to_profile(), Err(Error::InvalidProfile(_))));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let with_beats = |beats: Vec<f64>| MoodConfig {
            name: "odd".to_string(),
            scale: ScaleConfig::Pitches(vec![60]),
            tempo: 100,
            instrument: 0,
            harmony: Harmony::Solo,
            velocity: 80,
            transitions: TransitionConfig::Uniform,
            rhythm: RhythmConfig::Pattern { beats },
        };

        for beats in [vec![], vec![0.0, -1.0], vec![1.0, f64::NAN], vec![0.5, f64::INFINITY]] {
            let result = with_beats(beats.clone()).to_profile();
            assert!(matches!(result, Err(Error::InvalidProfile(_))), "{:?}", beats);
        }
        assert!(with_beats(vec![1.0, 0.5]).to_profile().is_ok());
    }

    #[test]
    fn test_render_settings_validated_on_parse() {
        for yaml in ["render: { ppqn: 40000, swing_ms: 0 }", "render: { ppqn: 0 }", "render: { channel: 17 }"] {
            assert!(matches!(MoodFile::from_yaml(yaml), Err(Error::Config(_))), "{}", yaml);
        }
        assert!(matches!(
            MoodFile::from_toml("[render]\nchannel = 16\n"),
            Err(Error::Config(_))
        ));

        let file = MoodFile::from_yaml("render: { ppqn: 32767, channel: 15 }").unwrap();
        assert_eq!(file.render.ppqn, 32767);
        assert_eq!(file.render.channel, 15);
    }

    #[test]
    fn test_unknown_scale_type_rejected() {
        let yaml = "moods:\n  - name: x\n    scale: { key: C, type: klingon }\n";
        let file = MoodFile::from_yaml(yaml).unwrap();
        assert!(file.moods[0].to_profile().is_err());
    }

    #[test]
    fn test_malformed_text_is_config_error() {
        assert!(matches!(MoodFile::from_yaml("moods: 12"), Err(Error::Config(_))));
        assert!(matches!(MoodFile::from_toml("moods = ["), Err(Error::Config(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let file = MoodFile::from_yaml(YAML).unwrap();
        let yaml = file.to_yaml().unwrap();
        assert_eq!(MoodFile::from_yaml(&yaml).unwrap(), file);
    }

    #[test]
    fn test_load_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml.write_all(YAML.as_bytes()).unwrap();
        assert_eq!(MoodFile::load(yaml.path()).unwrap().moods.len(), 2);

        let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        toml.write_all(TOML.as_bytes()).unwrap();
        assert_eq!(MoodFile::load(toml.path()).unwrap().moods[0].name, "stormy");
    }

    #[test]
    fn test_load_missing_file() {
        let err = MoodFile::load("/nonexistent/moods.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(MoodFile::from_yaml("{}").unwrap(), MoodFile::default());
    }
}
