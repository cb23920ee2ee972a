use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub touch: TouchConfig,
    #[serde(default)]
    pub resize: ResizeConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Named preset applied on top of the tables below.
    /// Left unset, the tables are used exactly as written.
    #[serde(default)]
    pub preset: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            preset: None,
        }
    }
}

/// Easing curve applied to transition progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the transition
    None,
    Linear,
    /// Cubic ease-out
    Cubic,
    /// Quintic ease-out
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Cubic ease-in-out
    #[default]
    InOutCubic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Snap transition duration in milliseconds (0 = jump on next frame)
    #[serde(default = "default_transition_duration")]
    pub transition_duration_ms: u64,
    /// Easing curve for the snap transition
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: default_transition_duration(),
            easing: EasingType::default(),
        }
    }
}

impl NavigationConfig {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    /// Accumulated delta needed to trigger a section change
    #[serde(default = "default_wheel_threshold")]
    pub threshold: f64,
    /// Minimum magnitude of the triggering event itself
    #[serde(default = "default_wheel_min_event_delta")]
    pub min_event_delta: f64,
    /// A gap longer than this between wheel events starts a new gesture
    #[serde(default = "default_wheel_gesture_gap")]
    pub gesture_gap_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            threshold: default_wheel_threshold(),
            min_event_delta: default_wheel_min_event_delta(),
            gesture_gap_ms: default_wheel_gesture_gap(),
        }
    }
}

impl WheelConfig {
    pub fn gesture_gap(&self) -> Duration {
        Duration::from_millis(self.gesture_gap_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchConfig {
    /// Swipe distance that must be exceeded
    #[serde(default = "default_touch_min_distance")]
    pub min_distance: f64,
    /// Swipes lasting this long or longer are treated as drags
    #[serde(default = "default_touch_max_duration")]
    pub max_duration_ms: u64,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            min_distance: default_touch_min_distance(),
            max_duration_ms: default_touch_max_duration(),
        }
    }
}

impl TouchConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// Quiet period before a burst of resizes triggers one refresh
    #[serde(default = "default_resize_debounce")]
    pub debounce_ms: u64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_resize_debounce(),
        }
    }
}

impl ResizeConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Background tone a section asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Dark,
    Bright,
}

/// One block of the demo page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub body: Vec<String>,
}

impl PageSection {
    fn new(id: &str, title: &str, tone: Tone, body: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            tone,
            body: body.iter().map(|line| line.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Input poll rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while a transition is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Wheel delta reported for one terminal wheel notch
    #[serde(default = "default_wheel_notch_delta")]
    pub wheel_notch_delta: f64,
    /// Touch units per terminal row (mouse drags emulate swipes)
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Sections of the demo page, in document order
    #[serde(default = "default_sections")]
    pub sections: Vec<PageSection>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            wheel_notch_delta: default_wheel_notch_delta(),
            row_height: default_row_height(),
            sections: default_sections(),
        }
    }
}

impl UiConfig {
    /// Frame interval while animating
    pub fn frame_interval(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }
}

/// Key bindings for the terminal host (Vim-style notation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_next_section")]
    pub next_section: String,
    #[serde(default = "default_key_prev_section")]
    pub prev_section: String,
    #[serde(default = "default_key_first_section")]
    pub first_section: String,
    #[serde(default = "default_key_last_section")]
    pub last_section: String,
    #[serde(default = "default_key_toggle_menu")]
    pub toggle_menu: String,
    #[serde(default = "default_key_quit")]
    pub quit: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            next_section: default_key_next_section(),
            prev_section: default_key_prev_section(),
            first_section: default_key_first_section(),
            last_section: default_key_last_section(),
            toggle_menu: default_key_toggle_menu(),
            quit: default_key_quit(),
        }
    }
}

/// Named constant sets for the navigation controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPreset {
    /// Canonical constants
    Standard,
    /// Only long swipes change section
    Decisive,
    /// Lower wheel threshold
    Responsive,
    /// No animation, sections switch on the next frame
    Instant,
}

impl NavPreset {
    pub const ALL: [NavPreset; 4] = [
        NavPreset::Standard,
        NavPreset::Decisive,
        NavPreset::Responsive,
        NavPreset::Instant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NavPreset::Standard => "standard",
            NavPreset::Decisive => "decisive",
            NavPreset::Responsive => "responsive",
            NavPreset::Instant => "instant",
        }
    }

    pub fn navigation(&self) -> NavigationConfig {
        match self {
            NavPreset::Instant => NavigationConfig {
                transition_duration_ms: 0,
                easing: EasingType::None,
            },
            _ => NavigationConfig::default(),
        }
    }

    pub fn wheel(&self) -> WheelConfig {
        match self {
            NavPreset::Responsive => WheelConfig {
                threshold: 80.0,
                ..WheelConfig::default()
            },
            _ => WheelConfig::default(),
        }
    }

    pub fn touch(&self) -> TouchConfig {
        match self {
            NavPreset::Decisive => TouchConfig {
                min_distance: 80.0,
                ..TouchConfig::default()
            },
            _ => TouchConfig::default(),
        }
    }
}

impl fmt::Display for NavPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NavPreset {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NavPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::UnknownPreset(s.to_string()))
    }
}

// Default keymap values (Vim-style notation)
fn default_key_next_section() -> String { "j".to_string() }
fn default_key_prev_section() -> String { "k".to_string() }
fn default_key_first_section() -> String { "gg".to_string() }
fn default_key_last_section() -> String { "G".to_string() }
fn default_key_toggle_menu() -> String { "m".to_string() }
fn default_key_quit() -> String { "q".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sectionlock")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_transition_duration() -> u64 {
    1200
}

fn default_wheel_threshold() -> f64 {
    100.0
}

fn default_wheel_min_event_delta() -> f64 {
    10.0 // filters trackpad inertia tails
}

fn default_wheel_gesture_gap() -> u64 {
    200
}

fn default_touch_min_distance() -> f64 {
    50.0
}

fn default_touch_max_duration() -> u64 {
    300
}

fn default_resize_debounce() -> u64 {
    100
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_wheel_notch_delta() -> f64 {
    60.0 // two quick notches cross the default threshold
}

fn default_row_height() -> f64 {
    16.0
}

fn default_sections() -> Vec<PageSection> {
    vec![
        PageSection::new(
            "hero",
            "Cuts that move",
            Tone::Dark,
            &["Video editing for brands, artists and film.", "Scroll, swipe or press j to begin."],
        ),
        PageSection::new(
            "about",
            "About",
            Tone::Bright,
            &["Ten years of commercial, music video and documentary work."],
        ),
        PageSection::new(
            "parallax-gallery",
            "Selected frames",
            Tone::Dark,
            &["Stills from recent grades and edits."],
        ),
        PageSection::new(
            "works-gallery",
            "Works",
            Tone::Bright,
            &["Showreel 2024", "Brand campaign: Northbound", "Music video: Low Tide"],
        ),
        PageSection::new(
            "contact",
            "Contact",
            Tone::Dark,
            &["Available for projects from next month."],
        ),
    ]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration text, applying the named preset if one is set
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        match config.general.preset.clone() {
            Some(name) => Ok(config.with_preset(name.parse()?)),
            None => Ok(config),
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Overlay a preset's navigation, wheel and touch tables
    pub fn with_preset(mut self, preset: NavPreset) -> Self {
        self.navigation = preset.navigation();
        self.wheel = preset.wheel();
        self.touch = preset.touch();
        self.general.preset = Some(preset.name().to_string());
        self
    }

    /// Get the configuration file path
    /// Always uses ~/.config/sectionlock/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sectionlock")
            .join("config.toml")
    }

    /// Get the log file path used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("sectionlock.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
