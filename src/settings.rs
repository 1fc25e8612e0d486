//! Immutable configuration supplied when the navigation system is created.

use crate::error::{Result, SettingsError};

/// Number of area classes; an area mask has one bit per area.
pub const AREA_COUNT: usize = 32;

/// Maximum number of navigation layers.
pub const MAX_LAYERS: usize = 32;

/// Area mask that accepts every area.
pub const ALL_AREAS: u32 = u32::MAX;

const DEFAULT_CONNECTION_RADIUS: f64 = 0.1;
const DEFAULT_RAYCAST_LENGTH: f64 = 2.0;
const DEFAULT_MAX_EDGE_LENGTH: f64 = 10.0;

const MIN_CONNECTION_RADIUS: f64 = 0.1;
const MIN_RAYCAST_LENGTH: f64 = 0.5;
const MIN_MAX_EDGE_LENGTH: f64 = 1.0;

const MIN_WEIGHT: f64 = 1.0;

/// Settings of one navigation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    name: String,
    connection_radius: f64,
    raycast_length: f64,
    max_edge_length: f64,
}

impl LayerSettings {
    /// Creates layer settings.
    ///
    /// - `connection_radius`: maximum distance between two points welded into
    ///   one vertex.
    /// - `raycast_length`: maximum hit distance of host raycasts.
    /// - `max_edge_length`: the longest edge the caller will register; bounds
    ///   the raycast broad phase.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BelowMinimum`] if a value is below its minimum.
    pub fn new(
        name: impl Into<String>,
        connection_radius: f64,
        raycast_length: f64,
        max_edge_length: f64,
    ) -> Result<Self> {
        check_minimum("connection_radius", connection_radius, MIN_CONNECTION_RADIUS)?;
        check_minimum("raycast_length", raycast_length, MIN_RAYCAST_LENGTH)?;
        check_minimum("max_edge_length", max_edge_length, MIN_MAX_EDGE_LENGTH)?;
        Ok(Self {
            name: name.into(),
            connection_radius,
            raycast_length,
            max_edge_length,
        })
    }

    /// A user-friendly name of the layer.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum distance between two points welded into one vertex.
    #[must_use]
    pub fn connection_radius(&self) -> f64 {
        self.connection_radius
    }

    /// Maximum hit distance of host raycasts.
    #[must_use]
    pub fn raycast_length(&self) -> f64 {
        self.raycast_length
    }

    /// The longest edge the caller will register.
    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        self.max_edge_length
    }
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            name: "default".into(),
            connection_radius: DEFAULT_CONNECTION_RADIUS,
            raycast_length: DEFAULT_RAYCAST_LENGTH,
            max_edge_length: DEFAULT_MAX_EDGE_LENGTH,
        }
    }
}

/// Settings of one area class.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSettings {
    name: String,
    weight: f64,
}

impl AreaSettings {
    /// Creates area settings. The weight is clamped to at least 1; higher
    /// weights make paths through the area less attractive.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight: weight.max(MIN_WEIGHT),
        }
    }

    /// Default settings for the area at `index`.
    #[must_use]
    pub fn default_for(index: usize) -> Self {
        Self::new(format!("Area {index}"), MIN_WEIGHT)
    }

    /// A user-friendly name of the area.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path cost multiplier of faces in this area.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Settings of the whole navigation system.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSettings {
    layers: Vec<LayerSettings>,
    areas: [AreaSettings; AREA_COUNT],
    capture_debug_snapshots: bool,
}

impl NavigationSettings {
    /// Creates settings with the given layers and default areas.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::LayerCount`] if there are no layers or more
    /// than [`MAX_LAYERS`].
    pub fn new(layers: Vec<LayerSettings>) -> Result<Self> {
        if layers.is_empty() || layers.len() > MAX_LAYERS {
            return Err(SettingsError::LayerCount(layers.len()).into());
        }
        Ok(Self {
            layers,
            areas: std::array::from_fn(AreaSettings::default_for),
            capture_debug_snapshots: false,
        })
    }

    /// Replaces the settings of the area at `index`. Out-of-range indices are
    /// ignored.
    #[must_use]
    pub fn with_area(mut self, index: usize, area: AreaSettings) -> Self {
        if let Some(slot) = self.areas.get_mut(index) {
            *slot = area;
        }
        self
    }

    /// Enables rebuilding a [`crate::topology::SurfaceSnapshot`] per layer
    /// after every building job.
    #[must_use]
    pub fn with_debug_snapshots(mut self, enabled: bool) -> Self {
        self.capture_debug_snapshots = enabled;
        self
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Settings of the layer at `index`.
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&LayerSettings> {
        self.layers.get(index)
    }

    /// All layer settings.
    #[must_use]
    pub fn layers(&self) -> &[LayerSettings] {
        &self.layers
    }

    /// Settings of the area at `index`.
    #[must_use]
    pub fn area(&self, index: usize) -> Option<&AreaSettings> {
        self.areas.get(index)
    }

    /// Whether debug snapshots are captured.
    #[must_use]
    pub fn capture_debug_snapshots(&self) -> bool {
        self.capture_debug_snapshots
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            layers: vec![LayerSettings::default()],
            areas: std::array::from_fn(AreaSettings::default_for),
            capture_debug_snapshots: false,
        }
    }
}

fn check_minimum(setting: &'static str, value: f64, min: f64) -> Result<()> {
    // NaN fails the comparison and is rejected too.
    if value >= min {
        Ok(())
    } else {
        Err(SettingsError::BelowMinimum {
            setting,
            value,
            min,
        }
        .into())
    }
}
