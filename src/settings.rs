use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::viewport::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsInteraction {
    /// Node dragging
    pub dragging_enabled: bool,

    /// Clicking a node selects it and opens the detail panel
    pub node_selection_enabled: bool,

    /// Clicking the empty canvas creates a node at the click position
    pub node_adding_enabled: bool,

    /// Dragging the empty canvas pans the viewport
    pub panning_enabled: bool,
}

impl Default for SettingsInteraction {
    fn default() -> Self {
        Self {
            dragging_enabled: true,
            node_selection_enabled: true,
            node_adding_enabled: true,
            panning_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsNavigation {
    /// Zoom change per button press or scroll event
    pub zoom_step: f32,

    pub zoom_min: f32,

    pub zoom_max: f32,

    /// Shows zoom in, zoom out and reset buttons over the canvas
    pub zoom_controls_enabled: bool,

    /// Ctrl + scroll zooms
    pub scroll_zoom_enabled: bool,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_step: ZOOM_STEP,
            zoom_min: MIN_ZOOM,
            zoom_max: MAX_ZOOM,
            zoom_controls_enabled: true,
            scroll_zoom_enabled: true,
        }
    }
}

impl SettingsNavigation {
    /// # Errors
    /// [`Error::InvalidZoomBounds`] unless `0 < zoom_min <= zoom_max`, both finite.
    /// [`Error::InvalidZoomStep`] unless `zoom_step` is finite and positive.
    pub fn check(&self) -> Result<()> {
        let (min, max) = (self.zoom_min, self.zoom_max);
        if !(min.is_finite() && max.is_finite() && min > 0. && min <= max) {
            return Err(Error::InvalidZoomBounds { min, max });
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.) {
            return Err(Error::InvalidZoomStep(self.zoom_step));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsStyle {
    /// Logical size of every node rectangle
    pub node_size: Vec2,

    pub edge_width: f32,

    /// Font size of titles and choice labels at zoom 1
    pub label_size: f32,

    pub detail_panel_width: f32,

    /// Shows the node count / dangling choices summary line
    pub diagnostics_shown: bool,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            node_size: Vec2::new(160., 70.),
            edge_width: 2.,
            label_size: 13.,
            detail_panel_width: 260.,
            diagnostics_shown: true,
        }
    }
}

/// All editor settings, loadable from a single JSON document.
///
/// Every section and field is optional in the document; missing ones keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub interaction: SettingsInteraction,
    pub navigation: SettingsNavigation,
    pub style: SettingsStyle,
}

impl Settings {
    /// # Errors
    /// Returns [`Error::Json`] when the document is not valid settings JSON, and the errors of
    /// [`SettingsNavigation::check`] for unusable zoom settings.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.navigation.check()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let s = Settings::from_json(
            r#"{"interaction": {"panning_enabled": false}, "style": {"node_size": {"x": 100, "y": 40}}}"#,
        )
        .unwrap();

        assert!(!s.interaction.panning_enabled);
        assert!(s.interaction.dragging_enabled);
        assert_eq!(s.navigation, SettingsNavigation::default());
        assert_eq!(s.style.node_size, Vec2::new(100., 40.));
        assert_eq!(s.style.edge_width, 2.);
    }

    #[test]
    fn test_inverted_zoom_bounds_rejected() {
        let err = Settings::from_json(r#"{"navigation": {"zoom_min": 3.0}}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidZoomBounds { min, max } if min == 3. && max == MAX_ZOOM
        ));

        assert!(Settings::from_json(r#"{"navigation": {"zoom_min": 0}}"#).is_err());
        assert!(Settings::from_json(r#"{"navigation": {"zoom_step": -0.1}}"#).is_err());
        assert!(Settings::from_json(r#"{"navigation": {"zoom_min": 1, "zoom_max": 1}}"#).is_ok());
    }

    #[test]
    fn test_non_finite_zoom_rejected() {
        let nav = SettingsNavigation {
            zoom_max: f32::NAN,
            ..SettingsNavigation::default()
        };
        assert!(nav.check().is_err());

        let nav = SettingsNavigation {
            zoom_step: f32::INFINITY,
            ..SettingsNavigation::default()
        };
        assert!(matches!(nav.check(), Err(Error::InvalidZoomStep(_))));
    }

    #[test]
    fn test_invalid_document() {
        assert!(Settings::from_json(r#"{"navigation": {"zoom_step": "big"}}"#).is_err());
    }
}
