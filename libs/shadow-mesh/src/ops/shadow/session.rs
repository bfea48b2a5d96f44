//! # Shadow Session
//!
//! Holds the current light and surface for callers that re-project every
//! frame (animation drivers, interactive viewers). The session owns its
//! inputs; it never references caller rendering state.

use super::{project, validate_light, Shadow, ShadowConfig};
use crate::error::ShadowResult;
use crate::surface::Surface;
use glam::DVec3;

/// Current light, surface and projection settings.
///
/// # Example
///
/// ```rust
/// use shadow_mesh::{ShadowConfig, ShadowSession, Surface};
/// use glam::DVec3;
///
/// let surface = Surface::new(
///     vec![DVec3::new(0.0, 0.0, 1.0), DVec3::new(1.0, 0.0, 1.0), DVec3::new(0.0, 1.0, 1.0)],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
/// let mut session =
///     ShadowSession::new(surface, DVec3::new(0.0, 0.0, 2.0), ShadowConfig::default()).unwrap();
///
/// // Move the light; the surface stays
/// let shadow = session.update(Some(DVec3::new(0.0, 0.0, 3.0)), None).unwrap();
/// assert_eq!(shadow.surface.vertex(1), DVec3::new(1.5, 0.0, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct ShadowSession {
    surface: Surface,
    light: DVec3,
    config: ShadowConfig,
}

impl ShadowSession {
    /// Creates a session after validating the light and configuration.
    pub fn new(surface: Surface, light: DVec3, config: ShadowConfig) -> ShadowResult<Self> {
        config.validate()?;
        validate_light(light)?;
        Ok(Self {
            surface,
            light,
            config,
        })
    }

    pub fn light(&self) -> DVec3 {
        self.light
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    /// Replaces the projection settings. The old settings stay on error.
    pub fn set_config(&mut self, config: ShadowConfig) -> ShadowResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Projects the current state.
    pub fn shadow(&self) -> ShadowResult<Shadow> {
        project(&self.surface, self.light, &self.config)
    }

    /// Replaces the light and/or surface, then returns the fresh shadow.
    ///
    /// Inputs are validated first; on error the session is unchanged.
    pub fn update(
        &mut self,
        light: Option<DVec3>,
        surface: Option<Surface>,
    ) -> ShadowResult<Shadow> {
        if let Some(light) = light {
            validate_light(light)?;
            self.light = light;
        }
        if let Some(surface) = surface {
            self.surface = surface;
        }
        self.shadow()
    }
}
