//! Parameter roles and definitions for filter kernels.
//!
//! Engine parameters are addressed by a closed set of roles rather than
//! free-form string keys. Each role still carries the engine key it is known
//! by so kernels can be described the way an image engine lists its inputs.

use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a declared filter parameter plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRole {
    /// The source image input
    Image,
    /// Effect strength, bound to the slider value directly
    Intensity,
    /// Radius in pixels
    Radius,
    /// Scale factor
    Scale,
    /// Center point of the effect
    Center,
}

impl ParameterRole {
    /// Every role, in binding order.
    pub fn all() -> &'static [ParameterRole] {
        &[
            ParameterRole::Image,
            ParameterRole::Intensity,
            ParameterRole::Radius,
            ParameterRole::Scale,
            ParameterRole::Center,
        ]
    }

    /// Engine key for this role.
    pub fn key(&self) -> &'static str {
        match self {
            ParameterRole::Image => "inputImage",
            ParameterRole::Intensity => "inputIntensity",
            ParameterRole::Radius => "inputRadius",
            ParameterRole::Scale => "inputScale",
            ParameterRole::Center => "inputCenter",
        }
    }
}

impl fmt::Display for ParameterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Numeric constraint on a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Value must be within range [min, max]
    Range {
        /// Lowest allowed value
        min: f64,
        /// Highest allowed value
        max: f64,
    },
    /// Value must be >= min
    MinValue(f64),
}

impl Constraint {
    /// Clamp a value so it satisfies this constraint.
    pub fn clamp(&self, value: f64) -> f64 {
        match *self {
            Constraint::Range { min, max } => value.clamp(min, max),
            Constraint::MinValue(min) => value.max(min),
        }
    }
}

/// Definition of a parameter a kernel declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    /// Role of the parameter
    pub role: ParameterRole,
    /// Human-readable name
    pub display_name: String,
    /// Value the kernel uses until one is bound (None for the image input)
    pub default_value: Option<Value>,
    /// Description for documentation
    pub description: String,
    /// Constraint applied when the kernel reads the value
    pub constraint: Option<Constraint>,
}

impl ParameterDefinition {
    /// The image input every kernel declares.
    pub fn image() -> Self {
        Self {
            role: ParameterRole::Image,
            display_name: "Image".to_string(),
            default_value: None,
            description: "Image to process".to_string(),
            constraint: None,
        }
    }

    /// A scalar parameter with a default.
    pub fn scalar(role: ParameterRole, default: f64) -> Self {
        Self {
            display_name: Self::role_to_display(role),
            role,
            default_value: Some(Value::Float(default)),
            description: String::new(),
            constraint: None,
        }
    }

    /// The center point parameter with a default position.
    pub fn center(x: f64, y: f64) -> Self {
        Self {
            role: ParameterRole::Center,
            display_name: "Center".to_string(),
            default_value: Some(Value::Vector2(x, y)),
            description: "Center of the effect".to_string(),
            constraint: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a range constraint.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.constraint = Some(Constraint::Range { min, max });
        self
    }

    /// Add a minimum value constraint.
    pub fn with_min(mut self, min: f64) -> Self {
        self.constraint = Some(Constraint::MinValue(min));
        self
    }

    fn role_to_display(role: ParameterRole) -> String {
        match role {
            ParameterRole::Image => "Image",
            ParameterRole::Intensity => "Intensity",
            ParameterRole::Radius => "Radius",
            ParameterRole::Scale => "Scale",
            ParameterRole::Center => "Center",
        }
        .to_string()
    }
}
