//! User profile submitted to the plan generator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Error returned when parsing an invalid profile enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {value:?} (expected one of: {expected})")]
pub struct ProfileValueParseError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for Gender {
    type Err = ProfileValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(ProfileValueParseError {
                field: "gender",
                value: other.to_owned(),
                expected: "male, female, other",
            }),
        }
    }
}

/// Self-reported weekly activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Human-readable description used in the generation prompt.
    pub fn description(self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary (little or no exercise)",
            Self::Light => "Light (exercise 1-3 days/week)",
            Self::Moderate => "Moderate (exercise 3-5 days/week)",
            Self::Active => "Active (exercise 6-7 days/week)",
            Self::VeryActive => "Very Active (intense exercise daily)",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "veryActive",
        };
        f.write_str(s)
    }
}

impl FromStr for ActivityLevel {
    type Err = ProfileValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "veryActive" => Ok(Self::VeryActive),
            other => Err(ProfileValueParseError {
                field: "activity level",
                value: other.to_owned(),
                expected: "sedentary, light, moderate, active, veryActive",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DietPreference {
    Vegetarian,
    NonVegetarian,
    Vegan,
    Jain,
    GlutenFree,
}

impl DietPreference {
    /// Human-readable label used in the generation prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::NonVegetarian => "Non-Vegetarian",
            Self::Vegan => "Vegan",
            Self::Jain => "Jain",
            Self::GlutenFree => "Gluten-Free",
        }
    }
}

impl fmt::Display for DietPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vegetarian => "vegetarian",
            Self::NonVegetarian => "nonVegetarian",
            Self::Vegan => "vegan",
            Self::Jain => "jain",
            Self::GlutenFree => "glutenFree",
        };
        f.write_str(s)
    }
}

impl FromStr for DietPreference {
    type Err = ProfileValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vegetarian" => Ok(Self::Vegetarian),
            "nonVegetarian" => Ok(Self::NonVegetarian),
            "vegan" => Ok(Self::Vegan),
            "jain" => Ok(Self::Jain),
            "glutenFree" => Ok(Self::GlutenFree),
            other => Err(ProfileValueParseError {
                field: "diet preference",
                value: other.to_owned(),
                expected: "vegetarian, nonVegetarian, vegan, jain, glutenFree",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Errors from [`Profile::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("age must be greater than zero")]
    InvalidAge,

    #[error("weight must be a positive number of kilograms, got {0}")]
    InvalidWeight(f64),

    #[error("height must be a positive number of centimetres, got {0}")]
    InvalidHeight(f64),
}

/// Immutable snapshot of the user's attributes at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    name: String,
    age: u32,
    gender: Gender,
    weight: f64,
    height: f64,
    activity_level: ActivityLevel,
    diet_preference: DietPreference,
}

impl Profile {
    /// Build a validated profile. The name is trimmed.
    pub fn new(
        name: &str,
        age: u32,
        gender: Gender,
        weight_kg: f64,
        height_cm: f64,
        activity_level: ActivityLevel,
        diet_preference: DietPreference,
    ) -> Result<Self, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if age == 0 {
            return Err(ProfileError::InvalidAge);
        }
        if !(weight_kg.is_finite() && weight_kg > 0.0) {
            return Err(ProfileError::InvalidWeight(weight_kg));
        }
        if !(height_cm.is_finite() && height_cm > 0.0) {
            return Err(ProfileError::InvalidHeight(height_cm));
        }
        Ok(Self {
            name: name.to_string(),
            age,
            gender,
            weight: weight_kg,
            height: height_cm,
            activity_level,
            diet_preference,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Weight in kilograms.
    pub fn weight_kg(&self) -> f64 {
        self.weight
    }

    /// Height in centimetres.
    pub fn height_cm(&self) -> f64 {
        self.height
    }

    pub fn activity_level(&self) -> ActivityLevel {
        self.activity_level
    }

    pub fn diet_preference(&self) -> DietPreference {
        self.diet_preference
    }
}
