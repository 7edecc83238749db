use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::CoreError;

/// The inclusive range of valid project difficulty ratings.
pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

/// Normalizes a monetary or hour value to exactly two decimal places,
/// rounding half-up. Every decimal is passed through here before it is
/// persisted or compared.
pub fn round_two_places(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A material row as stored, owned by exactly one project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Material {
    pub material_id: i32,
    pub project_id: i32,
    pub material_name: String,
    pub num_required: i32,
    pub cost: Decimal,
}

/// A step row as stored. `step_order` is assigned positionally (1..n) at
/// insert time and defines the display sequence.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Step {
    pub step_id: i32,
    pub project_id: i32,
    pub step_text: String,
    pub step_order: i32,
}

/// A shared category. Names are globally unique; a category is never owned
/// by a single project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i32,
    pub category_name: String,
}

/// A fully hydrated project aggregate: the project row plus its materials,
/// steps, and categories as fetched from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i32,
    pub project_name: String,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    pub materials: Vec<Material>,
    pub steps: Vec<Step>,
    pub categories: Vec<Category>,
}

/// A material to be inserted. The cost is normalized to two decimal places
/// on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    material_name: String,
    num_required: i32,
    cost: Decimal,
}

impl NewMaterial {
    pub fn new(material_name: impl Into<String>, num_required: i32, cost: Decimal) -> Self {
        Self {
            material_name: material_name.into(),
            num_required,
            cost: round_two_places(cost),
        }
    }

    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    pub fn num_required(&self) -> i32 {
        self.num_required
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }
}

/// A step to be inserted. Persisted order is positional in the submitted
/// sequence, so no order field is carried here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStep {
    step_text: String,
}

impl NewStep {
    pub fn new(step_text: impl Into<String>) -> Self {
        Self {
            step_text: step_text.into(),
        }
    }

    pub fn step_text(&self) -> &str {
        &self.step_text
    }
}

/// A category reference by name. Resolved to an existing row, or inserted,
/// when the owning project is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    category_name: String,
}

impl NewCategory {
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            category_name: category_name.into(),
        }
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }
}

/// A project to be inserted, before any identifier exists. Children are only
/// attached through the `add_*` methods so the submission order is fixed by
/// the aggregate itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    project_name: String,
    estimated_hours: Option<Decimal>,
    actual_hours: Option<Decimal>,
    difficulty: Option<i32>,
    notes: Option<String>,
    materials: Vec<NewMaterial>,
    steps: Vec<NewStep>,
    categories: Vec<NewCategory>,
}

impl NewProject {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            estimated_hours: None,
            actual_hours: None,
            difficulty: None,
            notes: None,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Sets the estimated hours, normalized to two decimal places.
    pub fn with_estimated_hours(mut self, hours: Decimal) -> Self {
        self.estimated_hours = Some(round_two_places(hours));
        self
    }

    /// Sets the actual hours, normalized to two decimal places.
    pub fn with_actual_hours(mut self, hours: Decimal) -> Self {
        self.actual_hours = Some(round_two_places(hours));
        self
    }

    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn add_material(&mut self, material: NewMaterial) {
        self.materials.push(material);
    }

    pub fn add_step(&mut self, step: NewStep) {
        self.steps.push(step);
    }

    pub fn add_category(&mut self, category: NewCategory) {
        self.categories.push(category);
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn estimated_hours(&self) -> Option<Decimal> {
        self.estimated_hours
    }

    pub fn actual_hours(&self) -> Option<Decimal> {
        self.actual_hours
    }

    pub fn difficulty(&self) -> Option<i32> {
        self.difficulty
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn materials(&self) -> &[NewMaterial] {
        &self.materials
    }

    pub fn steps(&self) -> &[NewStep] {
        &self.steps
    }

    pub fn categories(&self) -> &[NewCategory] {
        &self.categories
    }

    /// Checks every field against the rules that must hold before any store
    /// access is attempted.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "project_name".into(),
                "must not be blank".into(),
            ));
        }
        validate_difficulty(self.difficulty)?;
        validate_hours("estimated_hours", self.estimated_hours)?;
        validate_hours("actual_hours", self.actual_hours)?;

        for material in &self.materials {
            if material.material_name.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "material_name".into(),
                    "must not be blank".into(),
                ));
            }
            if material.num_required < 0 {
                return Err(CoreError::InvalidInput(
                    "num_required".into(),
                    format!("must not be negative, got {}", material.num_required),
                ));
            }
            if material.cost.is_sign_negative() {
                return Err(CoreError::InvalidInput(
                    "cost".into(),
                    format!("must not be negative, got {}", material.cost),
                ));
            }
        }
        for step in &self.steps {
            if step.step_text.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "step_text".into(),
                    "must not be blank".into(),
                ));
            }
        }
        for category in &self.categories {
            if category.category_name.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "category_name".into(),
                    "must not be blank".into(),
                ));
            }
        }
        Ok(())
    }
}

/// The scalar fields of an existing project to overwrite in an update. Child
/// collections are untouched by updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    project_id: i32,
    project_name: String,
    estimated_hours: Option<Decimal>,
    actual_hours: Option<Decimal>,
    difficulty: Option<i32>,
    notes: Option<String>,
}

impl ProjectUpdate {
    pub fn new(project_id: i32, project_name: impl Into<String>) -> Self {
        Self {
            project_id,
            project_name: project_name.into(),
            estimated_hours: None,
            actual_hours: None,
            difficulty: None,
            notes: None,
        }
    }

    /// Builds an update pre-filled with the current values of a fetched
    /// project, ready for selective overwriting.
    pub fn from_project(project: &Project) -> Self {
        Self {
            project_id: project.project_id,
            project_name: project.project_name.clone(),
            estimated_hours: project.estimated_hours,
            actual_hours: project.actual_hours,
            difficulty: project.difficulty,
            notes: project.notes.clone(),
        }
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn with_estimated_hours(mut self, hours: Decimal) -> Self {
        self.estimated_hours = Some(round_two_places(hours));
        self
    }

    pub fn with_actual_hours(mut self, hours: Decimal) -> Self {
        self.actual_hours = Some(round_two_places(hours));
        self
    }

    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn project_id(&self) -> i32 {
        self.project_id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn estimated_hours(&self) -> Option<Decimal> {
        self.estimated_hours
    }

    pub fn actual_hours(&self) -> Option<Decimal> {
        self.actual_hours
    }

    pub fn difficulty(&self) -> Option<i32> {
        self.difficulty
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_id <= 0 {
            return Err(CoreError::InvalidInput(
                "project_id".into(),
                format!("must be positive, got {}", self.project_id),
            ));
        }
        if self.project_name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "project_name".into(),
                "must not be blank".into(),
            ));
        }
        validate_difficulty(self.difficulty)?;
        validate_hours("estimated_hours", self.estimated_hours)?;
        validate_hours("actual_hours", self.actual_hours)?;
        Ok(())
    }
}

/// Checks that an optional difficulty rating falls inside the 1-5 range.
pub fn validate_difficulty(difficulty: Option<i32>) -> Result<(), CoreError> {
    match difficulty {
        Some(d) if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d) => Err(
            CoreError::InvalidInput(
                "difficulty".into(),
                format!("must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}, got {d}"),
            ),
        ),
        _ => Ok(()),
    }
}

fn validate_hours(field: &str, hours: Option<Decimal>) -> Result<(), CoreError> {
    match hours {
        Some(h) if h.is_sign_negative() => Err(CoreError::InvalidInput(
            field.into(),
            format!("must not be negative, got {h}"),
        )),
        _ => Ok(()),
    }
}
